use serde::{Deserialize, Deserializer, Serialize};

use crate::QuickReply;

/// A response from the chat endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatReply {
    /// The bot's answer. Services may omit it when nothing was generated.
    #[serde(default)]
    pub reply: Option<String>,
}

impl ChatReply {
    /// Creates a reply with the given text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            reply: Some(text.into()),
        }
    }

    /// Returns the reply text, treating an empty string as absent.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|s| !s.is_empty())
    }
}

/// A response from the suggestions endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestions {
    /// Quick replies for the requested page.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggestions: Vec<QuickReply>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<QuickReply>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<QuickReply>> = Option::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_fields() {
        let reply: ChatReply = serde_json::from_value(json!({})).unwrap();
        assert_eq!(reply.text(), None);

        let reply: ChatReply =
            serde_json::from_value(json!({ "reply": "" })).unwrap();
        assert_eq!(reply.text(), None);

        let suggestions: Suggestions =
            serde_json::from_value(json!({ "suggestions": null })).unwrap();
        assert!(suggestions.suggestions.is_empty());

        let suggestions: Suggestions =
            serde_json::from_value(json!({})).unwrap();
        assert!(suggestions.suggestions.is_empty());
    }
}
