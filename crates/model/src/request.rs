use serde::{Deserialize, Serialize};

use crate::Message;

/// A request to the chat endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question the user just asked.
    pub message: String,
    /// The trailing window of the transcript before `message` was added.
    pub history: Vec<Message>,
}

/// A request for quick replies suited to a page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionsRequest {
    /// The path of the page the user is currently on, without the query.
    pub current_path: String,
}
