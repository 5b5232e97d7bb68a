//! A terminal demo of the chatbot widget, talking to a real backend.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use nyang::core::{
    ChatbotBuilder, ChatbotConfigBuilder, DEFAULT_GREETING, PENDING_INDICATOR,
};
use nyang::model::{Message, QuickReply};
use nyang::render::{render_message, render_quick_replies};
use nyang::{Router, RouterEvent};
use nyang_http_service::{HttpChatService, HttpServiceConfigBuilder};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

const HELP: &str = "\
/open          open the chat window
/close         close the chat window
/go <path>     navigate to another page
/quick <n>     pick a quick reply
/link <n>      follow a link of the last answer
/transcript    dump the widget state as JSON
/quit          exit";

enum AppEvent {
    Input(String),
    Message(Message),
    QuickReplies(Vec<QuickReply>),
    Reset,
    Idle,
    Router(RouterEvent),
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Say(&'a str),
    Open,
    Close,
    Go(&'a str),
    Quick(usize),
    Link(usize),
    Transcript,
    Help,
    Quit,
    Invalid(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Say(line);
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(name, arg)| (name, arg.trim()))
            .unwrap_or((command, ""));
        let index = || arg.parse::<usize>().ok().filter(|n| *n > 0);

        match name {
            "open" => Self::Open,
            "close" => Self::Close,
            "go" if arg.starts_with('/') => Self::Go(arg),
            "quick" => index().map_or(Self::Invalid(line), Self::Quick),
            "link" => index().map_or(Self::Invalid(line), Self::Link),
            "transcript" => Self::Transcript,
            "help" => Self::Help,
            "quit" => Self::Quit,
            _ => Self::Invalid(line),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base_url = env::var("NYANG_API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
    let mut config_builder = ChatbotConfigBuilder::new();
    if let Ok(origin) = env::var("NYANG_ORIGIN") {
        match Url::parse(&origin) {
            Ok(origin) => config_builder = config_builder.with_origin(origin),
            Err(err) => {
                eprintln!("NYANG_ORIGIN is not a valid URL: {err}");
                return;
            }
        }
    }

    let mut service_config =
        HttpServiceConfigBuilder::new().with_base_url(base_url);
    if let Ok(timeout) = env::var("NYANG_API_TIMEOUT_SECS") {
        match timeout.parse::<u64>() {
            Ok(secs) => {
                service_config =
                    service_config.with_timeout(Duration::from_secs(secs));
            }
            Err(err) => {
                eprintln!("NYANG_API_TIMEOUT_SECS is not a number: {err}");
                return;
            }
        }
    }
    let service_config = service_config.build();
    let service = match HttpChatService::new(service_config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to create the HTTP client: {err}");
            return;
        }
    };

    let (router, mut router_rx) = Router::new("/");
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let chatbot = ChatbotBuilder::with_service(service, router.clone())
        .with_config(config_builder.build())
        .with_initial_path(router.current())
        .on_message({
            let event_tx = event_tx.clone();
            move |msg| {
                event_tx.send(AppEvent::Message(msg.clone())).ok();
            }
        })
        .on_quick_replies({
            let event_tx = event_tx.clone();
            move |replies| {
                event_tx.send(AppEvent::QuickReplies(replies.to_vec())).ok();
            }
        })
        .on_reset({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(AppEvent::Reset).ok();
            }
        })
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(AppEvent::Idle).ok();
            }
        })
        .build();

    tokio::spawn(read_lines(event_tx));

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .expect("spinner template is valid")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!("{}", "Type /help to see the commands.".dimmed());
    print_bot_message(&Message::bot(DEFAULT_GREETING));
    chatbot.open();

    let mut progress_bar: Option<ProgressBar> = None;
    let mut waiting = false;
    let mut quick_replies: Vec<QuickReply> = Vec::new();
    let mut links: Vec<String> = Vec::new();
    prompt();

    loop {
        if waiting {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message(PENDING_INDICATOR);
                    progress_bar
                })
                .inc(1);
        }

        let sleep = sleep(Duration::from_millis(100));
        let event = select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                event
            },
            Some(event) = router_rx.recv() => AppEvent::Router(event),
            _ = sleep => {
                continue;
            }
        };

        // Finish the progress bar before printing anything else.
        if let Some(progress_bar) = progress_bar.take() {
            progress_bar.finish_and_clear();
        }

        match event {
            AppEvent::Input(line) => match Command::parse(&line) {
                Command::Say("") => prompt(),
                Command::Say(text) => {
                    chatbot.send_user_message(text);
                    waiting = true;
                }
                Command::Open => {
                    chatbot.open();
                    prompt();
                }
                Command::Close => {
                    chatbot.close();
                    prompt();
                }
                Command::Go(path) => router.push(path),
                Command::Quick(n) => {
                    if let Some(reply) = quick_replies.get(n - 1) {
                        chatbot.select_quick_reply(reply.clone());
                        waiting = true;
                    } else {
                        println!("no quick reply [{n}]");
                        prompt();
                    }
                }
                Command::Link(n) => match links.get(n - 1) {
                    Some(target) => chatbot.follow_link(target.clone()),
                    None => {
                        println!("no link [{n}]");
                        prompt();
                    }
                },
                Command::Transcript => {
                    match chatbot.snapshot().await {
                        Ok(snapshot) => {
                            match serde_json::to_string_pretty(&snapshot) {
                                Ok(json) => println!("{json}"),
                                Err(err) => error!("{err}"),
                            }
                        }
                        Err(err) => error!("{err}"),
                    }
                    prompt();
                }
                Command::Help => {
                    println!("{HELP}");
                    prompt();
                }
                Command::Quit => break,
                Command::Invalid(line) => {
                    println!("unknown command: {line}");
                    prompt();
                }
            },
            AppEvent::Message(msg) => {
                if msg.is_bot() {
                    links = print_bot_message(&msg);
                }
            }
            AppEvent::QuickReplies(replies) => {
                if !replies.is_empty() {
                    println!("{}", render_quick_replies(&replies));
                }
                quick_replies = replies;
            }
            AppEvent::Reset => {
                println!("{}", "── 새 대화 ──".dimmed());
                links = print_bot_message(&Message::bot(DEFAULT_GREETING));
                waiting = false;
            }
            AppEvent::Idle => {
                waiting = false;
                prompt();
            }
            AppEvent::Router(RouterEvent::Navigated(event)) => {
                println!("📍 {}", event.path.bright_magenta());
                chatbot.navigated(event);
                if !waiting {
                    prompt();
                }
            }
            AppEvent::Router(RouterEvent::OpenedExternal(url)) => {
                println!("🔗 {}", url.bright_magenta());
                if !waiting {
                    prompt();
                }
            }
        }
    }
}

/// Prints a bot message and returns the targets of its links.
fn print_bot_message(msg: &Message) -> Vec<String> {
    let rendered = render_message(msg);
    println!("{}", rendered.line);
    rendered.links
}

fn prompt() {
    print!("> ");
    std::io::stdout().flush().ok();
}

async fn read_lines(event_tx: mpsc::UnboundedSender<AppEvent>) {
    let mut lines = io::BufReader::new(io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if event_tx.send(AppEvent::Input(line)).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                error!("error reading input: {err}");
                break;
            }
        }
    }
    // Closing stdin quits the demo.
    event_tx.send(AppEvent::Input("/quit".to_owned())).ok();
}
