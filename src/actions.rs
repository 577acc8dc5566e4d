// WHY: Action collaborator: what the host does with a resolved match
// Opening URLs and dialing are fire-and-forget; nothing flows back into the core

use serde::Serialize;
use tracing::info;

use crate::annotation::{Match, MatchTarget};

/// Dial-scheme prefix prepended to a phone number's dial string
pub const DEFAULT_DIAL_PREFIX: &str = "tel://";

/// Host operation chosen for a tapped match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    OpenLink { url: String },
    Dial { url: String },
}

impl Action {
    /// Links open their URL; phone numbers dial `dial_prefix` + dial string
    ///
    /// The dial string is not validated; a handler may still refuse it.
    pub fn for_match(m: &Match, dial_prefix: &str) -> Self {
        match &m.target {
            MatchTarget::Link { url } => Action::OpenLink { url: url.clone() },
            MatchTarget::PhoneNumber { dial } => Action::Dial {
                url: format!("{dial_prefix}{dial}"),
            },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Action::OpenLink { url } | Action::Dial { url } => url,
        }
    }
}

/// Host hooks for opening links and phone numbers
pub trait ActionHandler {
    fn open_link(&mut self, url: &str);
    fn open_phone_number(&mut self, dial_url: &str);
}

/// Route an action to the matching handler hook
pub fn dispatch(action: &Action, handler: &mut dyn ActionHandler) {
    match action {
        Action::OpenLink { url } => handler.open_link(url),
        Action::Dial { url } => handler.open_phone_number(url),
    }
}

/// Handler that only records the request in the log
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl ActionHandler for LoggingHandler {
    fn open_link(&mut self, url: &str) {
        info!(url, "Open link requested");
    }

    fn open_phone_number(&mut self, dial_url: &str) {
        info!(dial_url, "Dial requested");
    }
}

/// Handler that keeps every dispatched action in order
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub actions: Vec<Action>,
}

impl ActionHandler for RecordingHandler {
    fn open_link(&mut self, url: &str) {
        self.actions.push(Action::OpenLink { url: url.to_string() });
    }

    fn open_phone_number(&mut self, dial_url: &str) {
        self.actions.push(Action::Dial {
            url: dial_url.to_string(),
        });
    }
}
