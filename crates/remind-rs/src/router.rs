//! Inbound message classification and dispatch.
//!
//! [`MessageRouter::handle`] is the single entry point transports call. Each
//! message is routed by [`classify`], first match wins:
//!
//! | Input | Route |
//! |-------|-------|
//! | from a group conversation | [`Route::Ignore`], no reply, no side effect |
//! | `help`, `hi`, `hello` | [`Command::Help`] |
//! | `list`, `show` | [`Command::List`] |
//! | `clear`, `delete all` | [`Command::Clear`] |
//! | anything else | [`Route::FreeForm`], sent to extraction |
//!
//! Commands match the whole message after trimming, case-insensitively.
//! Extraction failures stop here: they are logged with their kind and the
//! sender gets the fixed "didn't understand" reply.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::api::tracing::generate_message_id;
use crate::extract::ExtractionClient;
use crate::format;
use crate::store::{ReminderRecord, ReminderStore};

/// A message delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque id of the conversation the message came from.
    pub conversation_id: String,
    /// Whether the conversation is a group chat.
    #[serde(default)]
    pub is_group: bool,
    /// Message body, verbatim.
    pub text: String,
}

impl InboundMessage {
    /// A message from a one-to-one conversation.
    pub fn direct(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            is_group: false,
            text: text.into(),
        }
    }

    /// A message from a group conversation.
    pub fn group(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            is_group: true,
            text: text.into(),
        }
    }
}

/// Fixed commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Clear,
}

impl Command {
    /// Match a whole message against the command words.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "help" | "hi" | "hello" => Some(Command::Help),
            "list" | "show" => Some(Command::List),
            "clear" | "delete all" => Some(Command::Clear),
            _ => None,
        }
    }
}

/// Where a message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Group message: dropped without a reply.
    Ignore,
    Command(Command),
    /// Natural-language reminder request.
    FreeForm,
}

/// Decide how to handle a message.
pub fn classify(message: &InboundMessage) -> Route {
    if message.is_group {
        return Route::Ignore;
    }
    match Command::parse(&message.text) {
        Some(command) => Route::Command(command),
        None => Route::FreeForm,
    }
}

/// Routes messages to commands or extraction and produces replies.
///
/// Cheap to clone; clones share the same store and extraction client, so a
/// transport can hand one to every concurrent request.
#[derive(Clone)]
pub struct MessageRouter {
    store: Arc<ReminderStore>,
    extractor: Arc<ExtractionClient>,
}

impl MessageRouter {
    pub fn new(store: Arc<ReminderStore>, extractor: Arc<ExtractionClient>) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &Arc<ReminderStore> {
        &self.store
    }

    /// Handle one message. Returns the reply to send back to the same
    /// conversation, or `None` when the message is ignored.
    pub async fn handle(&self, message: &InboundMessage) -> Option<String> {
        let command = match classify(message) {
            Route::Ignore => return None,
            Route::Command(command) => Some(command),
            Route::FreeForm => None,
        };

        let span = info_span!(
            "message",
            id = %generate_message_id(),
            conversation = %message.conversation_id,
        );
        Some(self.dispatch(command, message).instrument(span).await)
    }

    async fn dispatch(&self, command: Option<Command>, message: &InboundMessage) -> String {
        match command {
            Some(Command::Help) => {
                debug!("Help requested");
                format::help()
            }
            Some(Command::List) => {
                let records = self.store.list();
                debug!("Listing {} reminder(s)", records.len());
                if records.is_empty() {
                    format::empty_list()
                } else {
                    format::list_of(&records)
                }
            }
            Some(Command::Clear) => {
                let removed = self.store.clear();
                info!("Cleared {removed} reminder(s)");
                format::cleared()
            }
            None => self.handle_free_form(message).await,
        }
    }

    async fn handle_free_form(&self, message: &InboundMessage) -> String {
        info!("Processing: {}", message.text);
        match self.extractor.extract(&message.text).await {
            Ok(extracted) => {
                let record = self.store.append(|id| {
                    ReminderRecord::from_extraction(
                        id,
                        &message.conversation_id,
                        extracted,
                        &message.text,
                    )
                });
                info!(
                    reminder = %record.id,
                    "Saved reminder: task={:?} time={:?} date={:?}",
                    record.task, record.time, record.date
                );
                format::confirmation(&record.task, &record.time, &record.date)
            }
            Err(e) => {
                warn!(kind = e.kind(), "Extraction failed: {e}");
                format::extraction_failed()
            }
        }
    }
}
