//! Convenience re-exports for wiring up the agent.
//!
//! ```ignore
//! use remind_rs::prelude::*;
//! ```

pub use crate::OpenRouterClient;
pub use crate::api::{CompletionBackend, CompletionRequest, FnBackend, RetryConfig};
pub use crate::config::AgentConfig;
pub use crate::extract::{ExtractedReminder, ExtractionClient, ExtractionError};
pub use crate::heartbeat::spawn_heartbeat;
pub use crate::router::{InboundMessage, MessageRouter};
pub use crate::store::{ReminderId, ReminderRecord, ReminderStore};
