//! Correlation ids for inbound messages.
//!
//! Every message handled by the router gets a `msg-…` id that is attached to
//! all log lines emitted while handling it, so interleaved conversations can
//! be told apart in the log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Generate a unique correlation id for one inbound message.
pub fn generate_message_id() -> String {
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    // Counter disambiguates calls within the same clock tick.
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("msg-{ts:x}-{count:04x}")
}
