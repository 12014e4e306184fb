//! Reply templates.
//!
//! Every reply the agent sends comes from one of these functions. They are
//! pure: no I/O, no store access, no decisions beyond filling in the slots.

use crate::extract::TIME_NOT_SPECIFIED;
use crate::store::ReminderRecord;

/// Shown in listings when a reminder has no time.
pub const NO_TIME_SET: &str = "No time set";

/// Greeting and usage examples.
pub fn help() -> String {
    "👋 Hi! I'm your reminder bot!\n\n\
     📝 Just tell me things like:\n\
     • \"Remind me to call mom at 6pm\"\n\
     • \"Shopping list for tomorrow\"\n\
     • \"Meeting with boss at 3pm tomorrow\"\n\n\
     📋 Type \"list\" to see all reminders\n\
     🗑️ Type \"clear\" to delete all reminders"
        .to_string()
}

pub fn empty_list() -> String {
    "📭 No reminders yet!".to_string()
}

/// Numbered listing, 1-based, in the given order.
pub fn list_of(records: &[ReminderRecord]) -> String {
    let mut out = String::from("📝 *Your Reminders:*\n\n");
    for (i, r) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n   ⏰ {}\n\n",
            i + 1,
            r.task,
            display_time(&r.time)
        ));
    }
    out
}

pub fn cleared() -> String {
    "🗑️ All reminders cleared!".to_string()
}

/// Confirmation for a stored reminder.
pub fn confirmation(task: &str, time: &str, date: &str) -> String {
    format!(
        "✅ *Got it!*\n\n\
         📌 Task: {task}\n\
         ⏰ Time: {time}\n\
         📅 Date: {date}\n\n\
         Type \"list\" to see all reminders"
    )
}

/// Reply for any extraction failure.
pub fn extraction_failed() -> String {
    "❌ Sorry, I didn't understand that.\n\n\
     Try saying:\n\
     • \"Remind me to [task] at [time]\"\n\
     • Type \"help\" for examples"
        .to_string()
}

fn display_time(time: &str) -> &str {
    let trimmed = time.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(TIME_NOT_SPECIFIED) {
        NO_TIME_SET
    } else {
        trimmed
    }
}
