pub mod outcome;
pub mod reporter;

use serde_json::{json, Value};

use self::outcome::{CommandStatus, ExecutionOutcome};

pub fn to_json_response(outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(&outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(message: &str) -> String {
    let prefix = "pyship";
    if message.is_empty() {
        prefix.to_string()
    } else if message.starts_with(prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
