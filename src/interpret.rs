//! Interpretation of chat-completion responses.
//!
//! [`interpret`] turns an HTTP status and raw body into a [`ResponseOutcome`].  It never
//! fails: anything it cannot make sense of becomes [`ResponseOutcome::UnparseableError`].

use serde_json::Value;

use crate::types::{FilterCategory, POLICY_NO_DETAIL, ResponseOutcome, UsageStats};
use crate::utils::Probe;

/// Interpret one response from the chat endpoint.
///
/// For a 2xx status the body must carry `choices[0].message.role` and a non-empty
/// `choices[0].message.content`; `usage` is optional.  An empty `content` counts as
/// unparseable, so a success outcome can always be recorded as an assistant turn.  For any other status the body is read
/// as an error document and `error.innererror.content_filter_result` decides between a
/// content-filter rejection and a plain request error.  When several filter categories are
/// flagged, the first of violence, hate, sexual and self-harm wins.
pub fn interpret(http_status: u16, raw_body: &str) -> ResponseOutcome {
    if (200..300).contains(&http_status) {
        interpret_success(raw_body)
    } else {
        interpret_failure(http_status, raw_body)
    }
}

fn interpret_success(raw_body: &str) -> ResponseOutcome {
    let unparseable = || ResponseOutcome::UnparseableError {
        raw_body: raw_body.to_string(),
    };
    if raw_body.is_empty() {
        return unparseable();
    }
    let Ok(document) = serde_json::from_str::<Value>(raw_body) else {
        return unparseable();
    };
    let message = Probe::new(&document).field("choices").index(0).field("message");
    let (Some(role), Some(content)) = (
        message.field("role").as_str(),
        message.field("content").as_str(),
    ) else {
        return unparseable();
    };
    if content.is_empty() {
        return unparseable();
    }
    ResponseOutcome::Success {
        role: role.to_string(),
        content: content.to_string(),
        usage: usage(Probe::new(&document).field("usage")),
    }
}

fn usage(probe: Probe<'_>) -> Option<UsageStats> {
    probe.get()?.as_object()?;
    Some(UsageStats {
        completion_tokens: probe.field("completion_tokens").as_u64().unwrap_or(0),
        prompt_tokens: probe.field("prompt_tokens").as_u64().unwrap_or(0),
        total_tokens: probe.field("total_tokens").as_u64().unwrap_or(0),
    })
}

fn interpret_failure(http_status: u16, raw_body: &str) -> ResponseOutcome {
    let Ok(document) = serde_json::from_str::<Value>(raw_body) else {
        return ResponseOutcome::UnparseableError {
            raw_body: raw_body.to_string(),
        };
    };
    let filter = Probe::new(&document)
        .field("error")
        .field("innererror")
        .field("content_filter_result");
    if !filter.exists() {
        return ResponseOutcome::RequestError {
            http_status,
            reason: POLICY_NO_DETAIL.to_string(),
        };
    }
    let category = FilterCategory::PRIORITY
        .iter()
        .find(|(_, key)| filter.field(key).field("filtered").as_bool() == Some(true))
        .map(|(category, _)| *category)
        .unwrap_or(FilterCategory::Unspecified);
    ResponseOutcome::ContentFiltered { category }
}
