use std::fmt;

use crate::types::UsageStats;

/// Reason reported when the service answers with no usable policy detail.
pub const POLICY_NO_DETAIL: &str = "policy violation, no detail";

/// Reason reported when the request never reached the service.
pub const TRANSPORT_FAILURE: &str = "transport failure";

/// The content-policy category a request was rejected for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    /// Violent content.
    Violence,
    /// Hateful content.
    Hate,
    /// Sexual content.
    Sexual,
    /// Self-harm content.
    SelfHarm,
    /// Filtered, but no flagged category was reported.
    Unspecified,
}

impl FilterCategory {
    /// Flagged categories in the order they are checked; the first flagged one is reported.
    pub const PRIORITY: [(FilterCategory, &'static str); 4] = [
        (FilterCategory::Violence, "violence"),
        (FilterCategory::Hate, "hate"),
        (FilterCategory::Sexual, "sexual"),
        (FilterCategory::SelfHarm, "self_harm"),
    ];

    /// The message shown to the user for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            FilterCategory::Violence => "Your request was filtered due to violent content.",
            FilterCategory::Hate => "Your request was filtered due to hateful content.",
            FilterCategory::Sexual => "Your request was filtered due to sexual content.",
            FilterCategory::SelfHarm => "Your request was filtered due to self-harm content.",
            FilterCategory::Unspecified => "Your request was filtered by the assistant's policies.",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterCategory::Violence => "violence",
            FilterCategory::Hate => "hate",
            FilterCategory::Sexual => "sexual",
            FilterCategory::SelfHarm => "self_harm",
            FilterCategory::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

/// The interpretation of one response from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The service completed the conversation.
    Success {
        /// Role reported for the reply.
        role: String,
        /// Text of the reply.
        content: String,
        /// Token accounting, when reported.
        usage: Option<UsageStats>,
    },

    /// The service rejected the request under its content policy.
    ContentFiltered {
        /// The single category reported.
        category: FilterCategory,
    },

    /// The request failed without recognizable policy detail, or never reached the service.
    RequestError {
        /// HTTP status; 0 when no response was received.
        http_status: u16,
        /// Short reason.
        reason: String,
    },

    /// The response body could not be interpreted.
    UnparseableError {
        /// The body as received.
        raw_body: String,
    },
}

impl ResponseOutcome {
    /// Outcome for a request that never produced an HTTP response.
    pub fn transport_failure() -> Self {
        ResponseOutcome::RequestError {
            http_status: 0,
            reason: TRANSPORT_FAILURE.to_string(),
        }
    }

    /// Returns true for [`ResponseOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success { .. })
    }

    /// The filter category, if the request was filtered.
    pub fn filter_category(&self) -> Option<FilterCategory> {
        match self {
            ResponseOutcome::ContentFiltered { category } => Some(*category),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        let order: Vec<FilterCategory> = FilterCategory::PRIORITY.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
                FilterCategory::Violence,
                FilterCategory::Hate,
                FilterCategory::Sexual,
                FilterCategory::SelfHarm,
            ]
        );
    }

    #[test]
    fn transport_failure_has_status_zero() {
        assert_eq!(
            ResponseOutcome::transport_failure(),
            ResponseOutcome::RequestError {
                http_status: 0,
                reason: "transport failure".to_string(),
            }
        );
    }

    #[test]
    fn filter_category_accessor() {
        let outcome = ResponseOutcome::ContentFiltered {
            category: FilterCategory::Hate,
        };
        assert_eq!(outcome.filter_category(), Some(FilterCategory::Hate));
        assert!(!outcome.is_success());
    }
}
