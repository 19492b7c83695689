use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Token accounting reported with a successful completion.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens in the generated reply.
    pub completion_tokens: u64,

    /// Tokens in the submitted conversation.
    pub prompt_tokens: u64,

    /// Sum of prompt and completion tokens, as reported.
    pub total_tokens: u64,
}

impl UsageStats {
    /// Create a new `UsageStats`.
    pub fn new(completion_tokens: u64, prompt_tokens: u64, total_tokens: u64) -> Self {
        Self {
            completion_tokens,
            prompt_tokens,
            total_tokens,
        }
    }
}

impl Add for UsageStats {
    type Output = UsageStats;

    fn add(self, rhs: UsageStats) -> UsageStats {
        UsageStats {
            completion_tokens: self.completion_tokens.saturating_add(rhs.completion_tokens),
            prompt_tokens: self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            total_tokens: self.total_tokens.saturating_add(rhs.total_tokens),
        }
    }
}
