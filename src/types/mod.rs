// Public modules
pub mod chat_completion_request;
pub mod content_part;
pub mod generation_parameters;
pub mod response_outcome;
pub mod role;
pub mod transcript;
pub mod turn;
pub mod usage;

// Re-exports
pub use chat_completion_request::{ChatCompletionRequest, ImageUrl, WireContentPart, WireMessage};
pub use content_part::ContentPart;
pub use generation_parameters::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, GenerationParameters,
};
pub use response_outcome::{FilterCategory, POLICY_NO_DETAIL, ResponseOutcome, TRANSPORT_FAILURE};
pub use role::Role;
pub use transcript::Transcript;
pub use turn::Turn;
pub use usage::UsageStats;
