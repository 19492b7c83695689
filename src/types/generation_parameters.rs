use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default nucleus sampling value.
pub const DEFAULT_TOP_P: f32 = 0.95;

/// Default maximum tokens per response.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Sampling parameters sent with every request of a session.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling value.
    pub top_p: f32,

    /// Maximum tokens in a reply.
    pub max_tokens: u32,

    /// Streaming is never requested.
    pub stream: bool,
}

impl GenerationParameters {
    /// Create parameters with the given sampling values; streaming stays off.
    pub fn new(temperature: f32, top_p: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            top_p,
            max_tokens,
            stream: false,
        }
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE, DEFAULT_TOP_P, DEFAULT_MAX_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = GenerationParameters::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.95);
        assert_eq!(params.max_tokens, 800);
        assert!(!params.stream);
    }
}
