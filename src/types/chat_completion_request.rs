use serde::{Deserialize, Serialize};

use crate::types::{ContentPart, GenerationParameters, Role, Transcript, Turn};

/// An image reference on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageUrl {
    /// A `data:` URI.
    pub url: String,
}

/// One content part on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireContentPart {
    /// `{"type": "text", "text": ...}`
    Text {
        /// The text.
        text: String,
    },

    /// `{"type": "image_url", "image_url": {"url": ...}}`
    ImageUrl {
        /// The image reference.
        image_url: ImageUrl,
    },
}

impl From<&ContentPart> for WireContentPart {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text { value } => WireContentPart::Text {
                text: value.clone(),
            },
            ContentPart::ImageReference {
                mime_type,
                base64_data,
            } => WireContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{mime_type};base64,{base64_data}"),
                },
            },
        }
    }
}

/// One message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireMessage {
    /// Author of the message.
    pub role: Role,

    /// Ordered content parts.
    pub content: Vec<WireContentPart>,
}

impl From<&Turn> for WireMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content().iter().map(WireContentPart::from).collect(),
        }
    }
}

/// The body POSTed to the chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The whole conversation, oldest first.
    pub messages: Vec<WireMessage>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling value.
    pub top_p: f32,

    /// Maximum tokens in the reply.
    pub max_tokens: u32,

    /// Always false.
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Build the request for a transcript.
    ///
    /// Every turn becomes one message in transcript order.  Text parts become `text` parts and
    /// images become `image_url` parts carrying a `data:` URI.
    pub fn build(transcript: &Transcript, params: &GenerationParameters) -> Self {
        Self {
            messages: transcript.turns().iter().map(WireMessage::from).collect(),
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stream: params.stream,
        }
    }

    /// Serialize to the JSON body sent on the wire.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
