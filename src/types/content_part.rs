/// One unit of a turn's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// The text itself.
        value: String,
    },

    /// An inline image, carried as base64 and rendered on the wire as a data URI.
    ImageReference {
        /// MIME type such as `image/jpeg`.
        mime_type: String,
        /// Standard base64 encoding of the image bytes.
        base64_data: String,
    },
}

impl ContentPart {
    /// Create a text part.
    pub fn text(value: impl Into<String>) -> Self {
        ContentPart::Text {
            value: value.into(),
        }
    }

    /// Create an image part from already-encoded data.
    pub fn image(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        ContentPart::ImageReference {
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
        }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { value } => Some(value),
            ContentPart::ImageReference { .. } => None,
        }
    }

    /// Returns true if this part is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, ContentPart::ImageReference { .. })
    }

    /// The `data:` URI for an image part.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            ContentPart::Text { .. } => None,
            ContentPart::ImageReference {
                mime_type,
                base64_data,
            } => Some(format!("data:{mime_type};base64,{base64_data}")),
        }
    }
}

impl From<&str> for ContentPart {
    fn from(value: &str) -> Self {
        ContentPart::text(value)
    }
}

impl From<String> for ContentPart {
    fn from(value: String) -> Self {
        ContentPart::text(value)
    }
}
