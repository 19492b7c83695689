use crate::error::{Error, Result};
use crate::types::{ContentPart, Role};

/// One conversational entry: a role and at least one content part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    content: Vec<ContentPart>,
}

impl Turn {
    /// Create a turn, rejecting empty content.
    pub fn new(role: Role, content: Vec<ContentPart>) -> Result<Self> {
        if content.is_empty() {
            return Err(Error::invalid_turn(format!(
                "{role} turn must have at least one content part"
            )));
        }
        Ok(Self { role, content })
    }

    /// Create a turn holding a single text part.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::text(text)],
        }
    }

    /// The author of this turn.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The content parts, in order.
    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }

    /// The concatenated text parts of this turn.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_rejected() {
        let err = Turn::new(Role::User, vec![]).unwrap_err();
        assert!(err.is_invalid_turn());
    }

    #[test]
    fn text_content_skips_images() {
        let turn = Turn::new(
            Role::User,
            vec![ContentPart::image("image/jpeg", "AAAA"), "what is this?".into()],
        )
        .unwrap();
        assert_eq!(turn.role(), Role::User);
        assert_eq!(turn.content().len(), 2);
        assert_eq!(turn.text_content(), "what is this?");
    }
}
