use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{ContentPart, Role, Turn};

/// The ordered, append-only record of a conversation.
///
/// A transcript always opens with a system turn followed by the assistant's greeting.  Turns
/// are only ever appended; insertion order is chronological order is wire order.  The
/// transcript does not enforce user/assistant alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Start a transcript with the system prompt and the assistant's greeting.
    pub fn initialize(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![
                Turn::text(Role::System, system_prompt),
                Turn::text(Role::Assistant, greeting),
            ],
        }
    }

    /// Append a user turn made of the given parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTurn`] if `parts` is empty.
    pub fn append_user_turn(&mut self, parts: Vec<ContentPart>) -> Result<()> {
        let turn = Turn::new(Role::User, parts)?;
        self.turns.push(turn);
        Ok(())
    }

    /// Append the assistant's reply as a single text part.
    ///
    /// `role` is the role the service reported for the reply.  The turn is always recorded as
    /// an assistant turn; a different reported role is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTurn`] if `content` is empty.
    pub fn append_assistant_turn(&mut self, role: &str, content: &str) -> Result<()> {
        if content.is_empty() {
            return Err(Error::invalid_turn("assistant reply is empty"));
        }
        if role.parse::<Role>() != Ok(Role::Assistant) {
            warn!(role, "service reported a non-assistant role for its reply");
        }
        self.turns.push(Turn::text(Role::Assistant, content));
        Ok(())
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns recorded.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false; a transcript starts with two turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True until the first user turn has been appended.
    pub fn awaiting_first_user_turn(&self) -> bool {
        !self.turns.iter().any(|turn| turn.role() == Role::User)
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_seeds_system_and_greeting() {
        let transcript = Transcript::initialize("S", "G");
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0], Turn::text(Role::System, "S"));
        assert_eq!(transcript.turns()[1], Turn::text(Role::Assistant, "G"));
        assert!(transcript.awaiting_first_user_turn());
    }

    #[test]
    fn empty_user_turn_rejected() {
        let mut transcript = Transcript::initialize("S", "G");
        let err = transcript.append_user_turn(vec![]).unwrap_err();
        assert!(err.is_invalid_turn());
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn empty_assistant_turn_rejected() {
        let mut transcript = Transcript::initialize("S", "G");
        let err = transcript.append_assistant_turn("assistant", "").unwrap_err();
        assert!(err.is_invalid_turn());
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn appends_never_disturb_earlier_turns() {
        let mut transcript = Transcript::initialize("S", "G");
        let mut seen: Vec<Turn> = transcript.turns().to_vec();

        let steps: Vec<Box<dyn Fn(&mut Transcript) -> Result<()>>> = vec![
            Box::new(|t: &mut Transcript| t.append_user_turn(vec!["one".into()])),
            Box::new(|t: &mut Transcript| t.append_assistant_turn("assistant", "reply one")),
            Box::new(|t: &mut Transcript| t.append_user_turn(vec!["two".into()])),
            Box::new(|t: &mut Transcript| t.append_user_turn(vec!["three".into()])),
            Box::new(|t: &mut Transcript| t.append_assistant_turn("assistant", "reply three")),
        ];
        for step in steps {
            step(&mut transcript).unwrap();
            assert_eq!(transcript.len(), seen.len() + 1);
            assert_eq!(&transcript.turns()[..seen.len()], &seen[..]);
            seen = transcript.turns().to_vec();
        }
        assert!(!transcript.awaiting_first_user_turn());
    }

    #[test]
    fn reported_role_does_not_change_turn_role() {
        let mut transcript = Transcript::initialize("S", "G");
        transcript.append_assistant_turn("tool", "odd").unwrap();
        assert_eq!(transcript.last().unwrap().role(), Role::Assistant);
    }
}
