//! Line-oriented user input.

use std::collections::VecDeque;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// Source of user input lines.
pub trait InputSource {
    /// Read one line, or `None` once input has ended.
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// Interactive input backed by `rustyline`, with in-memory history.
pub struct LineEditor {
    editor: DefaultEditor,
    prompt: String,
}

impl LineEditor {
    /// Creates an editor that shows `prompt` before each line.
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|err| Error::input(format!("failed to initialize line editor: {err}")))?;
        Ok(Self {
            editor,
            prompt: prompt.into(),
        })
    }
}

impl InputSource for LineEditor {
    fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl+D and Ctrl+C both end the conversation.
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(err) => Err(Error::input(err.to_string())),
        }
    }
}

/// Input replayed from a fixed list of lines; ends when the list is exhausted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Creates input that yields `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not yet read.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_ends_with_none() {
        let mut input = ScriptedInput::new(["a", "b"]);
        assert_eq!(input.read_line().unwrap().as_deref(), Some("a"));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.read_line().unwrap().as_deref(), Some("b"));
        assert_eq!(input.read_line().unwrap(), None);
    }
}
