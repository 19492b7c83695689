//! Interactive console chat on top of the client library.
//!
//! This module provides the turn-based REPL: read a question, send the whole conversation to
//! the chat endpoint, and print the reply or the reason there is none.  It supports:
//!
//! - Attaching one local image to the first question
//! - Token usage display after each reply
//! - Category-specific messages for content-filter rejections
//!
//! # Architecture
//!
//! - [`config`]: settings resolution and session configuration
//! - [`input`]: line-oriented input sources
//! - [`session`]: conversation state and the turn-taking loop

mod config;
mod input;
mod session;

pub use crate::render::{OutputSink, PlainTextRenderer, RecordingSink, Style};
pub use config::{
    APP_SETTINGS_FILE, AzureSettings, ChatConfig, DEFAULT_GREETING, DEFAULT_SYSTEM_PROMPT,
    SETTINGS_SECTION,
};
pub use input::{InputSource, LineEditor, ScriptedInput};
pub use session::{ChatSession, SessionState, SessionStats};
