//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript, drives one
//! request/response exchange per user message, and reports every outcome through an
//! [`OutputSink`].

use std::path::Path;

use tracing::{debug, warn};
use url::Url;

use crate::chat::config::ChatConfig;
use crate::chat::input::InputSource;
use crate::client::{ChatSender, reason_phrase};
use crate::error::Result;
use crate::image::{ImageData, ImageLoader};
use crate::interpret::interpret;
use crate::observability::{
    SESSION_CONTENT_FILTERED, SESSION_REQUEST_ERRORS, SESSION_SUCCESSES, SESSION_TRANSPORT_FAILURES,
    SESSION_TURNS, SESSION_UNPARSEABLE,
};
use crate::render::{OutputSink, Style};
use crate::types::{
    ChatCompletionRequest, ContentPart, GenerationParameters, ResponseOutcome, Transcript,
    UsageStats,
};

const PROMPT_INCLUDE_IMAGE: &str = "Do you want to include an image in the query? (y/n)";
const PROMPT_IMAGE_PATH: &str = "Enter the image path:";
const IMAGE_NOT_FOUND: &str = "The image path does not exist. Proceeding without an image.";
const PROMPT_FIRST_QUESTION: &str = "Enter your question (type 'exit' to end):";
const PROMPT_NEXT_QUESTION: &str = "Enter your next question (or 'exit' to finish):";
const END_OF_INPUT: &str = "Null input detected. Terminating the program...";
const TERMINATED: &str = "Program terminated.";
const NO_RESPONSE: &str = "No response from the assistant or an error occurred.";
const NO_VALID_RESPONSE: &str = "No valid response was obtained from the assistant.";
const POLICY_WITHOUT_DETAIL: &str =
    "Your request violates the assistant's policies, but no detailed information was obtained.";
const FILTER_REASON_UNKNOWN: &str =
    "Your request was filtered, but the exact reason could not be determined.";

/// Where the session is in its turn-taking loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next user message.
    AwaitingInput,
    /// A request is in flight.
    Sending,
    /// Recording a successful reply.
    ApplyingSuccess,
    /// Reporting a content-filter rejection.
    ReportingFilter,
    /// Reporting a request error or an uninterpretable response.
    ReportingError,
    /// The user left; nothing more will be sent.
    Ended,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The number of turns in the transcript.
    pub turn_count: usize,
    /// Total number of requests attempted.
    pub total_requests: u64,
    /// Requests that produced an assistant reply.
    pub successful_replies: u64,
    /// Usage summed across all replies that reported it.
    pub total_usage: UsageStats,
    /// Usage of the most recent reply, if reported.
    pub last_turn_usage: Option<UsageStats>,
}

/// A chat session that manages conversation state and endpoint interactions.
///
/// The transcript is owned by the session and only exposed read-only.  User turns are recorded
/// before sending; assistant turns only on success.  A failed exchange never ends the session.
pub struct ChatSession<S: ChatSender> {
    sender: S,
    endpoint: Url,
    bearer_token: String,
    parameters: GenerationParameters,
    greeting: String,
    transcript: Transcript,
    image: Option<ImageData>,
    state: SessionState,
    usage_totals: UsageStats,
    last_turn_usage: Option<UsageStats>,
    request_count: u64,
    success_count: u64,
}

impl<S: ChatSender> ChatSession<S> {
    /// Creates a new chat session with the given sender, token, and configuration.
    pub fn new(sender: S, bearer_token: impl Into<String>, config: &ChatConfig) -> Self {
        Self {
            sender,
            endpoint: config.endpoint.clone(),
            bearer_token: bearer_token.into(),
            parameters: config.parameters,
            greeting: config.greeting.clone(),
            transcript: Transcript::initialize(&config.system_prompt, &config.greeting),
            image: None,
            state: SessionState::AwaitingInput,
            usage_totals: UsageStats::default(),
            last_turn_usage: None,
            request_count: 0,
            success_count: 0,
        }
    }

    /// Attach an image to the first user turn.  Ignored once a user turn has been sent.
    pub fn attach_image(&mut self, image: ImageData) {
        if self.transcript.awaiting_first_user_turn() {
            self.image = Some(image);
        } else {
            warn!("image attached after the first user turn; ignoring");
        }
    }

    /// Returns true if an image is waiting to be sent with the first user turn.
    pub fn has_pending_image(&self) -> bool {
        self.image.is_some()
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The current loop state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            turn_count: self.transcript.len(),
            total_requests: self.request_count,
            successful_replies: self.success_count,
            total_usage: self.usage_totals,
            last_turn_usage: self.last_turn_usage,
        }
    }

    /// Display the assistant's greeting.
    pub fn greet(&self, sink: &mut dyn OutputSink) {
        sink.write_line(&format!("[assistant]: {}", self.greeting), Style::AssistantTurn);
    }

    /// Ask whether to attach an image and, if so, load it.
    ///
    /// A missing file, a declined prompt, or the end of input all continue without an image.
    pub fn prompt_for_image(
        &mut self,
        input: &mut dyn InputSource,
        sink: &mut dyn OutputSink,
        loader: &dyn ImageLoader,
    ) -> Result<()> {
        sink.write_line(PROMPT_INCLUDE_IMAGE, Style::Neutral);
        let answer = input.read_line()?.unwrap_or_default();
        if answer.trim().to_lowercase() != "y" {
            return Ok(());
        }

        sink.write_line(PROMPT_IMAGE_PATH, Style::Neutral);
        let path = input.read_line()?.unwrap_or_default();
        let path = path.trim();
        sink.write_line(&format!("Image path entered: '{path}'"), Style::Neutral);
        match loader.read_image_as_base64(Path::new(path))? {
            Some(image) => self.attach_image(image),
            None => sink.write_line(IMAGE_NOT_FOUND, Style::Neutral),
        }
        Ok(())
    }

    /// Run the conversation until the user types `exit` or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if input cannot be read or the transcript rejects a turn.
    pub async fn run(
        &mut self,
        input: &mut dyn InputSource,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        sink.write_line(PROMPT_FIRST_QUESTION, Style::Neutral);
        while self.state != SessionState::Ended {
            self.step(input, sink).await?;
        }
        sink.write_line(TERMINATED, Style::Neutral);
        Ok(())
    }

    /// Read one line and act on it: either exit or perform one exchange.
    pub async fn step(
        &mut self,
        input: &mut dyn InputSource,
        sink: &mut dyn OutputSink,
    ) -> Result<SessionState> {
        if self.state == SessionState::Ended {
            return Ok(self.state);
        }
        let Some(line) = input.read_line()? else {
            sink.write_line(END_OF_INPUT, Style::Neutral);
            self.transition(SessionState::Ended);
            return Ok(self.state);
        };
        let text = line.trim();
        if text.eq_ignore_ascii_case("exit") {
            self.transition(SessionState::Ended);
            return Ok(self.state);
        }
        self.send(text, sink).await?;
        sink.write_line(PROMPT_NEXT_QUESTION, Style::Neutral);
        Ok(self.state)
    }

    /// Send one user message and report the outcome.
    ///
    /// The user turn stays in the transcript whatever the outcome; an assistant turn is
    /// appended only on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTurn`](crate::Error::InvalidTurn) if the turn cannot be recorded.
    pub async fn send(&mut self, text: &str, sink: &mut dyn OutputSink) -> Result<ResponseOutcome> {
        let mut parts = Vec::with_capacity(2);
        if self.transcript.awaiting_first_user_turn()
            && let Some(image) = self.image.take()
        {
            parts.push(ContentPart::from(image));
        }
        parts.push(ContentPart::text(text));
        self.transcript.append_user_turn(parts)?;
        SESSION_TURNS.click();
        sink.write_line(&format!("[user]: {text}"), Style::UserTurn);

        self.transition(SessionState::Sending);
        let body = ChatCompletionRequest::build(&self.transcript, &self.parameters).to_json()?;
        self.request_count = self.request_count.saturating_add(1);
        let (status, outcome) = match self
            .sender
            .send(&self.endpoint, &self.bearer_token, body)
            .await
        {
            Ok(response) => (
                Some(response.status),
                interpret(response.status, &response.body),
            ),
            Err(err) => {
                SESSION_TRANSPORT_FAILURES.click();
                warn!(error = %err, "chat request did not reach the endpoint");
                sink.write_line(NO_RESPONSE, Style::Error);
                sink.write_line(&err.to_string(), Style::Error);
                (None, ResponseOutcome::transport_failure())
            }
        };

        self.apply(status, &outcome, sink)?;
        self.transition(SessionState::AwaitingInput);
        Ok(outcome)
    }

    fn apply(
        &mut self,
        status: Option<u16>,
        outcome: &ResponseOutcome,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        let failed_status = status.filter(|status| !(200..300).contains(status));
        match outcome {
            ResponseOutcome::Success {
                role,
                content,
                usage,
            } => {
                self.transition(SessionState::ApplyingSuccess);
                SESSION_SUCCESSES.click();
                self.transcript.append_assistant_turn(role, content)?;
                self.success_count = self.success_count.saturating_add(1);
                sink.write_line(&format!("[{role}]: {content}"), Style::AssistantTurn);
                self.last_turn_usage = *usage;
                if let Some(usage) = usage {
                    self.usage_totals = self.usage_totals + *usage;
                    sink.write_line(&usage_report(usage), Style::UsageInfo);
                }
            }
            ResponseOutcome::ContentFiltered { category } => {
                self.transition(SessionState::ReportingFilter);
                SESSION_CONTENT_FILTERED.click();
                report_status(failed_status, sink);
                sink.write_line(category.user_message(), Style::Error);
                sink.write_line(NO_RESPONSE, Style::Error);
            }
            ResponseOutcome::RequestError { http_status, reason } => {
                self.transition(SessionState::ReportingError);
                SESSION_REQUEST_ERRORS.click();
                debug!(http_status = *http_status, reason = %reason, "request error");
                // Transport failures were already reported where they happened.
                if status.is_some() {
                    report_status(failed_status, sink);
                    sink.write_line(POLICY_WITHOUT_DETAIL, Style::Error);
                    sink.write_line(NO_RESPONSE, Style::Error);
                }
            }
            ResponseOutcome::UnparseableError { raw_body } => {
                self.transition(SessionState::ReportingError);
                SESSION_UNPARSEABLE.click();
                debug!(bytes = raw_body.len(), "response body could not be interpreted");
                if failed_status.is_some() {
                    report_status(failed_status, sink);
                    sink.write_line(FILTER_REASON_UNKNOWN, Style::Error);
                    sink.write_line(NO_RESPONSE, Style::Error);
                } else if raw_body.is_empty() {
                    sink.write_line(NO_RESPONSE, Style::Error);
                } else {
                    sink.write_line(NO_VALID_RESPONSE, Style::Error);
                }
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

fn report_status(status: Option<u16>, sink: &mut dyn OutputSink) {
    if let Some(status) = status {
        sink.write_line(
            &format!("Error: {status}, {}", reason_phrase(status)),
            Style::Error,
        );
    }
}

fn usage_report(usage: &UsageStats) -> String {
    format!(
        "Usage:\n  completion_tokens: {}\n  prompt_tokens: {}\n  total_tokens: {}",
        usage.completion_tokens, usage.prompt_tokens, usage.total_tokens
    )
}
