//! Logging trait for chat endpoint exchanges.
//!
//! This module provides the [`ExchangeLogger`] trait that allows callers to capture every
//! request body and response passing through an [`HttpSender`](crate::HttpSender).

/// A trait for logging chat endpoint exchanges.
///
/// # Example
///
/// ```rust,ignore
/// use aoai_chat::ExchangeLogger;
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ExchangeLogger for FileLogger {
///     fn log_request(&self, body: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Request: {body}").unwrap();
///     }
///
///     fn log_response(&self, status: u16, body: &str) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response {status}: {body}").unwrap();
///     }
/// }
/// ```
pub trait ExchangeLogger: Send + Sync {
    /// Log a JSON body just before it is sent.
    fn log_request(&self, body: &str);

    /// Log a response once its body has been read, whatever the status.
    fn log_response(&self, status: u16, body: &str);
}
