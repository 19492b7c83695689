use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("aoai_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("aoai_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("aoai_chat.client.request_duration_seconds");

pub(crate) static AUTH_TOKEN_REQUESTS: Counter = Counter::new("aoai_chat.auth.token_requests");
pub(crate) static AUTH_TOKEN_ERRORS: Counter = Counter::new("aoai_chat.auth.token_errors");

pub(crate) static SESSION_TURNS: Counter = Counter::new("aoai_chat.session.turns");
pub(crate) static SESSION_SUCCESSES: Counter = Counter::new("aoai_chat.session.successes");
pub(crate) static SESSION_CONTENT_FILTERED: Counter =
    Counter::new("aoai_chat.session.content_filtered");
pub(crate) static SESSION_REQUEST_ERRORS: Counter =
    Counter::new("aoai_chat.session.request_errors");
pub(crate) static SESSION_UNPARSEABLE: Counter = Counter::new("aoai_chat.session.unparseable");
pub(crate) static SESSION_TRANSPORT_FAILURES: Counter =
    Counter::new("aoai_chat.session.transport_failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&AUTH_TOKEN_REQUESTS);
    collector.register_counter(&AUTH_TOKEN_ERRORS);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_SUCCESSES);
    collector.register_counter(&SESSION_CONTENT_FILTERED);
    collector.register_counter(&SESSION_REQUEST_ERRORS);
    collector.register_counter(&SESSION_UNPARSEABLE);
    collector.register_counter(&SESSION_TRANSPORT_FAILURES);
}
