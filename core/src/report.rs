//! Turning failed calls into user-facing messages.

use tracing::warn;

use crate::error::RestError;
use crate::events::{EventBus, MAIN_ERROR_TOPIC};

/// Human-readable message for a failed call. Total over `RestError`.
pub fn classify(error: &RestError) -> String {
    match error {
        RestError::ServerRejection { status, data } => {
            format!("Request failed with status code {status} and message: {data}")
        }
        RestError::NoResponse { .. } => {
            "Request failed with no response from the back end.".to_string()
        }
        RestError::RequestConstruction { message } => format!("Request failed: {message}"),
    }
}

/// Publishes classified failures on the `"main-error"` topic.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    bus: EventBus,
}

impl ErrorReporter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Returns the published message.
    pub fn report(&self, error: &RestError) -> String {
        let message = classify(error);
        if let RestError::NoResponse { reason } = error {
            warn!(%reason, "request got no response");
        } else {
            warn!(%message, "request failed");
        }
        self.bus.publish(MAIN_ERROR_TOPIC, message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejection_renders_compact_json() {
        let err = RestError::rejection(404, json!({"msg": "not found"}));
        assert_eq!(
            classify(&err),
            r#"Request failed with status code 404 and message: {"msg":"not found"}"#
        );
    }

    #[test]
    fn rejection_keeps_body_key_order() {
        let response = crate::http::HttpResponse {
            status: 400,
            headers: Vec::new(),
            body: r#"{"message":"bad","code":400}"#.to_string(),
        };
        let err = RestError::rejection(response.status, response.json_body());
        assert_eq!(
            classify(&err),
            r#"Request failed with status code 400 and message: {"message":"bad","code":400}"#
        );
    }

    #[test]
    fn rejection_with_text_body_is_quoted() {
        let err = RestError::rejection(502, json!("Bad Gateway"));
        assert_eq!(
            classify(&err),
            r#"Request failed with status code 502 and message: "Bad Gateway""#
        );
    }

    #[test]
    fn no_response_ignores_reason() {
        let err = RestError::no_response("tcp connect error");
        assert_eq!(classify(&err), "Request failed with no response from the back end.");
    }

    #[test]
    fn construction_failure_includes_message() {
        let err = RestError::construction("relative URL without a base");
        assert_eq!(classify(&err), "Request failed: relative URL without a base");
    }

    #[test]
    fn report_publishes_on_main_error() {
        let reporter = ErrorReporter::new(EventBus::new());
        let mut rx = reporter.bus().subscribe();
        let message = reporter.report(&RestError::no_response("timed out"));
        let event = rx.try_recv().unwrap();
        assert_eq!(event.topic, MAIN_ERROR_TOPIC);
        assert_eq!(event.payload, message);
    }

    #[test]
    fn every_report_is_published() {
        let reporter = ErrorReporter::new(EventBus::new());
        let mut rx = reporter.bus().subscribe();
        reporter.report(&RestError::construction("a"));
        reporter.report(&RestError::construction("a"));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
