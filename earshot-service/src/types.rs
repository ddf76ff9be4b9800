//! Wire types for the conversation service.

use std::fmt;

use serde::Serialize;

/// Body of an `add_message` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddMessageRequest<'a> {
    /// Event text to insert into the running conversation.
    pub message: &'a str,
}

/// Where the conversation service listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Scheme and host, without port or trailing slash.
    pub base_url: String,
    /// TCP port.
    pub port: u16,
    /// Route accepting text events.
    pub route: String,
}

impl Endpoint {
    /// Full URL of the route.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{}:{}/{}",
            self.base_url.trim_end_matches('/'),
            self.port,
            self.route.trim_start_matches('/')
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_parts_once() {
        let endpoint = Endpoint {
            base_url: "http://localhost/".into(),
            port: 4999,
            route: "/add_message".into(),
        };
        assert_eq!(endpoint.url(), "http://localhost:4999/add_message");
        assert_eq!(endpoint.to_string(), endpoint.url());
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_string(&AddMessageRequest {
            message: "Player: Hi; Lydia: \"Hello\"",
        })
        .expect("serialize");
        assert_eq!(body, r#"{"message":"Player: Hi; Lydia: \"Hello\""}"#);
    }
}
