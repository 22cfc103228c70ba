use {serde::Serialize, warp::http::StatusCode};

/// Error reply of an [crate::Endpoint]. The status code is sent as the reply
/// status and the rest is serialized as the JSON body:
///
/// ```json
/// { "success": false, "error": "...", "message": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    /// Short description of what went wrong.
    error: String,
    /// Human readable explanation.
    message: String,
}

impl Failure {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn test_serializes_without_status() {
        let failure = Failure::new(StatusCode::BAD_GATEWAY, "Upstream down", "Try again later");

        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({
                "success": false,
                "error": "Upstream down",
                "message": "Try again later",
            })
        );
        assert_eq!(failure.status(), StatusCode::BAD_GATEWAY);
    }
}
