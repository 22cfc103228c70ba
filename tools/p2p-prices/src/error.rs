use {
    p2p_toolkit::{Failure, StatusCode},
    thiserror::Error,
};

/// Error type for a price search. Each variant is terminal for the request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("Timeout al conectar con Binance P2P")]
    UpstreamTimeout,

    #[error("Error al conectar con Binance P2P: {0}")]
    UpstreamTransport(String),

    #[error("Respuesta inválida de Binance P2P: {0}")]
    UpstreamMalformedResponse(String),

    #[error("Error interno del servidor: {0}")]
    Internal(String),
}

/// Reasons for skipping a single offer. These never fail the request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfferParseError {
    #[error("`{0}` is not an object")]
    NotAnObject(&'static str),

    #[error("`{0}` is not a valid decimal")]
    InvalidDecimal(&'static str),
}

impl PriceError {
    /// Maps network error to our error kind
    pub fn from_network_error(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::UpstreamTimeout
        } else {
            Self::UpstreamTransport(error.to_string())
        }
    }

    /// HTTP status code the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamTimeout | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamTransport(_) | Self::UpstreamMalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<PriceError> for Failure {
    fn from(error: PriceError) -> Self {
        let status = error.status_code();

        match error {
            PriceError::UpstreamTimeout => Failure::new(
                status,
                error.to_string(),
                "Binance P2P no respondió dentro del tiempo límite",
            ),
            PriceError::UpstreamTransport(ref reason) => Failure::new(
                status,
                "Error al conectar con Binance P2P",
                format!("Error en la petición a Binance P2P: {}", reason),
            ),
            PriceError::UpstreamMalformedResponse(_) => Failure::new(
                status,
                "Respuesta inválida de Binance P2P",
                "Binance P2P devolvió una respuesta que no es JSON válido",
            ),
            PriceError::Internal(_) => Failure::new(
                status,
                error.to_string(),
                "Ocurrió un error inesperado al procesar la solicitud",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_failure() {
        let failure = Failure::from(PriceError::UpstreamTimeout);

        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failure.error(), "Timeout al conectar con Binance P2P");
    }

    #[test]
    fn test_transport_failure_embeds_reason() {
        let failure = Failure::from(PriceError::UpstreamTransport(
            "connection refused".to_string(),
        ));

        assert_eq!(failure.status(), StatusCode::BAD_GATEWAY);
        assert!(failure.message().contains("connection refused"));
    }

    #[test]
    fn test_malformed_response_failure_has_fixed_message() {
        let failure = Failure::from(PriceError::UpstreamMalformedResponse(
            "expected value at line 1 column 1".to_string(),
        ));

        assert_eq!(failure.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            failure.message(),
            "Binance P2P devolvió una respuesta que no es JSON válido"
        );
    }

    #[test]
    fn test_internal_failure_embeds_reason() {
        let failure = Failure::from(PriceError::Internal("boom".to_string()));

        assert_eq!(failure.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failure.error(), "Error interno del servidor: boom");
    }
}
