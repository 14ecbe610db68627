use std::fmt::Display;

use crate::gateway::transport::TransportError;

#[derive(Debug)]
pub enum GatewayError {
    /// Required credential is empty
    MissingCredential(&'static str),
    /// Card data cannot be mapped, the message never contains card values
    InvalidCard(&'static str),
    Transport(TransportError),
    /// Reply body is not a valid Swipe reply
    Deserialization(serde_json::Error),
    /// Reply carried a non-200 `response_code`
    Api { code: i64, message: String },
}

impl From<TransportError> for GatewayError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Deserialization(value)
    }
}

impl std::error::Error for GatewayError {}

impl Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::MissingCredential(name) => write!(f, "missing required option: {name}"),
            GatewayError::InvalidCard(reason) => write!(f, "invalid card data: {reason}"),
            GatewayError::Transport(e) => write!(f, "{e}"),
            GatewayError::Deserialization(e) => write!(f, "gateway response deserialization: {e}"),
            GatewayError::Api { code, message } => write!(f, "gateway error {code}: {message}"),
        }
    }
}
