use serde_json::{Map, Value};

use crate::VerifiedToken;

/// The authenticated caller, as asserted by a verified token.
///
/// The payload is whatever the client asked to have signed; only `email`
/// is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    payload: Map<String, Value>,
}

impl Identity {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    /// The `email` claim, if present and a string.
    pub fn email(&self) -> Option<&str> {
        self.payload.get("email").and_then(Value::as_str)
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

impl From<VerifiedToken> for Identity {
    fn from(token: VerifiedToken) -> Self {
        Self::new(token.payload)
    }
}
