//! Bridge errors - invalid input arriving from JavaScript

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, PartialEq)]
pub enum BridgeError {
    #[error("Invalid body slot: {0} (expected < {1})")]
    InvalidBodySlot(u32, usize),

    #[error("Invalid joint index: {0} (expected < {1})")]
    InvalidJoint(u32, usize),

    #[error("Invalid joint data length: {0} (expected {1})")]
    InvalidFrameLength(usize, usize),

    #[error("Invalid smoother config: {0}")]
    InvalidConfig(String),
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_bad_value() {
        assert_eq!(
            BridgeError::InvalidBodySlot(9, 6).to_string(),
            "Invalid body slot: 9 (expected < 6)"
        );
        assert_eq!(
            BridgeError::InvalidFrameLength(12, 75).to_string(),
            "Invalid joint data length: 12 (expected 75)"
        );
    }
}
