//! The uniform result shape returned by every gateway call.

use serde::Serialize;

/// Message used when a successful response carries none.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "OK";

/// Message used when no better failure description is available.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Response envelope.
///
/// `success == true` implies `data` holds the unwrapped payload.
/// `success == false` implies `data` is `None` and `message` is a
/// human-readable description of the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    /// Unwrapped payload, present only on success.
    pub data: Option<T>,

    /// Whether the call succeeded.
    pub success: bool,

    /// Server message on success, failure description otherwise.
    pub message: String,
}

impl<T> Envelope<T> {
    /// Build a successful envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: message.into(),
        }
    }

    /// Build a failed envelope. Empty messages fall back to
    /// [`GENERIC_FAILURE_MESSAGE`].
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            data: None,
            success: false,
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Map the payload, keeping success and message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            data: self.data.map(f),
            success: self.success,
            message: self.message,
        }
    }

    /// Borrow the payload if the call succeeded.
    pub fn data(&self) -> Option<&T> {
        if self.success {
            self.data.as_ref()
        } else {
            None
        }
    }

    /// Convert into a `Result`, with the failure message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(GENERIC_FAILURE_MESSAGE.to_string()),
            (false, _) => Err(self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_never_carries_data() {
        let env: Envelope<u32> = Envelope::failure("Email already exists");
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message, "Email already exists");
    }

    #[test]
    fn test_failure_empty_message_falls_back() {
        let env: Envelope<u32> = Envelope::failure("  ");
        assert_eq!(env.message, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Envelope::ok(7, "OK").into_result(), Ok(7));
        assert_eq!(
            Envelope::<u32>::failure("nope").into_result(),
            Err("nope".to_string())
        );
    }

    #[test]
    fn test_map_keeps_message() {
        let env = Envelope::ok(vec![1, 2, 3], "listed").map(|v| v.len());
        assert_eq!(env.data, Some(3));
        assert_eq!(env.message, "listed");
    }
}
