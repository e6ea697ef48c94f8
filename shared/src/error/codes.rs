//! Unified error codes for cash reconciliation
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 7xxx: Cash session errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Required field missing
    RequiredField = 7,

    // ==================== 7xxx: Cash session ====================
    /// Cash session not found
    SessionNotFound = 7201,

    // ==================== 9xxx: System ====================
    /// Operation timeout
    TimeoutError = 9004,
    /// Session data source failed
    UpstreamFailure = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::RequiredField => "Required field missing",

            // Cash session
            ErrorCode::SessionNotFound => "Cash session not found",

            // System
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::UpstreamFailure => "Could not load sessions",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            7 => Ok(ErrorCode::RequiredField),

            // Cash session
            7201 => Ok(ErrorCode::SessionNotFound),

            // System
            9004 => Ok(ErrorCode::TimeoutError),
            9006 => Ok(ErrorCode::UpstreamFailure),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::RequiredField.code(), 7);
        assert_eq!(ErrorCode::SessionNotFound.code(), 7201);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
        assert_eq!(ErrorCode::UpstreamFailure.code(), 9006);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(ErrorCode::try_from(7201), Ok(ErrorCode::SessionNotFound));
        assert_eq!(ErrorCode::try_from(9006), Ok(ErrorCode::UpstreamFailure));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4001), Err(InvalidErrorCode(4001)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::SessionNotFound).unwrap();
        assert_eq!(json, "7201");

        let code: ErrorCode = serde_json::from_str("2").unwrap();
        assert_eq!(code, ErrorCode::ValidationFailed);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::UpstreamFailure), "9006");
        assert_eq!(
            ErrorCode::UpstreamFailure.message(),
            "Could not load sessions"
        );
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
