//! Error types and result definitions.

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimulationError {
    /// No usable market data for the requested window.
    ///
    /// Covers empty histories, null closes inside the window, and benchmark
    /// calendars with no overlap. Callers typically translate this to a
    /// 404-like signal.
    #[error("Data unavailable for '{symbol}': {context}")]
    DataUnavailable {
        /// Symbol the lookup was for
        symbol: String,
        /// What was missing
        context: String,
    },

    /// Invalid configuration parameter.
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Reason for invalidity
        reason: String,
    },

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse a JSON response.
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// Response structure error - missing or malformed fields.
    #[error("Response structure error in '{field}': {context}")]
    ResponseStructureError {
        /// Field name that caused the error
        field: String,
        /// Error context
        context: String,
    },

    /// Server error (5xx status codes) from a data provider.
    #[error("Server error {status}: {context}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Error context
        context: String,
    },

    /// Error loading or parsing the rate observation table.
    #[error("Rate table error: {context}")]
    RateTableError {
        /// Error context
        context: String,
    },
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

impl SimulationError {
    /// Create a data-unavailable error.
    pub fn unavailable(symbol: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            context: context.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_param(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Create a response structure error.
    pub fn response_structure(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::ResponseStructureError {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Check if this error is worth retrying with backoff.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            SimulationError::HttpError(_) | SimulationError::ServerError { .. }
        )
    }

    /// Check if this error is the "no result" outcome.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SimulationError::DataUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err = SimulationError::unavailable("TEST", "no price history");
        assert!(err.to_string().contains("TEST"));
        assert!(err.to_string().contains("no price history"));
        assert!(err.is_unavailable());
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_invalid_param() {
        let err = SimulationError::invalid_param("margin_ratio", "must be between 1.0 and 2.0");
        assert!(err.to_string().contains("margin_ratio"));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_server_error_retriable() {
        let err = SimulationError::ServerError {
            status: 503,
            context: "upstream".into(),
        };
        assert!(err.is_retriable());
    }
}
