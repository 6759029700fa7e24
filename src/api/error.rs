use std::fmt::{self, Display};

use thiserror::Error;

use super::value::Value;

/// Everything that can go wrong while calling the registrar.
///
/// Every variant is handed back to the caller exactly as produced; nothing is retried or swallowed.
#[derive(Debug, Error)]
pub enum Error {
    /// A required request value was `None`. Detected before anything is sent.
    #[error("request can't be empty: `{0}` needs a request value")]
    MissingRequest(&'static str),

    /// The call did not complete: connection, HTTP, or XML-RPC level failure. No status code is available.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The call completed, but the registrar answered with a status code outside of `1000..=1500`.
    #[error(transparent)]
    Api(#[from] ErrorResponse),

    /// The call succeeded, but its payload did not have the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// [`find_record_by_id`][crate::api::NameserverService::find_record_by_id] searched every zone without finding
    /// the record.
    #[error("couldn't find INWX record for id {0}")]
    RecordNotFound(i64),
}

impl Error {
    /// The registrar's status code, if this is an [`Error::Api`].
    pub fn code(&self) -> Option<i64> {
        match self {
            Error::Api(resp) => Some(resp.code),
            _ => None,
        }
    }
}

/// Failures below the registrar's own status codes.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to communicate with the INWX API")]
    Http(#[from] reqwest::Error),

    #[error("INWX API responded with HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("INWX API sent a malformed XML-RPC response: {0}")]
    Malformed(String),

    #[error("can't encode XML-RPC request: {0}")]
    Unencodable(String),

    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },
}

/// A non-success status returned by the registrar.
///
/// `code` is part of the registrar's stable contract; callers may branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: i64,
    pub message: String,
    pub reason: String,
    pub reason_code: String,
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.code, self.message)?;
        if !self.reason.is_empty() {
            write!(f, ". Reason: ({}) {}", self.reason_code, self.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorResponse {}

/// A response payload that does not match the model it is being decoded into.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode `{path}`: expected {expected}, found {found}")]
pub struct DecodeError {
    path: String,
    expected: &'static str,
    found: String,
}

impl DecodeError {
    /// A value of the wrong XML-RPC type.
    pub fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self {
            path: String::new(),
            expected,
            found: found.kind().to_string(),
        }
    }

    /// An integer that does not fit the target type.
    pub fn out_of_range(expected: &'static str, found: i64) -> Self {
        Self {
            path: String::new(),
            expected,
            found: format!("out-of-range integer {found}"),
        }
    }

    /// Prefixes the path with the key (or array index) the failing value was found under.
    pub fn at(mut self, key: &str) -> Self {
        self.path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{key}.{}", self.path)
        };
        self
    }

    /// Dotted path of the offending value, relative to the decoded payload.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_display() {
        let plain = ErrorResponse {
            code: 2303,
            message: "Object does not exist".into(),
            reason: String::new(),
            reason_code: String::new(),
        };
        assert_eq!(plain.to_string(), "(2303) Object does not exist");

        let with_reason = ErrorResponse {
            reason: "Record not found".into(),
            reason_code: "RECORD_NOT_FOUND".into(),
            ..plain
        };
        assert_eq!(
            with_reason.to_string(),
            "(2303) Object does not exist. Reason: (RECORD_NOT_FOUND) Record not found"
        );
    }

    #[test]
    fn api_errors_expose_their_code() {
        let err = Error::from(ErrorResponse {
            code: 2400,
            message: "Command failed".into(),
            reason: String::new(),
            reason_code: String::new(),
        });
        assert_eq!(err.code(), Some(2400));
        assert_eq!(Error::RecordNotFound(7).code(), None);
    }
}
