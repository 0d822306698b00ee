use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured runtime error with a stable classification.
/// Every failure in this crate is permanent for the request that raised it;
/// nothing is retried and nothing is recovered locally.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a validation error for a malformed application value.
    pub fn validation(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Validation, origin, message)
    }

    /// Construct an error for a query shape the backend cannot represent.
    pub fn unsupported_query(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::UnsupportedQuery, origin, message)
    }

    /// Construct an integrity error (non-nullable field resolved to NULL).
    pub fn integrity(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Integrity, origin, message)
    }

    /// Construct a storage error (value has no storage representation).
    pub fn storage(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Storage, origin, message)
    }

    /// Construct a not-implemented error (e.g. a non-COUNT aggregate).
    pub fn not_implemented(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotImplemented, origin, message)
    }

    /// Construct an error for a low-level primitive this crate refuses to emulate.
    pub fn not_supported(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotSupported, origin, message)
    }

    /// Construct a compiler-origin invariant violation.
    pub(crate) fn compiler_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Compiler,
            message,
        )
    }

    #[must_use]
    pub const fn is_unsupported_query(&self) -> bool {
        matches!(self.class, ErrorClass::UnsupportedQuery)
    }

    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self.class, ErrorClass::Integrity)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    UnsupportedQuery,
    Integrity,
    Storage,
    NotSupported,
    NotImplemented,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::UnsupportedQuery => "unsupported_query",
            Self::Integrity => "integrity",
            Self::Storage => "storage",
            Self::NotSupported => "not_supported",
            Self::NotImplemented => "not_implemented",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Convert,
    Serialize,
    Decode,
    Eval,
    Order,
    Query,
    Compiler,
    Driver,
    Config,
    Cursor,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Convert => "convert",
            Self::Serialize => "serialize",
            Self::Decode => "decode",
            Self::Eval => "eval",
            Self::Order => "order",
            Self::Query => "query",
            Self::Compiler => "compiler",
            Self::Driver => "driver",
            Self::Config => "config",
            Self::Cursor => "cursor",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = Error::unsupported_query(ErrorOrigin::Decode, "Only AND filters are supported");

        assert_eq!(
            err.display_with_class(),
            "decode:unsupported_query: Only AND filters are supported"
        );
        assert!(err.is_unsupported_query());
        assert!(!err.is_integrity());
    }

    #[test]
    fn display_is_message_only() {
        let err = Error::integrity(ErrorOrigin::Compiler, "Non-nullable field name can't be None!");

        assert_eq!(err.to_string(), "Non-nullable field name can't be None!");
    }
}
