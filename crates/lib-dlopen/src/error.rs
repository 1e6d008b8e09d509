//! Error types for dynamic library operations.

use thiserror::Error;

/// Message carried by [`DlError::Closed`].
pub const CLOSED_MESSAGE: &str = "this library has been closed";

/// Errors that can occur while opening a library or resolving its symbols.
///
/// Loader diagnostics are carried verbatim: `Display` prints exactly the
/// text the platform loader produced, nothing is prepended.
#[derive(Debug, Error)]
pub enum DlError {
    /// The platform loader could not open the library.
    #[error("{message}")]
    Open {
        /// Path given to the loader, `None` for the process image.
        path: Option<String>,
        message: String,
    },

    /// The library handle has already been closed.
    #[error("this library has been closed")]
    Closed,

    /// The symbol could not be resolved in the opened library.
    #[error("{message}")]
    Symbol { name: String, message: String },
}

impl DlError {
    /// Create an open error from a loader failure.
    pub fn open_error(path: Option<&str>, source: libloading::Error) -> Self {
        Self::Open {
            path: path.map(String::from),
            message: loader_message(&source),
        }
    }

    /// Create a symbol error from a loader failure.
    pub fn symbol_error(name: impl Into<String>, source: libloading::Error) -> Self {
        Self::Symbol {
            name: name.into(),
            message: loader_message(&source),
        }
    }

    pub fn is_open_error(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn is_symbol_error(&self) -> bool {
        matches!(self, Self::Symbol { .. })
    }

    /// The diagnostic text, as displayed.
    pub fn message(&self) -> &str {
        match self {
            Self::Open { message, .. } | Self::Symbol { message, .. } => message,
            Self::Closed => CLOSED_MESSAGE,
        }
    }
}

/// Diagnostic text of a loader failure.
///
/// The Windows variants of `libloading::Error` only display the name of the
/// failing call; the OS text lives in their source.
fn loader_message(err: &libloading::Error) -> String {
    match std::error::Error::source(err) {
        Some(source) => source.to_string(),
        None => err.to_string(),
    }
}

/// Result type for dynamic library operations.
pub type DlResult<T> = Result<T, DlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_message() {
        let err = DlError::Closed;
        assert_eq!(err.to_string(), CLOSED_MESSAGE);
        assert_eq!(err.message(), CLOSED_MESSAGE);
        assert!(err.is_closed());
        assert!(!err.is_open_error());
    }

    #[test]
    fn test_messages_are_verbatim() {
        let err = DlError::Open {
            path: Some("/no/such/lib.so".to_string()),
            message: "/no/such/lib.so: cannot open shared object file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "/no/such/lib.so: cannot open shared object file"
        );

        let err = DlError::Symbol {
            name: "missing".to_string(),
            message: "undefined symbol: missing".to_string(),
        };
        assert_eq!(err.to_string(), "undefined symbol: missing");
        assert!(err.is_symbol_error());
    }

    #[test]
    fn test_message_taken_from_error_source() {
        let nul = std::ffi::CString::new("a\0b").unwrap_err();
        let expected = nul.to_string();
        let err = DlError::symbol_error("a\0b", libloading::Error::CreateCString { source: nul });
        assert_eq!(err.message(), expected);
        assert_ne!(err.message(), "could not create a C string from bytes");
    }
}
