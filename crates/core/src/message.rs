//! Structured user-visible diagnostics.
//!
//! Every line supplant prints about itself goes through [`Message`] so the
//! rendering (`supplant <severity>: <text>`) stays uniform across crates.

use std::borrow::Cow;
use std::fmt;

/// Severity of a user-visible message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
}

impl Severity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Structured representation of a user-visible diagnostic.
///
/// # Examples
///
/// ```
/// use supplant_core::message::Message;
///
/// let message = Message::error(2, "failed to rename temporary file");
/// let rendered = message.to_string();
/// assert!(rendered.starts_with("supplant error: failed to rename"));
/// assert!(rendered.ends_with("(code 2)"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    severity: Severity,
    code: Option<i32>,
    text: Cow<'static, str>,
}

impl Message {
    /// Creates an informational message.
    #[must_use]
    pub fn info<T: Into<Cow<'static, str>>>(text: T) -> Self {
        Self {
            severity: Severity::Info,
            code: None,
            text: text.into(),
        }
    }

    /// Creates a warning message.
    #[must_use]
    pub fn warning<T: Into<Cow<'static, str>>>(text: T) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            text: text.into(),
        }
    }

    /// Creates an error message carrying the process exit code.
    #[must_use]
    pub fn error<T: Into<Cow<'static, str>>>(code: i32, text: T) -> Self {
        Self {
            severity: Severity::Error,
            code: Some(code),
            text: text.into(),
        }
    }

    /// Returns the message severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the exit code associated with the message, if any.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Returns the message payload text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "supplant {}: {}", self.severity.as_str(), self.text)?;
        if let (Severity::Error, Some(code)) = (self.severity, self.code) {
            write!(f, " (code {code})")?;
        }
        Ok(())
    }
}

/// Builds an error [`Message`] from a format string and an exit code.
#[macro_export]
macro_rules! supplant_error {
    ($code:expr, $($arg:tt)*) => {
        $crate::message::Message::error($code, format!($($arg)*))
    };
}

/// Builds a warning [`Message`] from a format string.
#[macro_export]
macro_rules! supplant_warning {
    ($($arg:tt)*) => {
        $crate::message::Message::warning(format!($($arg)*))
    };
}

/// Builds an informational [`Message`] from a format string.
#[macro_export]
macro_rules! supplant_info {
    ($($arg:tt)*) => {
        $crate::message::Message::info(format!($($arg)*))
    };
}
