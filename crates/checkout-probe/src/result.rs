//! Result and error types for checkout-probe.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for harness operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Coarse classification of a [`ProbeError`].
///
/// The tolerance layer only ever looks at the kind, never at the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Expected state was observed to differ
    Assertion,
    /// A bounded wait elapsed
    Timeout,
    /// Page text did not match the expected format
    Parse,
    /// The target application rejected a form submission
    Validation,
    /// Driver, browser or configuration problem
    Infrastructure,
}

/// Errors that can occur while driving a scenario
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Expected state never observed
    #[error("Assertion failed: expected {expected}, observed {observed}")]
    AssertionFailed {
        /// What the harness expected
        expected: String,
        /// What the page showed
        observed: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of the awaited condition
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Price or count text not in the expected format
    #[error("Could not parse {what} from {text:?}")]
    Parse {
        /// What was being parsed
        what: &'static str,
        /// The offending text
        text: String,
    },

    /// Form submission surfaced a validation error
    #[error("Validation rejected {field}: {message}")]
    ValidationRejected {
        /// Field the error names, if recognised
        field: String,
        /// Full error banner text
        message: String,
    },

    /// Transition not declared for the current logical page
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Source page
        from: String,
        /// Requested target page
        to: String,
    },

    /// Element missing at the moment of interaction
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Driver-level failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Failure surfaced at the scenario boundary
    #[error("Scenario '{name}' failed on {last_page} after '{last_action}': {source}")]
    Scenario {
        /// Scenario name
        name: String,
        /// Last verified logical page
        last_page: String,
        /// Last primitive action attempted
        last_action: String,
        /// Underlying failure
        #[source]
        source: Box<ProbeError>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Build an assertion failure from anything displayable
    pub fn assertion(expected: impl Into<String>, observed: impl Into<String>) -> Self {
        Self::AssertionFailed {
            expected: expected.into(),
            observed: observed.into(),
        }
    }

    /// Build a timeout error
    pub fn timeout(waited_for: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            waited_for: waited_for.into(),
            ms,
        }
    }

    /// Classify the error, looking through scenario wrappers
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AssertionFailed { .. } | Self::InvalidTransition { .. } => ErrorKind::Assertion,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::ValidationRejected { .. } => ErrorKind::Validation,
            Self::Scenario { source, .. } => source.kind(),
            Self::ElementNotFound { .. }
            | Self::Driver { .. }
            | Self::NavigationError { .. }
            | Self::BrowserLaunchError { .. }
            | Self::Config { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_) => ErrorKind::Infrastructure,
        }
    }

    /// Whether this is a timeout-kind error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(ProbeError::timeout("badge", 10).kind(), ErrorKind::Timeout);
        assert_eq!(
            ProbeError::assertion("1", "2").kind(),
            ErrorKind::Assertion
        );
        assert_eq!(
            ProbeError::Parse {
                what: "price",
                text: "abc".into()
            }
            .kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            ProbeError::Driver {
                message: "gone".into()
            }
            .kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_scenario_wrapper_keeps_inner_kind() {
        let err = ProbeError::Scenario {
            name: "journey".into(),
            last_page: "Cart".into(),
            last_action: "click #checkout".into(),
            source: Box::new(ProbeError::timeout("url /checkout-step-one.html", 5000)),
        };
        assert!(err.is_timeout());
        let text = err.to_string();
        assert!(text.contains("journey"));
        assert!(text.contains("Cart"));
        assert!(text.contains("click #checkout"));
    }

    #[test]
    fn test_display_messages() {
        let err = ProbeError::assertion("badge 2", "badge 3");
        assert_eq!(
            err.to_string(),
            "Assertion failed: expected badge 2, observed badge 3"
        );
        let err = ProbeError::Parse {
            what: "price",
            text: "$x".into(),
        };
        assert_eq!(err.to_string(), "Could not parse price from \"$x\"");
    }
}
