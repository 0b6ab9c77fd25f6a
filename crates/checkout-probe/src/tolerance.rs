//! Tolerance Layer
//!
//! Some personas legitimately deviate from the happy path. Their outcomes are
//! classified into a tagged [`Outcome`] and judged against the persona's
//! [`TolerancePolicy`]. Errors outside the three outcome kinds are genuine
//! failures and are never classified.

use crate::checkout::Submission;
use crate::persona::Persona;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// How a step that may legitimately deviate ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The step reached its intended state
    Completed,
    /// The application rejected input with this message
    ValidationError(String),
    /// A bounded wait elapsed
    Timeout {
        /// What was awaited
        waited_for: String,
        /// Bound in milliseconds
        ms: u64,
    },
}

/// Kind of an [`Outcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// [`Outcome::Completed`]
    Completed,
    /// [`Outcome::ValidationError`]
    ValidationError,
    /// [`Outcome::Timeout`]
    Timeout,
}

impl Outcome {
    /// Kind tag
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Completed => OutcomeKind::Completed,
            Self::ValidationError(_) => OutcomeKind::ValidationError,
            Self::Timeout { .. } => OutcomeKind::Timeout,
        }
    }

    /// Classify a step result
    ///
    /// Success, validation rejections and timeouts become outcomes; every
    /// other error is returned unchanged.
    pub fn classify<T>(result: ProbeResult<T>) -> ProbeResult<Self> {
        match result {
            Ok(_) => Ok(Self::Completed),
            Err(err) => match root(err) {
                ProbeError::ValidationRejected { message, .. } => Ok(Self::ValidationError(message)),
                ProbeError::Timeout { waited_for, ms } => Ok(Self::Timeout { waited_for, ms }),
                other => Err(other),
            },
        }
    }

    /// Outcome of a checkout form submission
    #[must_use]
    pub fn from_submission(submission: &Submission) -> Self {
        match submission {
            Submission::Advanced => Self::Completed,
            Submission::Rejected { message, .. } => Self::ValidationError(message.clone()),
        }
    }
}

fn root(err: ProbeError) -> ProbeError {
    match err {
        ProbeError::Scenario { source, .. } => root(*source),
        other => other,
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::ValidationError(message) => write!(f, "validation error: {message}"),
            Self::Timeout { waited_for, ms } => write!(f, "timeout after {ms}ms: {waited_for}"),
        }
    }
}

/// Outcome kinds a persona may produce without failing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    accepted: BTreeSet<OutcomeKind>,
    expected_messages: Vec<String>,
}

impl TolerancePolicy {
    /// Only completion passes
    #[must_use]
    pub fn strict() -> Self {
        Self {
            accepted: BTreeSet::from([OutcomeKind::Completed]),
            expected_messages: Vec::new(),
        }
    }

    /// Completion or a validation error passes
    #[must_use]
    pub fn either_or() -> Self {
        Self {
            accepted: BTreeSet::from([OutcomeKind::Completed, OutcomeKind::ValidationError]),
            expected_messages: Vec::new(),
        }
    }

    /// Policy for a persona
    #[must_use]
    pub fn for_persona(persona: Persona) -> Self {
        persona.tolerance_policy()
    }

    /// Only accept validation errors containing one of these texts
    #[must_use]
    pub fn with_expected_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a kind is accepted (timeouts never are)
    #[must_use]
    pub fn accepts_kind(&self, kind: OutcomeKind) -> bool {
        kind != OutcomeKind::Timeout && self.accepted.contains(&kind)
    }

    /// Whether an outcome is accepted
    #[must_use]
    pub fn accepts(&self, outcome: &Outcome) -> bool {
        match outcome {
            Outcome::ValidationError(message) if !self.expected_messages.is_empty() => {
                self.accepts_kind(OutcomeKind::ValidationError)
                    && self
                        .expected_messages
                        .iter()
                        .any(|m| message.contains(m.as_str()))
            }
            other => self.accepts_kind(other.kind()),
        }
    }

    /// Pass an accepted outcome through, fail otherwise
    ///
    /// A rejected timeout keeps its timeout kind.
    pub fn judge(&self, persona: Persona, outcome: Outcome) -> ProbeResult<Outcome> {
        if self.accepts(&outcome) {
            if outcome != Outcome::Completed {
                warn!(persona = %persona, outcome = %outcome, "Tolerated outcome");
            }
            return Ok(outcome);
        }
        match outcome {
            Outcome::Timeout { waited_for, ms } => Err(ProbeError::Timeout { waited_for, ms }),
            other => Err(ProbeError::assertion(
                format!("{persona} outcome in {:?}", self.accepted),
                other.to_string(),
            )),
        }
    }

    /// Classify a step result and judge it in one go
    pub fn judge_result<T>(&self, persona: Persona, result: ProbeResult<T>) -> ProbeResult<Outcome> {
        self.judge(persona, Outcome::classify(result)?)
    }
}
