//! Scenario and suite reports.

use crate::flow::LogicalPage;
use crate::persona::Persona;
use crate::result::{ErrorKind, ProbeError, ProbeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Where and how a scenario failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    /// Error classification
    pub kind: ErrorKind,
    /// Underlying error message
    pub message: String,
    /// Last verified logical page
    pub last_page: String,
    /// Last primitive action attempted
    pub last_action: String,
}

impl FailureContext {
    /// Extract the context of a scenario-boundary error
    #[must_use]
    pub fn from_error(err: &ProbeError) -> Self {
        match err {
            ProbeError::Scenario {
                last_page,
                last_action,
                source,
                ..
            } => Self {
                kind: source.kind(),
                message: source.to_string(),
                last_page: last_page.clone(),
                last_action: last_action.clone(),
            },
            other => Self {
                kind: other.kind(),
                message: other.to_string(),
                last_page: LogicalPage::Unauthenticated.to_string(),
                last_action: "none".to_string(),
            },
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Persona the scenario ran as
    pub persona: Persona,
    /// Pass or fail
    pub status: ScenarioStatus,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Failure details, when failed
    pub failure: Option<FailureContext>,
}

impl ScenarioReport {
    /// Build from a scenario result
    #[must_use]
    pub fn from_result(
        name: impl Into<String>,
        persona: Persona,
        duration: Duration,
        result: &ProbeResult<()>,
    ) -> Self {
        let (status, failure) = match result {
            Ok(()) => (ScenarioStatus::Passed, None),
            Err(e) => (ScenarioStatus::Failed, Some(FailureContext::from_error(e))),
        };
        Self {
            name: name.into(),
            persona,
            status,
            duration_ms: duration.as_millis() as u64,
            failure,
        }
    }

    /// Check if passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.status.is_passed()
    }
}

/// Results of a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Per-scenario results, in submission order
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Start an empty report
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration_ms: 0,
            scenarios: Vec::new(),
        }
    }

    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }

    /// Count of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    /// Count of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.total() - self.passed_count()
    }

    /// Total scenarios
    #[must_use]
    pub fn total(&self) -> usize {
        self.scenarios.len()
    }

    /// Failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.scenarios.iter().filter(|s| !s.passed()).collect()
    }

    /// Look up a scenario by name
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> ProbeResult<()> {
        Err(ProbeError::Scenario {
            name: "full_journey".into(),
            last_page: "Cart".into(),
            last_action: "click .cart_button >> nth=2".into(),
            source: Box::new(ProbeError::assertion("badge 2", "badge 3")),
        })
    }

    #[test]
    fn test_failure_context_from_scenario_error() {
        let report =
            ScenarioReport::from_result("full_journey", Persona::Standard, Duration::from_millis(12), &failed());
        assert!(!report.passed());
        let failure = report.failure.unwrap();
        assert_eq!(failure.kind, ErrorKind::Assertion);
        assert_eq!(failure.last_page, "Cart");
        assert_eq!(failure.last_action, "click .cart_button >> nth=2");
        assert!(failure.message.contains("badge 3"));
    }

    #[test]
    fn test_suite_counts() {
        let mut suite = SuiteReport::new();
        suite.scenarios.push(ScenarioReport::from_result(
            "a",
            Persona::Standard,
            Duration::ZERO,
            &Ok(()),
        ));
        suite.scenarios.push(ScenarioReport::from_result(
            "b",
            Persona::Problem,
            Duration::ZERO,
            &failed(),
        ));
        assert_eq!(suite.total(), 2);
        assert_eq!(suite.passed_count(), 1);
        assert_eq!(suite.failed_count(), 1);
        assert!(!suite.all_passed());
        assert_eq!(suite.failures()[0].name, "b");
        assert!(suite.scenario("a").unwrap().passed());
    }

    #[test]
    fn test_to_json() {
        let mut suite = SuiteReport::new();
        suite.scenarios.push(ScenarioReport::from_result(
            "b",
            Persona::PerformanceGlitch,
            Duration::from_millis(5),
            &failed(),
        ));
        let json = suite.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scenarios"][0]["persona"], "performance_glitch");
        assert_eq!(value["scenarios"][0]["status"], "Failed");
        assert_eq!(value["scenarios"][0]["failure"]["kind"], "Assertion");
        assert_eq!(value["run_id"].as_str().unwrap().len(), 36);
    }
}
