//! Harness configuration
//!
//! Layered lowest to highest: built-in defaults, a YAML file, then
//! `PROBE_*` environment variables.

use crate::checkout::CheckoutInfo;
use crate::persona::PersonaTable;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{
    WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROBE_WINDOW_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`HarnessConfig::base_url`]
pub const ENV_BASE_URL: &str = "PROBE_BASE_URL";
/// Environment variable overriding the action timeout (ms)
pub const ENV_TIMEOUT_MS: &str = "PROBE_TIMEOUT_MS";
/// Environment variable overriding [`HarnessConfig::headless`]
pub const ENV_HEADLESS: &str = "PROBE_HEADLESS";

/// Default storefront
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Bounds for every kind of wait, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Element waits (visibility, text, count)
    pub action_ms: u64,
    /// URL waits after a navigation-triggering action
    pub navigation_ms: u64,
    /// Non-failing probes such as the auth-state check
    pub probe_ms: u64,
    /// Interval between polls
    pub poll_interval_ms: u64,
    /// Whole-scenario bound
    pub scenario_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: DEFAULT_WAIT_TIMEOUT_MS,
            navigation_ms: 10_000,
            probe_ms: DEFAULT_PROBE_WINDOW_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            scenario_ms: 60_000,
        }
    }
}

impl Timeouts {
    /// Multiply the action, navigation and scenario bounds
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Self {
            action_ms: scale(self.action_ms),
            navigation_ms: scale(self.navigation_ms),
            probe_ms: self.probe_ms,
            poll_interval_ms: self.poll_interval_ms,
            scenario_ms: scale(self.scenario_ms),
        }
    }

    /// Wait options for element waits
    #[must_use]
    pub const fn action(&self) -> WaitOptions {
        WaitOptions::new_const(self.action_ms, self.poll_interval_ms)
    }

    /// Wait options for URL waits
    #[must_use]
    pub const fn navigation(&self) -> WaitOptions {
        WaitOptions::new_const(self.navigation_ms, self.poll_interval_ms)
    }

    /// Wait options for a probe window
    #[must_use]
    pub const fn probe(&self) -> WaitOptions {
        WaitOptions::new_const(self.probe_ms, self.poll_interval_ms)
    }
}

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Storefront origin, without trailing slash
    pub base_url: String,
    /// Wait bounds
    pub timeouts: Timeouts,
    /// Timeout multiplier for the performance-glitch persona
    pub performance_timeout_factor: f64,
    /// Credentials per persona
    pub personas: PersonaTable,
    /// Customer details used by checkout journeys
    pub checkout: CheckoutInfo,
    /// Catalog size the listing scenario expects, if pinned
    pub catalog_size: Option<usize>,
    /// Run the browser without a window
    pub headless: bool,
    /// Run scenarios concurrently
    pub parallel: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeouts: Timeouts::default(),
            performance_timeout_factor: 2.0,
            personas: PersonaTable::default(),
            checkout: CheckoutInfo::new("John", "Doe", "10001"),
            catalog_size: Some(6),
            headless: true,
            parallel: true,
        }
    }
}

impl HarnessConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set wait bounds
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the performance persona multiplier
    #[must_use]
    pub const fn with_performance_timeout_factor(mut self, factor: f64) -> Self {
        self.performance_timeout_factor = factor;
        self
    }

    /// Set concurrent execution
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse YAML and validate
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file, apply environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml_ng::from_str(&text)?;
        let config = config.with_env_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> ProbeResult<Self> {
        let config = Self::default().with_env_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PROBE_*` overrides from a variable list
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> ProbeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_BASE_URL => self.base_url = value.to_string(),
                ENV_TIMEOUT_MS => {
                    self.timeouts.action_ms = value.parse().map_err(|_| ProbeError::Config {
                        message: format!("{ENV_TIMEOUT_MS} must be an integer, got {value:?}"),
                    })?;
                }
                ENV_HEADLESS => {
                    self.headless = match value.to_ascii_lowercase().as_str() {
                        "1" | "true" | "yes" => true,
                        "0" | "false" | "no" => false,
                        _ => {
                            return Err(ProbeError::Config {
                                message: format!("{ENV_HEADLESS} must be a boolean, got {value:?}"),
                            })
                        }
                    };
                }
                _ => {}
            }
        }
        Ok(self)
    }

    /// Reject configurations no scenario could run under
    pub fn validate(&self) -> ProbeResult<()> {
        let fail = |message: &str| {
            Err(ProbeError::Config {
                message: message.to_string(),
            })
        };
        if self.base_url.trim().is_empty() {
            return fail("base_url must not be empty");
        }
        let t = &self.timeouts;
        if t.action_ms == 0 || t.navigation_ms == 0 || t.probe_ms == 0 || t.scenario_ms == 0 {
            return fail("timeouts must be non-zero");
        }
        if t.poll_interval_ms == 0 {
            return fail("poll_interval_ms must be non-zero");
        }
        let factor = self.performance_timeout_factor;
        if factor.is_nan() || factor < 1.0 {
            return fail("performance_timeout_factor must be at least 1.0");
        }
        Ok(())
    }

    /// Absolute URL for a route path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

/// Join an origin and a route path with exactly one slash
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;
    use std::io::Write;

    mod timeouts_tests {
        use super::*;

        #[test]
        fn test_scaled_keeps_probe_and_poll() {
            let scaled = Timeouts::default().scaled(2.0);
            assert_eq!(scaled.action_ms, 10_000);
            assert_eq!(scaled.navigation_ms, 20_000);
            assert_eq!(scaled.scenario_ms, 120_000);
            assert_eq!(scaled.probe_ms, DEFAULT_PROBE_WINDOW_MS);
            assert_eq!(scaled.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options() {
            let t = Timeouts::default();
            assert_eq!(t.action().timeout_ms, t.action_ms);
            assert_eq!(t.navigation().poll_interval_ms, t.poll_interval_ms);
            assert_eq!(t.probe().timeout_ms, 2_000);
        }
    }

    mod harness_config_tests {
        use super::*;

        #[test]
        fn test_defaults_validate() {
            let config = HarnessConfig::default();
            assert!(config.validate().is_ok());
            assert_eq!(config.personas.get(Persona::Standard).username, "standard_user");
            assert!((config.performance_timeout_factor - 2.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = HarnessConfig::from_yaml(
                "base_url: http://localhost:8080\ntimeouts:\n  action_ms: 1500\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "http://localhost:8080");
            assert_eq!(config.timeouts.action_ms, 1500);
            assert_eq!(config.timeouts.navigation_ms, 10_000);
            assert_eq!(config.checkout.first_name, "John");
        }

        #[test]
        fn test_yaml_persona_override() {
            let config = HarnessConfig::from_yaml(
                "personas:\n  standard:\n    username: alice\n    password: pw\n",
            )
            .unwrap();
            assert_eq!(config.personas.standard.username, "alice");
            assert_eq!(config.personas.problem.username, "problem_user");
        }

        #[test]
        fn test_load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "performance_timeout_factor: 3.5").unwrap();
            let config = HarnessConfig::load(file.path()).unwrap();
            assert!((config.performance_timeout_factor - 3.5).abs() < f64::EPSILON);
        }

        #[test]
        fn test_load_missing_file_is_io_error() {
            let err = HarnessConfig::load("/definitely/not/here.yaml").unwrap_err();
            assert!(matches!(err, ProbeError::Io(_)));
        }

        #[test]
        fn test_invalid_yaml() {
            let err = HarnessConfig::from_yaml("timeouts: [1, 2").unwrap_err();
            assert!(matches!(err, ProbeError::Yaml(_)));
        }

        #[test]
        fn test_env_overrides() {
            let config = HarnessConfig::default()
                .with_env_overrides([
                    ("PROBE_BASE_URL", "http://127.0.0.1:9000"),
                    ("PROBE_TIMEOUT_MS", "750"),
                    ("PROBE_HEADLESS", "false"),
                    ("UNRELATED", "x"),
                ])
                .unwrap();
            assert_eq!(config.base_url, "http://127.0.0.1:9000");
            assert_eq!(config.timeouts.action_ms, 750);
            assert!(!config.headless);
        }

        #[test]
        fn test_env_override_rejects_garbage() {
            let err = HarnessConfig::default()
                .with_env_overrides([("PROBE_TIMEOUT_MS", "soon")])
                .unwrap_err();
            assert!(matches!(err, ProbeError::Config { .. }));
            assert!(HarnessConfig::default()
                .with_env_overrides([("PROBE_HEADLESS", "maybe")])
                .is_err());
        }

        #[test]
        fn test_validate_rejects() {
            assert!(HarnessConfig::default().with_base_url(" ").validate().is_err());
            assert!(HarnessConfig::default()
                .with_performance_timeout_factor(0.5)
                .validate()
                .is_err());
            assert!(HarnessConfig::default()
                .with_performance_timeout_factor(f64::NAN)
                .validate()
                .is_err());
            let mut config = HarnessConfig::default();
            config.timeouts.poll_interval_ms = 0;
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_url_for() {
            let config = HarnessConfig::default().with_base_url("http://shop.test/");
            assert_eq!(config.url_for("/cart.html"), "http://shop.test/cart.html");
            assert_eq!(config.url_for("/"), "http://shop.test/");
        }
    }
}
