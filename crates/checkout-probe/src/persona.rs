//! Named test identities and their credentials.

use crate::tolerance::TolerancePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Password shared by every storefront account
pub const DEFAULT_PASSWORD: &str = "secret_sauce";

/// A named test identity with known, documented behavior on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Well-behaved account
    Standard,
    /// Account with deliberate UI defects
    Problem,
    /// Account with slow responses
    PerformanceGlitch,
    /// Account the storefront refuses to log in
    LockedOut,
}

impl Persona {
    /// All personas
    pub const ALL: [Self; 4] = [
        Self::Standard,
        Self::Problem,
        Self::PerformanceGlitch,
        Self::LockedOut,
    ];

    /// Username the storefront ships for this persona
    #[must_use]
    pub const fn default_username(self) -> &'static str {
        match self {
            Self::Standard => "standard_user",
            Self::Problem => "problem_user",
            Self::PerformanceGlitch => "performance_glitch_user",
            Self::LockedOut => "locked_out_user",
        }
    }

    /// Whether outcomes for this persona may legitimately deviate
    #[must_use]
    pub const fn is_unreliable(self) -> bool {
        matches!(self, Self::Problem | Self::PerformanceGlitch)
    }

    /// Multiplier applied to every wait for this persona
    #[must_use]
    pub fn timeout_factor(self, performance_factor: f64) -> f64 {
        match self {
            Self::PerformanceGlitch => performance_factor,
            _ => 1.0,
        }
    }

    /// Outcomes this persona is allowed to produce
    #[must_use]
    pub fn tolerance_policy(self) -> TolerancePolicy {
        if self.is_unreliable() {
            TolerancePolicy::either_or()
        } else {
            TolerancePolicy::strict()
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_username())
    }
}

/// Username/password pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Stock credentials for a persona
    #[must_use]
    pub fn for_persona(persona: Persona) -> Self {
        Self::new(persona.default_username(), DEFAULT_PASSWORD)
    }
}

// Passwords never reach logs or reports.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Credential table, one entry per persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaTable {
    /// Standard persona
    pub standard: Credentials,
    /// Problem persona
    pub problem: Credentials,
    /// Performance-glitch persona
    pub performance_glitch: Credentials,
    /// Locked-out persona
    pub locked_out: Credentials,
}

impl Default for PersonaTable {
    fn default() -> Self {
        Self {
            standard: Credentials::for_persona(Persona::Standard),
            problem: Credentials::for_persona(Persona::Problem),
            performance_glitch: Credentials::for_persona(Persona::PerformanceGlitch),
            locked_out: Credentials::for_persona(Persona::LockedOut),
        }
    }
}

impl PersonaTable {
    /// Credentials bound to a persona
    #[must_use]
    pub const fn get(&self, persona: Persona) -> &Credentials {
        match persona {
            Persona::Standard => &self.standard,
            Persona::Problem => &self.problem,
            Persona::PerformanceGlitch => &self.performance_glitch,
            Persona::LockedOut => &self.locked_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::OutcomeKind;

    #[test]
    fn test_default_usernames() {
        assert_eq!(Persona::Standard.to_string(), "standard_user");
        assert_eq!(
            Persona::PerformanceGlitch.default_username(),
            "performance_glitch_user"
        );
    }

    #[test]
    fn test_only_performance_persona_is_scaled() {
        assert!((Persona::PerformanceGlitch.timeout_factor(2.0) - 2.0).abs() < f64::EPSILON);
        assert!((Persona::Standard.timeout_factor(2.0) - 1.0).abs() < f64::EPSILON);
        assert!((Persona::Problem.timeout_factor(3.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_policies() {
        assert!(!Persona::Standard
            .tolerance_policy()
            .accepts_kind(OutcomeKind::ValidationError));
        assert!(Persona::Problem
            .tolerance_policy()
            .accepts_kind(OutcomeKind::ValidationError));
        for persona in Persona::ALL {
            assert!(!persona.tolerance_policy().accepts_kind(OutcomeKind::Timeout));
        }
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::for_persona(Persona::Standard);
        let text = format!("{creds:?}");
        assert!(text.contains("standard_user"));
        assert!(!text.contains(DEFAULT_PASSWORD));
    }

    #[test]
    fn test_table_lookup() {
        let table = PersonaTable::default();
        assert_eq!(table.get(Persona::LockedOut).username, "locked_out_user");
        assert_eq!(table.get(Persona::Problem).password, DEFAULT_PASSWORD);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Persona::PerformanceGlitch).unwrap();
        assert_eq!(json, "\"performance_glitch\"");
    }
}
