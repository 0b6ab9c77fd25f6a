//! Scenario context and runner.
//!
//! Each scenario is a sequential async body run against its own driver
//! session. The runner may drive many scenarios concurrently; they share
//! nothing but the read-only configuration.

use crate::cart::Cart;
use crate::config::HarnessConfig;
use crate::driver::{DriverFactory, StoreDriver};
use crate::flow::LogicalPage;
use crate::page::Page;
use crate::persona::{Credentials, Persona};
use crate::report::{ScenarioReport, SuiteReport};
use crate::result::{ProbeError, ProbeResult};
use crate::session::{self, Session};
use crate::tolerance::TolerancePolicy;
use futures::future::{join_all, BoxFuture};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Everything a scenario body works with
#[derive(Debug)]
pub struct ScenarioContext<D> {
    /// Page context
    pub page: Page<D>,
    /// Expected cart
    pub cart: Cart,
    session: Option<Session>,
    persona: Persona,
    config: Arc<HarnessConfig>,
}

impl<D: StoreDriver> ScenarioContext<D> {
    /// Context for `persona` over a fresh driver session
    pub fn new(driver: D, persona: Persona, config: Arc<HarnessConfig>) -> Self {
        let factor = persona.timeout_factor(config.performance_timeout_factor);
        let page = Page::new(driver, config.base_url.clone(), config.timeouts.scaled(factor));
        Self {
            page,
            cart: Cart::new(),
            session: None,
            persona,
            config,
        }
    }

    /// Persona this scenario runs as
    pub const fn persona(&self) -> Persona {
        self.persona
    }

    /// Harness configuration
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Credentials of the scenario persona
    pub fn credentials(&self) -> &Credentials {
        self.config.personas.get(self.persona)
    }

    /// Tolerance policy of the scenario persona
    pub fn policy(&self) -> TolerancePolicy {
        self.persona.tolerance_policy()
    }

    /// Active session, synced to the page's current location
    pub fn session(&mut self) -> Option<&Session> {
        let location = self.page.location();
        if let Some(session) = self.session.as_mut() {
            session.track(location);
        }
        self.session.as_ref()
    }

    /// Log in as the scenario persona
    pub async fn login(&mut self) -> ProbeResult<()> {
        let session = session::login_as(&mut self.page, self.persona, &self.config).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Log the active session out
    pub async fn logout(&mut self) -> ProbeResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ProbeError::assertion("an active session", "not logged in"))?;
        session::logout(&mut self.page, session).await
    }

    /// Wrap a failure with the last known page and action
    pub fn fail(&self, name: &str, source: ProbeError) -> ProbeError {
        ProbeError::Scenario {
            name: name.to_string(),
            last_page: self.page.location().to_string(),
            last_action: self.page.last_action().to_string(),
            source: Box::new(source),
        }
    }
}

/// Async scenario body
pub type ScenarioFn<D> =
    for<'a> fn(&'a mut ScenarioContext<D>) -> BoxFuture<'a, ProbeResult<()>>;

/// A named scenario bound to a persona
pub struct Scenario<D> {
    name: String,
    persona: Persona,
    run: ScenarioFn<D>,
}

impl<D> Scenario<D> {
    /// Create a scenario
    pub fn new(name: impl Into<String>, persona: Persona, run: ScenarioFn<D>) -> Self {
        Self {
            name: name.into(),
            persona,
            run,
        }
    }

    /// Scenario name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scenario persona
    pub const fn persona(&self) -> Persona {
        self.persona
    }
}

impl<D> Clone for Scenario<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            persona: self.persona,
            run: self.run,
        }
    }
}

impl<D> fmt::Debug for Scenario<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("persona", &self.persona)
            .finish_non_exhaustive()
    }
}

/// What to do after a failed scenario in sequential runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Run every scenario
    #[default]
    CollectAll,
    /// Stop at the first failure
    FailFast,
}

/// Runs scenarios and collects a [`SuiteReport`]
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: Arc<HarnessConfig>,
    parallel: bool,
    failure_mode: FailureMode,
}

impl ScenarioRunner {
    /// Runner using the configuration's parallelism
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        let parallel = config.parallel;
        Self {
            config: Arc::new(config),
            parallel,
            failure_mode: FailureMode::CollectAll,
        }
    }

    /// Run concurrently or one at a time
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set failure handling for sequential runs
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Shared configuration
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run one scenario, failing with its context attached
    pub async fn execute<F: DriverFactory>(
        &self,
        factory: &F,
        scenario: &Scenario<F::Driver>,
    ) -> ProbeResult<()> {
        let name = scenario.name();
        info!(scenario = %name, persona = %scenario.persona, "Scenario started");
        let driver = factory.open().await.map_err(|source| ProbeError::Scenario {
            name: name.to_string(),
            last_page: LogicalPage::Unauthenticated.to_string(),
            last_action: "open session".to_string(),
            source: Box::new(source),
        })?;
        let mut ctx = ScenarioContext::new(driver, scenario.persona, Arc::clone(&self.config));
        let bound = ctx.page.timeouts().scenario_ms;
        let result =
            match tokio::time::timeout(Duration::from_millis(bound), (scenario.run)(&mut ctx)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProbeError::timeout(format!("scenario {name}"), bound)),
            };
        if let Err(e) = ctx.page.driver_mut().close().await {
            warn!(scenario = %name, error = %e, "Closing the session failed");
        }
        result.map_err(|source| ctx.fail(name, source))
    }

    /// Run one scenario and report it
    pub async fn run_one<F: DriverFactory>(
        &self,
        factory: &F,
        scenario: &Scenario<F::Driver>,
    ) -> ScenarioReport {
        let start = Instant::now();
        let result = self.execute(factory, scenario).await;
        match &result {
            Ok(()) => info!(scenario = %scenario.name, "Scenario passed"),
            Err(e) => error!(scenario = %scenario.name, error = %e, "Scenario failed"),
        }
        ScenarioReport::from_result(&scenario.name, scenario.persona, start.elapsed(), &result)
    }

    /// Run a suite
    pub async fn run_all<F: DriverFactory>(
        &self,
        factory: &F,
        scenarios: &[Scenario<F::Driver>],
    ) -> SuiteReport {
        let start = Instant::now();
        let mut report = SuiteReport::new();
        if self.parallel {
            report.scenarios =
                join_all(scenarios.iter().map(|s| self.run_one(factory, s))).await;
        } else {
            for scenario in scenarios {
                let result = self.run_one(factory, scenario).await;
                let stop = !result.passed() && self.failure_mode == FailureMode::FailFast;
                report.scenarios.push(result);
                if stop {
                    break;
                }
            }
        }
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %report.run_id,
            passed = report.passed_count(),
            failed = report.failed_count(),
            "Suite finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::sim::{SimulatedStore, SimulatedStoreFactory};
    use futures::FutureExt;

    fn config() -> HarnessConfig {
        HarnessConfig::default()
            .with_base_url("http://shop.test")
            .with_timeouts(Timeouts {
                action_ms: 200,
                navigation_ms: 400,
                probe_ms: 100,
                poll_interval_ms: 10,
                scenario_ms: 2_000,
            })
    }

    async fn logs_in(ctx: &mut ScenarioContext<SimulatedStore>) -> ProbeResult<()> {
        ctx.login().await
    }

    async fn fails_on_cart(ctx: &mut ScenarioContext<SimulatedStore>) -> ProbeResult<()> {
        ctx.login().await?;
        ctx.cart.remove(&mut ctx.page, 0).await
    }

    async fn hangs(ctx: &mut ScenarioContext<SimulatedStore>) -> ProbeResult<()> {
        ctx.login().await?;
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }

    fn suite() -> Vec<Scenario<SimulatedStore>> {
        vec![
            Scenario::new("logs in", Persona::Standard, |ctx| logs_in(ctx).boxed()),
            Scenario::new("fails on cart", Persona::Standard, |ctx| fails_on_cart(ctx).boxed()),
            Scenario::new("logs in again", Persona::Problem, |ctx| logs_in(ctx).boxed()),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_carries_last_page_and_action() {
        let runner = ScenarioRunner::new(config());
        let factory = SimulatedStoreFactory::new("http://shop.test");
        let err = runner.execute(&factory, &suite()[1]).await.unwrap_err();
        match err {
            ProbeError::Scenario {
                name, last_page, ..
            } => {
                assert_eq!(name, "fails on cart");
                assert_eq!(last_page, "Catalog");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_timeout_aborts() {
        let runner = ScenarioRunner::new(config());
        let factory = SimulatedStoreFactory::new("http://shop.test");
        let scenario = Scenario::new("hangs", Persona::Standard, |ctx| hangs(ctx).boxed());
        let report = runner.run_one(&factory, &scenario).await;
        let failure = report.failure.unwrap();
        assert_eq!(failure.kind, crate::result::ErrorKind::Timeout);
        assert_eq!(failure.last_page, "Catalog");
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_suite_keeps_order() {
        let runner = ScenarioRunner::new(config());
        let factory = SimulatedStoreFactory::new("http://shop.test");
        let report = runner.run_all(&factory, &suite()).await;
        let names: Vec<&str> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["logs in", "fails on cart", "logs in again"]);
        assert_eq!(report.passed_count(), 2);
        assert_eq!(report.failures()[0].name, "fails on cart");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_fast_stops_sequential_run() {
        let runner = ScenarioRunner::new(config())
            .with_parallel(false)
            .with_failure_mode(FailureMode::FailFast);
        let factory = SimulatedStoreFactory::new("http://shop.test");
        let report = runner.run_all(&factory, &suite()).await;
        assert_eq!(report.total(), 2);
        assert!(!report.all_passed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_session_tracking() {
        let mut ctx = ScenarioContext::new(
            SimulatedStore::new("http://shop.test"),
            Persona::Standard,
            Arc::new(config()),
        );
        assert!(ctx.session().is_none());
        assert!(ctx.logout().await.is_err());
        ctx.login().await.unwrap();
        assert_eq!(ctx.session().unwrap().current_page(), LogicalPage::Catalog);
        ctx.logout().await.unwrap();
        assert!(!ctx.session().unwrap().is_authenticated());
    }

    #[test]
    fn test_glitch_context_scales_timeouts() {
        let ctx = ScenarioContext::new(
            SimulatedStore::new("http://shop.test"),
            Persona::PerformanceGlitch,
            Arc::new(config()),
        );
        assert_eq!(ctx.page.timeouts().action_ms, 400);
        assert_eq!(ctx.page.timeouts().scenario_ms, 4_000);
        assert!(ctx.policy().accepts_kind(crate::tolerance::OutcomeKind::ValidationError));
    }
}
