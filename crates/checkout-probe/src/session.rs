//! Session Helper: authentication, logout and the auth-state probe.

use crate::config::HarnessConfig;
use crate::controls;
use crate::driver::StoreDriver;
use crate::flow::{self, LogicalPage};
use crate::locator::Selector;
use crate::page::{Arrival, Page};
use crate::persona::{Credentials, Persona};
use crate::result::{ProbeError, ProbeResult};
use tracing::{info, warn};

/// An authenticated persona
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    credentials: Credentials,
    authenticated: bool,
    current_page: LogicalPage,
}

impl Session {
    /// Credentials the session logged in with
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether the session is still logged in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Last logical page the session was seen on
    #[must_use]
    pub const fn current_page(&self) -> LogicalPage {
        self.current_page
    }

    /// Record the page the session is on
    pub fn track(&mut self, page: LogicalPage) {
        self.current_page = page;
    }
}

/// Result of submitting the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAttempt {
    /// The catalog was reached
    Authenticated,
    /// The error banner appeared with this text
    Rejected(String),
}

fn error_banner() -> Selector {
    Selector::test_id(controls::ERROR_TEST_ID)
}

async fn fill_login_form<D: StoreDriver>(
    page: &mut Page<D>,
    credentials: &Credentials,
) -> ProbeResult<()> {
    page.goto(controls::routes::LOGIN).await?;
    page.set_location(LogicalPage::Unauthenticated);
    page.fill(&Selector::css(controls::USERNAME), &credentials.username)
        .await?;
    page.fill(&Selector::css(controls::PASSWORD), &credentials.password)
        .await?;
    flow::check_transition(LogicalPage::Unauthenticated, LogicalPage::Catalog)?;
    page.click(&Selector::css(controls::LOGIN_BUTTON)).await
}

/// Log in and block until the catalog URL is reached
///
/// Only the URL is awaited; the landing page itself is not asserted.
pub async fn login<D: StoreDriver>(
    page: &mut Page<D>,
    credentials: &Credentials,
) -> ProbeResult<Session> {
    fill_login_form(page, credentials).await?;
    page.wait_for_url(&LogicalPage::Catalog.url()).await?;
    page.set_location(LogicalPage::Catalog);
    info!(user = %credentials.username, "Logged in");
    Ok(Session {
        credentials: credentials.clone(),
        authenticated: true,
        current_page: LogicalPage::Catalog,
    })
}

/// Log in as a persona, first scaling the page's waits for it
pub async fn login_as<D: StoreDriver>(
    page: &mut Page<D>,
    persona: Persona,
    config: &HarnessConfig,
) -> ProbeResult<Session> {
    let factor = persona.timeout_factor(config.performance_timeout_factor);
    page.set_timeouts(config.timeouts.scaled(factor));
    login(page, config.personas.get(persona)).await
}

/// Log in as the standard persona
pub async fn login_as_standard<D: StoreDriver>(
    page: &mut Page<D>,
    config: &HarnessConfig,
) -> ProbeResult<Session> {
    login_as(page, Persona::Standard, config).await
}

/// Log in as the problem persona
pub async fn login_as_problem<D: StoreDriver>(
    page: &mut Page<D>,
    config: &HarnessConfig,
) -> ProbeResult<Session> {
    login_as(page, Persona::Problem, config).await
}

/// Log in as the performance-glitch persona with scaled waits
pub async fn login_as_performance_glitch<D: StoreDriver>(
    page: &mut Page<D>,
    config: &HarnessConfig,
) -> ProbeResult<Session> {
    login_as(page, Persona::PerformanceGlitch, config).await
}

/// Submit credentials and report whether the store accepted them
pub async fn submit_credentials<D: StoreDriver>(
    page: &mut Page<D>,
    credentials: &Credentials,
) -> ProbeResult<LoginAttempt> {
    fill_login_form(page, credentials).await?;
    match page
        .wait_for_url_or_visible(&LogicalPage::Catalog.url(), &error_banner())
        .await?
    {
        Arrival::Url => {
            page.set_location(LogicalPage::Catalog);
            Ok(LoginAttempt::Authenticated)
        }
        Arrival::Element => {
            let message = page.text(&error_banner()).await?.unwrap_or_default();
            warn!(user = %credentials.username, message = %message, "Login rejected");
            Ok(LoginAttempt::Rejected(message))
        }
    }
}

/// Close the login error banner and confirm the form is usable again
pub async fn dismiss_login_error<D: StoreDriver>(page: &mut Page<D>) -> ProbeResult<()> {
    page.click(&Selector::css(controls::ERROR_DISMISS)).await?;
    page.wait_for_hidden(&error_banner()).await?;
    page.wait_for_visible(&Selector::css(controls::USERNAME))
        .await
        .map(|_| ())
}

/// Log out through the menu and block until the login page
pub async fn logout<D: StoreDriver>(page: &mut Page<D>, session: &mut Session) -> ProbeResult<()> {
    let from = page.location();
    flow::check_transition(from, LogicalPage::Unauthenticated)?;
    page.click(&Selector::css(controls::MENU_BUTTON)).await?;
    page.click(&Selector::css(controls::LOGOUT_LINK)).await?;
    page.wait_for_url(&LogicalPage::Unauthenticated.url()).await?;
    page.set_location(LogicalPage::Unauthenticated);
    session.authenticated = false;
    session.current_page = LogicalPage::Unauthenticated;
    info!(user = %session.credentials.username, from = %from, "Logged out");
    Ok(())
}

/// Probe for the catalog list within the configured probe window
///
/// Never fails; any error reads as "not authenticated".
pub async fn is_authenticated<D: StoreDriver>(page: &mut Page<D>) -> bool {
    let window = page.timeouts().probe_ms;
    page.probe_visible(&Selector::css(controls::INVENTORY_LIST), window)
        .await
}

/// Turn a rejected attempt into an error
pub fn require_authenticated(attempt: LoginAttempt) -> ProbeResult<()> {
    match attempt {
        LoginAttempt::Authenticated => Ok(()),
        LoginAttempt::Rejected(message) => Err(ProbeError::ValidationRejected {
            field: "login".to_string(),
            message,
        }),
    }
}
