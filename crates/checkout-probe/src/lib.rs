//! checkout-probe: Acceptance Harness for Storefront Checkout Journeys
//!
//! Drives a storefront through a browser the way a shopper would: log in,
//! browse and sort the catalog, fill the cart, check out. Every step is
//! verified before the next one starts, and personas with known defects are
//! judged by a tolerance policy instead of the happy path.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 checkout-probe Architecture                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Journeys   │    │ Session /  │    │ Page +     │            │
//! │   │ + Runner   │───►│ Cart /     │───►│ StoreDriver│──► browser │
//! │   │            │    │ Checkout   │    │ (waits)    │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                 │                                     │
//! │         ▼                 ▼                                     │
//! │   ┌────────────┐    ┌────────────┐                              │
//! │   │ Suite      │    │ Assertions │                              │
//! │   │ Report     │    │ + Tolerance│                              │
//! │   └────────────┘    └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without the `browser` feature the harness runs against
//! [`sim::SimulatedStore`], an in-memory model of the storefront.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Value and page assertions
pub mod assertion;

/// Cart Helper: expected cart, badge and cart page
pub mod cart;

/// Catalog listing, sorting and product detail
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod catalog;

/// Checkout form, overview and completion
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod checkout;

/// Routes and controls of the storefront
pub mod controls;

/// Logical pages and their declared transitions
pub mod flow;

/// Named end-to-end journeys
#[allow(clippy::missing_errors_doc, clippy::future_not_send)]
pub mod journeys;

/// Session Helper: login, logout and the auth probe
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod session;

/// In-memory storefront
#[allow(clippy::missing_errors_doc, clippy::too_many_lines)]
pub mod sim;

#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod browser;
mod config;
#[allow(clippy::missing_errors_doc)]
mod driver;
mod locator;
mod logging;
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
mod page;
mod persona;
mod report;
mod result;
#[allow(clippy::missing_errors_doc, clippy::future_not_send)]
mod runner;
mod tolerance;
mod wait;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumFactory};
pub use cart::{Cart, CartLine};
pub use catalog::{CatalogItem, SortMode};
pub use checkout::{CheckoutInfo, FormField, OrderSummary, Submission};
pub use config::{
    join_url, HarnessConfig, Timeouts, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_HEADLESS, ENV_TIMEOUT_MS,
};
pub use driver::{DriverFactory, StoreDriver};
pub use flow::{LogicalPage, Trigger};
pub use locator::Selector;
pub use logging::{env_filter, init_tracing, LogFormat, LOG_ENV};
pub use page::{Arrival, Page};
pub use persona::{Credentials, Persona, PersonaTable, DEFAULT_PASSWORD};
pub use report::{FailureContext, ScenarioReport, ScenarioStatus, SuiteReport};
pub use result::{ErrorKind, ProbeError, ProbeResult};
pub use runner::{FailureMode, Scenario, ScenarioContext, ScenarioFn, ScenarioRunner};
pub use session::{LoginAttempt, Session};
pub use sim::{Fault, SimulatedStore, SimulatedStoreFactory};
pub use tolerance::{Outcome, OutcomeKind, TolerancePolicy};
pub use wait::{
    path_of, Deadline, UrlPattern, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_PROBE_WINDOW_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

