//! StoreDriver - Abstract Browser Automation Trait
//!
//! The harness never talks to a browser directly. Everything it needs from
//! the automation engine is one of the operations below, so the chromium
//! adapter and the in-memory [`SimulatedStore`](crate::SimulatedStore) are
//! interchangeable.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StoreDriver (Abstract Trait)                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐        ┌─────────────────────────┐  │
//! │  │  ChromiumDriver     │        │  SimulatedStore         │  │
//! │  │  (feature=browser)  │        │  (in-memory contract)   │  │
//! │  │  CDP via            │        │  unit + integration     │  │
//! │  │  chromiumoxide      │        │  tests                  │  │
//! │  └─────────────────────┘        └─────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers report what the page shows *now*. Waiting, polling and
//! post-condition checks live one layer up in [`Page`](crate::Page).

use crate::locator::Selector;
use crate::result::ProbeResult;
use async_trait::async_trait;

/// Abstract driver trait for browser automation
///
/// Implementations must be `Send + Sync` so scenarios can run as independent
/// tasks.
/// Each driver instance is one isolated browser session.
#[async_trait]
pub trait StoreDriver: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&mut self, url: &str) -> ProbeResult<()>;

    /// Current absolute URL
    async fn current_url(&mut self) -> ProbeResult<String>;

    /// Document title
    async fn title(&mut self) -> ProbeResult<String>;

    /// Replace the value of an input element
    async fn fill(&mut self, selector: &Selector, value: &str) -> ProbeResult<()>;

    /// Click an element (first match unless narrowed)
    async fn click(&mut self, selector: &Selector) -> ProbeResult<()>;

    /// Choose an option of a `<select>` by value
    async fn select_option(&mut self, selector: &Selector, value: &str) -> ProbeResult<()>;

    /// Text content of the element, `None` when absent
    async fn text_content(&mut self, selector: &Selector) -> ProbeResult<Option<String>>;

    /// Text content of every match, in document order
    async fn all_text_contents(&mut self, selector: &Selector) -> ProbeResult<Vec<String>>;

    /// Current value of an input or select, `None` when absent
    async fn input_value(&mut self, selector: &Selector) -> ProbeResult<Option<String>>;

    /// Number of matching elements
    async fn count(&mut self, selector: &Selector) -> ProbeResult<usize>;

    /// Whether the element is present and rendered
    async fn is_visible(&mut self, selector: &Selector) -> ProbeResult<bool>;

    /// Tear down the browser session
    async fn close(&mut self) -> ProbeResult<()>;
}

/// Produces one isolated driver session per scenario.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Driver type handed to scenarios
    type Driver: StoreDriver + 'static;

    /// Open a fresh, isolated session
    async fn open(&self) -> ProbeResult<Self::Driver>;
}
