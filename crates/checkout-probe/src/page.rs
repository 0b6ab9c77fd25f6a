//! Page context: interaction primitives over a [`StoreDriver`].
//!
//! Each primitive addresses one element (or one element set for counts) or
//! one navigation target. Waits poll at a fixed interval and never re-issue
//! the action they are waiting on.

use crate::config::{join_url, Timeouts};
use crate::driver::StoreDriver;
use crate::flow::LogicalPage;
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{Deadline, UrlPattern, WaitOptions, WaitResult};
use tracing::{debug, warn};

/// Which of two raced conditions was observed first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// The URL matched
    Url,
    /// The element became visible
    Element,
}

/// Browser page plus the bookkeeping every scenario failure reports
#[derive(Debug)]
pub struct Page<D> {
    driver: D,
    base_url: String,
    timeouts: Timeouts,
    location: LogicalPage,
    last_action: String,
}

impl<D: StoreDriver> Page<D> {
    /// Wrap a driver session
    pub fn new(driver: D, base_url: impl Into<String>, timeouts: Timeouts) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            timeouts,
            location: LogicalPage::Unauthenticated,
            last_action: String::from("none"),
        }
    }

    /// Underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Underlying driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Last verified logical page
    pub const fn location(&self) -> LogicalPage {
        self.location
    }

    pub(crate) fn set_location(&mut self, location: LogicalPage) {
        self.location = location;
    }

    /// Last primitive action attempted
    pub fn last_action(&self) -> &str {
        &self.last_action
    }

    /// Active wait bounds
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Replace the wait bounds (persona scaling)
    pub fn set_timeouts(&mut self, timeouts: Timeouts) {
        self.timeouts = timeouts;
    }

    /// Absolute URL for a route path
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn record(&mut self, action: String) {
        debug!(action = %action, page = %self.location, "Primitive");
        self.last_action = action;
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Navigate to a route path
    pub async fn goto(&mut self, path: &str) -> ProbeResult<()> {
        self.record(format!("goto {path}"));
        let url = self.url_for(path);
        self.driver.goto(&url).await
    }

    /// Wait for the field, then replace its value
    pub async fn fill(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        self.record(format!("fill {selector}"));
        self.visible_within(selector, self.timeouts.action()).await?;
        self.driver.fill(selector, value).await
    }

    /// Wait for the element, then click it
    pub async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        self.record(format!("click {selector}"));
        self.visible_within(selector, self.timeouts.action()).await?;
        self.driver.click(selector).await
    }

    /// Wait for the select, then choose an option by value
    pub async fn select_option(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
        self.record(format!("select {selector} = {value}"));
        self.visible_within(selector, self.timeouts.action()).await?;
        self.driver.select_option(selector, value).await
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Trimmed text of an element, `None` when absent
    pub async fn text(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
        Ok(self
            .driver
            .text_content(selector)
            .await?
            .map(|t| t.trim().to_string()))
    }

    /// Trimmed text of every match, in display order
    pub async fn texts(&mut self, selector: &Selector) -> ProbeResult<Vec<String>> {
        Ok(self
            .driver
            .all_text_contents(selector)
            .await?
            .into_iter()
            .map(|t| t.trim().to_string())
            .collect())
    }

    /// Current value of an input or select
    pub async fn input_value(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
        self.driver.input_value(selector).await
    }

    /// Number of matches
    pub async fn count(&mut self, selector: &Selector) -> ProbeResult<usize> {
        self.driver.count(selector).await
    }

    /// Whether the element is rendered right now
    pub async fn is_visible(&mut self, selector: &Selector) -> ProbeResult<bool> {
        self.driver.is_visible(selector).await
    }

    /// Current absolute URL
    pub async fn current_url(&mut self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    /// Document title
    pub async fn title(&mut self) -> ProbeResult<String> {
        self.driver.title().await
    }

    // =========================================================================
    // WAITS
    // =========================================================================

    async fn visible_within(
        &mut self,
        selector: &Selector,
        options: WaitOptions,
    ) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(options);
        loop {
            if self.driver.is_visible(selector).await? {
                return Ok(deadline.finish(format!("{selector} visible")));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{selector} to be visible"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Wait until the URL matches (navigation bound)
    pub async fn wait_for_url(&mut self, pattern: &UrlPattern) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(self.timeouts.navigation());
        loop {
            let url = self.driver.current_url().await?;
            if pattern.matches(&url) {
                return Ok(deadline.finish(pattern.to_string()));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{pattern} (last seen {url})"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Wait until the element is rendered
    pub async fn wait_for_visible(&mut self, selector: &Selector) -> ProbeResult<WaitResult> {
        self.visible_within(selector, self.timeouts.action()).await
    }

    /// Wait until the element is absent or hidden
    pub async fn wait_for_hidden(&mut self, selector: &Selector) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(self.timeouts.action());
        loop {
            if !self.driver.is_visible(selector).await? {
                return Ok(deadline.finish(format!("{selector} hidden")));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{selector} to be hidden"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Wait until the element's trimmed text equals `expected`
    pub async fn wait_for_text(
        &mut self,
        selector: &Selector,
        expected: &str,
    ) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(self.timeouts.action());
        loop {
            let text = self.text(selector).await?;
            if text.as_deref() == Some(expected) {
                return Ok(deadline.finish(format!("{selector} == {expected:?}")));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{selector} to read {expected:?} (last seen {text:?})"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Wait until the element's text contains `needle`
    pub async fn wait_for_text_containing(
        &mut self,
        selector: &Selector,
        needle: &str,
    ) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(self.timeouts.action());
        loop {
            let text = self.text(selector).await?;
            if text.as_deref().is_some_and(|t| t.contains(needle)) {
                return Ok(deadline.finish(format!("{selector} contains {needle:?}")));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{selector} to contain {needle:?} (last seen {text:?})"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Wait until exactly `expected` elements match
    pub async fn wait_for_count(
        &mut self,
        selector: &Selector,
        expected: usize,
    ) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(self.timeouts.action());
        loop {
            let count = self.driver.count(selector).await?;
            if count == expected {
                return Ok(deadline.finish(format!("{selector} count == {expected}")));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{selector} count {expected} (last seen {count})"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Wait until an input or select holds `expected`
    pub async fn wait_for_value(
        &mut self,
        selector: &Selector,
        expected: &str,
    ) -> ProbeResult<WaitResult> {
        let mut deadline = Deadline::start(self.timeouts.action());
        loop {
            let value = self.driver.input_value(selector).await?;
            if value.as_deref() == Some(expected) {
                return Ok(deadline.finish(format!("{selector} value == {expected:?}")));
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{selector} value {expected:?} (last seen {value:?})"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Race a URL match against an element appearing (navigation bound)
    pub async fn wait_for_url_or_visible(
        &mut self,
        pattern: &UrlPattern,
        selector: &Selector,
    ) -> ProbeResult<Arrival> {
        let mut deadline = Deadline::start(self.timeouts.navigation());
        loop {
            if pattern.matches(&self.driver.current_url().await?) {
                return Ok(Arrival::Url);
            }
            if self.driver.is_visible(selector).await? {
                return Ok(Arrival::Element);
            }
            if deadline.expired() {
                return Err(ProbeError::timeout(
                    format!("{pattern} or {selector} visible"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.pause().await;
        }
    }

    /// Bounded visibility probe that never fails
    ///
    /// Driver errors count as "not visible".
    pub async fn probe_visible(&mut self, selector: &Selector, window_ms: u64) -> bool {
        let options = self.timeouts.probe().with_timeout(window_ms);
        match self.visible_within(selector, options).await {
            Ok(_) => true,
            Err(e) if e.is_timeout() => false,
            Err(e) => {
                warn!(selector = %selector, error = %e, "Probe failed");
                false
            }
        }
    }
}
