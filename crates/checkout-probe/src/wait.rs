//! Wait Mechanisms
//!
//! Bounded polling used by every primitive that observes a post-condition.
//! Polling reads state only; it never re-issues the action being waited on.

use regex::Regex;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element and URL waits (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default window for non-failing visibility probes (2 seconds)
pub const DEFAULT_PROBE_WINDOW_MS: u64 = 2_000;

// =============================================================================
// URL PATTERN
// =============================================================================

/// URL pattern matching for navigation waits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Path match, ignoring origin, query and fragment
    Path(String),
    /// Contains substring
    Contains(String),
    /// Regex match against the full URL
    Regex(String),
}

impl UrlPattern {
    /// Path pattern
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Path(pattern) => path_of(url) == pattern,
            Self::Contains(pattern) => url.contains(pattern.as_str()),
            Self::Regex(pattern) => Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(p) => write!(f, "url == {p}"),
            Self::Path(p) => write!(f, "path == {p}"),
            Self::Contains(p) => write!(f, "url contains {p}"),
            Self::Regex(p) => write!(f, "url =~ /{p}/"),
        }
    }
}

/// Path component of a URL (`/` when the URL has none)
#[must_use]
pub fn path_of(url: &str) -> &str {
    let after_scheme = url.find("://").map_or(url, |i| &url[i + 3..]);
    let path = match after_scheme.find('/') {
        Some(i) if url.contains("://") => &after_scheme[i..],
        Some(_) => after_scheme,
        None => "/",
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    match &path[..end] {
        "" => "/",
        p => p,
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create wait options from explicit bounds
    #[must_use]
    pub const fn new_const(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// DEADLINE
// =============================================================================

/// A running wait: start instant plus its bound.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    options: WaitOptions,
    polls: usize,
}

impl Deadline {
    /// Start the clock
    #[must_use]
    pub fn start(options: WaitOptions) -> Self {
        Self {
            start: Instant::now(),
            options,
            polls: 0,
        }
    }

    /// Time spent so far
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the bound has been reached
    #[must_use]
    pub fn expired(&self) -> bool {
        self.elapsed() >= self.options.timeout()
    }

    /// Number of completed polls
    #[must_use]
    pub const fn polls(&self) -> usize {
        self.polls
    }

    /// Timeout this deadline enforces
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.options.timeout_ms
    }

    /// Sleep one poll interval, never past the bound
    pub async fn pause(&mut self) {
        self.polls += 1;
        let remaining = self.options.timeout().saturating_sub(self.elapsed());
        tokio::time::sleep(self.options.poll_interval().min(remaining)).await;
    }

    /// Summarise a successful wait
    #[must_use]
    pub fn finish(&self, waited_for: impl Into<String>) -> WaitResult {
        WaitResult {
            elapsed: self.elapsed(),
            waited_for: waited_for.into(),
            polls: self.polls,
        }
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
    /// Poll intervals slept before success
    pub polls: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod url_pattern_tests {
        use super::*;

        #[test]
        fn test_path_of_full_url() {
            assert_eq!(
                path_of("https://www.saucedemo.com/inventory.html"),
                "/inventory.html"
            );
            assert_eq!(path_of("https://www.saucedemo.com/"), "/");
            assert_eq!(path_of("https://www.saucedemo.com"), "/");
        }

        #[test]
        fn test_path_of_strips_query_and_fragment() {
            assert_eq!(
                path_of("http://localhost:3000/inventory-item.html?id=4"),
                "/inventory-item.html"
            );
            assert_eq!(path_of("http://h/cart.html#top"), "/cart.html");
        }

        #[test]
        fn test_path_of_bare_path() {
            assert_eq!(path_of("/cart.html"), "/cart.html");
            assert_eq!(path_of(""), "/");
        }

        #[test]
        fn test_path_pattern() {
            let pattern = UrlPattern::path("/inventory.html");
            assert!(pattern.matches("https://shop.test/inventory.html"));
            assert!(!pattern.matches("https://shop.test/inventory-item.html?id=1"));
        }

        #[test]
        fn test_root_path_does_not_match_other_pages() {
            let pattern = UrlPattern::path("/");
            assert!(pattern.matches("https://shop.test/"));
            assert!(!pattern.matches("https://shop.test/cart.html"));
        }

        #[test]
        fn test_regex_and_contains() {
            assert!(UrlPattern::Regex(r"inventory-item\.html\?id=\d+".into())
                .matches("https://shop.test/inventory-item.html?id=4"));
            assert!(!UrlPattern::Regex("(".into()).matches("anything"));
            assert!(UrlPattern::Contains("cart".into()).matches("https://shop.test/cart.html"));
        }

        #[test]
        fn test_exact() {
            assert!(UrlPattern::Exact("https://a/".into()).matches("https://a/"));
            assert!(!UrlPattern::Exact("https://a/".into()).matches("https://a/x"));
        }
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(10_000).with_poll_interval(200);
            assert_eq!(opts.timeout(), Duration::from_millis(10_000));
            assert_eq!(opts.poll_interval(), Duration::from_millis(200));
        }
    }

    mod deadline_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_deadline_expires_after_timeout() {
            let mut deadline = Deadline::start(WaitOptions::new().with_timeout(120).with_poll_interval(50));
            assert!(!deadline.expired());
            deadline.pause().await;
            deadline.pause().await;
            assert!(!deadline.expired());
            deadline.pause().await;
            assert!(deadline.expired());
            assert_eq!(deadline.polls(), 3);
            assert_eq!(deadline.elapsed(), Duration::from_millis(120));
        }

        #[tokio::test(start_paused = true)]
        async fn test_finish_reports_polls() {
            let mut deadline = Deadline::start(WaitOptions::new());
            deadline.pause().await;
            let result = deadline.finish("badge");
            assert_eq!(result.polls, 1);
            assert_eq!(result.waited_for, "badge");
        }
    }
}
