//! Assertions for scenario validation.
//!
//! Value checks compare what the harness expected with what the page showed.
//! Page expectations wait for a state and, when it never appears, report the
//! last observed state as an assertion failure rather than a bare timeout.

use crate::driver::StoreDriver;
use crate::locator::Selector;
use crate::page::Page;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::UrlPattern;
use std::fmt::Debug;

/// Assert two values are equal
pub fn expect_eq<T: PartialEq + Debug>(what: &str, expected: &T, actual: &T) -> ProbeResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ProbeError::assertion(
            format!("{what} {expected:?}"),
            format!("{actual:?}"),
        ))
    }
}

/// Assert a string contains a substring (case-sensitive)
pub fn expect_contains(haystack: &str, needle: &str) -> ProbeResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(ProbeError::assertion(
            format!("text containing {needle:?}"),
            format!("{haystack:?}"),
        ))
    }
}

/// Assert a condition holds
pub fn expect_true(condition: bool, expected: &str) -> ProbeResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ProbeError::assertion(expected, "condition was false"))
    }
}

/// Assert two amounts are equal to `decimals` places
///
/// Passes when `|expected - actual| < 10^-decimals / 2`.
pub fn expect_close(what: &str, expected: f64, actual: f64, decimals: i32) -> ProbeResult<()> {
    let tolerance = 10f64.powi(-decimals) / 2.0;
    if (expected - actual).abs() < tolerance {
        Ok(())
    } else {
        Err(ProbeError::assertion(
            format!("{what} {expected:.prec$} (±{tolerance})", prec = decimals.max(0) as usize),
            format!("{actual}"),
        ))
    }
}

async fn observed_text<D: StoreDriver>(page: &mut Page<D>, selector: &Selector) -> String {
    match page.text(selector).await {
        Ok(Some(text)) => format!("{text:?}"),
        Ok(None) => "element absent".to_string(),
        Err(e) => format!("unreadable ({e})"),
    }
}

fn or_observed(err: ProbeError, expected: String, observed: String) -> ProbeError {
    if err.is_timeout() {
        ProbeError::assertion(expected, observed)
    } else {
        err
    }
}

/// Expect the URL to match within the navigation bound
pub async fn expect_url<D: StoreDriver>(page: &mut Page<D>, pattern: &UrlPattern) -> ProbeResult<()> {
    match page.wait_for_url(pattern).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_timeout() => {
            let observed = page
                .current_url()
                .await
                .unwrap_or_else(|e| format!("unreadable ({e})"));
            Err(or_observed(e, pattern.to_string(), observed))
        }
        Err(e) => Err(e),
    }
}

/// Expect the element's trimmed text to equal `expected`
pub async fn expect_text<D: StoreDriver>(
    page: &mut Page<D>,
    selector: &Selector,
    expected: &str,
) -> ProbeResult<()> {
    match page.wait_for_text(selector, expected).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let observed = observed_text(page, selector).await;
            Err(or_observed(e, format!("{selector} to read {expected:?}"), observed))
        }
    }
}

/// Expect the element's text to contain `needle`
pub async fn expect_text_contains<D: StoreDriver>(
    page: &mut Page<D>,
    selector: &Selector,
    needle: &str,
) -> ProbeResult<()> {
    match page.wait_for_text_containing(selector, needle).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let observed = observed_text(page, selector).await;
            Err(or_observed(e, format!("{selector} to contain {needle:?}"), observed))
        }
    }
}

/// Expect the element to be rendered
pub async fn expect_visible<D: StoreDriver>(page: &mut Page<D>, selector: &Selector) -> ProbeResult<()> {
    page.wait_for_visible(selector)
        .await
        .map(|_| ())
        .map_err(|e| or_observed(e, format!("{selector} visible"), "not visible".to_string()))
}

/// Expect the element to be absent or hidden
pub async fn expect_hidden<D: StoreDriver>(page: &mut Page<D>, selector: &Selector) -> ProbeResult<()> {
    match page.wait_for_hidden(selector).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let observed = observed_text(page, selector).await;
            Err(or_observed(e, format!("{selector} hidden"), format!("visible with {observed}")))
        }
    }
}

/// Expect exactly `expected` matches
pub async fn expect_count<D: StoreDriver>(
    page: &mut Page<D>,
    selector: &Selector,
    expected: usize,
) -> ProbeResult<()> {
    match page.wait_for_count(selector, expected).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let observed = match page.count(selector).await {
                Ok(n) => n.to_string(),
                Err(e) => format!("unreadable ({e})"),
            };
            Err(or_observed(e, format!("{expected} x {selector}"), observed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod value_tests {
        use super::*;

        #[test]
        fn test_expect_eq() {
            assert!(expect_eq("count", &2, &2).is_ok());
            let err = expect_eq("count", &2, &3).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Assertion failed: expected count 2, observed 3"
            );
        }

        #[test]
        fn test_expect_contains_is_case_sensitive() {
            assert!(expect_contains("Error: First Name is required", "First Name is required").is_ok());
            assert!(expect_contains("Error: first name is required", "First Name is required").is_err());
        }

        #[test]
        fn test_expect_close_two_places() {
            assert!(expect_close("total", 43.18, 43.18, 2).is_ok());
            assert!(expect_close("total", 43.18, 43.184, 2).is_ok());
            assert!(expect_close("total", 43.18, 43.19, 2).is_err());
            assert!(expect_close("total", 39.98 + 3.20, 43.18, 2).is_ok());
        }

        #[test]
        fn test_expect_true() {
            assert!(expect_true(true, "x").is_ok());
            assert!(matches!(
                expect_true(false, "x"),
                Err(ProbeError::AssertionFailed { .. })
            ));
        }
    }

    mod page_tests {
        use super::*;
        use crate::config::Timeouts;
        use crate::controls;
        use crate::sim::SimulatedStore;

        fn page() -> Page<SimulatedStore> {
            let timeouts = Timeouts {
                action_ms: 100,
                navigation_ms: 100,
                probe_ms: 100,
                poll_interval_ms: 10,
                scenario_ms: 1_000,
            };
            Page::new(SimulatedStore::new("http://shop.test"), "http://shop.test", timeouts)
        }

        #[tokio::test(start_paused = true)]
        async fn test_expect_url_reports_observed_url() {
            let mut page = page();
            page.goto("/").await.unwrap();
            let err = expect_url(&mut page, &UrlPattern::path("/cart.html"))
                .await
                .unwrap_err();
            match err {
                ProbeError::AssertionFailed { expected, observed } => {
                    assert_eq!(expected, "path == /cart.html");
                    assert_eq!(observed, "http://shop.test/");
                }
                other => panic!("unexpected {other}"),
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_expect_text_reports_absence() {
            let mut page = page();
            page.goto("/").await.unwrap();
            let err = expect_text(&mut page, &Selector::css(controls::CART_BADGE), "1")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("element absent"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_expect_count_and_visibility() {
            let mut page = page();
            page.goto("/").await.unwrap();
            assert!(expect_count(&mut page, &Selector::css(controls::USERNAME), 1).await.is_ok());
            assert!(expect_visible(&mut page, &Selector::css(controls::PASSWORD)).await.is_ok());
            assert!(expect_hidden(&mut page, &Selector::css(controls::CART_BADGE)).await.is_ok());
            let err = expect_hidden(&mut page, &Selector::css(controls::LOGIN_BUTTON))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("\"Login\""));
        }
    }
}
