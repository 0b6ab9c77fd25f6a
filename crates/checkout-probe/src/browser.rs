//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`ChromiumDriver`] implements
//! [`StoreDriver`](crate::driver::StoreDriver) by evaluating each selector's
//! DOM query in the page. Every scenario gets its own browser process from
//! [`ChromiumFactory`].

use crate::config::HarnessConfig;

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Chromium sandbox (disable in containers)
    pub sandbox: bool,
    /// Path to the chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Window width
    pub viewport_width: u32,
    /// Window height
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chromium_path: None,
            viewport_width: 1280,
            viewport_height: 800,
        }
    }
}

impl BrowserConfig {
    /// Launch options matching the harness configuration
    #[must_use]
    pub fn from_harness(config: &HarnessConfig) -> Self {
        Self::default().with_headless(config.headless)
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumDriver, ChromiumFactory};

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{DriverFactory, StoreDriver};
    use crate::locator::Selector;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tokio::sync::Mutex;
    use tracing::{debug, warn};

    fn driver_error(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::Driver {
            message: e.to_string(),
        }
    }

    /// One browser process with a single tab
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: Mutex<CdpBrowser>,
        page: CdpPage,
        handle: tokio::task::JoinHandle<()>,
    }

    impl ChromiumDriver {
        /// Launch chromium and open a blank tab
        pub async fn launch(config: &BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }
            let cdp_config = builder
                .build()
                .map_err(|message| ProbeError::BrowserLaunchError { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                ProbeError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;
            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ProbeError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            debug!(headless = config.headless, "Chromium launched");
            Ok(Self {
                browser: Mutex::new(browser),
                page,
                handle,
            })
        }

        /// Evaluate `body` as a function and decode its JSON result
        ///
        /// The result goes through `JSON.stringify` so `null` survives the
        /// round trip.
        async fn eval<T: DeserializeOwned>(&self, body: &str) -> ProbeResult<T> {
            let expr = format!("JSON.stringify((() => {{ {body} }})())");
            let json: String = self
                .page
                .evaluate(expr)
                .await
                .map_err(driver_error)?
                .into_value()
                .map_err(driver_error)?;
            Ok(serde_json::from_str(&json)?)
        }

        /// Run `action` against the resolved element, `el`
        async fn on_element(&self, selector: &Selector, action: &str) -> ProbeResult<()> {
            let body = format!(
                "const el = {}; if (!el) return false; {action}; return true;",
                selector.to_query()
            );
            if self.eval::<bool>(&body).await? {
                Ok(())
            } else {
                Err(ProbeError::ElementNotFound {
                    selector: selector.to_string(),
                })
            }
        }

        /// Set a form control's value through the native setter so the
        /// page's framework observes the change
        async fn set_value(&self, selector: &Selector, value: &str) -> ProbeResult<()> {
            let value = serde_json::to_string(value)?;
            let action = format!(
                "const setter = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value').set; \
                 setter.call(el, {value}); \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }}))"
            );
            self.on_element(selector, &action).await
        }
    }

    #[async_trait]
    impl StoreDriver for ChromiumDriver {
        async fn goto(&mut self, url: &str) -> ProbeResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| ProbeError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&mut self) -> ProbeResult<String> {
            self.eval("return location.href;").await
        }

        async fn title(&mut self) -> ProbeResult<String> {
            self.eval("return document.title;").await
        }

        async fn fill(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
            self.set_value(selector, value).await
        }

        async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
            self.on_element(selector, "el.click()").await
        }

        async fn select_option(&mut self, selector: &Selector, value: &str) -> ProbeResult<()> {
            self.set_value(selector, value).await
        }

        async fn text_content(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
            let body = format!(
                "const el = {}; return el ? el.textContent : null;",
                selector.to_query()
            );
            self.eval(&body).await
        }

        async fn all_text_contents(&mut self, selector: &Selector) -> ProbeResult<Vec<String>> {
            let body = format!(
                "return {}.map(el => el.textContent || '');",
                selector.to_all_query()
            );
            self.eval(&body).await
        }

        async fn input_value(&mut self, selector: &Selector) -> ProbeResult<Option<String>> {
            let body = format!(
                "const el = {}; return el && 'value' in el ? el.value : null;",
                selector.to_query()
            );
            self.eval(&body).await
        }

        async fn count(&mut self, selector: &Selector) -> ProbeResult<usize> {
            self.eval(&format!("return {};", selector.to_count_query()))
                .await
        }

        async fn is_visible(&mut self, selector: &Selector) -> ProbeResult<bool> {
            let body = format!(
                "const el = {}; return !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);",
                selector.to_query()
            );
            self.eval(&body).await
        }

        async fn close(&mut self) -> ProbeResult<()> {
            let mut browser = self.browser.lock().await;
            let closed = browser.close().await.map(|_| ()).map_err(driver_error);
            if let Err(e) = browser.wait().await {
                warn!(error = %e, "Chromium did not exit cleanly");
            }
            self.handle.abort();
            closed
        }
    }

    /// Launches one chromium per scenario
    #[derive(Debug, Clone, Default)]
    pub struct ChromiumFactory {
        config: BrowserConfig,
    }

    impl ChromiumFactory {
        /// Factory with these launch options
        #[must_use]
        pub const fn new(config: BrowserConfig) -> Self {
            Self { config }
        }
    }

    #[async_trait]
    impl DriverFactory for ChromiumFactory {
        type Driver = ChromiumDriver;

        async fn open(&self) -> ProbeResult<ChromiumDriver> {
            ChromiumDriver::launch(&self.config).await
        }
    }
}
