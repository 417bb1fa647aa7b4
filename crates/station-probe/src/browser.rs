//! Browser control for the scenarios.
//!
//! `BrowserConfig` is always available so it can live in `ProbeConfig`.
//! The CDP driver itself is compiled with the `browser` feature and uses
//! chromiumoxide.

use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Launch timeout in milliseconds
    pub launch_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
            launch_timeout_ms: 20_000,
        }
    }
}

impl BrowserConfig {
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

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::significant_drop_tightening)]
mod cdp {
    use super::{is_navigation_error, BrowserConfig};
    use crate::driver::{KeyInput, StationDriver};
    use crate::locator::{Locator, Query};
    use crate::result::{ProbeError, ProbeResult};
    use crate::wait::Readiness;
    use async_trait::async_trait;
    use base64::Engine as _;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::element::Element;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::time::Duration;
    use tracing::{debug, info};

    /// Station driver backed by a real Chromium over CDP
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: CdpBrowser,
        page: CdpPage,
        handle: tokio::task::JoinHandle<()>,
        closed: bool,
    }

    impl ChromiumDriver {
        /// Launch a new browser instance and open a blank page
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: &BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .launch_timeout(Duration::from_millis(config.launch_timeout_ms));

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
                .map_err(|message| ProbeError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| ProbeError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            info!(headless = config.headless, "browser launched");
            Ok(Self {
                browser,
                page,
                handle,
                closed: false,
            })
        }

        async fn find(&self, locator: &Locator, action: &str) -> ProbeResult<Element> {
            let found = match locator.to_query() {
                Query::Css(selector) => self.page.find_element(selector).await,
                Query::XPath(expr) => self.page.find_xpath(expr).await,
            };
            found.map_err(|e| ProbeError::element(locator, action, e.to_string()))
        }
    }

    #[async_trait]
    impl StationDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
            debug!(url, "navigate");
            self.page
                .goto(url)
                .await
                .map_err(|e| ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn set_viewport(&mut self, width: u32, height: u32) -> ProbeResult<()> {
            let params = SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(width))
                .height(i64::from(height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(|message| ProbeError::BrowserLaunch { message })?;
            self.page
                .execute(params)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn is_ready(&mut self, locator: &Locator, readiness: Readiness) -> ProbeResult<bool> {
            match self.page.evaluate(readiness.script(locator)).await {
                Ok(result) => Ok(result.into_value::<bool>().unwrap_or(false)),
                Err(e) => {
                    let message = e.to_string();
                    if is_navigation_error(&message) {
                        debug!(%locator, error = %message, "page mid-navigation, not ready yet");
                        Ok(false)
                    } else {
                        Err(ProbeError::element(locator, "check readiness of", message))
                    }
                }
            }
        }

        async fn click(&mut self, locator: &Locator) -> ProbeResult<()> {
            debug!(%locator, "click");
            let element = self.find(locator, "click").await?;
            element
                .click()
                .await
                .map_err(|e| ProbeError::element(locator, "click", e.to_string()))?;
            Ok(())
        }

        async fn send_keys(&mut self, locator: &Locator, keys: &[KeyInput]) -> ProbeResult<()> {
            debug!(%locator, keys = keys.len(), "send keys");
            let element = self.find(locator, "type into").await?;
            element
                .focus()
                .await
                .map_err(|e| ProbeError::element(locator, "focus", e.to_string()))?;
            for key in keys {
                let sent = match key {
                    KeyInput::Text(text) => element.type_str(text).await,
                    KeyInput::Key(key) => element.press_key(key.name()).await,
                };
                sent.map_err(|e| ProbeError::element(locator, "type into", e.to_string()))?;
            }
            Ok(())
        }

        async fn text(&mut self, locator: &Locator) -> ProbeResult<String> {
            let element = self.find(locator, "read text of").await?;
            let text = element
                .inner_text()
                .await
                .map_err(|e| ProbeError::element(locator, "read text of", e.to_string()))?;
            Ok(text.unwrap_or_default())
        }

        async fn screenshot(&mut self) -> ProbeResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let result = self
                .page
                .execute(params)
                .await
                .map_err(|e| ProbeError::Screenshot {
                    message: e.to_string(),
                })?;
            base64::engine::general_purpose::STANDARD
                .decode(&result.data)
                .map_err(|e| ProbeError::Screenshot {
                    message: e.to_string(),
                })
        }

        async fn close(&mut self) -> ProbeResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            let closed = self.browser.close().await;
            let _ = self.browser.wait().await;
            self.handle.abort();
            closed.map_err(|e| ProbeError::BrowserLaunch {
                message: format!("close failed: {e}"),
            })?;
            info!("browser closed");
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;

/// CDP errors raised while the page swaps documents
const NAVIGATION_ERRORS: &[&str] = &[
    "Execution context was destroyed",
    "Cannot find context with specified id",
    "Cannot find default execution context",
    "Inspected target navigated or closed",
];

/// Whether an evaluation error only means the page is between documents.
/// Anything else (a dead websocket, a crashed renderer) is fatal.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn is_navigation_error(message: &str) -> bool {
    NAVIGATION_ERRORS.iter().any(|marker| message.contains(marker))
}
