//! A browser session scoped to one scenario.
//!
//! The session owns its driver and a [`Waiter`]. All interaction goes through
//! [`Session::wait_then_act`], so nothing is clicked, typed into or read
//! before its readiness predicate has been observed.

use crate::config::ProbeConfig;
use crate::driver::{KeyInput, StationDriver};
use crate::fixtures;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::wait::{Readiness, WaitResult, Waiter};
use tracing::{debug, info};

/// What to do with an element once it is ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Click it
    Click,
    /// Send keystrokes to it
    SendKeys(Vec<KeyInput>),
    /// Read its visible text
    ReadText,
    /// Nothing; the wait is the assertion
    Observe,
}

impl Action {
    const fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::SendKeys(_) => "send_keys",
            Self::ReadText => "read_text",
            Self::Observe => "observe",
        }
    }
}

/// Authenticated browser session
#[derive(Debug)]
pub struct Session<D: StationDriver> {
    driver: D,
    waiter: Waiter,
    config: ProbeConfig,
}

impl<D: StationDriver> Session<D> {
    /// Wrap a freshly launched driver
    #[must_use]
    pub fn new(driver: D, config: ProbeConfig) -> Self {
        Self {
            driver,
            waiter: Waiter::with_options(config.wait_options()),
            config,
        }
    }

    /// Configuration of the run
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// The bounded-wait helper
    #[must_use]
    pub const fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// Mutable access to the driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Log in through the login page.
    ///
    /// # Errors
    ///
    /// Fails with a wait timeout if a login control never appears.
    pub async fn login(&mut self) -> ProbeResult<()> {
        let url = self.config.login_url();
        info!(url = %url, user = %self.config.username, "logging in");
        self.driver.navigate(&url).await?;
        self.driver
            .set_viewport(self.config.viewport.width, self.config.viewport.height)
            .await?;

        let username = KeyInput::text(self.config.username.clone());
        let password = KeyInput::text(self.config.password.clone());
        self.send_keys(&fixtures::username_input(), vec![username])
            .await?;
        self.send_keys(&fixtures::password_input(), vec![password])
            .await?;
        self.click(&fixtures::login_submit()).await
    }

    /// Wait until `locator` satisfies `readiness`, then perform `action`.
    ///
    /// Returns the element text for [`Action::ReadText`], `None` otherwise.
    ///
    /// # Errors
    ///
    /// `WaitTimeout` if the predicate never holds, or the driver's error if
    /// the action itself fails.
    pub async fn wait_then_act(
        &mut self,
        locator: &Locator,
        readiness: Readiness,
        action: Action,
    ) -> ProbeResult<Option<String>> {
        let waited: WaitResult = self
            .waiter
            .until(&mut self.driver, locator, readiness)
            .await?;
        debug!(action = action.name(), %locator, polls = waited.polls, "acting");

        match action {
            Action::Click => self.driver.click(locator).await.map(|()| None),
            Action::SendKeys(keys) => self.driver.send_keys(locator, &keys).await.map(|()| None),
            Action::ReadText => self.driver.text(locator).await.map(Some),
            Action::Observe => Ok(None),
        }
    }

    /// Click once present
    ///
    /// # Errors
    ///
    /// See [`Session::wait_then_act`]
    pub async fn click(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.wait_then_act(locator, Readiness::Present, Action::Click)
            .await
            .map(drop)
    }

    /// Click once clickable
    ///
    /// # Errors
    ///
    /// See [`Session::wait_then_act`]
    pub async fn click_when_clickable(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.wait_then_act(locator, Readiness::Clickable, Action::Click)
            .await
            .map(drop)
    }

    /// Type into an element once present
    ///
    /// # Errors
    ///
    /// See [`Session::wait_then_act`]
    pub async fn send_keys(&mut self, locator: &Locator, keys: Vec<KeyInput>) -> ProbeResult<()> {
        self.wait_then_act(locator, Readiness::Present, Action::SendKeys(keys))
            .await
            .map(drop)
    }

    /// Visible text of an element once present
    ///
    /// # Errors
    ///
    /// See [`Session::wait_then_act`]
    pub async fn text_of(&mut self, locator: &Locator) -> ProbeResult<String> {
        self.wait_then_act(locator, Readiness::Present, Action::ReadText)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Wait until an element is present
    ///
    /// # Errors
    ///
    /// See [`Session::wait_then_act`]
    pub async fn expect_present(&mut self, locator: &Locator) -> ProbeResult<()> {
        self.wait_then_act(locator, Readiness::Present, Action::Observe)
            .await
            .map(drop)
    }

    /// Wait until an element with exactly this text is present
    ///
    /// # Errors
    ///
    /// See [`Session::wait_then_act`]
    pub async fn expect_text(&mut self, text: &str) -> ProbeResult<()> {
        self.expect_present(&Locator::text(text)).await
    }

    /// Pause after a list filter so the grid can re-render
    pub async fn settle(&self) {
        let delay = self.config.settle_delay();
        if !delay.is_zero() {
            debug!(delay_ms = self.config.settle_delay_ms, "waiting for filter to settle");
            tokio::time::sleep(delay).await;
        }
    }

    /// Capture a PNG of the current page
    ///
    /// # Errors
    ///
    /// Returns the driver's screenshot error
    pub async fn screenshot(&mut self) -> ProbeResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Close the browser, consuming the session
    ///
    /// # Errors
    ///
    /// Returns the driver's close error
    pub async fn close(mut self) -> ProbeResult<()> {
        debug!("closing session");
        self.driver.close().await
    }
}
