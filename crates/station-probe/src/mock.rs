//! Mock driver for unit testing.
//!
//! `MockDriver` keeps a flat list of elements keyed by locator and a list of
//! reactions that change that list when the script navigates, clicks or
//! types. It is enough to replay a scenario without a browser and to check
//! which commands were issued.

use crate::driver::{Key, KeyInput, StationDriver};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::Readiness;
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex};

/// An element of the mock DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Locator that finds this element
    pub locator: Locator,
    /// Visible text
    pub text: String,
    /// Input value, edited by `send_keys`
    pub value: String,
    /// Whether the element passes the clickable predicate
    pub clickable: bool,
    /// Number of readiness checks that still report the element as absent
    pub hidden_polls: u32,
}

impl MockElement {
    /// Create a present, clickable element
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            value: String::new(),
            clickable: true,
            hidden_polls: 0,
        }
    }

    /// Set visible text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Present in the DOM but never clickable
    #[must_use]
    pub const fn not_clickable(mut self) -> Self {
        self.clickable = false;
        self
    }

    /// Report absent for the first `polls` readiness checks
    #[must_use]
    pub const fn appearing_after(mut self, polls: u32) -> Self {
        self.hidden_polls = polls;
        self
    }
}

/// What fires a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Navigation to exactly this URL
    Navigate(String),
    /// Click on the element
    Click(Locator),
    /// Keys sent to the element leave it holding exactly `value`
    Typed {
        /// Input element
        locator: Locator,
        /// Value after typing
        value: String,
    },
}

/// Change applied to the mock DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Insert the element, replacing any element with the same locator
    Show(MockElement),
    /// Remove the element
    Remove(Locator),
}

/// Shared record of driver calls, readable after the driver is dropped
#[derive(Debug, Clone, Default)]
pub struct MockJournal(Arc<Mutex<Vec<String>>>);

impl MockJournal {
    fn push(&self, entry: String) {
        if let Ok(mut entries) = self.0.lock() {
            entries.push(entry);
        }
    }

    /// All recorded calls in order
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Check if a call with this prefix was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.entries().iter().any(|c| c.starts_with(prefix))
    }

    /// Count calls with this prefix
    #[must_use]
    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

type Observer = Arc<dyn Fn(&Trigger) + Send + Sync>;

/// Callbacks told about every trigger, matched or not
#[derive(Default)]
struct Observers(Vec<Observer>);

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observers").field(&self.0.len()).finish()
    }
}

/// Mock driver with a scripted DOM
#[derive(Debug, Default)]
pub struct MockDriver {
    elements: Vec<MockElement>,
    reactions: Vec<(Trigger, Reaction)>,
    observers: Observers,
    journal: MockJournal,
    current_url: String,
    viewport: Option<(u32, u32)>,
    screenshot: Option<Vec<u8>>,
    fail_close: bool,
    closed: bool,
}

impl MockDriver {
    /// Create an empty mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element present from the start
    #[must_use]
    pub fn with_element(mut self, element: MockElement) -> Self {
        self.upsert(element);
        self
    }

    /// Register a reaction
    #[must_use]
    pub fn on(mut self, trigger: Trigger, reaction: Reaction) -> Self {
        self.reactions.push((trigger, reaction));
        self
    }

    /// Register several reactions for one trigger
    #[must_use]
    pub fn on_all(
        mut self,
        trigger: &Trigger,
        reactions: impl IntoIterator<Item = Reaction>,
    ) -> Self {
        for reaction in reactions {
            self.reactions.push((trigger.clone(), reaction));
        }
        self
    }

    /// Call `observer` with every trigger this driver fires
    #[must_use]
    pub fn observe(mut self, observer: impl Fn(&Trigger) + Send + Sync + 'static) -> Self {
        self.observers.0.push(Arc::new(observer));
        self
    }

    /// Set screenshot bytes returned by `screenshot`
    #[must_use]
    pub fn with_screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot = Some(png);
        self
    }

    /// Make `close` fail
    #[must_use]
    pub const fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Handle to the call journal
    #[must_use]
    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }

    /// Current URL
    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Last viewport set
    #[must_use]
    pub const fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    /// Look up an element by locator
    #[must_use]
    pub fn element(&self, locator: &Locator) -> Option<&MockElement> {
        self.elements.iter().find(|e| &e.locator == locator)
    }

    fn upsert(&mut self, element: MockElement) {
        if let Some(existing) = self.elements.iter_mut().find(|e| e.locator == element.locator) {
            *existing = element;
        } else {
            self.elements.push(element);
        }
    }

    fn fire(&mut self, fired: &Trigger) {
        for observer in &self.observers.0 {
            observer(fired);
        }

        let matching: Vec<Reaction> = self
            .reactions
            .iter()
            .filter(|(trigger, _)| trigger == fired)
            .map(|(_, reaction)| reaction.clone())
            .collect();

        for reaction in matching {
            match reaction {
                Reaction::Show(element) => self.upsert(element),
                Reaction::Remove(locator) => self.elements.retain(|e| e.locator != locator),
            }
        }
    }

    fn ensure_open(&self, locator: &Locator, action: &str) -> ProbeResult<()> {
        if self.closed {
            return Err(ProbeError::element(locator, action, "browser closed"));
        }
        Ok(())
    }

    fn visible(&self, locator: &Locator, action: &str) -> ProbeResult<&MockElement> {
        self.ensure_open(locator, action)?;
        self.element(locator)
            .filter(|e| e.hidden_polls == 0)
            .ok_or_else(|| ProbeError::element(locator, action, "no such element"))
    }
}

#[async_trait]
impl StationDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        if self.closed {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: "browser closed".to_string(),
            });
        }
        self.journal.push(format!("navigate:{url}"));
        self.current_url = url.to_string();
        self.fire(&Trigger::Navigate(url.to_string()));
        Ok(())
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> ProbeResult<()> {
        self.journal.push(format!("viewport:{width}x{height}"));
        self.viewport = Some((width, height));
        Ok(())
    }

    async fn is_ready(&mut self, locator: &Locator, readiness: Readiness) -> ProbeResult<bool> {
        self.ensure_open(locator, "query")?;
        let Some(element) = self.elements.iter_mut().find(|e| &e.locator == locator) else {
            return Ok(false);
        };
        if element.hidden_polls > 0 {
            element.hidden_polls -= 1;
            return Ok(false);
        }
        Ok(match readiness {
            Readiness::Present => true,
            Readiness::Clickable => element.clickable,
        })
    }

    async fn click(&mut self, locator: &Locator) -> ProbeResult<()> {
        if !self.visible(locator, "click")?.clickable {
            return Err(ProbeError::element(locator, "click", "element is not clickable"));
        }
        self.journal.push(format!("click:{locator}"));
        self.fire(&Trigger::Click(locator.clone()));
        Ok(())
    }

    async fn send_keys(&mut self, locator: &Locator, keys: &[KeyInput]) -> ProbeResult<()> {
        self.visible(locator, "type into")?;
        let typed: Vec<String> = keys.iter().map(ToString::to_string).collect();
        self.journal
            .push(format!("keys:{locator}:{}", typed.join("")));

        let value = match self.elements.iter_mut().find(|e| &e.locator == locator) {
            Some(element) => {
                for key in keys {
                    match key {
                        KeyInput::Text(text) => element.value.push_str(text),
                        KeyInput::Key(Key::Backspace) => {
                            element.value.pop();
                        }
                        KeyInput::Key(_) => {}
                    }
                }
                element.value.clone()
            }
            None => return Err(ProbeError::element(locator, "type into", "no such element")),
        };

        self.fire(&Trigger::Typed {
            locator: locator.clone(),
            value,
        });
        Ok(())
    }

    async fn text(&mut self, locator: &Locator) -> ProbeResult<String> {
        Ok(self.visible(locator, "read text of")?.text.clone())
    }

    async fn screenshot(&mut self) -> ProbeResult<Vec<u8>> {
        self.journal.push("screenshot".to_string());
        self.screenshot.clone().ok_or_else(|| ProbeError::Screenshot {
            message: "No mock screenshot set".to_string(),
        })
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.journal.push("close".to_string());
        self.closed = true;
        if self.fail_close {
            return Err(ProbeError::BrowserLaunch {
                message: "browser process did not exit".to_string(),
            });
        }
        Ok(())
    }
}

/// Scripted replica of the power-station UI, enough for the four scenarios.
///
/// [`build`] gives one browser over a fixed state. [`StationApp`] keeps the
/// state between browsers, so a stop in one session is what the next
/// session sees.
pub mod station_app {
    use super::{MockDriver, MockElement, Reaction, Trigger};
    use crate::fixtures::{self, RUNNING_LABEL, STOPPED_LABEL};
    use crate::locator::Locator;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Base URL the replica answers on
    pub const BASE_URL: &str = "http://localhost";

    /// Identifier prefilled in the creator form
    pub const PREFILLED_IDENTIFIER: &str = "0000:0000:0000:0000:0000:0000:0000:0004";

    /// Status of the one station listed in the fake grid
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Status {
        /// Listed as running
        Running,
        /// Listed as stopped
        Stopped,
    }

    impl Status {
        const fn label(self) -> &'static str {
            match self {
                Self::Running => RUNNING_LABEL,
                Self::Stopped => STOPPED_LABEL,
            }
        }

        fn control(self) -> Locator {
            match self {
                Self::Running => fixtures::stop_control(),
                Self::Stopped => fixtures::start_control(),
            }
        }

        const fn toggled(self) -> Self {
            match self {
                Self::Running => Self::Stopped,
                Self::Stopped => Self::Running,
            }
        }
    }

    /// What the fake application holds
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AppState {
        /// The listed station, if any
        pub station: Option<Status>,
        /// Whether the disconnect target can be found by its identifier
        pub disconnect_target: bool,
    }

    impl AppState {
        /// One station with the given status, plus the disconnect target
        #[must_use]
        pub const fn with_station(status: Status) -> Self {
            Self {
                station: Some(status),
                disconnect_target: true,
            }
        }

        /// Server-side effect of a committed action
        fn apply(&mut self, trigger: &Trigger) {
            let Trigger::Click(clicked) = trigger else {
                return;
            };
            if let Some(status) = self.station {
                if *clicked == status.control() {
                    self.station = Some(status.toggled());
                }
            }
            if *clicked == fixtures::confirm_yes() {
                self.disconnect_target = false;
            } else if *clicked == fixtures::add_to_system_button() {
                self.disconnect_target = true;
            }
        }
    }

    /// One application shared by every browser opened on it
    #[derive(Debug, Clone)]
    pub struct StationApp {
        state: Arc<Mutex<AppState>>,
    }

    impl StationApp {
        /// Start the application in `state`
        #[must_use]
        pub fn new(state: AppState) -> Self {
            Self {
                state: Arc::new(Mutex::new(state)),
            }
        }

        /// Current state
        #[must_use]
        pub fn state(&self) -> AppState {
            *self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Open a browser on the current state; its actions update the app
        #[must_use]
        pub fn open(&self) -> MockDriver {
            let shared = Arc::clone(&self.state);
            build(self.state()).observe(move |trigger| {
                shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .apply(trigger);
            })
        }
    }

    fn show(locator: Locator) -> Reaction {
        Reaction::Show(MockElement::new(locator))
    }

    fn searched(value: &str) -> Trigger {
        Trigger::Typed {
            locator: fixtures::station_search(),
            value: value.to_string(),
        }
    }

    /// Login page of the replica
    #[must_use]
    pub fn login_url() -> String {
        format!("{BASE_URL}{}", fixtures::LOGIN_PATH)
    }

    /// Build a driver holding the replica in `state`
    #[must_use]
    pub fn build(state: AppState) -> MockDriver {
        let mut driver = MockDriver::new()
            .with_screenshot(vec![0x89, 0x50, 0x4E, 0x47])
            .on_all(
                &Trigger::Navigate(login_url()),
                [
                    show(fixtures::username_input()),
                    show(fixtures::password_input()),
                    show(fixtures::login_submit()),
                ],
            )
            .on_all(
                &Trigger::Click(fixtures::login_submit()),
                [
                    show(fixtures::selected_nav_entry()),
                    show(fixtures::stations_link()),
                ],
            )
            .on_all(
                &Trigger::Click(fixtures::stations_link()),
                [
                    show(fixtures::station_search()),
                    show(fixtures::add_stations_button()),
                ],
            );

        if let Some(status) = state.station {
            let after = status.toggled();
            driver = driver
                .on(searched(status.label()), show(fixtures::first_row_details()))
                .on_all(
                    &Trigger::Click(fixtures::first_row_details()),
                    [
                        show(fixtures::status_label(status.label())),
                        show(status.control()),
                    ],
                )
                .on_all(
                    &Trigger::Click(status.control()),
                    [
                        Reaction::Remove(fixtures::status_label(status.label())),
                        Reaction::Remove(status.control()),
                        show(fixtures::status_label(after.label())),
                        show(after.control()),
                    ],
                );
        }

        if state.disconnect_target {
            driver = driver
                .on(
                    searched(fixtures::DISCONNECT_TARGET_ID),
                    show(fixtures::disconnect_control()),
                )
                .on(
                    Trigger::Click(fixtures::disconnect_control()),
                    show(fixtures::confirm_yes()),
                )
                .on(
                    Trigger::Click(fixtures::confirm_yes()),
                    show(fixtures::disconnected_notice()),
                );
        }

        driver
            .on(
                Trigger::Click(fixtures::add_stations_button()),
                show(fixtures::add_station_button()),
            )
            .on(
                Trigger::Click(fixtures::add_station_button()),
                Reaction::Show(
                    MockElement::new(fixtures::creator_identifier_input())
                        .with_value(PREFILLED_IDENTIFIER),
                ),
            )
            .on(
                Trigger::Typed {
                    locator: fixtures::creator_identifier_input(),
                    value: fixtures::DISCONNECT_TARGET_ID.to_string(),
                },
                show(fixtures::save_control()),
            )
            .on(
                Trigger::Click(fixtures::save_control()),
                show(fixtures::add_to_system_button()),
            )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod element_tests {
        use super::*;

        #[test]
        fn test_element_defaults() {
            let el = MockElement::new(Locator::text("Tak"));
            assert!(el.clickable);
            assert_eq!(el.hidden_polls, 0);
            assert!(el.value.is_empty());
        }

        #[test]
        fn test_element_builders() {
            let el = MockElement::new(Locator::id("x"))
                .with_text("label")
                .with_value("v")
                .not_clickable()
                .appearing_after(2);
            assert_eq!(el.text, "label");
            assert_eq!(el.value, "v");
            assert!(!el.clickable);
            assert_eq!(el.hidden_polls, 2);
        }
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_records_and_fires() {
            let mut driver = MockDriver::new().on(
                Trigger::Navigate("http://app/login".into()),
                Reaction::Show(MockElement::new(Locator::id("login-input"))),
            );
            driver.navigate("http://app/login").await.unwrap();

            assert_eq!(driver.current_url(), "http://app/login");
            assert!(driver
                .is_ready(&Locator::id("login-input"), Readiness::Present)
                .await
                .unwrap());
            assert!(driver.journal().was_called("navigate:http://app/login"));
        }

        #[tokio::test]
        async fn test_click_missing_element_fails() {
            let mut driver = MockDriver::new();
            let err = driver.click(&Locator::text("Tak")).await.unwrap_err();
            assert!(err.to_string().contains("no such element"));
        }

        #[tokio::test]
        async fn test_click_not_clickable_fails() {
            let loc = Locator::text("Dodaj do systemu");
            let mut driver =
                MockDriver::new().with_element(MockElement::new(loc.clone()).not_clickable());
            assert!(driver.click(&loc).await.is_err());
        }

        #[tokio::test]
        async fn test_send_keys_edits_value() {
            let loc = Locator::id("ident");
            let mut driver =
                MockDriver::new().with_element(MockElement::new(loc.clone()).with_value("abc4"));
            driver
                .send_keys(&loc, &[Key::Backspace.into(), "3".into()])
                .await
                .unwrap();
            assert_eq!(driver.element(&loc).unwrap().value, "abc3");
            assert!(driver.journal().was_called("keys:id:"));
        }

        #[tokio::test]
        async fn test_typed_trigger_matches_final_value() {
            let search = Locator::id(":r5:");
            let row = Locator::xpath("//row");
            let mut driver = MockDriver::new()
                .with_element(MockElement::new(search.clone()))
                .on(
                    Trigger::Typed {
                        locator: search.clone(),
                        value: "Uruchomiona".into(),
                    },
                    Reaction::Show(MockElement::new(row.clone())),
                );

            driver.send_keys(&search, &["Urucho".into()]).await.unwrap();
            assert!(!driver.is_ready(&row, Readiness::Present).await.unwrap());
            driver.send_keys(&search, &["miona".into()]).await.unwrap();
            assert!(driver.is_ready(&row, Readiness::Present).await.unwrap());
        }

        #[tokio::test]
        async fn test_remove_reaction() {
            let label = Locator::text("Uruchomiona");
            let stop = Locator::text("Stop");
            let mut driver = MockDriver::new()
                .with_element(MockElement::new(label.clone()))
                .with_element(MockElement::new(stop.clone()))
                .on(Trigger::Click(stop.clone()), Reaction::Remove(label.clone()));

            driver.click(&stop).await.unwrap();
            assert!(driver.element(&label).is_none());
        }

        #[tokio::test]
        async fn test_text_and_viewport() {
            let loc = Locator::css("span.chip");
            let mut driver = MockDriver::new()
                .with_element(MockElement::new(loc.clone()).with_text("Zatrzymana"));
            assert_eq!(driver.text(&loc).await.unwrap(), "Zatrzymana");

            driver.set_viewport(1980, 1080).await.unwrap();
            assert_eq!(driver.viewport(), Some((1980, 1080)));
        }

        #[tokio::test]
        async fn test_screenshot_requires_data() {
            let mut driver = MockDriver::new();
            assert!(driver.screenshot().await.is_err());

            let mut driver = MockDriver::new().with_screenshot(vec![1, 2, 3]);
            assert_eq!(driver.screenshot().await.unwrap(), vec![1, 2, 3]);
        }

        #[tokio::test]
        async fn test_close_blocks_further_queries() {
            let loc = Locator::text("Tak");
            let mut driver = MockDriver::new().with_element(MockElement::new(loc.clone()));
            let journal = driver.journal();
            driver.close().await.unwrap();

            assert!(driver.is_ready(&loc, Readiness::Present).await.is_err());
            assert!(driver.navigate("http://x").await.is_err());
            assert_eq!(journal.count("close"), 1);
        }

        #[tokio::test]
        async fn test_failing_close_still_marks_closed() {
            let mut driver = MockDriver::new().failing_close();
            let journal = driver.journal();
            assert!(driver.close().await.is_err());
            assert!(journal.was_called("close"));
        }
    }

    mod observer_tests {
        use super::*;

        #[tokio::test]
        async fn test_observer_sees_unmatched_triggers() {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&seen);
            let button = Locator::text("Tak");
            let mut driver = MockDriver::new()
                .with_element(MockElement::new(button.clone()))
                .observe(move |trigger| sink.lock().unwrap().push(trigger.clone()));

            driver.navigate("http://app").await.unwrap();
            driver.click(&button).await.unwrap();

            assert_eq!(
                *seen.lock().unwrap(),
                [Trigger::Navigate("http://app".into()), Trigger::Click(button)]
            );
        }
    }

    mod station_app_tests {
        use super::*;
        use crate::fixtures::{self, RUNNING_LABEL, STOPPED_LABEL};
        use station_app::{AppState, StationApp, Status};

        /// Log in, filter by `label` and press `control` in the first row
        async fn press_row_control(driver: &mut MockDriver, label: &str, control: &Locator) {
            driver.navigate(&station_app::login_url()).await.unwrap();
            driver.click(&fixtures::login_submit()).await.unwrap();
            driver.click(&fixtures::stations_link()).await.unwrap();
            driver
                .send_keys(&fixtures::station_search(), &[label.into()])
                .await
                .unwrap();
            driver.click(&fixtures::first_row_details()).await.unwrap();
            driver.click(control).await.unwrap();
        }

        #[tokio::test]
        async fn test_stop_is_seen_by_next_browser() {
            let app = StationApp::new(AppState::with_station(Status::Running));

            let mut first = app.open();
            press_row_control(&mut first, RUNNING_LABEL, &fixtures::stop_control()).await;
            assert_eq!(app.state().station, Some(Status::Stopped));

            let mut second = app.open();
            second.navigate(&station_app::login_url()).await.unwrap();
            second.click(&fixtures::login_submit()).await.unwrap();
            second.click(&fixtures::stations_link()).await.unwrap();
            second
                .send_keys(&fixtures::station_search(), &[RUNNING_LABEL.into()])
                .await
                .unwrap();
            assert!(second.element(&fixtures::first_row_details()).is_none());
        }

        #[tokio::test]
        async fn test_one_off_build_leaves_app_untouched() {
            let app = StationApp::new(AppState::with_station(Status::Stopped));
            let mut driver = station_app::build(app.state());
            press_row_control(&mut driver, STOPPED_LABEL, &fixtures::start_control()).await;
            assert_eq!(app.state().station, Some(Status::Stopped));
        }

        #[tokio::test]
        async fn test_disconnect_confirmation_removes_target() {
            let app = StationApp::new(AppState::with_station(Status::Running));
            let mut driver = app.open();
            driver.navigate(&station_app::login_url()).await.unwrap();
            driver.click(&fixtures::login_submit()).await.unwrap();
            driver.click(&fixtures::stations_link()).await.unwrap();
            driver
                .send_keys(&fixtures::station_search(), &[fixtures::DISCONNECT_TARGET_ID.into()])
                .await
                .unwrap();
            driver.click(&fixtures::disconnect_control()).await.unwrap();
            assert!(app.state().disconnect_target);

            driver.click(&fixtures::confirm_yes()).await.unwrap();
            assert!(!app.state().disconnect_target);
        }
    }
}
