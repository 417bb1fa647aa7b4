//! The four station lifecycle scenarios.
//!
//! Each script is a fixed sequence of waits and actions against an
//! already authenticated [`Session`]. Scripts share no state; the live
//! application state is the only thing connecting them (see `stop` and
//! `start`, or `disconnect` and `connect`).

use crate::driver::{Key, KeyInput, StationDriver};
use crate::fixtures::{self, RUNNING_LABEL, STOPPED_LABEL};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// A station lifecycle scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Stop a running station
    StopStation,
    /// Start a stopped station
    StartStation,
    /// Disconnect a station from the system
    DisconnectStation,
    /// Add a station back to the system
    ConnectStation,
}

impl Scenario {
    /// All scenarios in declaration order
    pub const ALL: [Self; 4] = [
        Self::StopStation,
        Self::StartStation,
        Self::DisconnectStation,
        Self::ConnectStation,
    ];

    /// Short name used on the command line and in reports
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StopStation => "stop",
            Self::StartStation => "start",
            Self::DisconnectStation => "disconnect",
            Self::ConnectStation => "connect",
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::StopStation => "Stop a running station and expect it to show as stopped",
            Self::StartStation => "Start a stopped station and expect it to show as running",
            Self::DisconnectStation => "Disconnect the target station and expect the success notice",
            Self::ConnectStation => "Add the target station back through the station creator",
        }
    }

    /// Run the script on a logged-in session
    ///
    /// # Errors
    ///
    /// The first unmet wait or failed action aborts the script.
    pub async fn run<D: StationDriver>(&self, session: &mut Session<D>) -> ProbeResult<()> {
        info!(scenario = self.name(), "running scenario");
        match self {
            Self::StopStation => stop_station(session).await,
            Self::StartStation => start_station(session).await,
            Self::DisconnectStation => disconnect_station(session).await,
            Self::ConnectStation => connect_station(session).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProbeError::UnknownScenario {
                name: s.to_string(),
            })
    }
}

// =============================================================================
// SCRIPTS
// =============================================================================

/// Open the station list and filter it
async fn open_filtered_list<D: StationDriver>(
    session: &mut Session<D>,
    filter: &str,
) -> ProbeResult<()> {
    session
        .expect_present(&fixtures::selected_nav_entry())
        .await?;
    session.click(&fixtures::stations_link()).await?;
    session
        .send_keys(&fixtures::station_search(), vec![KeyInput::text(filter)])
        .await?;
    session.settle().await;
    Ok(())
}

/// Toggle the first station whose status is `from` and expect `to`
async fn toggle_station<D: StationDriver>(
    session: &mut Session<D>,
    from: &str,
    control: &Locator,
    to: &str,
) -> ProbeResult<()> {
    open_filtered_list(session, from).await?;
    session.click(&fixtures::first_row_details()).await?;
    session.expect_text(from).await?;
    session.click(control).await?;
    session.expect_text(to).await
}

async fn stop_station<D: StationDriver>(session: &mut Session<D>) -> ProbeResult<()> {
    toggle_station(session, RUNNING_LABEL, &fixtures::stop_control(), STOPPED_LABEL).await
}

async fn start_station<D: StationDriver>(session: &mut Session<D>) -> ProbeResult<()> {
    toggle_station(session, STOPPED_LABEL, &fixtures::start_control(), RUNNING_LABEL).await
}

async fn disconnect_station<D: StationDriver>(session: &mut Session<D>) -> ProbeResult<()> {
    let target = session.config().disconnect_station_id.clone();
    open_filtered_list(session, &target).await?;
    session.click(&fixtures::disconnect_control()).await?;
    session.click(&fixtures::confirm_yes()).await?;
    session
        .expect_present(&fixtures::disconnected_notice())
        .await
}

/// The creator form prefills an identifier; its last character is replaced
/// with the target's last character.
async fn connect_station<D: StationDriver>(session: &mut Session<D>) -> ProbeResult<()> {
    let replacement = session
        .config()
        .disconnect_station_id
        .chars()
        .last()
        .map_or_else(
            || fixtures::IDENTIFIER_REPLACEMENT.to_string(),
            String::from,
        );

    session.login().await?;
    session
        .expect_present(&fixtures::selected_nav_entry())
        .await?;
    session.click(&fixtures::stations_link()).await?;
    session.click(&fixtures::add_stations_button()).await?;
    session.click(&fixtures::add_station_button()).await?;
    session
        .send_keys(
            &fixtures::creator_identifier_input(),
            vec![Key::Backspace.into(), KeyInput::Text(replacement)],
        )
        .await?;
    session.click(&fixtures::save_control()).await?;
    session
        .click_when_clickable(&fixtures::add_to_system_button())
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::mock::station_app::{self, AppState, StationApp, Status};
    use crate::mock::{MockDriver, MockJournal, Reaction, Trigger};

    fn fast_config() -> ProbeConfig {
        ProbeConfig::new()
            .with_wait_timeout(2_000)
            .with_poll_interval(100)
            .with_settle_delay(0)
    }

    async fn logged_in(state: AppState) -> (Session<MockDriver>, MockJournal) {
        let driver = station_app::build(state);
        let journal = driver.journal();
        let mut session = Session::new(driver, fast_config());
        session.login().await.unwrap();
        (session, journal)
    }

    mod catalogue_tests {
        use super::*;

        #[test]
        fn test_names_round_trip() {
            for scenario in Scenario::ALL {
                assert_eq!(scenario.name().parse::<Scenario>().unwrap(), scenario);
            }
        }

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!("STOP".parse::<Scenario>().unwrap(), Scenario::StopStation);
            assert_eq!(" connect ".parse::<Scenario>().unwrap(), Scenario::ConnectStation);
        }

        #[test]
        fn test_unknown_name() {
            let err = "restart".parse::<Scenario>().unwrap_err();
            assert!(matches!(err, ProbeError::UnknownScenario { ref name } if name == "restart"));
        }

        #[test]
        fn test_declaration_order() {
            let names: Vec<_> = Scenario::ALL.iter().map(Scenario::name).collect();
            assert_eq!(names, ["stop", "start", "disconnect", "connect"]);
        }
    }

    mod stop_start_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_stop_running_station() {
            let (mut session, journal) = logged_in(AppState::with_station(Status::Running)).await;

            Scenario::StopStation.run(&mut session).await.unwrap();

            assert!(journal.was_called("keys:id://*[@id=':r5:']:\"Uruchomiona\""));
            assert!(journal.was_called("click:attribute://button[contains(@aria-label, 'pracę')]"));
            assert!(session
                .driver_mut()
                .element(&fixtures::status_label(STOPPED_LABEL))
                .is_some());
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_stopped_station() {
            let (mut session, journal) = logged_in(AppState::with_station(Status::Stopped)).await;

            Scenario::StartStation.run(&mut session).await.unwrap();

            assert!(journal.was_called("click:css:svg[data-testid='PlayArrowIcon']"));
            assert!(session
                .driver_mut()
                .element(&fixtures::status_label(RUNNING_LABEL))
                .is_some());
        }

        #[tokio::test(start_paused = true)]
        async fn test_stop_without_running_station_times_out() {
            let (mut session, journal) = logged_in(AppState::with_station(Status::Stopped)).await;

            let err = Scenario::StopStation.run(&mut session).await.unwrap_err();

            assert!(err.is_timeout());
            assert!(err.to_string().contains("span[1]/button"));
            assert_eq!(journal.count("click:attribute:"), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_runs_on_state_left_by_stop() {
            let app = StationApp::new(AppState::with_station(Status::Running));

            let mut session = Session::new(app.open(), fast_config());
            session.login().await.unwrap();
            Scenario::StopStation.run(&mut session).await.unwrap();
            session.close().await.unwrap();
            assert_eq!(app.state().station, Some(Status::Stopped));

            let mut session = Session::new(app.open(), fast_config());
            session.login().await.unwrap();
            Scenario::StartStation.run(&mut session).await.unwrap();
            session.close().await.unwrap();
            assert_eq!(app.state().station, Some(Status::Running));
        }

        #[tokio::test(start_paused = true)]
        async fn test_settle_delay_precedes_row_lookup() {
            let driver = station_app::build(AppState::with_station(Status::Running));
            let config = fast_config().with_settle_delay(5_000);
            let mut session = Session::new(driver, config);
            session.login().await.unwrap();

            let start = tokio::time::Instant::now();
            Scenario::StopStation.run(&mut session).await.unwrap();
            assert!(start.elapsed() >= std::time::Duration::from_secs(5));
        }
    }

    mod disconnect_connect_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_disconnect_target_station() {
            let (mut session, journal) = logged_in(AppState::with_station(Status::Running)).await;

            Scenario::DisconnectStation.run(&mut session).await.unwrap();

            let calls = journal.entries();
            let confirm = calls.iter().position(|c| c == "click:text://*[text() = 'Tak']");
            let disconnect = calls
                .iter()
                .position(|c| c.contains("'Disconnect'"));
            assert!(disconnect.unwrap() < confirm.unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_disconnect_missing_station_times_out() {
            let state = AppState {
                station: None,
                disconnect_target: false,
            };
            let (mut session, _) = logged_in(state).await;

            let err = Scenario::DisconnectStation.run(&mut session).await.unwrap_err();
            assert!(err.to_string().contains("Disconnect"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_connect_rewrites_identifier_and_submits() {
            let (mut session, journal) = logged_in(AppState::with_station(Status::Running)).await;

            Scenario::ConnectStation.run(&mut session).await.unwrap();

            assert_eq!(journal.count("navigate:"), 2);
            assert_eq!(
                session
                    .driver_mut()
                    .element(&fixtures::creator_identifier_input())
                    .unwrap()
                    .value,
                fixtures::DISCONNECT_TARGET_ID
            );
            assert!(journal.was_called("click:text://*[text() = 'Dodaj do systemu']"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_connect_waits_for_navigation_after_relogin() {
            let driver = station_app::build(AppState::with_station(Status::Running)).on(
                Trigger::Click(fixtures::login_submit()),
                Reaction::Remove(fixtures::selected_nav_entry()),
            );
            let journal = driver.journal();
            let mut session = Session::new(driver, fast_config());
            session.login().await.unwrap();

            let err = Scenario::ConnectStation.run(&mut session).await.unwrap_err();

            assert!(err.is_timeout());
            assert!(err.to_string().contains("selected"));
            assert!(!journal.was_called("click:xpath://a[@href='/power-stations']"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_connect_with_other_identifier_never_saves() {
            let driver = station_app::build(AppState::with_station(Status::Running));
            let mut config = fast_config();
            config.disconnect_station_id = "0000:0000:0000:0000:0000:0000:0000:0009".into();
            let mut session = Session::new(driver, config);
            session.login().await.unwrap();

            let err = Scenario::ConnectStation.run(&mut session).await.unwrap_err();
            assert!(err.is_timeout());
            assert!(err.to_string().contains("Save"));
        }
    }
}
