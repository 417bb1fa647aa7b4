//! Fixture data for the power-station application.
//!
//! Labels are the application's Polish UI strings. Several locators target
//! React-generated ids (`:r2:`, `:r5:`) or absolute layout paths; they are
//! tied to one build of the UI and are kept here so a UI change touches one
//! file.

use crate::locator::Locator;

/// Login page path
pub const LOGIN_PATH: &str = "/login";

/// Station list path
pub const STATIONS_PATH: &str = "/power-stations";

/// Status label of a running station
pub const RUNNING_LABEL: &str = "Uruchomiona";

/// Status label of a stopped station
pub const STOPPED_LABEL: &str = "Zatrzymana";

/// Station disconnected and reconnected by the disconnect/connect pair
pub const DISCONNECT_TARGET_ID: &str = "0000:0000:0000:0000:0000:0000:0000:0003";

/// Notification shown after a successful disconnect
pub const DISCONNECTED_NOTICE: &str = "Pomyślnie odłączono elektrownię od systemu";

/// Affirmative button of the disconnect confirmation dialog
pub const CONFIRM_YES_LABEL: &str = "Tak";

/// Toolbar button opening the station creator
pub const ADD_STATIONS_LABEL: &str = "Dodaj nowe elektrownie";

/// Creator toolbar button adding a blank station row
pub const ADD_STATION_LABEL: &str = "Dodaj nową elektrownię";

/// Creator footer button submitting new stations
pub const ADD_TO_SYSTEM_LABEL: &str = "Dodaj do systemu";

/// Character appended to the creator's identifier after removing its last one
pub const IDENTIFIER_REPLACEMENT: &str = "3";

const FIRST_ROW_DETAILS_XPATH: &str =
    "/html/body/div/div[2]/div[3]/main/div/div/div/div[2]/div[2]/div/div/div[1]/div[4]/div/span[1]/button";

const CREATOR_IDENTIFIER_XPATH: &str =
    "//div[@id='root']/div[2]/div[3]/main/div/div/div/div[2]/div[2]/div/div/div/div/div/div/input";

// login

/// Login name field
pub fn username_input() -> Locator {
    Locator::id("login-input")
}

/// Password field
pub fn password_input() -> Locator {
    Locator::id("password-input")
}

/// Login submit button
pub fn login_submit() -> Locator {
    Locator::id(":r2:")
}

// navigation

/// Highlighted side-menu entry, present once the dashboard has rendered
pub fn selected_nav_entry() -> Locator {
    Locator::attribute_contains("a", "class", "selected")
}

/// Side-menu link to the station list
pub fn stations_link() -> Locator {
    Locator::xpath(format!("//a[@href='{STATIONS_PATH}']"))
}

// station list

/// Search field above the station grid
pub fn station_search() -> Locator {
    Locator::id(":r5:")
}

/// Details action of the first row in the filtered station grid
pub fn first_row_details() -> Locator {
    Locator::xpath(FIRST_ROW_DETAILS_XPATH)
}

/// Status chip showing `label`
pub fn status_label(label: &str) -> Locator {
    Locator::text(label)
}

/// Stop control; its aria-label reads "Zatrzymaj pracę ..."
pub fn stop_control() -> Locator {
    Locator::attribute_contains("button", "aria-label", "pracę")
}

/// Start control, identified by its play icon
pub fn start_control() -> Locator {
    Locator::css("svg[data-testid='PlayArrowIcon']")
}

/// Disconnect action of the filtered station
pub fn disconnect_control() -> Locator {
    Locator::attribute_contains("button", "aria-label", "Disconnect")
}

/// Affirmative button of the confirmation dialog
pub fn confirm_yes() -> Locator {
    Locator::text(CONFIRM_YES_LABEL)
}

/// Notification confirming the disconnect
pub fn disconnected_notice() -> Locator {
    Locator::text(DISCONNECTED_NOTICE)
}

// creator

/// Toolbar button opening the station creator
pub fn add_stations_button() -> Locator {
    Locator::text(ADD_STATIONS_LABEL)
}

/// Creator button adding a station row
pub fn add_station_button() -> Locator {
    Locator::text(ADD_STATION_LABEL)
}

/// Identifier input of the first creator row
pub fn creator_identifier_input() -> Locator {
    Locator::xpath(CREATOR_IDENTIFIER_XPATH)
}

/// Save action of the creator row
pub fn save_control() -> Locator {
    Locator::attribute_contains("button", "aria-label", "Save")
}

/// Creator footer button submitting new stations
pub fn add_to_system_button() -> Locator {
    Locator::text(ADD_TO_SYSTEM_LABEL)
}
