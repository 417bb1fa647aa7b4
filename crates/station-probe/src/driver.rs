//! StationDriver - the browser capability seam.
//!
//! Scenarios never talk to a browser directly. They go through this trait,
//! which exposes exactly what the scripts need: navigate, resize, evaluate a
//! readiness predicate, click, type, read text, capture the page and close.
//!
//! # Implementations
//!
//! - `ChromiumDriver` - Chrome DevTools Protocol via chromiumoxide (`browser` feature)
//! - `MockDriver` - scripted in-memory DOM for unit testing

use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::wait::Readiness;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named special key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Delete the character before the caret
    Backspace,
    /// Submit / newline
    Enter,
    /// Move focus
    Tab,
    /// Dismiss
    Escape,
}

impl Key {
    /// Key name as understood by the DevTools `Input` domain
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Backspace => "Backspace",
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::Escape => "Escape",
        }
    }
}

/// One unit of keyboard input sent to an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyInput {
    /// Literal text, typed character by character
    Text(String),
    /// A single special key press
    Key(Key),
}

impl KeyInput {
    /// Literal text input
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<&str> for KeyInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "{t:?}"),
            Self::Key(k) => write!(f, "<{}>", k.name()),
        }
    }
}

/// Abstract driver trait for the browser under control.
///
/// Each method takes `&mut self`: a session owns its driver exclusively and
/// issues one command at a time.
#[async_trait]
pub trait StationDriver: Send {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Resize the viewport
    async fn set_viewport(&mut self, width: u32, height: u32) -> ProbeResult<()>;

    /// Evaluate the readiness predicate once, without waiting
    async fn is_ready(&mut self, locator: &Locator, readiness: Readiness) -> ProbeResult<bool>;

    /// Click the element
    async fn click(&mut self, locator: &Locator) -> ProbeResult<()>;

    /// Focus the element and send keystrokes to it
    async fn send_keys(&mut self, locator: &Locator, keys: &[KeyInput]) -> ProbeResult<()>;

    /// Visible text of the element
    async fn text(&mut self, locator: &Locator) -> ProbeResult<String>;

    /// PNG screenshot of the viewport
    async fn screenshot(&mut self) -> ProbeResult<Vec<u8>>;

    /// Close the browser and release its resources
    async fn close(&mut self) -> ProbeResult<()>;
}
