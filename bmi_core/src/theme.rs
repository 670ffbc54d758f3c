//! Light/dark theme preference and the chart palette it selects.

use crate::storage::KeyValueStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key of the theme preference
pub const THEME_KEY: &str = "bmiTheme";

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Load the saved theme, or `fallback` when none is saved or it is unreadable
    pub fn load<S: KeyValueStore>(store: &S, fallback: Theme) -> Theme {
        match store.get(THEME_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable theme {:?}: {}", raw, e);
                fallback
            }),
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!("Unable to read theme: {}. Using {}.", e, fallback);
                fallback
            }
        }
    }

    pub fn save<S: KeyValueStore>(self, store: &mut S) -> Result<()> {
        store.set(THEME_KEY, &serde_json::to_string(&self)?)?;
        tracing::debug!("Saved theme {}", self);
        Ok(())
    }

    pub fn palette(self) -> ChartPalette {
        match self {
            Theme::Dark => ChartPalette {
                text: "#b0b0b0",
                grid: "rgba(255,255,255,0.1)",
                line: LINE_COLOR,
            },
            Theme::Light => ChartPalette {
                text: "#666666",
                grid: "rgba(0,0,0,0.1)",
                line: LINE_COLOR,
            },
        }
    }
}

const LINE_COLOR: &str = "#af0404";

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Colours for drawing the trend chart
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ChartPalette {
    pub text: &'static str,
    pub grid: &'static str,
    pub line: &'static str,
}
