pub mod band;
pub mod config;
pub mod stats;
pub mod summary;
pub mod window;

pub use band::{classify, Band, BandRange};
pub use config::{AnalysisConfig, ElementProfile};
pub use stats::{detect_spike, SeriesStats};
pub use summary::{analyze_element, compose_summary, ElementReport};
pub use window::{DatePhrase, FetchWindow, SummaryWindow};

use serde::{Deserialize, Serialize};

/// The four room qualities the device samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Element {
    Temperature,
    Humidity,
    Sound,
    Light,
}

impl Element {
    /// Priority order used everywhere a single element must be chosen.
    pub const ALL: [Element; 4] = [
        Element::Temperature,
        Element::Humidity,
        Element::Sound,
        Element::Light,
    ];

    /// How the element is spoken about in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Element::Temperature => "temperature",
            Element::Humidity => "humidity",
            Element::Sound => "sound level",
            Element::Light => "brightness",
        }
    }

    /// Key used in device payloads and chart payloads.
    pub fn key(self) -> &'static str {
        match self {
            Element::Temperature => "t",
            Element::Humidity => "h",
            Element::Sound => "s",
            Element::Light => "l",
        }
    }

    /// Parse a slot value. "room" and anything unrecognized mean the whole
    /// room, i.e. no single element.
    pub fn parse(value: &str) -> Option<Element> {
        match value {
            "temperature" => Some(Element::Temperature),
            "humidity" => Some(Element::Humidity),
            "sound" => Some(Element::Sound),
            "light" => Some(Element::Light),
            _ => None,
        }
    }
}
