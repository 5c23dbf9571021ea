use crate::analysis::band::{classify, Band, BandRange};
use crate::analysis::Element;

/// Calibrated comfort data for one element: its ordered band table, the unit
/// suffix spoken after values, and how far a reading must stray from the
/// window average to count as a spike.
#[derive(Debug, Clone)]
pub struct ElementProfile {
    pub bands: Vec<BandRange>,
    pub unit: &'static str,
    pub spike_threshold: i64,
}

impl ElementProfile {
    pub fn classify(&self, value: i64) -> Option<Band> {
        classify(&self.bands, value)
    }

    /// Value with its spoken unit, e.g. "76 degrees".
    pub fn with_unit(&self, value: i64) -> String {
        format!("{}{}", value, self.unit)
    }
}

/// Immutable per-element configuration, built once at startup and injected
/// wherever readings are classified.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    temperature: ElementProfile,
    humidity: ElementProfile,
    sound: ElementProfile,
    light: ElementProfile,
}

impl AnalysisConfig {
    pub fn profile(&self, element: Element) -> &ElementProfile {
        match element {
            Element::Temperature => &self.temperature,
            Element::Humidity => &self.humidity,
            Element::Sound => &self.sound,
            Element::Light => &self.light,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            temperature: ElementProfile {
                bands: vec![
                    BandRange::new(0, 52, Band::VeryLow),
                    BandRange::new(53, 55, Band::TooLow),
                    BandRange::new(56, 58, Band::SlightlyLow),
                    BandRange::new(59, 70, Band::Ideal),
                    BandRange::new(71, 72, Band::SlightlyHigh),
                    BandRange::new(73, 75, Band::TooHigh),
                    BandRange::open(76, Band::VeryHigh),
                ],
                unit: " degrees",
                spike_threshold: 5,
            },
            humidity: ElementProfile {
                // 60 sits in both the ideal and slightly-high ranges; the
                // later range wins under last-match-wins classification.
                bands: vec![
                    BandRange::new(0, 30, Band::TooLow),
                    BandRange::new(31, 41, Band::SlightlyLow),
                    BandRange::new(42, 60, Band::Ideal),
                    BandRange::new(60, 67, Band::SlightlyHigh),
                    BandRange::open(68, Band::TooHigh),
                ],
                unit: " percent",
                spike_threshold: 5,
            },
            sound: ElementProfile {
                bands: vec![
                    BandRange::new(0, 25, Band::Ideal),
                    BandRange::new(26, 39, Band::SlightlyHigh),
                    BandRange::open(40, Band::TooHigh),
                ],
                unit: " decibels",
                spike_threshold: 20,
            },
            light: ElementProfile {
                bands: vec![
                    BandRange::new(0, 2, Band::Ideal),
                    BandRange::new(3, 10, Band::SlightlyHigh),
                    BandRange::new(11, 30, Band::TooHigh),
                    BandRange::open(31, Band::VeryHigh),
                ],
                unit: " lux",
                spike_threshold: 10,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_bands_match_calibration() {
        let config = AnalysisConfig::default();
        let profile = config.profile(Element::Temperature);

        assert_eq!(profile.classify(54), Some(Band::TooLow));
        assert_eq!(profile.classify(65), Some(Band::Ideal));
        assert_eq!(profile.classify(76), Some(Band::VeryHigh));
        assert_eq!(profile.classify(400), Some(Band::VeryHigh));
    }

    #[test]
    fn humidity_overlap_resolves_to_later_range() {
        let config = AnalysisConfig::default();
        let profile = config.profile(Element::Humidity);

        assert_eq!(profile.classify(60), Some(Band::SlightlyHigh));
        assert_eq!(profile.classify(59), Some(Band::Ideal));
    }

    #[test]
    fn units_are_spoken_after_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.profile(Element::Light).with_unit(4), "4 lux");
        assert_eq!(
            config.profile(Element::Temperature).with_unit(65),
            "65 degrees"
        );
    }
}
