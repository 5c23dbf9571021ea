use serde::{Deserialize, Serialize};

/// Stand-in maximum for the open-ended top range of a band table.
pub const OPEN_ENDED_MAX: i64 = 1000;

/// Signed comfort classification of a single reading, from far below the
/// ideal range (-3) to far above it (+3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    VeryLow,
    TooLow,
    SlightlyLow,
    Ideal,
    SlightlyHigh,
    TooHigh,
    VeryHigh,
}

impl Band {
    pub fn level(self) -> i8 {
        match self {
            Band::VeryLow => -3,
            Band::TooLow => -2,
            Band::SlightlyLow => -1,
            Band::Ideal => 0,
            Band::SlightlyHigh => 1,
            Band::TooHigh => 2,
            Band::VeryHigh => 3,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Band::VeryHigh => "far too high",
            Band::TooHigh => "too high",
            Band::SlightlyHigh => "slightly too high",
            Band::SlightlyLow => "slightly too low",
            Band::TooLow => "too low",
            Band::VeryLow => "far too low",
            Band::Ideal => "ideal",
        }
    }
}

/// Level of a possibly-unclassified reading. Values outside every range carry
/// no band and read as level 0 for fragment thresholds.
pub fn level_of(band: Option<Band>) -> i8 {
    band.map(Band::level).unwrap_or(0)
}

/// Spoken description of a possibly-unclassified reading.
pub fn describe(band: Option<Band>) -> &'static str {
    band.unwrap_or(Band::Ideal).describe()
}

/// One inclusive integer range of a band table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandRange {
    pub min: i64,
    pub max: i64,
    pub band: Band,
}

impl BandRange {
    pub fn new(min: i64, max: i64, band: Band) -> Self {
        Self { min, max, band }
    }

    /// Range with no upper bound beyond the sentinel.
    pub fn open(min: i64, band: Band) -> Self {
        Self {
            min,
            max: OPEN_ENDED_MAX,
            band,
        }
    }
}

/// Classify a value against an ordered band table.
///
/// Every range is checked in definition order and a later match overrides an
/// earlier one. Calibration tables rely on this on their overlap points, so
/// the scan must not stop at the first hit.
pub fn classify(table: &[BandRange], value: i64) -> Option<Band> {
    let mut current = None;

    for range in table {
        if range.min <= value && value <= range.max {
            current = Some(range.band);
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_match_wins_on_overlap() {
        let table = [
            BandRange::new(0, 60, Band::Ideal),
            BandRange::new(60, 67, Band::SlightlyHigh),
        ];

        assert_eq!(classify(&table, 59), Some(Band::Ideal));
        assert_eq!(classify(&table, 60), Some(Band::SlightlyHigh));
        assert_eq!(classify(&table, 67), Some(Band::SlightlyHigh));
    }

    #[test]
    fn value_outside_every_range_has_no_band() {
        let table = [BandRange::new(10, 20, Band::Ideal)];

        assert_eq!(classify(&table, 9), None);
        assert_eq!(level_of(None), 0);
        assert_eq!(describe(None), "ideal");
    }

    #[test]
    fn open_ended_top_range_catches_large_values() {
        let table = [
            BandRange::new(0, 75, Band::Ideal),
            BandRange::open(76, Band::VeryHigh),
        ];

        assert_eq!(classify(&table, 999), Some(Band::VeryHigh));
    }
}
