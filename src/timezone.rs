use chrono::FixedOffset;

/// Zone abbreviations the skill accepts during calibration.
pub const SUPPORTED_TIME_ZONES: [&str; 12] = [
    "PST", "PDT", "MST", "MDT", "HST", "HDT", "EST", "EDT", "CST", "CDT", "AKST", "AKDT",
];

pub fn is_supported(abbreviation: &str) -> bool {
    SUPPORTED_TIME_ZONES.contains(&abbreviation)
}

/// Resolve a North American zone abbreviation to its UTC offset.
///
/// The abbreviations already encode standard vs. daylight time, so fixed
/// offsets are sufficient; no IANA database lookup is needed.
pub fn utc_offset(abbreviation: &str) -> Option<FixedOffset> {
    let hours = match abbreviation {
        "PST" => -8,
        "PDT" => -7,
        "MST" => -7,
        "MDT" => -6,
        "HST" => -10,
        "HDT" => -9,
        "UTC" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "AKST" => -9,
        "AKDT" => -8,
        _ => return None,
    };

    FixedOffset::east_opt(hours * 3600)
}
