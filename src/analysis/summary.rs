use chrono::{FixedOffset, TimeZone};

use crate::analysis::band::{describe, level_of, Band};
use crate::analysis::config::ElementProfile;
use crate::analysis::stats::{detect_spike, SeriesStats};
use crate::analysis::window::DatePhrase;
use crate::analysis::Element;
use crate::lang;

/// Candidate sentences for one element over one summarization window.
#[derive(Debug, Clone)]
pub struct ElementReport {
    pub element: Element,
    pub spike: Option<String>,
    pub band: Option<String>,
    pub general: String,
}

/// Produce the spike/band/general candidates for a single element.
///
/// `values` and `timestamps` are the already-windowed slices, aligned by
/// index. Returns None when the window carries no samples.
pub fn analyze_element(
    element: Element,
    profile: &ElementProfile,
    values: &[i64],
    timestamps: &[i64],
    tz: FixedOffset,
    is_present: bool,
) -> Option<ElementReport> {
    let stats = SeriesStats::compute(values)?;

    let max_band = profile.classify(values[stats.max_idx]);
    let min_band = profile.classify(values[stats.min_idx]);
    let avg_band = profile.classify(stats.mean);

    // A transient extreme beats everything else in interest.
    let spike_level = detect_spike(values, &stats, profile);
    let spike = if spike_level != 0 {
        let (idx, band) = if spike_level > 0 {
            (stats.max_idx, max_band)
        } else {
            (stats.min_idx, min_band)
        };

        let time = hour_label(timestamps[idx], tz);
        Some(lang::spike(
            &format!("around {time}"),
            element.label(),
            &profile.with_unit(values[idx]),
            describe(band),
        ))
    } else {
        None
    };

    // Sustained excursions two levels or more out of the ideal range.
    let band = if level_of(avg_band) >= Band::TooHigh.level()
        || level_of(avg_band) <= Band::TooLow.level()
    {
        let direction = if level_of(avg_band) > 0 { "higher" } else { "lower" };
        Some(lang::band(
            "average",
            element.label(),
            &profile.with_unit(stats.mean),
            direction,
            is_present,
        ))
    } else if level_of(max_band) >= Band::TooHigh.level() {
        Some(lang::band(
            "maximum",
            element.label(),
            &profile.with_unit(values[stats.max_idx]),
            "higher",
            is_present,
        ))
    } else if level_of(min_band) <= Band::TooLow.level() {
        Some(lang::band(
            "minimum",
            element.label(),
            &profile.with_unit(values[stats.min_idx]),
            "lower",
            is_present,
        ))
    } else {
        None
    };

    let general = lang::general(
        element.label(),
        &profile.with_unit(stats.mean),
        describe(avg_band),
        is_present,
    );

    Some(ElementReport {
        element,
        spike,
        band,
        general,
    })
}

/// Combine per-element reports into one spoken summary.
///
/// Precedence: the first spike in element priority order (never for week-long
/// windows), then the first band sentence from an element that did not supply
/// the spike, an all-is-well phrase when neither exists, and finally the
/// first general sentence from an element that supplied nothing yet. No
/// element contributes more than once.
pub fn compose_summary(reports: &[ElementReport], date: DatePhrase) -> String {
    let is_present = date.is_present();

    let spike = if date.allows_spikes() {
        reports
            .iter()
            .find(|r| r.spike.is_some())
            .map(|r| (r.element, r.spike.clone().unwrap_or_default()))
    } else {
        None
    };
    let spike_element = spike.as_ref().map(|(el, _)| *el);

    let band = reports
        .iter()
        .filter(|r| Some(r.element) != spike_element)
        .find(|r| r.band.is_some())
        .map(|r| (r.element, r.band.clone().unwrap_or_default()));
    let band_element = band.as_ref().map(|(el, _)| *el);

    let mut parts: Vec<String> = Vec::new();
    if let Some((_, text)) = spike {
        parts.push(text);
    }
    match band {
        Some((_, text)) => parts.push(text),
        None if parts.is_empty() => parts.push(lang::all_is_well(is_present).to_string()),
        None => {}
    }

    if let Some(report) = reports
        .iter()
        .find(|r| Some(r.element) != spike_element && Some(r.element) != band_element)
    {
        parts.push(report.general.clone());
    }

    parts.join(" ").trim().to_string()
}

/// Hour-of-day label like "3am" in the user's zone.
fn hour_label(timestamp: i64, tz: FixedOffset) -> String {
    match tz.timestamp_opt(timestamp, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%-I%P").to_string(),
        _ => String::new(),
    }
}
