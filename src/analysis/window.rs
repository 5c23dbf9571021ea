use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Timelike};

/// Relative period a status request refers to. Anything that is not "today"
/// or "yesterday" is treated as the last week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePhrase {
    Today,
    Yesterday,
    LastWeek,
}

impl DatePhrase {
    /// Normalize the raw date slot. A missing or empty slot and present-tense
    /// phrasings like "is now" all mean today.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("is") | Some("is now") | Some("is like now") => DatePhrase::Today,
            Some("today") => DatePhrase::Today,
            Some("yesterday") => DatePhrase::Yesterday,
            Some(_) => DatePhrase::LastWeek,
        }
    }

    /// Present tense applies only to a "today" request.
    pub fn is_present(self) -> bool {
        self == DatePhrase::Today
    }

    /// Whether chart labels should show hours rather than weekdays.
    pub fn uses_hour_labels(self) -> bool {
        matches!(self, DatePhrase::Today | DatePhrase::Yesterday)
    }

    /// Spikes are only called out for windows within a single day.
    pub fn allows_spikes(self) -> bool {
        self != DatePhrase::LastWeek
    }
}

/// Timestamp range and sampling density requested from the device. Always a
/// superset of the summarization window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub min_ts: i64,
    pub max_ts: i64,
    pub samples_per_hour: u32,
}

impl FetchWindow {
    pub fn for_date(date: DatePhrase, now: DateTime<FixedOffset>) -> Self {
        match date {
            // Last 8 hours, aligned to the start of the hour, sampled densely.
            DatePhrase::Today => Self {
                min_ts: floor_to_hour(now - Duration::hours(8)).timestamp(),
                max_ts: now.timestamp(),
                samples_per_hour: 6,
            },
            // 9pm yesterday through 11am today covers any plausible night.
            DatePhrase::Yesterday => Self {
                min_ts: (floor_to_day(now - Duration::days(1)) + Duration::hours(21)).timestamp(),
                max_ts: (floor_to_day(now) + Duration::hours(11)).timestamp(),
                samples_per_hour: 6,
            },
            DatePhrase::LastWeek => Self {
                min_ts: (now - Duration::days(7)).timestamp(),
                max_ts: now.timestamp(),
                samples_per_hour: 1,
            },
        }
    }
}

/// Inclusive index bounds of the fetched series that are actually analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryWindow {
    pub start: usize,
    pub end: usize,
    pub is_present: bool,
}

impl SummaryWindow {
    /// Resolve which samples a request covers.
    ///
    /// For "yesterday" the window runs from the sample nearest the user's
    /// sleep time yesterday to the sample nearest their weekday wake time
    /// today. Nearest means minimal absolute timestamp difference; the sleep
    /// bound scans from the start of the series, the wake bound from the end.
    pub fn resolve(
        date: DatePhrase,
        timestamps: &[i64],
        sleep_time: &str,
        wake_weekday_time: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Self> {
        if timestamps.is_empty() {
            bail!("cannot resolve a window over an empty series");
        }

        let last = timestamps.len() - 1;
        let window = match date {
            DatePhrase::Today => Self {
                start: last.saturating_sub(1),
                end: last,
                is_present: true,
            },
            DatePhrase::Yesterday => {
                let sleep_ts = clock_time_on(now - Duration::days(1), sleep_time)
                    .context("bad sleep time attribute")?;
                let wake_ts = clock_time_on(now, wake_weekday_time)
                    .context("bad weekday wake time attribute")?;

                let start = nearest_from_start(timestamps, sleep_ts);
                let end = nearest_from_end(timestamps, wake_ts);

                Self {
                    // Clamp only; a degenerate start==end window passes through.
                    start: start.min(end),
                    end,
                    is_present: false,
                }
            }
            DatePhrase::LastWeek => Self {
                start: 0,
                end: last,
                is_present: false,
            },
        };

        Ok(window)
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The covered samples of one parallel sequence.
    pub fn slice<'a>(&self, values: &'a [i64]) -> &'a [i64] {
        let end = self.end.min(values.len().saturating_sub(1));
        &values[self.start.min(end)..=end]
    }
}

/// Unix timestamp of a "HH:MM" clock time on the given day.
fn clock_time_on(day: DateTime<FixedOffset>, clock: &str) -> Result<i64> {
    let time = NaiveTime::parse_from_str(clock, "%H:%M")
        .with_context(|| format!("unparseable clock time {clock:?}"))?;

    let at = floor_to_day(day)
        + Duration::hours(i64::from(time.hour()))
        + Duration::minutes(i64::from(time.minute()));

    Ok(at.timestamp())
}

/// First index whose timestamp is nearest the target.
fn nearest_from_start(timestamps: &[i64], target: i64) -> usize {
    let mut best = 0;
    for (idx, &ts) in timestamps.iter().enumerate() {
        if (ts - target).abs() < (timestamps[best] - target).abs() {
            best = idx;
        }
    }
    best
}

/// Last index whose timestamp is nearest the target.
fn nearest_from_end(timestamps: &[i64], target: i64) -> usize {
    let mut best = timestamps.len() - 1;
    for (idx, &ts) in timestamps.iter().enumerate().rev() {
        if (ts - target).abs() < (timestamps[best] - target).abs() {
            best = idx;
        }
    }
    best
}

fn floor_to_hour(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt - Duration::minutes(i64::from(dt.minute())) - Duration::seconds(i64::from(dt.second()))
}

fn floor_to_day(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt - Duration::seconds(i64::from(dt.num_seconds_from_midnight()))
}
