//! Compact serialization of a reading series for the chart-rendering
//! collaborator. The payload has to survive a URL query parameter, so the
//! flat `key=value` text is compressed and encoded with the URL-safe base64
//! alphabet.

use std::io::{Read, Write};

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{FixedOffset, TimeZone};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::analysis::Element;
use crate::series::{parse_csv_values, ReadingSeries};

/// Characters escaped inside values; matches component-style URI escaping,
/// leaving the unreserved marks alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How sample instants are labelled on the chart's x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// "3am" style labels for today/yesterday windows.
    HourOfDay,
    /// "Mon" style labels for week windows.
    DayOfWeek,
}

impl LabelStyle {
    fn format(self, timestamp: i64, tz: FixedOffset) -> String {
        let pattern = match self {
            LabelStyle::HourOfDay => "%-I%P",
            LabelStyle::DayOfWeek => "%a",
        };

        match tz.timestamp_opt(timestamp, 0) {
            chrono::LocalResult::Single(dt) => dt.format(pattern).to_string(),
            _ => String::new(),
        }
    }
}

/// Encode a series into the compressed URL-safe payload.
///
/// Labels are run-length boundary encoded: an `index=label` entry is emitted
/// only where the label differs from the previous sample's. When `element` is
/// given, only that series is included alongside the labels.
pub fn encode(
    series: &ReadingSeries,
    element: Option<Element>,
    style: LabelStyle,
    tz: FixedOffset,
) -> Result<String> {
    let mut boundaries: Vec<String> = Vec::new();
    let mut last_label = String::new();
    for (idx, &ts) in series.timestamps.iter().enumerate() {
        let label = style.format(ts, tz);
        if label != last_label {
            boundaries.push(format!("{idx}={label}"));
            last_label = label;
        }
    }

    let mut pairs: Vec<(&str, String)> = vec![("x", boundaries.join(","))];
    for el in Element::ALL {
        if element.is_none() || element == Some(el) {
            pairs.push((el.key(), join_values(series.values(el))));
        }
    }

    let query: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", encode_component(value)))
        .collect();

    compress(&query.join("&"))
}

/// Decoded chart payload, as the rendering collaborator sees it.
///
/// `labels` holds one entry per sample: the boundary label where one was
/// encoded, an empty string everywhere else. The gaps are intentional and
/// must not be back-filled with the previous label, so that the rendered
/// label lands under the sample where the hour or day changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedChart {
    pub labels: Vec<String>,
    pub temperature: Option<Vec<i64>>,
    pub humidity: Option<Vec<i64>>,
    pub sound: Option<Vec<i64>>,
    pub light: Option<Vec<i64>>,
}

impl DecodedChart {
    fn series_mut(&mut self, key: &str) -> Option<&mut Option<Vec<i64>>> {
        match key {
            "t" => Some(&mut self.temperature),
            "h" => Some(&mut self.humidity),
            "s" => Some(&mut self.sound),
            "l" => Some(&mut self.light),
            _ => None,
        }
    }

    /// Length of the first present series, which every label must align to.
    fn sample_count(&self) -> usize {
        [&self.temperature, &self.humidity, &self.sound, &self.light]
            .into_iter()
            .flatten()
            .next()
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Reverse of [`encode`]; exercised by the rendering collaborator and by the
/// round-trip tests here.
pub fn decode(payload: &str) -> Result<DecodedChart> {
    let query = decompress(payload)?;

    let mut chart = DecodedChart::default();
    let mut boundaries = String::new();

    for pair in query.split('&') {
        let (key, raw_value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("chart pair without '=': {pair:?}"))?;
        let value = percent_decode_str(raw_value)
            .decode_utf8()
            .context("chart value is not valid utf-8")?;

        if key == "x" {
            boundaries = value.into_owned();
        } else if let Some(slot) = chart.series_mut(key) {
            *slot = Some(parse_csv_values(&value)?);
        } else {
            bail!("unknown chart series key {key:?}");
        }
    }

    chart.labels = expand_labels(&boundaries, chart.sample_count())?;
    Ok(chart)
}

fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Component-escape a value, keeping literal commas readable.
fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT)
        .to_string()
        .replace("%2C", ",")
}

/// Fill a full per-index label array from its boundary entries.
fn expand_labels(boundaries: &str, len: usize) -> Result<Vec<String>> {
    let mut labels = vec![String::new(); len];

    for entry in boundaries.split(',').filter(|e| !e.is_empty()) {
        let (idx, label) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("label boundary without '=': {entry:?}"))?;
        let idx: usize = idx
            .parse()
            .with_context(|| format!("bad label index {idx:?}"))?;
        if idx < len {
            labels[idx] = label.to_string();
        }
    }

    Ok(labels)
}

fn compress(text: &str) -> Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .context("compressing chart payload")?;
    let compressed = encoder.finish().context("finishing chart payload")?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

fn decompress(payload: &str) -> Result<String> {
    let compressed = URL_SAFE_NO_PAD
        .decode(payload)
        .context("chart payload is not valid base64")?;
    let mut text = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .context("decompressing chart payload")?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn eastern() -> FixedOffset {
        FixedOffset::east_opt(-5 * 3600).unwrap()
    }

    fn night_series() -> ReadingSeries {
        let tz = eastern();
        let start = tz.with_ymd_and_hms(2024, 3, 11, 22, 40, 0).unwrap();
        let timestamps: Vec<i64> = (0..6)
            .map(|i| (start + Duration::minutes(10 * i)).timestamp())
            .collect();

        ReadingSeries::new(
            timestamps,
            vec![65, 66, 66, 65, 64, 64],
            vec![50, 50, 51, 51, 50, 50],
            vec![20, 21, 20, 20, 22, 20],
            vec![0, 0, 1, 0, 0, 0],
        )
        .unwrap()
    }

    #[test]
    fn round_trip_reproduces_values_exactly() {
        let series = night_series();
        let payload = encode(&series, None, LabelStyle::HourOfDay, eastern()).unwrap();
        let decoded = decode(&payload).unwrap();

        assert_eq!(decoded.temperature.as_deref(), Some(series.temperature.as_slice()));
        assert_eq!(decoded.humidity.as_deref(), Some(series.humidity.as_slice()));
        assert_eq!(decoded.sound.as_deref(), Some(series.sound.as_slice()));
        assert_eq!(decoded.light.as_deref(), Some(series.light.as_slice()));
    }

    #[test]
    fn labels_appear_only_at_boundaries() {
        // Samples span 10pm to nearly midnight; the hour label changes at
        // index 0 (10pm) and index 2 (11pm).
        let series = night_series();
        let payload = encode(&series, None, LabelStyle::HourOfDay, eastern()).unwrap();
        let decoded = decode(&payload).unwrap();

        assert_eq!(decoded.labels.len(), series.len());
        assert_eq!(decoded.labels[0], "10pm");
        assert_eq!(decoded.labels[1], "");
        assert_eq!(decoded.labels[2], "11pm");
        assert!(decoded.labels[3..].iter().all(String::is_empty));
    }

    #[test]
    fn single_element_request_restricts_the_payload() {
        let series = night_series();
        let payload = encode(
            &series,
            Some(Element::Humidity),
            LabelStyle::HourOfDay,
            eastern(),
        )
        .unwrap();
        let decoded = decode(&payload).unwrap();

        assert!(decoded.temperature.is_none());
        assert!(decoded.sound.is_none());
        assert!(decoded.light.is_none());
        assert_eq!(decoded.humidity.as_deref(), Some(series.humidity.as_slice()));
    }

    #[test]
    fn week_style_labels_use_weekdays() {
        let tz = eastern();
        let start = tz.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        let timestamps: Vec<i64> = (0..48)
            .map(|i| (start + Duration::hours(i)).timestamp())
            .collect();
        let flat = vec![60; 48];
        let series = ReadingSeries::new(
            timestamps,
            flat.clone(),
            flat.clone(),
            flat.clone(),
            flat,
        )
        .unwrap();

        let payload = encode(&series, None, LabelStyle::DayOfWeek, tz).unwrap();
        let decoded = decode(&payload).unwrap();

        // March 11th 2024 is a Monday.
        assert_eq!(decoded.labels[0], "Mon");
        assert_eq!(decoded.labels.iter().filter(|l| !l.is_empty()).count(), 3);
        assert!(decoded.labels.contains(&"Tue".to_string()));
        assert!(decoded.labels.contains(&"Wed".to_string()));
    }

    #[test]
    fn garbage_payload_is_rejected() {
        assert!(decode("definitely not base64 zlib").is_err());
    }
}
