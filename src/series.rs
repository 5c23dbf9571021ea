use anyhow::{bail, Result};

use crate::analysis::Element;

/// Five parallel sequences sampled by the monitoring device, aligned by index.
/// Timestamps are ascending unix seconds; element values are device-native
/// integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingSeries {
    pub timestamps: Vec<i64>,
    pub temperature: Vec<i64>,
    pub humidity: Vec<i64>,
    pub sound: Vec<i64>,
    pub light: Vec<i64>,
}

impl ReadingSeries {
    pub fn new(
        timestamps: Vec<i64>,
        temperature: Vec<i64>,
        humidity: Vec<i64>,
        sound: Vec<i64>,
        light: Vec<i64>,
    ) -> Result<Self> {
        let n = timestamps.len();
        if temperature.len() != n || humidity.len() != n || sound.len() != n || light.len() != n {
            bail!(
                "reading series lengths diverge: ts={} t={} h={} s={} l={}",
                n,
                temperature.len(),
                humidity.len(),
                sound.len(),
                light.len()
            );
        }

        Ok(Self {
            timestamps,
            temperature,
            humidity,
            sound,
            light,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn values(&self, element: Element) -> &[i64] {
        match element {
            Element::Temperature => &self.temperature,
            Element::Humidity => &self.humidity,
            Element::Sound => &self.sound,
            Element::Light => &self.light,
        }
    }
}

/// Parse a comma-separated value list, dropping empty entries.
///
/// The device pads its output with trailing separators, so blank entries are
/// expected and skipped rather than treated as errors.
pub fn parse_csv_values(csv: &str) -> Result<Vec<i64>> {
    csv.split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<i64>()
                .map_err(|err| anyhow::anyhow!("bad sample value {entry:?}: {err}"))
        })
        .collect()
}
