use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use thiserror::Error;

use crate::analysis::window::FetchWindow;
use crate::series::{parse_csv_values, ReadingSeries};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("device returned no data")]
    EmptyResponse,
    #[error("malformed device payload: {0}")]
    Malformed(String),
}

/// Blocking-per-turn fetch of raw readings from the monitoring device.
pub trait DeviceGateway {
    fn fetch(
        &self,
        ip: &str,
        port: u16,
        window: &FetchWindow,
    ) -> impl std::future::Future<Output = Result<ReadingSeries, DeviceError>> + Send;
}

/// HTTP implementation talking to the device's `/fetch` endpoint. One
/// round trip per turn with a hard timeout; a failed fetch is reported to
/// the user rather than retried.
#[derive(Debug, Clone)]
pub struct HttpDeviceGateway {
    client: reqwest::Client,
}

impl HttpDeviceGateway {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building device http client")?;

        Ok(Self { client })
    }
}

impl DeviceGateway for HttpDeviceGateway {
    async fn fetch(
        &self,
        ip: &str,
        port: u16,
        window: &FetchWindow,
    ) -> Result<ReadingSeries, DeviceError> {
        let url = format!(
            "http://{}:{}/fetch?min={}&max={}&ph={}",
            ip, port, window.min_ts, window.max_ts, window.samples_per_hour
        );
        debug!("fetching readings from {url}");

        let body = self.client.get(&url).send().await?.text().await?;
        parse_device_body(&body)
    }
}

/// Parse the device's ad hoc `key=csv&key=csv` body into a series.
///
/// The device streams samples newest-first; every sequence is reversed here
/// so the rest of the crate only ever sees chronological order.
pub fn parse_device_body(body: &str) -> Result<ReadingSeries, DeviceError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(DeviceError::EmptyResponse);
    }

    let mut temperature = None;
    let mut humidity = None;
    let mut sound = None;
    let mut light = None;
    let mut timestamps = None;

    for pair in body.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(DeviceError::Malformed(format!("pair without '=': {pair:?}")));
        };

        let values = parse_csv_values(value)
            .map_err(|err| DeviceError::Malformed(err.to_string()))
            .map(|mut v| {
                v.reverse();
                v
            })?;

        match key {
            "t" => temperature = Some(values),
            "h" => humidity = Some(values),
            "s" => sound = Some(values),
            "l" => light = Some(values),
            "ts" => timestamps = Some(values),
            other => {
                return Err(DeviceError::Malformed(format!("unknown key {other:?}")));
            }
        }
    }

    let (Some(timestamps), Some(temperature), Some(humidity), Some(sound), Some(light)) =
        (timestamps, temperature, humidity, sound, light)
    else {
        return Err(DeviceError::Malformed("missing series key".to_string()));
    };

    if timestamps.is_empty() {
        return Err(DeviceError::EmptyResponse);
    }

    ReadingSeries::new(timestamps, temperature, humidity, sound, light)
        .map_err(|err| DeviceError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_reversed_to_chronological_order() {
        let body = "t=66,65&h=51,50&s=21,20&l=1,0&ts=200,100";
        let series = parse_device_body(body).unwrap();

        assert_eq!(series.timestamps, vec![100, 200]);
        assert_eq!(series.temperature, vec![65, 66]);
        assert_eq!(series.light, vec![0, 1]);
    }

    #[test]
    fn empty_body_reports_no_data() {
        assert!(matches!(
            parse_device_body("  \n"),
            Err(DeviceError::EmptyResponse)
        ));
        assert!(matches!(
            parse_device_body("t=&h=&s=&l=&ts="),
            Err(DeviceError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_series_is_malformed() {
        assert!(matches!(
            parse_device_body("t=65&ts=100"),
            Err(DeviceError::Malformed(_))
        ));
    }

    #[test]
    fn trailing_separators_are_tolerated() {
        let body = "t=66,65,&h=51,50,&s=21,20,&l=1,0,&ts=200,100,";
        let series = parse_device_body(body).unwrap();
        assert_eq!(series.len(), 2);
    }
}
