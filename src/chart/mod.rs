pub mod codec;

pub use codec::{decode, encode, DecodedChart, LabelStyle};

/// Full URL handed to the chart-rendering collaborator.
pub fn chart_url(endpoint: &str, payload: &str) -> String {
    format!("{endpoint}?d={payload}")
}
