use serde::{Deserialize, Serialize};

/// Which calibration question is currently awaiting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WaitingSlot {
    Sleep,
    WakeWeekday,
    WakeWeekend,
}

/// Everything remembered about a user across turns. Every field is optional
/// because calibration fills them in one question at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttributes {
    pub device_guid: Option<String>,
    pub device_ip: Option<String>,
    pub device_port: Option<u16>,
    pub sleep_time: Option<String>,
    pub wake_weekday_time: Option<String>,
    pub wake_weekend_time: Option<String>,
    pub time_zone: Option<String>,
    pub waiting_slot: Option<WaitingSlot>,
}

impl SessionAttributes {
    /// Wipe everything, returning the user to a fresh start.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Forget the cached device address but keep the link and calibration.
    /// The address is re-resolved from the link store on the next request.
    pub fn clear_connection(&mut self) {
        self.device_ip = None;
        self.device_port = None;
    }

    pub fn has_device_link(&self) -> bool {
        self.device_guid.is_some()
    }
}
