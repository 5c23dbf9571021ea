use crate::session::attributes::SessionAttributes;

/// The next piece of calibration still missing, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupRequirement {
    DeviceLink,
    SleepTime,
    WakeWeekdayTime,
    WakeWeekendTime,
    TimeZone,
}

/// First unmet requirement, or None when calibration is complete.
///
/// Data questions are refused until this returns None, so the order here is
/// exactly the order the user is asked.
pub fn next_requirement(attrs: &SessionAttributes) -> Option<SetupRequirement> {
    if !attrs.has_device_link() {
        Some(SetupRequirement::DeviceLink)
    } else if attrs.sleep_time.is_none() {
        Some(SetupRequirement::SleepTime)
    } else if attrs.wake_weekday_time.is_none() {
        Some(SetupRequirement::WakeWeekdayTime)
    } else if attrs.wake_weekend_time.is_none() {
        Some(SetupRequirement::WakeWeekendTime)
    } else if attrs.time_zone.is_none() {
        Some(SetupRequirement::TimeZone)
    } else {
        None
    }
}

pub fn is_complete(attrs: &SessionAttributes) -> bool {
    next_requirement(attrs).is_none()
}
