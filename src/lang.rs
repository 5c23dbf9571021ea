//! Every phrase the skill can speak. Summary sentences pick randomly among
//! small variant sets so repeated questions do not sound canned.

use rand::seq::SliceRandom;

fn pick(options: &[&'static str]) -> &'static str {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(options[0])
}

// --- introduction and setup -------------------------------------------------

pub const ALL_INFO_GATHERED: &str = "Alright, that's everything we need to get started. I've begun recording your sleep data now. When you come back, you can ask questions like \"ask good sleep how is the bedroom?\" or \"ask good sleep how was the temperature last night\".";
pub const NEED_PIN_CODE: &str = "Welcome to Good Sleep! I need the 4 digit pin code from your monitoring device to get started. Please say it now.";
pub const NEED_PIN_CODE_REPROMPT: &str =
    "Please say the 4 digit pin code you received when setting up your device.";
pub const HELP: &str = "Welcome to Good Sleep! I can give you information about the current environment of your bedroom, or show you what the conditions were like last night or over the last week. What would you like to know?";
pub const HELP_PRE_SETUP: &str = "I can give you information about the current environment of your bedroom, but first you must complete the setup questions. ";
pub const HELP_REPROMPT: &str = "What would you like to know?";
pub const UNHANDLED: &str = "Sorry, I didn't understand that. Please say it again.";
pub const RESET_CONFIRMED: &str = "Done.";

// --- time entry -------------------------------------------------------------

pub const SLEEP_TIME_QUESTION: &str =
    "I've connected to your device successfully. Around what time do you go to sleep?";
pub const WAKE_WEEKDAY_QUESTION: &str = "Okay. And around when do you wake up on weekdays?";
pub const WAKE_WEEKEND_QUESTION: &str = "What time do you wake up on weekends?";
pub const TIME_ZONE_QUESTION: &str =
    "Finally, what time zone are you in? Say something like C.S.T. or Pacific Time.";
pub const TIME_ZONE_ERROR: &str = "I didn't understand that time zone. Try saying something like Central Time or P.S.T. Only North American time zones are supported currently.";
pub const TIME_FORMAT_ERROR: &str = "Please say your time, like 9pm or 7am.";

// --- pin entry --------------------------------------------------------------

pub const PIN_INPUT_ERROR: &str =
    "I didn't get your pin number. Please try saying the 4-digit pin number again.";
pub const PIN_LOOKUP_ERROR: &str =
    "There was a problem looking up your device. Please try again later.";
pub const PIN_EXPECTED_ERROR: &str =
    "I'm sorry, I didn't understand that PIN number. Please say the 4 digits again.";

/// Spell the unknown pin back digit by digit.
pub fn no_device_for_pin(pin: &str) -> String {
    let spelled: Vec<String> = pin.chars().map(|c| c.to_string()).collect();
    format!(
        "I couldn't find a device with the pin code {}. Please check and say it again now.",
        spelled.join(", ")
    )
}

// --- data fetching and charts -----------------------------------------------

pub const FETCH_ERROR: &str =
    "I couldn't connect to your device. Please make sure it's online and set up, then try again.";
pub const CHART_TITLE: &str = "Your Sleep Data";

// --- summary fragments ------------------------------------------------------

/// Fallback sentence always available per element.
/// e.g. "The temperature averaged 64 degrees, which is ideal."
pub fn general(element: &str, avg_value: &str, band: &str, is_present: bool) -> String {
    let verb = if is_present {
        pick(&[" is around ", " is about "])
    } else {
        pick(&[" averaged ", " stayed around ", " was about "])
    };
    format!("The {element}{verb}{avg_value}, which is {band}.")
}

/// Out-of-band sentence.
/// e.g. "The maximum temperature was 71 degrees, which is higher than recommended."
pub fn band(
    qualifier: &str,
    element: &str,
    value: &str,
    higher_lower: &str,
    is_present: bool,
) -> String {
    let verb = if is_present { " is " } else { " was " };
    let tail = pick(&[
        "most people like.",
        "recommended.",
        "desired for the best sleep.",
    ]);
    format!("The {qualifier} {element}{verb}{value}, which is {higher_lower} than {tail}")
}

/// Spike sentence.
/// e.g. "At around 3am, the temperature got to 76 degrees, which is far too high to sleep well."
pub fn spike(time: &str, element: &str, value: &str, band: &str) -> String {
    let tail = pick(&[
        "to sleep well.",
        "and may wake you up.",
        "to have a good night's sleep.",
    ]);
    format!("At {time}, the {element} got to {value}, which is {band} {tail}")
}

pub fn all_is_well(is_present: bool) -> &'static str {
    if is_present {
        "The bedroom is looking good."
    } else {
        "Everything was good."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_switches_tense() {
        let present = general("temperature", "64 degrees", "ideal", true);
        assert!(present.starts_with("The temperature is a"));
        assert!(present.ends_with("64 degrees, which is ideal."));

        let past = general("temperature", "64 degrees", "ideal", false);
        assert!(!past.contains(" is around "));
        assert!(!past.contains(" is about "));
    }

    #[test]
    fn pin_digits_are_spelled_out() {
        let speech = no_device_for_pin("1234");
        assert!(speech.contains("1, 2, 3, 4"));
    }

    #[test]
    fn spike_sentence_names_time_and_band() {
        let speech = spike("around 3am", "temperature", "76 degrees", "far too high");
        assert!(speech.starts_with("At around 3am, the temperature got to 76 degrees,"));
        assert!(speech.contains("far too high"));
    }
}
