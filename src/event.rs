//! Incoming voice events and the response shape handed back to the
//! voice platform. The wire structs stay close to the platform's JSON so a
//! thin adapter can deserialize straight into them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One slot as delivered by the platform: the raw transcription plus the
/// resolved canonical value, when resolution succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub resolved: Option<String>,
    #[serde(default)]
    pub validated: bool,
}

impl SlotValue {
    /// A slot whose resolution matched a known value.
    pub fn resolved(raw: &str, resolved: &str) -> Self {
        Self {
            raw: raw.to_string(),
            resolved: Some(resolved.to_string()),
            validated: true,
        }
    }

    /// A slot taken verbatim, with no resolution step.
    pub fn exact(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            resolved: Some(raw.to_string()),
            validated: true,
        }
    }

    /// A slot the platform heard but could not match.
    pub fn unmatched(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            resolved: None,
            validated: false,
        }
    }

    /// Best available value: the resolved form when validated, otherwise the
    /// raw utterance. Callers that must distinguish check `validated`.
    pub fn value(&self) -> Option<&str> {
        if self.validated {
            self.resolved.as_deref()
        } else {
            Some(&self.raw)
        }
    }
}

/// A raw turn from the platform, before intent interpretation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    pub intent: String,
    #[serde(default)]
    pub slots: HashMap<String, SlotValue>,
}

impl IncomingEvent {
    pub fn new(intent: &str) -> Self {
        Self {
            intent: intent.to_string(),
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, name: &str, slot: SlotValue) -> Self {
        self.slots.insert(name.to_string(), slot);
        self
    }

    fn slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name)
    }
}

/// Interpreted intent of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Launch,
    Status {
        element: Option<SlotValue>,
        date: Option<SlotValue>,
    },
    EnterPin {
        pin: Option<SlotValue>,
    },
    TimeResponse {
        time: Option<SlotValue>,
    },
    SetTimeZone {
        zone: Option<SlotValue>,
    },
    Help,
    Cancel,
    Stop,
    SessionEnded,
    Reset,
    Unhandled,
}

impl Intent {
    pub fn from_event(event: &IncomingEvent) -> Self {
        match event.intent.as_str() {
            "LaunchRequest" => Intent::Launch,
            "SpecificStatus" => Intent::Status {
                element: event.slot("Element").cloned(),
                date: event.slot("RequestDate").cloned(),
            },
            "EnterPin" => Intent::EnterPin {
                pin: event.slot("PinNumber").cloned(),
            },
            "TimeResponse" => Intent::TimeResponse {
                time: event.slot("SleepTime").cloned(),
            },
            "SetTimeZone" => Intent::SetTimeZone {
                zone: event.slot("TimeZone").cloned(),
            },
            "AMAZON.HelpIntent" => Intent::Help,
            "AMAZON.CancelIntent" => Intent::Cancel,
            "AMAZON.StopIntent" => Intent::Stop,
            "SessionEndedRequest" => Intent::SessionEnded,
            "Reset" => Intent::Reset,
            _ => Intent::Unhandled,
        }
    }
}

/// Visual card shown alongside the spoken response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub text: String,
    pub image_url: String,
}

/// What the skill says back, and whether the session stays open.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub speech: String,
    #[serde(default)]
    pub reprompt: Option<String>,
    #[serde(default)]
    pub card: Option<Card>,
    pub end_session: bool,
}

impl SkillResponse {
    /// Ask a question and keep the microphone open.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: Some(reprompt.into()),
            card: None,
            end_session: false,
        }
    }

    /// State something and close the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: None,
            card: None,
            end_session: true,
        }
    }

    /// Close the session without speaking.
    pub fn silent() -> Self {
        Self {
            speech: String::new(),
            reprompt: None,
            card: None,
            end_session: true,
        }
    }

    pub fn with_card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_intent_carries_its_slots() {
        let event = IncomingEvent::new("SpecificStatus")
            .with_slot("Element", SlotValue::resolved("temp", "temperature"))
            .with_slot("RequestDate", SlotValue::exact("yesterday"));

        let Intent::Status { element, date } = Intent::from_event(&event) else {
            panic!("expected a status intent");
        };
        assert_eq!(element.unwrap().value(), Some("temperature"));
        assert_eq!(date.unwrap().value(), Some("yesterday"));
    }

    #[test]
    fn unmatched_slots_fall_back_to_the_raw_utterance() {
        let slot = SlotValue::unmatched("yesterday");
        assert_eq!(slot.value(), Some("yesterday"));
        assert!(!slot.validated);
    }

    #[test]
    fn unknown_intents_are_unhandled() {
        let event = IncomingEvent::new("SomeNewIntent");
        assert_eq!(Intent::from_event(&event), Intent::Unhandled);
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = IncomingEvent::new("EnterPin")
            .with_slot("PinNumber", SlotValue::exact("1234"));
        let json = serde_json::to_string(&event).unwrap();
        let back: IncomingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.intent, "EnterPin");
        assert_eq!(back.slots["PinNumber"].value(), Some("1234"));
    }
}
