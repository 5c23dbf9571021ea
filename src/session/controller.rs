//! The per-user conversation driver. One controller instance owns a user's
//! attributes and dialogue state; every turn flows through [`SessionController::handle`],
//! which mutates a scratch copy and commits it only when the turn succeeds.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{info, warn};

use crate::analysis::{
    analyze_element, compose_summary, AnalysisConfig, DatePhrase, Element, FetchWindow,
    SummaryWindow,
};
use crate::chart::{self, LabelStyle};
use crate::device::{DeviceGateway, LinkStore};
use crate::event::{Card, IncomingEvent, Intent, SkillResponse, SlotValue};
use crate::lang;
use crate::session::attributes::{SessionAttributes, WaitingSlot};
use crate::session::gatekeeper::{self, SetupRequirement};
use crate::settings::Settings;
use crate::timezone;

/// Where the dialogue currently stands. Mirrors the question last asked, so
/// off-script answers can be nudged back toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingPin,
    AwaitingTime(WaitingSlot),
    AwaitingTimeZone,
}

/// Ambiguous AMAZON.TIME resolutions (night, morning, afternoon, evening)
/// that cannot be pinned to a clock time.
const AMBIGUOUS_TIMES: [&str; 4] = ["NI", "MO", "AF", "EV"];

pub struct SessionController<L, G> {
    state: SessionState,
    attrs: SessionAttributes,
    config: AnalysisConfig,
    settings: Settings,
    links: L,
    gateway: G,
}

/// Scratch copy of the mutable session pieces for one turn.
struct Turn {
    state: SessionState,
    attrs: SessionAttributes,
}

impl<L: LinkStore, G: DeviceGateway> SessionController<L, G> {
    pub fn new(settings: Settings, links: L, gateway: G) -> Self {
        Self {
            state: SessionState::Idle,
            attrs: SessionAttributes::default(),
            config: AnalysisConfig::default(),
            settings,
            links,
            gateway,
        }
    }

    /// Resume with attributes restored from persistent storage.
    pub fn with_attributes(mut self, attrs: SessionAttributes) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn attributes(&self) -> &SessionAttributes {
        &self.attrs
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one turn. State and attributes are committed atomically: a turn
    /// that fails midway leaves the session exactly as it was.
    pub async fn handle(&mut self, event: IncomingEvent) -> SkillResponse {
        let intent = Intent::from_event(&event);
        info!("handling {:?} in {:?}", event.intent, self.state);

        let mut turn = Turn {
            state: self.state,
            attrs: self.attrs.clone(),
        };

        match self.dispatch(&mut turn, intent).await {
            Ok(response) => {
                self.state = turn.state;
                self.attrs = turn.attrs;
                response
            }
            Err(err) => {
                warn!("turn failed, session left unchanged: {err:#}");
                SkillResponse::tell(lang::FETCH_ERROR)
            }
        }
    }

    async fn dispatch(&self, turn: &mut Turn, intent: Intent) -> Result<SkillResponse> {
        let response = match intent {
            Intent::Launch => {
                if gatekeeper::is_complete(&turn.attrs) {
                    turn.state = SessionState::Idle;
                    SkillResponse::ask(lang::HELP, lang::HELP_REPROMPT)
                } else {
                    ask_next_requirement(turn, "")
                }
            }
            Intent::Status { element, date } => {
                if gatekeeper::is_complete(&turn.attrs) {
                    self.status_turn(turn, element, date).await?
                } else {
                    ask_next_requirement(turn, "")
                }
            }
            Intent::EnterPin { pin } => {
                if turn.attrs.has_device_link() {
                    SkillResponse::ask(lang::UNHANDLED, lang::HELP_REPROMPT)
                } else {
                    self.enter_pin(turn, pin).await?
                }
            }
            Intent::TimeResponse { time } => match turn.attrs.waiting_slot {
                Some(slot) => record_time(turn, slot, time),
                None => off_script(turn),
            },
            Intent::SetTimeZone { zone } => match turn.state {
                SessionState::AwaitingTimeZone => record_time_zone(turn, zone),
                _ => off_script(turn),
            },
            Intent::Help => {
                if gatekeeper::is_complete(&turn.attrs) {
                    SkillResponse::ask(lang::HELP, lang::HELP_REPROMPT)
                } else {
                    ask_next_requirement(turn, lang::HELP_PRE_SETUP)
                }
            }
            Intent::Cancel | Intent::Stop => SkillResponse::silent(),
            Intent::SessionEnded => {
                turn.attrs.clear_connection();
                turn.state = SessionState::Idle;
                SkillResponse::silent()
            }
            Intent::Reset => {
                turn.attrs.reset();
                turn.state = SessionState::Idle;
                SkillResponse::tell(lang::RESET_CONFIRMED)
            }
            Intent::Unhandled => off_script(turn),
        };

        Ok(response)
    }

    async fn enter_pin(&self, turn: &mut Turn, pin: Option<SlotValue>) -> Result<SkillResponse> {
        let raw = pin
            .as_ref()
            .and_then(SlotValue::value)
            .unwrap_or_default()
            .trim()
            .to_string();

        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Ok(SkillResponse::ask(
                lang::PIN_INPUT_ERROR,
                lang::NEED_PIN_CODE_REPROMPT,
            ));
        }
        let Ok(pin) = raw.parse::<u32>() else {
            return Ok(SkillResponse::ask(
                lang::PIN_INPUT_ERROR,
                lang::NEED_PIN_CODE_REPROMPT,
            ));
        };

        let link = match self.links.find_by_pin(pin).await {
            Ok(link) => link,
            Err(err) => {
                warn!("pin lookup failed: {err}");
                return Ok(SkillResponse::tell(lang::PIN_LOOKUP_ERROR));
            }
        };

        match link {
            Some(link) => {
                turn.attrs.device_guid = Some(link.guid);
                turn.attrs.device_ip = Some(link.ip);
                turn.attrs.device_port = Some(link.port);
                Ok(ask_next_requirement(turn, ""))
            }
            None => Ok(SkillResponse::ask(
                lang::no_device_for_pin(&raw),
                lang::NEED_PIN_CODE_REPROMPT,
            )),
        }
    }

    /// Fetch, analyze, and speak one data request. Calibration is known to be
    /// complete when this runs.
    async fn status_turn(
        &self,
        turn: &mut Turn,
        element: Option<SlotValue>,
        date: Option<SlotValue>,
    ) -> Result<SkillResponse> {
        let element = element
            .as_ref()
            .and_then(SlotValue::value)
            .and_then(Element::parse);
        let date = DatePhrase::parse(date.as_ref().and_then(SlotValue::value));

        let zone = turn.attrs.time_zone.as_deref().context("time zone unset")?;
        let tz = timezone::utc_offset(zone)
            .with_context(|| format!("stored time zone {zone:?} is unknown"))?;
        let now = Utc::now().with_timezone(&tz);

        let (ip, port) = self.device_address(turn).await?;
        let fetch = FetchWindow::for_date(date, now);
        let series = self
            .gateway
            .fetch(&ip, port, &fetch)
            .await
            .context("device fetch failed")?;

        let sleep = turn.attrs.sleep_time.as_deref().context("sleep time unset")?;
        let wake = turn
            .attrs
            .wake_weekday_time
            .as_deref()
            .context("weekday wake time unset")?;
        let window = SummaryWindow::resolve(date, &series.timestamps, sleep, wake, now)?;

        let timestamps = window.slice(&series.timestamps);
        let mut reports = Vec::new();
        for el in Element::ALL {
            if element.is_none() || element == Some(el) {
                if let Some(report) = analyze_element(
                    el,
                    self.config.profile(el),
                    window.slice(series.values(el)),
                    timestamps,
                    tz,
                    window.is_present,
                ) {
                    reports.push(report);
                }
            }
        }
        let summary = compose_summary(&reports, date);

        // The summary reads the window; the chart shows everything fetched.
        let style = if date.uses_hour_labels() {
            LabelStyle::HourOfDay
        } else {
            LabelStyle::DayOfWeek
        };
        let payload = chart::encode(&series, element, style, tz)?;
        let image_url = chart::chart_url(&self.settings.chart_endpoint, &payload);

        turn.state = SessionState::Idle;
        Ok(SkillResponse::tell(summary.clone()).with_card(Card {
            title: lang::CHART_TITLE.to_string(),
            text: summary,
            image_url,
        }))
    }

    /// Cached device address, re-resolved from the link store when absent.
    async fn device_address(&self, turn: &mut Turn) -> Result<(String, u16)> {
        if let (Some(ip), Some(port)) = (&turn.attrs.device_ip, turn.attrs.device_port) {
            return Ok((ip.clone(), port));
        }

        let guid = turn
            .attrs
            .device_guid
            .clone()
            .context("no device link on record")?;
        let link = self
            .links
            .get(&guid)
            .await
            .map_err(|err| anyhow!("link store lookup failed: {err}"))?
            .with_context(|| format!("device link {guid:?} has disappeared"))?;

        turn.attrs.device_ip = Some(link.ip.clone());
        turn.attrs.device_port = Some(link.port);
        Ok((link.ip, link.port))
    }
}

/// Off-script input: nudge back to the pin when that is what was asked,
/// resume the question cascade while calibration is incomplete, otherwise a
/// generic re-prompt.
fn off_script(turn: &mut Turn) -> SkillResponse {
    if turn.state == SessionState::AwaitingPin {
        return SkillResponse::ask(lang::PIN_EXPECTED_ERROR, lang::NEED_PIN_CODE_REPROMPT);
    }
    if !gatekeeper::is_complete(&turn.attrs) {
        return ask_next_requirement(turn, "");
    }
    SkillResponse::ask(lang::UNHANDLED, lang::HELP_REPROMPT)
}

/// Ask the next calibration question, or close out setup when done.
fn ask_next_requirement(turn: &mut Turn, prefix: &str) -> SkillResponse {
    match gatekeeper::next_requirement(&turn.attrs) {
        Some(SetupRequirement::DeviceLink) => {
            turn.state = SessionState::AwaitingPin;
            turn.attrs.waiting_slot = None;
            SkillResponse::ask(
                format!("{prefix}{}", lang::NEED_PIN_CODE),
                lang::NEED_PIN_CODE_REPROMPT,
            )
        }
        Some(SetupRequirement::SleepTime) => {
            turn.state = SessionState::AwaitingTime(WaitingSlot::Sleep);
            turn.attrs.waiting_slot = Some(WaitingSlot::Sleep);
            SkillResponse::ask(
                format!("{prefix}{}", lang::SLEEP_TIME_QUESTION),
                lang::SLEEP_TIME_QUESTION,
            )
        }
        Some(SetupRequirement::WakeWeekdayTime) => {
            turn.state = SessionState::AwaitingTime(WaitingSlot::WakeWeekday);
            turn.attrs.waiting_slot = Some(WaitingSlot::WakeWeekday);
            SkillResponse::ask(
                format!("{prefix}{}", lang::WAKE_WEEKDAY_QUESTION),
                lang::WAKE_WEEKDAY_QUESTION,
            )
        }
        Some(SetupRequirement::WakeWeekendTime) => {
            turn.state = SessionState::AwaitingTime(WaitingSlot::WakeWeekend);
            turn.attrs.waiting_slot = Some(WaitingSlot::WakeWeekend);
            SkillResponse::ask(
                format!("{prefix}{}", lang::WAKE_WEEKEND_QUESTION),
                lang::WAKE_WEEKEND_QUESTION,
            )
        }
        Some(SetupRequirement::TimeZone) => {
            turn.state = SessionState::AwaitingTimeZone;
            turn.attrs.waiting_slot = None;
            SkillResponse::ask(
                format!("{prefix}{}", lang::TIME_ZONE_QUESTION),
                lang::TIME_ZONE_QUESTION,
            )
        }
        None => {
            turn.state = SessionState::Idle;
            turn.attrs.waiting_slot = None;
            SkillResponse::tell(lang::ALL_INFO_GATHERED)
        }
    }
}

/// Store an answered wake/sleep time, rejecting anything that is not a
/// concrete clock time.
fn record_time(turn: &mut Turn, slot: WaitingSlot, time: Option<SlotValue>) -> SkillResponse {
    let raw = time
        .as_ref()
        .and_then(SlotValue::value)
        .unwrap_or_default()
        .trim()
        .to_string();

    let usable = !raw.is_empty()
        && !AMBIGUOUS_TIMES.contains(&raw.as_str())
        && chrono::NaiveTime::parse_from_str(&raw, "%H:%M").is_ok();
    if !usable {
        return SkillResponse::ask(lang::TIME_FORMAT_ERROR, lang::TIME_FORMAT_ERROR);
    }

    match slot {
        WaitingSlot::Sleep => turn.attrs.sleep_time = Some(raw),
        WaitingSlot::WakeWeekday => turn.attrs.wake_weekday_time = Some(raw),
        WaitingSlot::WakeWeekend => turn.attrs.wake_weekend_time = Some(raw),
    }

    ask_next_requirement(turn, "")
}

fn record_time_zone(turn: &mut Turn, zone: Option<SlotValue>) -> SkillResponse {
    let zone = zone
        .as_ref()
        .and_then(SlotValue::value)
        .unwrap_or_default()
        .trim()
        .to_uppercase();

    if !timezone::is_supported(&zone) {
        return SkillResponse::ask(lang::TIME_ZONE_ERROR, lang::TIME_ZONE_ERROR);
    }

    turn.attrs.time_zone = Some(zone);
    ask_next_requirement(turn, "")
}
