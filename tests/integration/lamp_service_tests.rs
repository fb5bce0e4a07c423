//! Integration tests for the LampService pipeline.
//!
//! Every event kind goes through `dispatch` (or `handle_request`) with
//! mock indicator, entropy and event-sink adapters, checking the state
//! changes and the events and indicator calls they produce.

use core::time::Duration;

use smartlamp::app::events::AppEvent;
use smartlamp::app::lamp::LampService;
use smartlamp::config::LampConfig;
use smartlamp::control::presence::PresenceTimer;
use smartlamp::drivers::indicator::IndicatorPattern;
use smartlamp::error::{CommsError, Error, ProtocolError};
use smartlamp::events::{InputEvent, LampEvent};
use smartlamp::fsm::StateId;
use smartlamp::fsm::context::Presence;
use smartlamp::rpc::protocol::{
    BRIGHTNESS_PATH, Code, ContentFormat, Method, Request, Response, STATUS_PATH, StatusReport,
};
use smartlamp::rpc::transport::CallOutcome;

use crate::mock_hw::{MockHardware, RecordingSink};

fn make_lamp() -> (LampService, MockHardware, RecordingSink) {
    let config = LampConfig::default();
    let mut lamp = LampService::new(&config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    lamp.start(&mut hw, &mut sink);
    (lamp, hw, sink)
}

fn suggestion(body: &str) -> LampEvent {
    LampEvent::Negotiated(CallOutcome::Success(
        Response::content(ContentFormat::TextPlain, body).unwrap(),
    ))
}

fn put_brightness(body: &str) -> Request {
    Request::new(Method::Put, BRIGHTNESS_PATH)
        .unwrap()
        .with_payload(body)
        .unwrap()
}

// ── Start-up ─────────────────────────────────────────────────

#[test]
fn start_shows_initial_threshold() {
    let (lamp, hw, sink) = make_lamp();

    assert_eq!(lamp.gesture_state(), StateId::Idle);
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::Blue));
    assert!(!hw.aux_on(), "manual indicator must start dark");
    assert_eq!(sink.events, vec![AppEvent::Started]);
}

// ── Gestures ─────────────────────────────────────────────────

#[test]
fn held_gesture_steps_and_lights_manual_indicator() {
    let (mut lamp, mut hw, mut sink) = make_lamp();

    lamp.dispatch(InputEvent::Press.into(), &mut hw, &mut sink);
    lamp.dispatch(InputEvent::HoldTick.into(), &mut hw, &mut sink);
    lamp.dispatch(InputEvent::HoldTick.into(), &mut hw, &mut sink);

    assert_eq!(lamp.gesture_state(), StateId::HeldOverride);
    assert_eq!(lamp.state().threshold, 60);
    assert!(hw.aux_on());
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::RedBlue));

    lamp.dispatch(InputEvent::Release.into(), &mut hw, &mut sink);

    assert_eq!(lamp.gesture_state(), StateId::Idle);
    assert_eq!(lamp.state().threshold, 60, "release keeps the stepped value");
    assert_eq!(lamp.state().desired_lux, 600 + 400);
    assert!(hw.aux_on(), "manual mode survives the release");

    let transitions = sink.count(|e| matches!(e, AppEvent::GestureChanged { .. }));
    assert_eq!(transitions, 2);
}

#[test]
fn next_press_clears_manual_mode() {
    let (mut lamp, mut hw, mut sink) = make_lamp();
    for ev in [InputEvent::Press, InputEvent::HoldTick, InputEvent::Release] {
        lamp.dispatch(ev.into(), &mut hw, &mut sink);
    }
    assert!(lamp.state().manual_mode);

    lamp.dispatch(InputEvent::Press.into(), &mut hw, &mut sink);

    assert!(!lamp.state().manual_mode);
    assert!(!hw.aux_on());
}

// ── Sensor ───────────────────────────────────────────────────

#[test]
fn sensor_tick_updates_lux_and_reports_telemetry() {
    let (mut lamp, mut hw, mut sink) = make_lamp();
    hw.draws.push_back(377);
    let desired = lamp.state().desired_lux;

    lamp.dispatch(LampEvent::SensorTick, &mut hw, &mut sink);

    assert_eq!(lamp.state().current_lux, 377);
    assert_eq!(lamp.state().desired_lux, desired);
    match sink.events.last() {
        Some(AppEvent::Telemetry(t)) => {
            assert_eq!(t.lux, 377);
            assert_eq!(t.threshold, 50);
            assert_eq!(t.presence, Presence::Present);
        }
        other => panic!("expected telemetry, got {:?}", other),
    }
}

// ── Presence ─────────────────────────────────────────────────

#[test]
fn departure_darkens_lamp_and_return_restores_threshold() {
    let (mut lamp, _, mut sink) = make_lamp();
    let mut hw = MockHardware::with_coins(&[true]);
    lamp.dispatch(suggestion("35"), &mut hw, &mut sink);
    assert_eq!(lamp.state().current_brightness, 35);

    lamp.dispatch(LampEvent::Presence(PresenceTimer::Check), &mut hw, &mut sink);

    assert_eq!(lamp.presence(), Presence::Absent);
    assert_eq!(lamp.state().threshold, 0);
    assert_eq!(lamp.state().current_brightness, 0);
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::Off));
    assert_eq!(
        lamp.next_presence_timer(),
        (PresenceTimer::Return, Duration::from_secs(5))
    );
    assert!(lamp.negotiation_request().is_none());

    lamp.dispatch(LampEvent::Presence(PresenceTimer::Return), &mut hw, &mut sink);

    assert_eq!(lamp.presence(), Presence::Present);
    assert_eq!(lamp.state().threshold, 50);
    assert_eq!(lamp.state().desired_lux, 500 + lamp.state().current_lux);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PresenceChanged(_))),
        2
    );
}

#[test]
fn stay_decision_keeps_check_timer() {
    let (mut lamp, _, mut sink) = make_lamp();
    let mut hw = MockHardware::with_coins(&[false]);

    lamp.dispatch(LampEvent::Presence(PresenceTimer::Check), &mut hw, &mut sink);

    assert_eq!(lamp.presence(), Presence::Present);
    assert_eq!(lamp.next_presence_timer().0, PresenceTimer::Check);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PresenceChanged(_))),
        0
    );
}

// ── Negotiation ──────────────────────────────────────────────

#[test]
fn negotiation_request_carries_lux_pair() {
    let (lamp, _, _) = make_lamp();
    let req = lamp.negotiation_request().unwrap();
    assert_eq!(req.lux, 400);
    assert_eq!(req.desired_lux, 400, "boot value until the first gesture");
}

#[test]
fn suggestion_outside_scale_is_clamped() {
    let (mut lamp, mut hw, mut sink) = make_lamp();

    lamp.dispatch(suggestion("130"), &mut hw, &mut sink);
    assert_eq!(lamp.state().current_brightness, 100);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::BrightnessApplied {
            suggested: 130,
            applied: 100
        })
    );

    lamp.dispatch(suggestion("-7"), &mut hw, &mut sink);
    assert_eq!(lamp.state().current_brightness, 0);
}

#[test]
fn timeout_keeps_last_brightness() {
    let (mut lamp, mut hw, mut sink) = make_lamp();
    lamp.dispatch(suggestion("42"), &mut hw, &mut sink);

    lamp.dispatch(LampEvent::Negotiated(CallOutcome::Timeout), &mut hw, &mut sink);

    assert_eq!(lamp.state().current_brightness, 42);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::NegotiationFailed(Error::Comms(CommsError::Timeout)))
    );
}

#[test]
fn non_numeric_suggestion_is_malformed() {
    let (mut lamp, mut hw, mut sink) = make_lamp();
    lamp.dispatch(suggestion("42"), &mut hw, &mut sink);

    lamp.dispatch(suggestion("bright"), &mut hw, &mut sink);

    assert_eq!(lamp.state().current_brightness, 42);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::NegotiationFailed(Error::Protocol(
            ProtocolError::NotNumeric
        )))
    );
}

#[test]
fn late_response_after_switch_off_leaves_lamp_dark() {
    let (mut lamp, mut hw, mut sink) = make_lamp();
    assert_eq!(
        lamp.handle_request(&put_brightness("0"), &mut hw, &mut sink).code,
        Code::Changed
    );

    lamp.dispatch(suggestion("64"), &mut hw, &mut sink);

    assert_eq!(lamp.state().current_brightness, 0);
}

// ── Resources ────────────────────────────────────────────────

#[test]
fn actuation_sets_threshold_and_brightness() {
    let (mut lamp, mut hw, mut sink) = make_lamp();

    let resp = lamp.handle_request(&put_brightness("80"), &mut hw, &mut sink);

    assert_eq!(resp.code, Code::Changed);
    assert_eq!(lamp.state().threshold, 80);
    assert_eq!(lamp.state().current_brightness, 80);
    assert_eq!(lamp.state().desired_lux, 800 + 400);
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::RedBlue));
    assert!(sink.events.contains(&AppEvent::ActuationAccepted(80)));
}

#[test]
fn actuation_while_absent_applies_on_return() {
    let (mut lamp, _, mut sink) = make_lamp();
    let mut hw = MockHardware::with_coins(&[true]);
    lamp.dispatch(LampEvent::Presence(PresenceTimer::Check), &mut hw, &mut sink);

    let resp = lamp.handle_request(&put_brightness("20"), &mut hw, &mut sink);

    assert_eq!(resp.code, Code::Changed);
    assert_eq!(lamp.state().threshold, 0, "lamp stays dark while absent");
    assert_eq!(lamp.state().saved_threshold, 20);

    lamp.dispatch(LampEvent::Presence(PresenceTimer::Return), &mut hw, &mut sink);
    assert_eq!(lamp.state().threshold, 20);
}

#[test]
fn gesture_while_absent_applies_on_return() {
    let (mut lamp, _, mut sink) = make_lamp();
    let mut hw = MockHardware::with_coins(&[true]);
    lamp.dispatch(LampEvent::Presence(PresenceTimer::Check), &mut hw, &mut sink);
    let desired_lux = lamp.state().desired_lux;

    lamp.dispatch(InputEvent::Press.into(), &mut hw, &mut sink);
    lamp.dispatch(InputEvent::HoldTick.into(), &mut hw, &mut sink);
    lamp.dispatch(InputEvent::HoldTick.into(), &mut hw, &mut sink);
    lamp.dispatch(InputEvent::Release.into(), &mut hw, &mut sink);

    assert_eq!(lamp.state().threshold, 0, "lamp stays dark while absent");
    assert_eq!(lamp.state().saved_threshold, 60);
    assert_eq!(lamp.state().desired_lux, desired_lux);
    assert!(lamp.negotiation_request().is_none());

    lamp.dispatch(LampEvent::Presence(PresenceTimer::Return), &mut hw, &mut sink);
    assert_eq!(lamp.state().threshold, 60);
    assert_eq!(lamp.state().desired_lux, 600 + lamp.state().current_lux);
}

#[test]
fn empty_actuation_body_is_bad_request() {
    let (mut lamp, mut hw, mut sink) = make_lamp();

    let resp = lamp.handle_request(&put_brightness(""), &mut hw, &mut sink);

    assert_eq!(resp.code, Code::BadRequest);
    assert_eq!(lamp.state().threshold, 50);
    assert!(sink.events.contains(&AppEvent::ActuationRejected));
}

#[test]
fn status_resource_reports_json() {
    let (mut lamp, mut hw, mut sink) = make_lamp();
    lamp.dispatch(suggestion("30"), &mut hw, &mut sink);

    let req = Request::new(Method::Get, STATUS_PATH).unwrap();
    let resp = lamp.handle_request(&req, &mut hw, &mut sink);

    assert_eq!(resp.code, Code::Content);
    assert_eq!(resp.format, Some(ContentFormat::Json));
    let report: StatusReport = serde_json::from_str(&resp.payload).unwrap();
    assert_eq!(
        report,
        StatusReport {
            lux_perceived: 400,
            lux_desired: 400,
            brightness_percent: 30,
        }
    );
}

#[test]
fn unknown_path_and_wrong_method() {
    let (mut lamp, mut hw, mut sink) = make_lamp();

    let missing = Request::new(Method::Get, "actuators/colour").unwrap();
    assert_eq!(
        lamp.handle_request(&missing, &mut hw, &mut sink).code,
        Code::NotFound
    );

    let delete = Request::new(Method::Delete, BRIGHTNESS_PATH).unwrap();
    assert_eq!(
        lamp.handle_request(&delete, &mut hw, &mut sink).code,
        Code::MethodNotAllowed
    );
}
