//! Integration tests for the prediction node: the `autobright` resource
//! backed by the linear oracle, and broadcast delivery to scripted lamps.

use core::net::{Ipv6Addr, SocketAddr};
use core::time::Duration;

use futures_lite::future;
use smartlamp::adapters::oracle::LinearOracle;
use smartlamp::app::events::AppEvent;
use smartlamp::app::predictor::{BroadcastDispatcher, PredictorService, broadcast};
use smartlamp::config::PredictorConfig;
use smartlamp::drivers::indicator::IndicatorPattern;
use smartlamp::error::CommsError;
use smartlamp::rpc::protocol::{
    AUTOBRIGHT_PATH, BRIGHTNESS_PATH, Code, Method, PredictionRequest, Request, Response,
};

use crate::mock_hw::{MockClient, MockHardware, RecordingSink, Reply};

const TIMEOUT: Duration = Duration::from_millis(50);

fn lamp(n: u16) -> SocketAddr {
    SocketAddr::from((Ipv6Addr::LOCALHOST, 6000 + n))
}

fn make_predictor() -> (PredictorService<LinearOracle>, MockHardware, RecordingSink) {
    let config = PredictorConfig::default();
    (
        PredictorService::new(LinearOracle::from_config(&config)),
        MockHardware::new(),
        RecordingSink::new(),
    )
}

fn autobright(query: &str) -> Request {
    Request::new(Method::Get, AUTOBRIGHT_PATH)
        .unwrap()
        .with_query(query)
        .unwrap()
}

// ── autobright ───────────────────────────────────────────────

#[test]
fn default_oracle_answers_lamp_headroom() {
    let (mut svc, mut hw, mut sink) = make_predictor();

    let resp = svc.handle_request(&autobright("lux=400&des_lux=900"), &mut hw, &mut sink);

    assert_eq!(resp.code, Code::Content);
    assert_eq!(resp.payload.as_str(), "50");
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::Blue));
    assert_eq!(
        sink.events,
        vec![AppEvent::Suggested {
            lux: 400,
            desired_lux: 900,
            brightness: 50
        }]
    );
}

#[test]
fn lamp_request_round_trips_through_resource() {
    let (mut svc, mut hw, mut sink) = make_predictor();
    let req = PredictionRequest {
        lux: 380,
        desired_lux: 580,
    }
    .to_request()
    .unwrap();

    let resp = svc.handle_request(&req, &mut hw, &mut sink);

    assert_eq!(resp.payload.as_str(), "20");
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::Green));
}

#[test]
fn garbage_query_fields_become_zero() {
    let (mut svc, mut hw, mut sink) = make_predictor();

    let resp = svc.handle_request(&autobright("lux=dim&des_lux="), &mut hw, &mut sink);
    assert_eq!(resp.code, Code::Content);
    assert_eq!(resp.payload.as_str(), "0");

    let resp = svc.handle_request(&autobright(""), &mut hw, &mut sink);
    assert_eq!(resp.payload.as_str(), "0");
    assert_eq!(hw.last_pattern(), Some(IndicatorPattern::Off));
}

#[test]
fn predictor_routes_only_autobright() {
    let (mut svc, mut hw, mut sink) = make_predictor();

    let put = Request::new(Method::Put, AUTOBRIGHT_PATH).unwrap();
    assert_eq!(
        svc.handle_request(&put, &mut hw, &mut sink).code,
        Code::MethodNotAllowed
    );

    let other = Request::new(Method::Get, BRIGHTNESS_PATH).unwrap();
    assert_eq!(
        svc.handle_request(&other, &mut hw, &mut sink).code,
        Code::NotFound
    );
    assert!(sink.events.is_empty());
}

// ── Broadcast ────────────────────────────────────────────────

#[test]
fn silent_lamp_does_not_block_the_next_one() {
    let client = MockClient::new()
        .reply(lamp(1), Reply::Silent)
        .reply(lamp(2), Reply::Answer(Response::empty(Code::Changed)));
    let dispatcher = BroadcastDispatcher::new(20);

    let report = future::block_on(broadcast(
        &client,
        &[lamp(1), lamp(2)],
        dispatcher.next_command(),
        TIMEOUT,
    ));

    assert_eq!(report.attempted, 2);
    assert_eq!(report.delivered, 1);
    let sent = client.take_sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].0, lamp(2));
    assert_eq!(sent[1].1.method, Method::Put);
    assert_eq!(sent[1].1.payload.as_str(), "0");
}

#[test]
fn failed_round_still_toggles() {
    let client = MockClient::new()
        .reply(lamp(1), Reply::Fail(CommsError::SendFailed))
        .reply(lamp(2), Reply::Answer(Response::empty(Code::BadRequest)));
    let mut dispatcher = BroadcastDispatcher::new(20);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    dispatcher.start(&mut hw);
    assert!(hw.aux_on());

    let report = future::block_on(broadcast(
        &client,
        &[lamp(1), lamp(2)],
        dispatcher.next_command(),
        TIMEOUT,
    ));
    dispatcher.complete(report, &mut hw, &mut sink);

    assert_eq!(report.delivered, 0);
    assert!(dispatcher.all_off());
    assert!(!hw.aux_on());
    assert_eq!(dispatcher.next_command().brightness, 20);
    assert_eq!(
        sink.events,
        vec![AppEvent::BroadcastCompleted {
            brightness: 0,
            delivered: 0,
            attempted: 2,
            all_off: true,
        }]
    );
}
