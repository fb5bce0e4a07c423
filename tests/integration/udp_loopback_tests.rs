//! UDP transport over the loopback interface: a real `UdpServer` and
//! `UdpRpcClient` pair, driven on the test thread with `block_on`.

use core::net::{Ipv4Addr, SocketAddr};
use core::time::Duration;
use std::net::UdpSocket;

use async_io_mini::{Async, Timer};
use futures_lite::future;
use smartlamp::adapters::oracle::LinearOracle;
use smartlamp::adapters::udp::{UdpRpcClient, UdpServer};
use smartlamp::app::lamp::LampService;
use smartlamp::app::predictor::PredictorService;
use smartlamp::config::LampConfig;
use smartlamp::rpc::protocol::{
    Code, CommandMessage, PredictionRequest, PredictionResponse, Request, Response,
};
use smartlamp::rpc::transport::{CallOutcome, call_with_timeout};

use crate::mock_hw::{MockHardware, RecordingSink};

const TIMEOUT: Duration = Duration::from_millis(500);

fn any_local() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
}

/// Serve with `handler` until the single call to the server resolves.
fn exchange<H>(server: &UdpServer, handler: H, req: &Request) -> CallOutcome
where
    H: FnMut(&Request) -> Response,
{
    let client = UdpRpcClient::bind(any_local()).unwrap();
    let target = server.local_addr().unwrap();

    future::block_on(future::or(
        async {
            server.serve(handler).await;
            CallOutcome::Timeout
        },
        call_with_timeout(&client, target, req, TIMEOUT),
    ))
}

/// Send `frame` as-is and return the server's answer, if one arrives.
fn raw_exchange<H>(server: &UdpServer, handler: H, frame: &[u8]) -> Option<String>
where
    H: FnMut(&Request) -> Response,
{
    let peer = Async::<UdpSocket>::bind(any_local()).unwrap();
    let target = server.local_addr().unwrap();
    let mut buf = [0u8; 512];

    future::block_on(future::or(
        async {
            server.serve(handler).await;
            None
        },
        async {
            peer.send_to(frame, target).await.unwrap();
            future::or(
                async {
                    let (n, _) = peer.recv_from(&mut buf).await.unwrap();
                    Some(String::from_utf8_lossy(&buf[..n]).into_owned())
                },
                async {
                    Timer::after(TIMEOUT).await;
                    None
                },
            )
            .await
        },
    ))
}

fn lamp_reply(frame: &[u8]) -> Option<String> {
    let server = UdpServer::bind(any_local()).unwrap();
    let mut lamp = LampService::new(&LampConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    raw_exchange(&server, |r| lamp.handle_request(r, &mut hw, &mut sink), frame)
}

#[test]
fn autobright_over_udp() {
    let server = UdpServer::bind(any_local()).unwrap();
    let mut svc = PredictorService::new(LinearOracle::new(-0.1, 0.1, 0.0));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let req = PredictionRequest {
        lux: 400,
        desired_lux: 900,
    }
    .to_request()
    .unwrap();

    let outcome = exchange(
        &server,
        |r| svc.handle_request(r, &mut hw, &mut sink),
        &req,
    );

    let resp = match outcome {
        CallOutcome::Success(resp) => resp,
        other => panic!("expected an answer, got {:?}", other),
    };
    assert_eq!(
        PredictionResponse::from_response(&resp).unwrap().brightness_percent,
        50
    );
}

#[test]
fn brightness_command_over_udp() {
    let server = UdpServer::bind(any_local()).unwrap();
    let mut lamp = LampService::new(&LampConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let req = CommandMessage { brightness: 0 }.to_request().unwrap();

    let outcome = exchange(
        &server,
        |r| lamp.handle_request(r, &mut hw, &mut sink),
        &req,
    );

    match outcome {
        CallOutcome::Success(resp) => assert_eq!(resp.code, Code::Changed),
        other => panic!("expected an answer, got {:?}", other),
    }
    assert_eq!(lamp.state().threshold, 0);
}

#[test]
fn nobody_listening_times_out() {
    // Bound but never served: the request is swallowed.
    let server = UdpServer::bind(any_local()).unwrap();
    let client = UdpRpcClient::bind(any_local()).unwrap();
    let req = CommandMessage { brightness: 20 }.to_request().unwrap();

    let outcome = future::block_on(call_with_timeout(
        &client,
        server.local_addr().unwrap(),
        &req,
        Duration::from_millis(50),
    ));

    assert_eq!(outcome, CallOutcome::Timeout);
}

#[test]
fn out_of_range_command_answered_bad_request() {
    assert_eq!(
        lamp_reply(b"PUT 9 actuators/brightness\n150").as_deref(),
        Some("9 4.00 -\n")
    );
}

#[test]
fn oversized_payload_answered_bad_request() {
    let mut frame = b"PUT 9 actuators/brightness\n".to_vec();
    frame.extend(std::iter::repeat_n(b'1', 200));
    assert_eq!(lamp_reply(&frame).as_deref(), Some("9 4.00 -\n"));
}

#[test]
fn unknown_method_answered_method_not_allowed() {
    assert_eq!(
        lamp_reply(b"FETCH 11 status\n").as_deref(),
        Some("11 4.05 -\n")
    );
}

#[test]
fn frame_without_mid_gets_no_answer() {
    assert_eq!(lamp_reply(b"GET status\n"), None);
}

#[test]
fn oversized_lux_reads_as_zero() {
    let server = UdpServer::bind(any_local()).unwrap();
    let mut svc = PredictorService::new(LinearOracle::new(-0.1, 0.1, 0.0));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let frame = format!("GET 9 autobright?lux={}&des_lux=900\n", "4".repeat(70));

    let reply = raw_exchange(
        &server,
        |r| svc.handle_request(r, &mut hw, &mut sink),
        frame.as_bytes(),
    );

    assert_eq!(reply.as_deref(), Some("9 2.05 text/plain\n90"));
}
