//! Lamp node runtime.
//!
//! Five logical tasks share one [`LampNode`]:
//!
//! | Task        | Wakes on                      | Dispatches             |
//! |-------------|-------------------------------|------------------------|
//! | sampler     | sensor period                 | `SensorTick`           |
//! | presence    | check / return timer          | `Presence(timer)`      |
//! | negotiator  | negotiation period            | `Negotiated(outcome)`  |
//! | input       | classified button event       | `Input(event)`         |
//! | server      | inbound datagram              | `handle_request`       |

use core::cell::RefCell;
use core::future::Future;
use core::net::SocketAddr;
use core::time::Duration;
use std::rc::Rc;

use async_io_mini::Timer;
use edge_executor::LocalExecutor;
use log::{info, warn};

use super::{InputChannel, MAX_TASKS, millis};
use crate::adapters::udp::UdpServer;
use crate::app::lamp::LampService;
use crate::app::ports::{EventSink, IndicatorPort, RandomPort};
use crate::config::LampConfig;
use crate::error::Error;
use crate::events::LampEvent;
use crate::rpc::protocol::{Request, Response};
use crate::rpc::transport::{RpcClient, call_with_timeout};

/// Everything the lamp's tasks share: the service plus its ports.
pub struct LampNode<H, S> {
    pub service: LampService,
    pub hw: H,
    pub sink: S,
}

pub type SharedLamp<H, S> = Rc<RefCell<LampNode<H, S>>>;

impl<H, S> LampNode<H, S>
where
    H: IndicatorPort + RandomPort,
    S: EventSink,
{
    pub fn new(config: &LampConfig, hw: H, sink: S) -> Self {
        let mut node = Self {
            service: LampService::new(config),
            hw,
            sink,
        };
        node.service.start(&mut node.hw, &mut node.sink);
        node
    }

    pub fn dispatch(&mut self, event: LampEvent) {
        self.service.dispatch(event, &mut self.hw, &mut self.sink);
    }

    pub fn handle_request(&mut self, req: &Request) -> Response {
        self.service.handle_request(req, &mut self.hw, &mut self.sink)
    }
}

// ── Tasks ────────────────────────────────────────────────────

async fn sampler_loop<H, S>(node: SharedLamp<H, S>, period: Duration)
where
    H: IndicatorPort + RandomPort,
    S: EventSink,
{
    loop {
        Timer::after(period).await;
        node.borrow_mut().dispatch(LampEvent::SensorTick);
    }
}

async fn presence_loop<H, S>(node: SharedLamp<H, S>)
where
    H: IndicatorPort + RandomPort,
    S: EventSink,
{
    loop {
        let (timer, period) = node.borrow().service.next_presence_timer();
        Timer::after(period).await;
        node.borrow_mut().dispatch(LampEvent::Presence(timer));
    }
}

/// Run one negotiation round.  Returns `false` when the lamp is off and
/// no request was sent.
pub async fn negotiate_once<H, S, C>(
    node: &SharedLamp<H, S>,
    client: &C,
    predictor: SocketAddr,
    timeout: Duration,
) -> bool
where
    H: IndicatorPort + RandomPort,
    S: EventSink,
    C: RpcClient,
{
    let Some(request) = node.borrow().service.negotiation_request() else {
        return false;
    };
    let req = match request.to_request() {
        Ok(req) => req,
        Err(e) => {
            warn!("Negotiation: cannot build request: {}", e);
            return false;
        }
    };

    let outcome = call_with_timeout(client, predictor, &req, timeout).await;
    node.borrow_mut().dispatch(LampEvent::Negotiated(outcome));
    true
}

async fn negotiation_loop<H, S, C>(
    node: SharedLamp<H, S>,
    client: &C,
    predictor: SocketAddr,
    period: Duration,
    timeout: Duration,
) where
    H: IndicatorPort + RandomPort,
    S: EventSink,
    C: RpcClient,
{
    loop {
        Timer::after(period).await;
        negotiate_once(&node, client, predictor, timeout).await;
    }
}

async fn input_loop<H, S>(node: SharedLamp<H, S>, inputs: &InputChannel)
where
    H: IndicatorPort + RandomPort,
    S: EventSink,
{
    loop {
        let event = inputs.receive().await;
        node.borrow_mut().dispatch(LampEvent::Input(event));
    }
}

async fn server_loop<H, S>(node: SharedLamp<H, S>, server: &UdpServer)
where
    H: IndicatorPort + RandomPort,
    S: EventSink,
{
    server
        .serve(|req| node.borrow_mut().handle_request(req))
        .await;
}

// ── Entry point ──────────────────────────────────────────────

/// Run the lamp node forever on the calling thread.
///
/// `inputs` is fed by `button`, which runs on the same executor (the
/// [`button_loop`](super::button_loop) task on the device).
pub fn run<'a, H, S, C>(
    config: &LampConfig,
    node: SharedLamp<H, S>,
    client: &'a C,
    server: &'a UdpServer,
    inputs: &'a InputChannel,
    button: impl Future<Output = ()> + 'a,
) -> Result<(), Error>
where
    H: IndicatorPort + RandomPort + 'a,
    S: EventSink + 'a,
    C: RpcClient,
{
    let predictor = config.predictor_addr()?;
    let executor: LocalExecutor<'a, MAX_TASKS> = LocalExecutor::new();

    executor
        .spawn(sampler_loop(node.clone(), millis(config.sensor_interval_ms)))
        .detach();
    executor.spawn(presence_loop(node.clone())).detach();
    executor
        .spawn(negotiation_loop(
            node.clone(),
            client,
            predictor,
            millis(config.negotiation_interval_ms),
            millis(config.negotiation_timeout_ms),
        ))
        .detach();
    executor.spawn(input_loop(node.clone(), inputs)).detach();
    executor.spawn(server_loop(node, server)).detach();
    executor.spawn(button).detach();

    info!(
        "Lamp node running: predictor={} sensor={}ms negotiate={}ms",
        predictor, config.sensor_interval_ms, config.negotiation_interval_ms
    );

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
