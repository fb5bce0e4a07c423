//! Prediction node runtime.
//!
//! Two logical tasks share one [`PredictorNode`]: the UDP server that
//! answers `autobright`, and the input task that turns each button press
//! into a sequential broadcast to the configured lamps.

use core::cell::RefCell;
use core::future::Future;
use core::net::SocketAddr;
use core::time::Duration;
use std::rc::Rc;

use edge_executor::LocalExecutor;
use heapless::Vec;
use log::info;

use super::{InputChannel, MAX_TASKS, millis};
use crate::adapters::udp::UdpServer;
use crate::app::ports::{BrightnessOracle, EventSink, IndicatorPort};
use crate::app::predictor::{BroadcastDispatcher, BroadcastReport, PredictorService, broadcast};
use crate::config::{MAX_LAMPS, PredictorConfig};
use crate::error::Error;
use crate::events::InputEvent;
use crate::rpc::protocol::{Request, Response};
use crate::rpc::transport::RpcClient;

pub struct PredictorNode<O, H, S> {
    pub service: PredictorService<O>,
    pub dispatcher: BroadcastDispatcher,
    pub hw: H,
    pub sink: S,
}

pub type SharedPredictor<O, H, S> = Rc<RefCell<PredictorNode<O, H, S>>>;

impl<O, H, S> PredictorNode<O, H, S>
where
    O: BrightnessOracle,
    H: IndicatorPort,
    S: EventSink,
{
    pub fn new(config: &PredictorConfig, oracle: O, mut hw: H, mut sink: S) -> Self {
        let dispatcher = BroadcastDispatcher::new(config.all_on_brightness);
        dispatcher.start(&mut hw);
        sink.emit(&crate::app::events::AppEvent::Started);
        Self {
            service: PredictorService::new(oracle),
            dispatcher,
            hw,
            sink,
        }
    }

    pub fn handle_request(&mut self, req: &Request) -> Response {
        self.service.handle_request(req, &mut self.hw, &mut self.sink)
    }

    pub fn complete_broadcast(&mut self, report: BroadcastReport) {
        self.dispatcher.complete(report, &mut self.hw, &mut self.sink);
    }
}

/// Handle one button press: send the current command to every lamp,
/// then flip the toggle.
pub async fn broadcast_once<O, H, S, C>(
    node: &SharedPredictor<O, H, S>,
    client: &C,
    lamps: &[SocketAddr],
    timeout: Duration,
) -> BroadcastReport
where
    O: BrightnessOracle,
    H: IndicatorPort,
    S: EventSink,
    C: RpcClient,
{
    let cmd = node.borrow().dispatcher.next_command();
    let report = broadcast(client, lamps, cmd, timeout).await;
    node.borrow_mut().complete_broadcast(report);
    report
}

async fn input_loop<O, H, S, C>(
    node: SharedPredictor<O, H, S>,
    client: &C,
    lamps: Vec<SocketAddr, MAX_LAMPS>,
    timeout: Duration,
    inputs: &InputChannel,
) where
    O: BrightnessOracle,
    H: IndicatorPort,
    S: EventSink,
    C: RpcClient,
{
    loop {
        // Only the press edge toggles; hold ticks and releases are ignored.
        if inputs.receive().await == InputEvent::Press {
            broadcast_once(&node, client, &lamps, timeout).await;
        }
    }
}

async fn server_loop<O, H, S>(node: SharedPredictor<O, H, S>, server: &UdpServer)
where
    O: BrightnessOracle,
    H: IndicatorPort,
    S: EventSink,
{
    server
        .serve(|req| node.borrow_mut().handle_request(req))
        .await;
}

/// Run the prediction node forever on the calling thread.
pub fn run<'a, O, H, S, C>(
    config: &PredictorConfig,
    node: SharedPredictor<O, H, S>,
    client: &'a C,
    server: &'a UdpServer,
    inputs: &'a InputChannel,
    button: impl Future<Output = ()> + 'a,
) -> Result<(), Error>
where
    O: BrightnessOracle + 'a,
    H: IndicatorPort + 'a,
    S: EventSink + 'a,
    C: RpcClient,
{
    let lamps = config.lamp_addrs()?;
    let executor: LocalExecutor<'a, MAX_TASKS> = LocalExecutor::new();

    info!("Prediction node running: {} lamps in broadcast set", lamps.len());

    executor
        .spawn(input_loop(
            node.clone(),
            client,
            lamps,
            millis(config.command_timeout_ms),
            inputs,
        ))
        .detach();
    executor.spawn(server_loop(node, server)).detach();
    executor.spawn(button).detach();

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
