//! RPC call primitive.
//!
//! A node talks to its peers through [`RpcClient`], one request and one
//! response per call.  Concrete implementations:
//! - UDP datagrams (`adapters::udp`)
//! - scripted in-memory clients in the tests
//!
//! Every outbound call goes through [`call_with_timeout`], which races
//! the call against a timer and folds the result into a [`CallOutcome`],
//! so a silent peer can never stall the caller's task.

use core::future::Future;
use core::net::SocketAddr;
use core::time::Duration;

use async_io_mini::Timer;
use futures_lite::future;

use super::protocol::{Request, Response};
use crate::error::CommsError;

/// Request/response channel to a peer node.
pub trait RpcClient {
    /// Send `req` to `endpoint` and wait for its response.
    /// May wait forever; callers bound it with [`call_with_timeout`].
    fn call(
        &self,
        endpoint: SocketAddr,
        req: &Request,
    ) -> impl Future<Output = Result<Response, CommsError>>;
}

/// How a bounded call resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(Response),
    Timeout,
    TransportError(CommsError),
}

/// Issue one call, giving up after `timeout`.
pub async fn call_with_timeout<C: RpcClient>(
    client: &C,
    endpoint: SocketAddr,
    req: &Request,
    timeout: Duration,
) -> CallOutcome {
    let call = async {
        match client.call(endpoint, req).await {
            Ok(resp) => CallOutcome::Success(resp),
            Err(CommsError::Timeout) => CallOutcome::Timeout,
            Err(e) => CallOutcome::TransportError(e),
        }
    };
    let deadline = async {
        Timer::after(timeout).await;
        CallOutcome::Timeout
    };
    future::or(call, deadline).await
}
