//! UDP datagram transport.
//!
//! [`UdpRpcClient`] implements [`RpcClient`]: one request datagram out,
//! then wait for the datagram from the same peer echoing our message id.
//! [`UdpServer`] receives requests on the node's listening port and
//! answers each one from a handler closure.
//!
//! Both sit on `async-io-mini`'s reactor, so a task waiting on the
//! socket yields to the rest of the node's executor.

use core::cell::Cell;
use core::net::SocketAddr;
use core::time::Duration;
use std::net::UdpSocket;

use async_io_mini::{Async, Timer};
use log::{debug, info, warn};

use crate::error::{CommsError, Error};
use crate::rpc::codec::{self, MAX_DATAGRAM};
use crate::rpc::protocol::{Code, Request, Response};
use crate::rpc::transport::RpcClient;

/// Pause after a socket error before receiving again.
const RECEIVE_RETRY: Duration = Duration::from_millis(100);

// ── Client ───────────────────────────────────────────────────

pub struct UdpRpcClient {
    socket: Async<UdpSocket>,
    next_mid: Cell<u16>,
}

impl UdpRpcClient {
    /// Bind an ephemeral local port.
    pub fn bind(local: SocketAddr) -> Result<Self, Error> {
        let socket = Async::<UdpSocket>::bind(local).map_err(|_| Error::Init("udp client bind"))?;
        Ok(Self {
            socket,
            next_mid: Cell::new(1),
        })
    }

    fn take_mid(&self) -> u16 {
        let mid = self.next_mid.get();
        self.next_mid.set(mid.wrapping_add(1));
        mid
    }
}

fn same_peer(a: SocketAddr, b: SocketAddr) -> bool {
    // Scope id and flow info differ between what we dial and what the
    // stack reports for link-local peers.
    a.ip() == b.ip() && a.port() == b.port()
}

impl RpcClient for UdpRpcClient {
    async fn call(&self, endpoint: SocketAddr, req: &Request) -> Result<Response, CommsError> {
        let mid = self.take_mid();
        let frame = codec::encode_request(mid, req).map_err(|_| CommsError::RequestTooLarge)?;

        self.socket
            .send_to(frame.as_bytes(), endpoint)
            .await
            .map_err(|_| CommsError::SendFailed)?;

        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let (n, from) = self
                .socket
                .recv_from(&mut buf)
                .await
                .map_err(|_| CommsError::ReceiveFailed)?;
            if !same_peer(from, endpoint) {
                debug!("UDP: ignoring datagram from {}", from);
                continue;
            }
            match codec::decode_response(&buf[..n]) {
                Ok((got, resp)) if got == mid => return Ok(resp),
                Ok((got, _)) => debug!("UDP: stale answer mid={} (want {})", got, mid),
                Err(e) => warn!("UDP: undecodable answer from {}: {}", from, e),
            }
        }
    }
}

// ── Server ───────────────────────────────────────────────────

pub struct UdpServer {
    socket: Async<UdpSocket>,
}

impl UdpServer {
    pub fn bind(local: SocketAddr) -> Result<Self, Error> {
        let socket = Async::<UdpSocket>::bind(local).map_err(|_| Error::Init("udp server bind"))?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.socket
            .get_ref()
            .local_addr()
            .map_err(|_| Error::Init("udp local address"))
    }

    /// Serve requests forever.
    ///
    /// A request that does not decode is answered with
    /// [`Code::for_rejection`] when its message id can still be read, and
    /// dropped otherwise.  `handler` runs synchronously between two awaits.
    pub async fn serve<H>(&self, mut handler: H)
    where
        H: FnMut(&Request) -> Response,
    {
        if let Ok(addr) = self.local_addr() {
            info!("UDP: listening on {}", addr);
        }

        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let (n, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(x) => x,
                Err(e) => {
                    warn!("UDP: receive failed: {}", e);
                    Timer::after(RECEIVE_RETRY).await;
                    continue;
                }
            };

            let (mid, req) = match codec::decode_request(&buf[..n]) {
                Ok(x) => x,
                Err(e) => {
                    match codec::request_mid(&buf[..n]) {
                        Some(mid) => {
                            warn!("UDP: rejecting bad request from {}: {}", peer, e);
                            self.reply(peer, mid, &Response::empty(Code::for_rejection(e))).await;
                        }
                        None => warn!("UDP: dropping bad request from {}: {}", peer, e),
                    }
                    continue;
                }
            };
            debug!("UDP: {} {} from {}", req.method, req.path, peer);

            let resp = handler(&req);
            self.reply(peer, mid, &resp).await;
        }
    }

    async fn reply(&self, peer: SocketAddr, mid: u16, resp: &Response) {
        match codec::encode_response(mid, resp) {
            Ok(frame) => {
                if let Err(e) = self.socket.send_to(frame.as_bytes(), peer).await {
                    warn!("UDP: reply to {} failed: {}", peer, e);
                }
            }
            Err(e) => warn!("UDP: cannot encode reply: {}", e),
        }
    }
}
