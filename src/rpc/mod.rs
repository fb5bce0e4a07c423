//! Request/response messaging between nodes.
//!
//! Small text datagrams with CoAP-style methods, paths and status codes.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      RPC Stack                             │
//! │                                                            │
//! │  ┌───────────┐   ┌──────────┐   ┌───────────────────────┐  │
//! │  │ RpcClient │──▶│  Codec   │──▶│  UdpServer handler    │  │
//! │  │ (trait)   │   │ (framing)│   │  → Lamp/Predictor svc │  │
//! │  └───────────┘   └──────────┘   └───────────────────────┘  │
//! │       ▲                                    │               │
//! │       │              ┌─────────────────────┘               │
//! │       │              ▼                                     │
//! │  ┌───────────┐   ┌──────────┐                              │
//! │  │ Timeout   │◀──│ Protocol │   (typed message payloads)   │
//! │  │ race      │   │ messages │                              │
//! │  └───────────┘   └──────────┘                              │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod protocol;
pub mod transport;
