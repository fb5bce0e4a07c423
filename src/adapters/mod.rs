//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                |
//! |------------|--------------------|----------------------------|
//! | `hardware` | IndicatorPort      | indicator LED driver       |
//! |            | RandomPort         | entropy source             |
//! | `rng`      | RandomPort         | `rand` generator           |
//! | `oracle`   | BrightnessOracle   | linear brightness model    |
//! | `log_sink` | EventSink          | Serial log output          |
//! | `udp`      | RpcClient          | UDP socket (async-io-mini) |
//! |            | request server     |                            |

pub mod hardware;
pub mod log_sink;
pub mod oracle;
pub mod rng;
pub mod udp;
