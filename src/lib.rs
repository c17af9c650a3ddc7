//! Offline sandbox for the Gatenet networking API.
//!
//! [`sandbox::MockNetworkFacade`] answers HTTP, DNS, geo, ping and service
//! identification calls from canned tables after a simulated delay, without
//! touching the network.

pub mod app;
pub mod cli;
pub mod demo;
pub mod discovery;
pub mod error;
pub mod output;
pub mod sandbox;

pub use error::{Result, SandboxError};
pub use sandbox::{MockNetworkFacade, NetworkFacade};
