//! GreenGuardian: environmental issue reporting.
//!
//! The server side lives in [`core`] and [`features`]; [`client`] holds the
//! HTTP client and view-models used by front ends.

pub mod client;
pub mod core;
pub mod features;
pub mod shared;
