//! Exposure layer for the query engine
//!
//! An exposure consumes a transport-agnostic [`ServerHost`](super::host::ServerHost)
//! and turns it into a servable application. REST over HTTP is the only one.

pub mod rest;

pub use rest::RestExposure;
