//! # Desktop Bridge
//!
//! Native-host implementations of the bridge traits. Currently just
//! the reqwest-backed HTTP transport.

pub mod http;

pub use http::ReqwestHttpClient;
