//! REDCap API integration
//!
//! This module provides the transport boundary for talking to a REDCap
//! server: the [`Requester`] trait abstracting authenticated POST access,
//! and [`HttpRequester`], the `reqwest`-backed implementation.

pub mod http;
pub mod traits;

pub use http::HttpRequester;
pub use traits::Requester;
