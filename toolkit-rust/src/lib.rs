//! # P2P Toolkit
//!
//! The P2P Toolkit is a Rust library that provides a trait to define an
//! Endpoint. An Endpoint is a stateless service that is invoked over HTTP with
//! a `GET` request and answers with JSON. The Toolkit automatically generates
//! the necessary routes for the Endpoint, including the CORS preflight and a
//! health check.

mod endpoint;
mod failure;
mod runtime;

pub use {
    anyhow::Result as AnyResult,
    endpoint::Endpoint,
    failure::Failure,
    runtime::{routes_for_, QueryParams, ALLOWED_HEADERS, ALLOWED_METHODS},
    warp::{self, http::StatusCode},
};
