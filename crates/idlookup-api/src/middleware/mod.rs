//! # HTTP Middleware
//!
//! Request ids and request tracing. The API key gate lives in
//! [`crate::auth`].

pub mod tracing_layer;
