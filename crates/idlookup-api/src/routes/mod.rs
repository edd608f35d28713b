//! # API Route Modules
//!
//! Every route here sits behind the API key gate.

pub mod user;
