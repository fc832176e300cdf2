//! HTTP front end for the service dispatcher.

pub mod api;
pub mod metrics;
pub mod state;
