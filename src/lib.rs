//! Tab suspender: the decision engine and tab-state lifecycle behind a browser
//! extension that swaps idle tabs for a lightweight placeholder page.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
