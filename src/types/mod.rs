// Tab suspender shared type definitions
// Each submodule defines types used across the engine, the host bridge and the message layer.

pub mod command;
pub mod errors;
pub mod event;
pub mod placeholder;
pub mod settings;
pub mod suspension;
pub mod tab;
