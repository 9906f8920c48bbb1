// Tab suspender state managers
// Managers own mutable per-tab state: activity timestamps, suspension records, command bindings.

pub mod activity_tracker;
pub mod command_manager;
pub mod tab_registry;
