// Tab suspender services
// Services hold the suspension logic: placeholder codec, policy, settings, transitions and the sweep timer.

pub mod context_menu;
pub mod placeholder;
pub mod policy_evaluator;
pub mod settings_engine;
pub mod suspend_executor;
pub mod suspension_scheduler;
