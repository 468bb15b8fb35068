//! Derived-state rules. Every function here is a pure function of its inputs.

pub mod diet;
pub mod messages;
pub mod programs;
pub mod safety;
pub mod series;
pub mod tasks;
pub mod velocity;

pub use diet::diet_signals;
pub use programs::{ensure_active_program_consistent, set_active_program, set_program_enabled};
pub use safety::{safety_signals, SafetySignal};
pub use tasks::{today_tasks, toggle_manual_task, Task};
pub use velocity::{compute_velocity, Velocity, VelocityOptions, VelocityResult};
