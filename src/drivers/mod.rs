//! Output line drivers and task helpers.

pub mod lines;
pub mod sim_line;
pub mod task_pin;
