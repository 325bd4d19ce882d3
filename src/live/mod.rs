pub mod commands;
pub mod controller;
pub mod loop_worker;
pub mod state;

pub use controller::LiveController;
pub use state::{LiveState, LiveStatus};
