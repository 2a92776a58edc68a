mod controller;
mod idle_timer;
mod monitor;
mod state;

pub use controller::*;
pub use idle_timer::*;
pub use monitor::*;
pub use state::*;
