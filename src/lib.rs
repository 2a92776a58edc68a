pub mod actuator;
pub mod clock;
pub mod display;
pub mod error;
pub mod gpio;
pub mod logging;
pub mod mock;
pub mod scan;
pub mod shutdown;
