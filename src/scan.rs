mod concurrent;
mod config;
mod result;
mod sequential;
mod single;

pub use concurrent::*;
pub use config::*;
pub use result::*;
pub use sequential::*;
pub use single::*;
