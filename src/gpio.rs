mod pin;
mod raspberry;
mod source;

pub use pin::*;
pub use raspberry::*;
pub use source::*;
