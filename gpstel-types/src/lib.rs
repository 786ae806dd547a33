pub mod error;
pub mod fourcc;
pub mod record;
pub mod sample;
pub mod window;

pub use error::*;
pub use fourcc::*;
pub use record::*;
pub use sample::*;
pub use window::*;
