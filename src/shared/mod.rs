pub mod error;
pub mod fs;
pub mod logging;
pub mod result;

pub use result::Result;
