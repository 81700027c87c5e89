pub mod error;
pub mod loose;
pub mod types;

pub use error::*;
pub use types::*;
