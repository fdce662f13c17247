pub mod errors;
pub mod link;

pub use errors::*;
pub use link::*;
