//! Request handlers.

pub mod clips;
pub mod health;
pub mod upload;

pub use clips::*;
pub use health::*;
pub use upload::*;
