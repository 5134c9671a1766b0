//! Core types, validation, and error taxonomy for the recommendation engine.

pub mod error;
pub mod events;
pub mod limits;
pub mod recommendation;
pub mod session;

pub use error::{Error, Result};
pub use events::*;
pub use recommendation::*;
pub use session::*;
