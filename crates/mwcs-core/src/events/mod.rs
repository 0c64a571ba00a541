//! Preprocessing events and the observer seam.
//!
//! The scheduler reports its progress through an [`EventDispatcher`] that the
//! embedding application injects; with no handlers registered, emission is free.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::PreprocessEventHandler;
pub use types::*;
