//! Request handlers.

pub mod access;
pub mod feedback;
pub mod games;
pub mod health;

pub use access::*;
pub use feedback::*;
pub use games::*;
pub use health::*;
