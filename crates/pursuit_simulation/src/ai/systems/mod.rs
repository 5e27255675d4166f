//! AI systems (strategic layer logic)

pub mod hearing;
pub mod pursuit;

// Re-export all systems
pub use hearing::*;
pub use pursuit::*;
