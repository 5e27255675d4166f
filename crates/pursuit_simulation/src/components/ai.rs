//! AI компоненты: brain, config, state

// NOTE: живут в crate::ai module, здесь только re-export для единообразия
pub use crate::ai::{PursuitBrain, PursuitConfig, PursuitState};
