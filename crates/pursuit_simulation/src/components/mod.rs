//! ECS Components для pursuit симуляции
//!
//! Организация по доменам:
//! - movement: locomotion адаптер (NavAgent — destination + speed для navigation)
//! - world: геометрия и цель (Obstruction, PursuitTarget)
//! - ai: pursuit AI (PursuitBrain, PursuitConfig, PursuitState)

pub mod ai;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use ai::*;
pub use movement::*;
pub use world::*;
