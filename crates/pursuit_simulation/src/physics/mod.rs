//! Physics / navigation адаптеры (tactical layer в headless режиме)
//!
//! В игре эти port'ы реализует движок (raycast, NavMesh agent).
//! Для headless симуляции и тестов — простые реализации поверх ECS компонентов.

pub mod navigation;
pub mod sight;

// Re-export основных типов
pub use navigation::{steer_nav_agents, NavDriver};
pub use sight::WorldSight;
