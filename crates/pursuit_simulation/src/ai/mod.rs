//! Pursuit AI module
//!
//! Один параметризованный FSM (Patrolling / Chasing / Searching / SpecialBehavior)
//! вместо пачки почти одинаковых enemy скриптов. Варианты врагов — данные
//! (`PursuitConfig` + capability секции), не отдельные классы.

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod config;
pub mod events;
pub mod perception;
pub mod ports;
pub mod systems;

#[cfg(test)]
mod config_tests;

// Re-export основных типов
pub use brain::{PursuitController, TickInput, TransitionHook};
pub use components::{Memory, PatrolRoute, PursuitBrain, PursuitState, PursuitTransition, SearchHistory};
pub use config::{
    ConfigError, DeviationKind, ElevationConfig, HearingConfig, PursuitConfig, PursuitProfile,
    SpecialBehaviorConfig, WanderConfig,
};
pub use events::{NoiseEvent, PursuitTransitionEvent};
pub use perception::{evaluate_perception, AgentPose, PerceptionResult};
pub use ports::{HitTag, Locomotion, ObstructionFilter, OpenSight, RayHit, SightQuery, TargetSource};

/// SystemSet всего pursuit tick'а (hearing → FSM → steering)
///
/// Системы, двигающие цель, ставятся `.before(PursuitSystems)` — иначе
/// порядок относительно perception не определён.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PursuitSystems;

/// Pursuit Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. ai_hearing — шум переводит агентов в Searching
/// 2. ai_pursuit_tick — perception + FSM → NavAgent команды
/// 3. steer_nav_agents — headless navigation двигает Transform
pub struct PursuitPlugin;

impl Plugin for PursuitPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NoiseEvent>()
            .add_event::<PursuitTransitionEvent>()
            .register_type::<PursuitConfig>()
            .register_type::<crate::components::NavAgent>()
            .register_type::<crate::components::Obstruction>()
            .register_type::<crate::components::PursuitTarget>()
            .add_systems(
                FixedUpdate,
                (
                    systems::ai_hearing,
                    systems::ai_pursuit_tick,
                    crate::physics::steer_nav_agents,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(PursuitSystems),
            );
    }
}
