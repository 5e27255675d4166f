//! Pursuit systems: спавн агентов и FSM tick каждый FixedUpdate.

use bevy::prelude::*;

use crate::ai::brain::TickInput;
use crate::ai::events::PursuitTransitionEvent;
use crate::ai::perception::AgentPose;
use crate::ai::{PursuitBrain, PursuitConfig};
use crate::components::{NavAgent, Obstruction, PursuitTarget};
use crate::physics::{NavDriver, WorldSight};

/// Спавн агента: конфиг клампится, brain создаётся из него
pub fn spawn_pursuer(commands: &mut Commands, config: PursuitConfig, transform: Transform) -> Entity {
    let config = config.sanitized();
    let brain = PursuitBrain::new(&config);

    commands
        .spawn((transform, config, brain, NavAgent::default()))
        .id()
}

/// Система: pursuit FSM tick
///
/// Для каждого агента:
/// 1. Perception через WorldSight (Obstruction boxes) + единственный PursuitTarget
/// 2. Brain tick → команды в NavAgent
/// 3. Transitions → PursuitTransitionEvent
pub fn ai_pursuit_tick(
    mut agents: Query<(Entity, &Transform, &PursuitConfig, &mut PursuitBrain, &mut NavAgent)>,
    targets: Query<&Transform, With<PursuitTarget>>,
    obstructions: Query<(&Transform, &Obstruction)>,
    mut transitions: EventWriter<PursuitTransitionEvent>,
    mut missing_target_warned: Local<bool>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Нет цели (или их несколько) → агенты просто никого не видят
    let target = match targets.single() {
        Ok(transform) => {
            *missing_target_warned = false;
            Some(transform.translation)
        }
        Err(_) => {
            if !*missing_target_warned && !agents.is_empty() {
                crate::log_warning("ai_pursuit_tick: no single PursuitTarget, agents are blind");
                *missing_target_warned = true;
            }
            None
        }
    };

    let sight = WorldSight::from_obstructions(obstructions.iter());

    for (entity, transform, config, mut brain, mut nav) in agents.iter_mut() {
        let input = TickInput {
            pose: AgentPose::from_transform(transform),
            target,
            delta,
        };

        let mut driver = NavDriver::new(&mut nav, transform.translation);

        if let Some(transition) = brain.tick(config, &input, &sight, &mut driver) {
            transitions.write(PursuitTransitionEvent::new(entity, transition));
        }
    }
}
