//! Hearing system: NoiseEvent → агенты с hearing capability идут проверять.

use bevy::prelude::*;

use crate::ai::events::{NoiseEvent, PursuitTransitionEvent};
use crate::ai::perception::AgentPose;
use crate::ai::{PursuitBrain, PursuitConfig};
use crate::components::NavAgent;
use crate::physics::NavDriver;

/// Система: AI реакция на шум
///
/// Логика:
/// - Skip: источник шума сам себя не слышит
/// - Skip: агенты без hearing секции и агенты в Chasing (brain.hear решает)
/// - Дистанция ≤ min(loudness, hearing.range) → Searching к источнику
pub fn ai_hearing(
    mut noises: EventReader<NoiseEvent>,
    mut agents: Query<(Entity, &Transform, &PursuitConfig, &mut PursuitBrain, &mut NavAgent)>,
    mut transitions: EventWriter<PursuitTransitionEvent>,
) {
    for noise in noises.read() {
        for (entity, transform, config, mut brain, mut nav) in agents.iter_mut() {
            if noise.source == Some(entity) || config.hearing.is_none() {
                continue;
            }

            let pose = AgentPose::from_transform(transform);
            let mut driver = NavDriver::new(&mut nav, transform.translation);

            if let Some(transition) = brain.hear(config, &pose, noise.position, noise.loudness, &mut driver) {
                transitions.write(PursuitTransitionEvent::new(entity, transition));
            }
        }
    }
}
