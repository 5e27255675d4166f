//! AI Events — входящие стимулы и исходящие transitions
//!
//! - NoiseEvent: шум в мире (шаги, ловушка) → агенты с hearing идут проверять
//! - PursuitTransitionEvent: смена PursuitState → анимации / звук / vignette на стороне хоста

use bevy::prelude::*;

use crate::ai::components::{PursuitState, PursuitTransition};

/// Шум в мире
///
/// Агент слышит если дистанция ≤ min(loudness, hearing.range).
#[derive(Event, Debug, Clone)]
pub struct NoiseEvent {
    /// Кто шумел (None — окружение, ловушка)
    pub source: Option<Entity>,
    pub position: Vec3,
    /// Радиус слышимости шума (метры)
    pub loudness: f32,
}

/// Агент сменил состояние
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PursuitTransitionEvent {
    pub entity: Entity,
    pub from: PursuitState,
    pub to: PursuitState,
}

impl PursuitTransitionEvent {
    pub fn new(entity: Entity, transition: PursuitTransition) -> Self {
        Self {
            entity,
            from: transition.from,
            to: transition.to,
        }
    }
}
