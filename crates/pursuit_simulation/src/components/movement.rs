//! Movement компоненты: locomotion агента

use bevy::prelude::*;

/// Navigation агент (locomotion port в ECS)
///
/// Архитектура:
/// - Brain пишет destination + speed (high-level intent)
/// - Navigation система (headless: steer_nav_agents) двигает Transform
/// - remaining distance считается от текущего Transform, горизонтально
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Куда идём (None — стоим)
    pub destination: Option<Vec3>,
    /// Скорость (m/s), всегда ≥ 0
    pub speed: f32,
    /// Путь ещё считается (внешний pathfinder); headless steering считает мгновенно
    pub path_pending: bool,
}

impl NavAgent {
    /// Горизонтальная дистанция до destination (0 если destination нет)
    pub fn remaining_from(&self, position: Vec3) -> f32 {
        self.destination
            .map(|destination| horizontal_distance(position, destination))
            .unwrap_or(0.0)
    }
}

pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
