//! Navigation — locomotion port адаптер + headless steering
//!
//! Архитектура:
//! - NavDriver: обёртка над NavAgent + текущая позиция, реализует Locomotion
//! - steer_nav_agents: прямолинейное движение к destination (stand-in для NavMesh)

use bevy::prelude::*;

use crate::ai::ports::Locomotion;
use crate::components::{horizontal_distance, NavAgent};

/// Locomotion port для одного агента на время tick'а
pub struct NavDriver<'a> {
    agent: &'a mut NavAgent,
    position: Vec3,
}

impl<'a> NavDriver<'a> {
    pub fn new(agent: &'a mut NavAgent, position: Vec3) -> Self {
        Self { agent, position }
    }
}

impl Locomotion for NavDriver<'_> {
    fn set_destination(&mut self, point: Vec3) {
        // Пересчитываем путь только если destination реально сменился
        if self.agent.destination != Some(point) {
            self.agent.destination = Some(point);
            self.agent.path_pending = false;
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.agent.speed = speed.max(0.0);
    }

    fn remaining_distance(&self) -> f32 {
        self.agent.remaining_from(self.position)
    }

    fn is_path_pending(&self) -> bool {
        self.agent.path_pending
    }
}

/// Дистанция на которой считаем что пришли (без дрожания вокруг точки)
const ARRIVE_EPSILON: f32 = 1e-3;

/// Система: NavAgent → Transform
///
/// Работает в FixedUpdate после ai_pursuit_tick.
/// Движение только по XZ, Y не трогаем (пол/высоту держит внешний слой).
pub fn steer_nav_agents(mut agents: Query<(&NavAgent, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (agent, mut transform) in agents.iter_mut() {
        let Some(destination) = agent.destination else {
            continue;
        };

        let position = transform.translation;
        let distance = horizontal_distance(position, destination);
        if distance <= ARRIVE_EPSILON || agent.speed <= 0.0 {
            continue;
        }

        let direction = Vec3::new(destination.x - position.x, 0.0, destination.z - position.z) / distance;
        let step = agent.speed * delta;

        if step >= distance {
            transform.translation.x = destination.x;
            transform.translation.z = destination.z;
        } else {
            transform.translation += direction * step;
        }

        // Смотрим по направлению движения (forward = -Z)
        transform.look_to(direction, Vec3::Y);
    }
}
