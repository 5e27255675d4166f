//! Perception policy: видит ли агент цель в этот tick
//!
//! Три независимых short-circuit проверки, от дешёвой к дорогой:
//! 1. distance ≤ sight_range
//! 2. angle < field_of_view / 2
//! 3. raycast от глаз до цели не задел obstruction раньше цели

use bevy::prelude::*;

use crate::ai::config::PursuitConfig;
use crate::ai::ports::{HitTag, SightQuery};

/// Поза агента на момент tick'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    /// Направление взгляда (не обязательно normalized)
    pub forward: Vec3,
}

impl AgentPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            forward: transform.forward().as_vec3(),
        }
    }

    pub fn eye(&self, eye_height: f32) -> Vec3 {
        self.position + Vec3::Y * eye_height
    }
}

/// Результат одного perception tick (не хранится между tick'ами)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionResult {
    pub visible: bool,
    /// Позиция цели (ZERO если цели нет)
    pub position: Vec3,
    pub distance: f32,
}

impl PerceptionResult {
    pub fn hidden(position: Vec3, distance: f32) -> Self {
        Self {
            visible: false,
            position,
            distance,
        }
    }

    /// Цели нет (reference не назначен) — всегда not visible
    pub fn no_target() -> Self {
        Self::hidden(Vec3::ZERO, f32::INFINITY)
    }
}

/// Ближе этого цель считается "в контакте" — видна без angle/raycast
const CONTACT_DISTANCE: f32 = 1e-4;

/// Допуск: попадание в пределах epsilon от цели не считается "до цели"
const HIT_EPSILON: f32 = 1e-3;

pub fn evaluate_perception(
    pose: &AgentPose,
    target: Option<Vec3>,
    config: &PursuitConfig,
    sight: &impl SightQuery,
) -> PerceptionResult {
    let Some(target) = target else {
        return PerceptionResult::no_target();
    };

    let to_target = target - pose.position;
    let distance = to_target.length();

    if distance > config.sight_range {
        return PerceptionResult::hidden(target, distance);
    }

    if distance <= CONTACT_DISTANCE {
        return PerceptionResult {
            visible: true,
            position: target,
            distance,
        };
    }

    // 360° — всенаправленное зрение, угол не проверяем
    if config.field_of_view < 360.0 {
        // NaN (нулевой forward) → not visible
        let angle = pose.forward.angle_between(to_target).to_degrees();
        if angle.is_nan() || angle >= config.half_fov() {
            return PerceptionResult::hidden(target, distance);
        }
    }

    if !config.obstruction_filter.is_empty() && is_obstructed(pose, target, config, sight) {
        return PerceptionResult::hidden(target, distance);
    }

    PerceptionResult {
        visible: true,
        position: target,
        distance,
    }
}

fn is_obstructed(
    pose: &AgentPose,
    target: Vec3,
    config: &PursuitConfig,
    sight: &impl SightQuery,
) -> bool {
    let eye = pose.eye(config.eye_height);
    let to_target = target - eye;
    let ray_length = to_target.length();

    // Глаза ровно в точке цели — нечему загораживать
    let Some(direction) = to_target.try_normalize() else {
        return false;
    };

    match sight.line_of_sight(eye, direction, ray_length, config.obstruction_filter) {
        Some(hit) => hit.tag == HitTag::Obstruction && hit.distance < ray_length - HIT_EPSILON,
        None => false,
    }
}
