//! Ports — границы между pursuit AI и внешним миром
//!
//! HYBRID ARCHITECTURE:
//! - Brain = strategic layer (когда гнаться, искать, патрулировать)
//! - Physics/Navigation = tactical layer (raycast, pathfinding, steering)
//!
//! Brain никогда не строит геометрию и не планирует путь — только вызывает
//! эти trait'ы как запросы/команды.

use bevy::prelude::*;

/// Битовая маска слоёв, блокирующих line-of-sight
///
/// ## Layers:
/// - Layer 1 (0b1 = 1): Environment (стены, препятствия)
/// - Layer 2 (0b10 = 2): Props (двери, мебель)
/// - Layer 3 (0b100 = 4): Actors
///
/// Пустая маска = "нечем блокировать" → raycast пропускается.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ObstructionFilter(pub u32);

impl ObstructionFilter {
    pub const NONE: Self = Self(0);
    pub const ENVIRONMENT: Self = Self(0b1);
    pub const PROPS: Self = Self(0b10);
    pub const ACTORS: Self = Self(0b100);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// true если хотя бы один слой `layers` входит в фильтр
    pub fn matches(self, layers: u32) -> bool {
        self.0 & layers != 0
    }
}

impl Default for ObstructionFilter {
    fn default() -> Self {
        Self::ENVIRONMENT
    }
}

impl std::ops::BitOr for ObstructionFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Что задел луч
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTag {
    /// Геометрия из obstruction filter (стена, дверь)
    Obstruction,
    /// Сама цель (луч дошёл до игрока)
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Дистанция от origin до точки попадания
    pub distance: f32,
    pub tag: HitTag,
}

/// Perception port: line-of-sight raycast
pub trait SightQuery {
    /// Ближайшее попадание луча в пределах `max_distance`, `None` если луч чистый.
    ///
    /// `direction` ожидается normalized.
    fn line_of_sight(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: ObstructionFilter,
    ) -> Option<RayHit>;
}

/// Мир без препятствий (луч всегда чистый)
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSight;

impl SightQuery for OpenSight {
    fn line_of_sight(&self, _: Vec3, _: Vec3, _: f32, _: ObstructionFilter) -> Option<RayHit> {
        None
    }
}

/// Locomotion port: команды navigation агенту
///
/// Brain выдаёт destination + speed; планирование пути — снаружи.
pub trait Locomotion {
    fn set_destination(&mut self, point: Vec3);
    fn set_speed(&mut self, speed: f32);
    /// Оставшаяся дистанция по пути до destination (0 если destination нет)
    fn remaining_distance(&self) -> f32;
    fn is_path_pending(&self) -> bool;
}

/// Target port: позиция игрока (None если reference не назначен)
pub trait TargetSource {
    fn current_position(&self) -> Option<Vec3>;
}

impl TargetSource for Option<Vec3> {
    fn current_position(&self) -> Option<Vec3> {
        *self
    }
}

impl TargetSource for Vec3 {
    fn current_position(&self) -> Option<Vec3> {
        Some(*self)
    }
}
