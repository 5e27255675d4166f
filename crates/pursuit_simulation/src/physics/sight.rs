//! WorldSight — perception port поверх Obstruction компонентов
//!
//! Ray-vs-AABB через bevy::math::bounding. Без broadphase: уровни маленькие,
//! пересобирается каждый tick из Query.

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

use crate::ai::ports::{HitTag, ObstructionFilter, RayHit, SightQuery};
use crate::components::Obstruction;

#[derive(Debug, Clone, Default)]
pub struct WorldSight {
    blockers: Vec<(Aabb3d, u32)>,
}

impl WorldSight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Собрать из (Transform, Obstruction) пар
    pub fn from_obstructions<'a>(
        obstructions: impl IntoIterator<Item = (&'a Transform, &'a Obstruction)>,
    ) -> Self {
        let mut sight = Self::new();
        for (transform, obstruction) in obstructions {
            sight.add_box(transform.translation, obstruction.half_extents, obstruction.layers);
        }
        sight
    }

    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layers: u32) {
        self.blockers.push((Aabb3d::new(center, half_extents.abs()), layers));
    }

    pub fn with_box(mut self, center: Vec3, half_extents: Vec3, layers: u32) -> Self {
        self.add_box(center, half_extents, layers);
        self
    }

    pub fn len(&self) -> usize {
        self.blockers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockers.is_empty()
    }
}

impl SightQuery for WorldSight {
    fn line_of_sight(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: ObstructionFilter,
    ) -> Option<RayHit> {
        // Нулевое/NaN направление — запрос невалиден, считаем что препятствий нет
        let Ok(direction) = Dir3::new(direction) else {
            return None;
        };

        let ray = RayCast3d::new(origin, direction, max_distance);

        self.blockers
            .iter()
            .filter(|(_, layers)| filter.matches(*layers))
            .filter_map(|(aabb, _)| ray.aabb_intersection_at(aabb))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit {
                distance,
                tag: HitTag::Obstruction,
            })
    }
}
