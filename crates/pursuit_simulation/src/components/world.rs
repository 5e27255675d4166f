//! World компоненты: цель преследования и блокирующая зрение геометрия

use bevy::prelude::*;

/// Marker: за этим entity охотятся агенты (игрок)
///
/// Ожидается ровно один. Нет ни одного (или несколько) → агенты его не видят.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct PursuitTarget;

/// Box-препятствие для line-of-sight (стены, двери, мебель)
///
/// Центр — Transform.translation, поворот не учитывается (axis-aligned).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Obstruction {
    pub half_extents: Vec3,
    /// Битовая маска слоёв (сравнивается с ObstructionFilter агента)
    pub layers: u32,
}

impl Obstruction {
    /// Стена на слое Environment
    pub fn wall(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            layers: crate::ai::ObstructionFilter::ENVIRONMENT.0,
        }
    }
}
