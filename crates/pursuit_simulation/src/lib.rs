//! Pursuit AI Simulation Core
//!
//! Enemy AI для stealth/horror: зрение (дистанция + конус + raycast),
//! память о последней позиции игрока, патруль / погоня / поиск.
//!
//! HYBRID ARCHITECTURE:
//! - Brain = strategic layer (решения: когда гнаться, искать, сдаваться)
//! - Ports = tactical layer (raycast, navigation, позиция игрока) — движок или headless адаптеры
//! - ECS (Bevy) = headless прогон многих агентов в FixedUpdate

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    evaluate_perception, AgentPose, PerceptionResult, PursuitBrain, PursuitConfig, PursuitController,
    PursuitPlugin, PursuitProfile, PursuitState,
};
pub use ai::systems::spawn_pursuer;
pub use components::*;
pub use logger::{log, log_error, log_info, log_warning};

/// Частота simulation tick (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .add_plugins(PursuitPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Раздаёт seed'ы агентам: каждый brain дальше владеет своим ChaCha8.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed для следующего агента
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную ровно на один fixed tick за `app.update()` —
/// прогон не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
