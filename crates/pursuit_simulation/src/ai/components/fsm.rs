//! Pursuit FSM components (state, memory, patrol route, brain).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::config::PursuitConfig;

/// Pursuit FSM состояния (ровно одно активно на агента)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect, serde::Serialize, serde::Deserialize)]
pub enum PursuitState {
    /// Patrolling — начальное состояние, ходим по маршруту
    #[default]
    Patrolling,

    /// Chasing — цель видна, бежим к ней
    Chasing,

    /// Searching — цель потеряна, идём к last known position пока жива память
    Searching,

    /// SpecialBehavior — много раз теряли цель в одном месте, уходим в случайную точку
    SpecialBehavior {
        /// Куда уходим (random waypoint или offset от last known position)
        destination: Vec3,
    },
}

impl PursuitState {
    pub fn name(&self) -> &'static str {
        match self {
            PursuitState::Patrolling => "Patrolling",
            PursuitState::Chasing => "Chasing",
            PursuitState::Searching => "Searching",
            PursuitState::SpecialBehavior { .. } => "SpecialBehavior",
        }
    }
}

/// Смена состояния (для hooks: анимации, звук, post-processing)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitTransition {
    pub from: PursuitState,
    pub to: PursuitState,
}

/// Память о цели: где видели в последний раз и сколько ещё помним
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct Memory {
    pub last_known_position: Vec3,
    /// Секунды, уменьшается до 0 только пока цель не видна
    pub remaining: f32,
}

impl Memory {
    pub fn is_valid(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn refresh(&mut self, position: Vec3, duration: f32) {
        self.last_known_position = position;
        self.remaining = duration;
    }

    pub fn decay(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

/// Cyclic маршрут патруля
///
/// Инвариант: `index` всегда в [0, len) (для пустого маршрута — 0 и не используется).
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    index: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.index).copied()
    }

    /// index = (index + 1) mod len, возвращает новый waypoint
    pub fn advance(&mut self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.waypoints.len();
        self.current()
    }

    /// Перепрыгнуть на waypoint (index по модулю длины)
    pub fn jump_to(&mut self, index: usize) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.index = index % self.waypoints.len();
        self.current()
    }
}

/// История завершённых поисков (для SpecialBehavior trigger)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct SearchHistory {
    /// Где закончился предыдущий поиск
    pub anchor: Option<Vec3>,
    /// Сколько поисков подряд закончились в радиусе друг от друга
    pub repeat_count: u32,
}

impl SearchHistory {
    /// Регистрирует конец поиска, возвращает текущий счётчик повторов
    pub fn record(&mut self, position: Vec3, radius: f32) -> u32 {
        let repeated = self
            .anchor
            .is_some_and(|anchor| anchor.distance(position) <= radius);

        self.repeat_count = if repeated { self.repeat_count + 1 } else { 1 };
        self.anchor = Some(position);
        self.repeat_count
    }

    pub fn reset(&mut self) {
        self.anchor = None;
        self.repeat_count = 0;
    }
}

/// Wander runtime (только для агентов без маршрута с WanderConfig)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct WanderState {
    pub timer: f32,
    pub target: Option<Vec3>,
}

/// Runtime pursuit AI одного агента
///
/// Конфиг живёт отдельно (`PursuitConfig`), brain — только изменяемое состояние.
/// Каждый агент владеет своим RNG: агенты не делят mutable state.
#[derive(Component, Debug, Clone)]
pub struct PursuitBrain {
    pub(crate) state: PursuitState,
    pub(crate) memory: Memory,
    pub(crate) route: PatrolRoute,
    pub(crate) search_history: SearchHistory,
    /// false → при следующем patrol tick выдаём текущий waypoint заново
    pub(crate) patrol_leg_active: bool,
    /// Память только что выставлена шумом — следующий Searching tick её не уменьшает
    pub(crate) fresh_memory: bool,
    pub(crate) orbit_angle: f32,
    pub(crate) wander: WanderState,
    pub(crate) rng: ChaCha8Rng,
}

impl PursuitBrain {
    pub fn new(config: &PursuitConfig) -> Self {
        Self {
            state: PursuitState::Patrolling,
            memory: Memory::default(),
            route: PatrolRoute::new(config.patrol_route.clone()),
            search_history: SearchHistory::default(),
            patrol_leg_active: false,
            fresh_memory: false,
            orbit_angle: 0.0,
            wander: WanderState::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    pub fn state(&self) -> PursuitState {
        self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn search_history(&self) -> &SearchHistory {
        &self.search_history
    }
}
