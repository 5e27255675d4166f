//! PursuitConfig — параметры pursuit AI (загружаются один раз при спавне агента)
//!
//! Один параметризованный конфиг покрывает все варианты врагов:
//! базовые числа (range, fov, speeds, memory) + опциональные capability секции
//! (elevation / hearing / wander / special). Пресеты — `PursuitProfile`.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::ports::ObstructionFilter;

/// Ошибки загрузки конфига
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pursuit config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pursuit config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Параметры pursuit AI
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PursuitConfig {
    /// Дальность зрения (метры, inclusive)
    pub sight_range: f32,
    /// Полный угол конуса зрения (градусы)
    pub field_of_view: f32,
    /// Высота глаз над pivot агента (origin для raycast)
    pub eye_height: f32,
    /// Сколько секунд агент ищет last known position после потери цели
    pub memory_duration: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub search_speed: f32,
    /// Waypoint считается достигнутым когда remaining distance меньше этого
    pub arrival_threshold: f32,
    pub obstruction_filter: ObstructionFilter,
    /// Cyclic маршрут патруля (пустой = стоим на месте)
    pub patrol_route: Vec<Vec3>,
    /// Seed per-agent RNG (deviation, wander)
    pub seed: u64,
    pub elevation: Option<ElevationConfig>,
    pub hearing: Option<HearingConfig>,
    pub wander: Option<WanderConfig>,
    pub special: Option<SpecialBehaviorConfig>,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            sight_range: 10.0,
            field_of_view: 120.0,
            eye_height: 1.0,
            memory_duration: 5.0,
            patrol_speed: 2.0,
            chase_speed: 5.0,
            search_speed: 3.5,
            arrival_threshold: 0.5,
            obstruction_filter: ObstructionFilter::ENVIRONMENT,
            patrol_route: Vec::new(),
            seed: 0,
            elevation: None,
            hearing: None,
            wander: None,
            special: None,
        }
    }
}

/// Elevation check: игрок залез выше агента (на ящик, на голову)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Насколько выше агента должен быть target (метры)
    pub threshold: f32,
    /// Горизонтальный радиус "стоит на голове" → кружим
    pub on_head_radius: f32,
    /// Горизонтальный радиус "рядом сверху" → встаём под target
    pub beneath_radius: f32,
    pub orbit_radius: f32,
    /// Угловая скорость орбиты (рад/сек), она же скорость движения
    pub orbit_speed: f32,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            on_head_radius: 1.5,
            beneath_radius: 3.0,
            orbit_radius: 2.0,
            orbit_speed: 3.0,
        }
    }
}

/// Hearing: шум в радиусе → агент идёт проверять
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct HearingConfig {
    /// Максимальная дистанция слышимости (ограничивает loudness шума)
    pub range: f32,
}

impl Default for HearingConfig {
    fn default() -> Self {
        Self { range: 15.0 }
    }
}

/// Wander: случайные точки вокруг агента когда маршрута нет
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub radius: f32,
    /// Секунды между сменой wander точки
    pub cooldown: f32,
    /// Множитель chase_speed во время wander
    pub speed_factor: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            cooldown: 5.0,
            speed_factor: 0.5,
        }
    }
}

/// Special behavior: агент N раз подряд терял игрока в одном и том же месте
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialBehaviorConfig {
    /// Сколько подряд поисков должно закончиться рядом (N >= 1)
    pub threshold: u32,
    /// Радиус "то же самое место" (метры)
    pub repeat_radius: f32,
    pub deviation: DeviationKind,
}

impl Default for SpecialBehaviorConfig {
    fn default() -> Self {
        Self {
            threshold: 3,
            repeat_radius: 2.0,
            deviation: DeviationKind::RandomWaypoint,
        }
    }
}

/// Куда уходит агент в SpecialBehavior
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub enum DeviationKind {
    /// Случайный waypoint маршрута (пустой маршрут → offset на 10м)
    RandomWaypoint,
    /// Last known position + случайный горизонтальный offset (≤ max_offset)
    Offset { max_offset: f32 },
}

/// Пресеты пяти вариантов врагов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum PursuitProfile {
    /// Медленный преследователь с памятью и слухом
    Stalker,
    /// Быстрый, широкий FOV, не даёт залезть на себя, бродит без маршрута
    Aggressive,
    /// Патрульный по waypoint'ам, без памяти
    Sentry,
    /// Узкий конус, глаза на 1.5м, сразу сдаётся
    StealthChaser,
    /// Прыгун: только дистанция, телепорт после потери игрока
    Jumper,
}

impl PursuitProfile {
    pub fn config(self) -> PursuitConfig {
        match self {
            PursuitProfile::Stalker => PursuitConfig {
                hearing: Some(HearingConfig::default()),
                ..default()
            },
            PursuitProfile::Aggressive => PursuitConfig {
                sight_range: 25.0,
                field_of_view: 140.0,
                memory_duration: 3.0,
                chase_speed: 6.0,
                // Память ведёт к last known position на полной скорости
                search_speed: 6.0,
                patrol_speed: 3.0,
                elevation: Some(ElevationConfig::default()),
                wander: Some(WanderConfig::default()),
                ..default()
            },
            PursuitProfile::Sentry => PursuitConfig {
                memory_duration: 0.0,
                search_speed: 2.0,
                ..default()
            },
            PursuitProfile::StealthChaser => PursuitConfig {
                field_of_view: 90.0,
                eye_height: 1.5,
                memory_duration: 0.0,
                patrol_speed: 3.5,
                chase_speed: 3.5,
                search_speed: 3.5,
                ..default()
            },
            PursuitProfile::Jumper => PursuitConfig {
                sight_range: 20.0,
                field_of_view: 360.0,
                obstruction_filter: ObstructionFilter::NONE,
                memory_duration: 1.0,
                chase_speed: 10.0,
                search_speed: 10.0,
                special: Some(SpecialBehaviorConfig {
                    threshold: 1,
                    repeat_radius: 20.0,
                    deviation: DeviationKind::Offset { max_offset: 20.0 },
                }),
                ..default()
            },
        }
    }
}

impl PursuitConfig {
    pub fn with_route(mut self, route: impl IntoIterator<Item = Vec3>) -> Self {
        self.patrol_route = route.into_iter().collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Парсит JSON и сразу клампит невалидные значения
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Клампит отрицательные / non-finite значения в 0, FOV в [0, 360].
    ///
    /// Каждое исправление логируется warning'ом. Отрицательные значения
    /// никогда не попадают в команды движения.
    pub fn sanitized(mut self) -> Self {
        non_negative("sight_range", &mut self.sight_range);
        non_negative("eye_height", &mut self.eye_height);
        non_negative("memory_duration", &mut self.memory_duration);
        non_negative("patrol_speed", &mut self.patrol_speed);
        non_negative("chase_speed", &mut self.chase_speed);
        non_negative("search_speed", &mut self.search_speed);
        non_negative("arrival_threshold", &mut self.arrival_threshold);

        non_negative("field_of_view", &mut self.field_of_view);
        if self.field_of_view > 360.0 {
            crate::logger::log_warning(&format!(
                "PursuitConfig: field_of_view {} > 360, clamped",
                self.field_of_view
            ));
            self.field_of_view = 360.0;
        }

        if let Some(elevation) = self.elevation.as_mut() {
            non_negative("elevation.threshold", &mut elevation.threshold);
            non_negative("elevation.on_head_radius", &mut elevation.on_head_radius);
            non_negative("elevation.beneath_radius", &mut elevation.beneath_radius);
            non_negative("elevation.orbit_radius", &mut elevation.orbit_radius);
            non_negative("elevation.orbit_speed", &mut elevation.orbit_speed);
        }

        if let Some(hearing) = self.hearing.as_mut() {
            non_negative("hearing.range", &mut hearing.range);
        }

        if let Some(wander) = self.wander.as_mut() {
            non_negative("wander.radius", &mut wander.radius);
            non_negative("wander.cooldown", &mut wander.cooldown);
            non_negative("wander.speed_factor", &mut wander.speed_factor);
        }

        if let Some(special) = self.special.as_mut() {
            non_negative("special.repeat_radius", &mut special.repeat_radius);
            if let DeviationKind::Offset { max_offset } = &mut special.deviation {
                non_negative("special.deviation.max_offset", max_offset);
            }
            if special.threshold == 0 {
                crate::logger::log_warning("PursuitConfig: special.threshold 0, clamped to 1");
                special.threshold = 1;
            }
        }

        self.patrol_route.retain(|waypoint| {
            let finite = waypoint.is_finite();
            if !finite {
                crate::logger::log_warning(&format!(
                    "PursuitConfig: dropped non-finite waypoint {:?}",
                    waypoint
                ));
            }
            finite
        });

        self
    }

    /// Половина FOV в градусах (angle check: angle < half_fov)
    pub fn half_fov(&self) -> f32 {
        self.field_of_view * 0.5
    }
}

fn non_negative(name: &str, value: &mut f32) {
    if value.is_finite() && *value >= 0.0 {
        return;
    }

    crate::logger::log_warning(&format!("PursuitConfig: {} = {} clamped to 0", name, value));
    *value = 0.0;
}
