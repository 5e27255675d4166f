//! Pursuit FSM: один tick решения агента
//!
//! Patrolling → Chasing → Searching → Patrolling (+ SpecialBehavior)
//!
//! Архитектура:
//! - Brain получает perception (через `SightQuery`) и пишет команды в `Locomotion`
//! - Один tick = синхронная оценка, без ожиданий и без wall clock
//! - Побочные эффекты (анимации, звук) — через `PursuitTransition` / hooks

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::components::{PursuitBrain, PursuitState, PursuitTransition};
use crate::ai::config::{DeviationKind, ElevationConfig, PursuitConfig, SpecialBehaviorConfig, WanderConfig};
use crate::ai::perception::{evaluate_perception, AgentPose, PerceptionResult};
use crate::ai::ports::{Locomotion, SightQuery, TargetSource};

/// Fallback offset для RandomWaypoint когда маршрута нет (метры)
const EMPTY_ROUTE_DEVIATION: f32 = 10.0;

/// Входные данные tick'а
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub pose: AgentPose,
    pub target: Option<Vec3>,
    /// Δt с прошлого tick'а (секунды, simulation clock)
    pub delta: f32,
}

impl PursuitBrain {
    /// Полный tick: elevation check → perception → FSM
    pub fn tick(
        &mut self,
        config: &PursuitConfig,
        input: &TickInput,
        sight: &impl SightQuery,
        locomotion: &mut impl Locomotion,
    ) -> Option<PursuitTransition> {
        let delta = sanitize_delta(input.delta);

        if let (Some(elevation), Some(target)) = (&config.elevation, input.target) {
            if self.elevation_maneuver(elevation, config, &input.pose, target, delta, locomotion) {
                return None;
            }
        }

        let perception = evaluate_perception(&input.pose, input.target, config, sight);
        self.step(config, &input.pose, &perception, delta, locomotion)
    }

    /// FSM шаг с уже посчитанным perception
    pub fn step(
        &mut self,
        config: &PursuitConfig,
        pose: &AgentPose,
        perception: &PerceptionResult,
        delta: f32,
        locomotion: &mut impl Locomotion,
    ) -> Option<PursuitTransition> {
        let delta = sanitize_delta(delta);

        // Видим цель → Chasing из любого состояния (прерывает поиск/патруль)
        if perception.visible {
            let transition = self.enter(PursuitState::Chasing);
            self.chase(config, perception.position, locomotion);
            return transition;
        }

        match self.state {
            PursuitState::Patrolling => {
                self.patrol(config, pose, delta, locomotion);
                None
            }

            PursuitState::Chasing => {
                // Память уже обновлена на последнем видимом tick'е — не сбрасываем
                let transition = self.enter(PursuitState::Searching);
                self.move_to_last_known(config, locomotion);
                transition
            }

            PursuitState::Searching => {
                // Tick, в котором услышали шум, не тратит память (как и переход из Chasing)
                if self.fresh_memory {
                    self.fresh_memory = false;
                } else {
                    self.memory.decay(delta);
                }
                if self.memory.is_valid() {
                    self.move_to_last_known(config, locomotion);
                    None
                } else {
                    self.finish_search(config, pose, delta, locomotion)
                }
            }

            PursuitState::SpecialBehavior { destination } => {
                if is_destination_reached(config, locomotion) {
                    let transition = self.enter(PursuitState::Patrolling);
                    self.patrol(config, pose, delta, locomotion);
                    transition
                } else {
                    locomotion.set_speed(config.patrol_speed);
                    locomotion.set_destination(destination);
                    None
                }
            }
        }
    }

    /// Шум в точке `position` слышен в радиусе `loudness` (ограничен hearing.range).
    ///
    /// Услышал и не в Chasing → Searching к источнику шума.
    pub fn hear(
        &mut self,
        config: &PursuitConfig,
        pose: &AgentPose,
        position: Vec3,
        loudness: f32,
        locomotion: &mut impl Locomotion,
    ) -> Option<PursuitTransition> {
        let hearing = config.hearing.as_ref()?;

        if self.state == PursuitState::Chasing {
            return None;
        }

        let audible = loudness.min(hearing.range);
        if pose.position.distance(position) > audible {
            return None;
        }

        crate::log(&format!(
            "🔊 heard noise at {:?} ({:.1}m away)",
            position,
            pose.position.distance(position)
        ));

        self.memory.refresh(position, config.memory_duration);
        let transition = self.enter(PursuitState::Searching);
        self.fresh_memory = true;
        self.move_to_last_known(config, locomotion);
        transition
    }

    fn enter(&mut self, next: PursuitState) -> Option<PursuitTransition> {
        if self.state == next {
            return None;
        }

        let from = self.state;
        self.state = next;
        self.fresh_memory = false;

        // Возврат в патруль всегда начинается с текущего waypoint
        if next != PursuitState::Patrolling {
            self.patrol_leg_active = false;
            self.wander.target = None;
        }

        crate::log(&format!("AI: {} → {}", from.name(), next.name()));
        Some(PursuitTransition { from, to: next })
    }

    fn chase(&mut self, config: &PursuitConfig, target: Vec3, locomotion: &mut impl Locomotion) {
        self.memory.refresh(target, config.memory_duration);
        locomotion.set_speed(config.chase_speed);
        locomotion.set_destination(target);
    }

    fn move_to_last_known(&mut self, config: &PursuitConfig, locomotion: &mut impl Locomotion) {
        locomotion.set_speed(config.search_speed);
        locomotion.set_destination(self.memory.last_known_position);
    }

    fn patrol(
        &mut self,
        config: &PursuitConfig,
        pose: &AgentPose,
        delta: f32,
        locomotion: &mut impl Locomotion,
    ) {
        if self.route.is_empty() {
            // Нет маршрута: wander если настроен, иначе стоим на месте
            if let Some(wander) = &config.wander {
                self.wander(wander, config, pose, delta, locomotion);
            }
            return;
        }

        let next_waypoint = if !self.patrol_leg_active {
            self.patrol_leg_active = true;
            self.route.current()
        } else if is_destination_reached(config, locomotion) {
            self.route.advance()
        } else {
            None
        };

        if let Some(waypoint) = next_waypoint {
            locomotion.set_speed(config.patrol_speed);
            locomotion.set_destination(waypoint);
        }
    }

    fn wander(
        &mut self,
        wander: &WanderConfig,
        config: &PursuitConfig,
        pose: &AgentPose,
        delta: f32,
        locomotion: &mut impl Locomotion,
    ) {
        self.wander.timer -= delta;

        let needs_target = self.wander.target.is_none()
            || self.wander.timer <= 0.0
            || is_destination_reached(config, locomotion);

        if !needs_target {
            return;
        }

        let target = pose.position + random_horizontal_offset(&mut self.rng, wander.radius);
        self.wander.target = Some(target);
        self.wander.timer = wander.cooldown;

        locomotion.set_speed(config.chase_speed * wander.speed_factor);
        locomotion.set_destination(target);
    }

    fn finish_search(
        &mut self,
        config: &PursuitConfig,
        pose: &AgentPose,
        delta: f32,
        locomotion: &mut impl Locomotion,
    ) -> Option<PursuitTransition> {
        self.memory.clear();
        let terminal = self.memory.last_known_position;

        if let Some(special) = &config.special {
            let repeats = self.search_history.record(terminal, special.repeat_radius);
            if repeats >= special.threshold {
                self.search_history.reset();
                let destination = self.pick_deviation(special, terminal);

                crate::log(&format!(
                    "🌀 AI: lost target {} times near {:?} → deviation to {:?}",
                    repeats, terminal, destination
                ));

                let transition = self.enter(PursuitState::SpecialBehavior { destination });
                locomotion.set_speed(config.patrol_speed);
                locomotion.set_destination(destination);
                return transition;
            }
        }

        let transition = self.enter(PursuitState::Patrolling);
        self.patrol(config, pose, delta, locomotion);
        transition
    }

    fn pick_deviation(&mut self, special: &SpecialBehaviorConfig, terminal: Vec3) -> Vec3 {
        match special.deviation {
            DeviationKind::RandomWaypoint if !self.route.is_empty() => {
                let index = self.rng.gen_range(0..self.route.len());
                self.route.jump_to(index).unwrap_or(terminal)
            }
            DeviationKind::RandomWaypoint => {
                terminal + random_horizontal_offset(&mut self.rng, EMPTY_ROUTE_DEVIATION)
            }
            DeviationKind::Offset { max_offset } => {
                terminal + random_horizontal_offset(&mut self.rng, max_offset)
            }
        }
    }

    /// Target выше агента: кружим под ним или встаём под него.
    ///
    /// Возвращает true если manoeuvre перехватил движение (FSM в этот tick не работает).
    fn elevation_maneuver(
        &mut self,
        elevation: &ElevationConfig,
        config: &PursuitConfig,
        pose: &AgentPose,
        target: Vec3,
        delta: f32,
        locomotion: &mut impl Locomotion,
    ) -> bool {
        let vertical = target.y - pose.position.y;
        if vertical <= elevation.threshold {
            return false;
        }

        let horizontal = Vec2::new(target.x, target.z).distance(Vec2::new(pose.position.x, pose.position.z));
        let beneath = Vec3::new(target.x, pose.position.y, target.z);

        if horizontal < elevation.on_head_radius {
            self.orbit_angle = (self.orbit_angle + delta * elevation.orbit_speed) % TAU;
            let offset = Vec3::new(self.orbit_angle.cos(), 0.0, self.orbit_angle.sin()) * elevation.orbit_radius;

            locomotion.set_speed(elevation.orbit_speed);
            locomotion.set_destination(beneath + offset);
            true
        } else if horizontal < elevation.beneath_radius {
            locomotion.set_speed(config.chase_speed);
            locomotion.set_destination(beneath);
            true
        } else {
            false
        }
    }
}

fn is_destination_reached(config: &PursuitConfig, locomotion: &impl Locomotion) -> bool {
    !locomotion.is_path_pending() && locomotion.remaining_distance() < config.arrival_threshold
}

fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() {
        delta.max(0.0)
    } else {
        0.0
    }
}

/// Равномерная точка в горизонтальном диске радиуса `radius`
fn random_horizontal_offset(rng: &mut impl Rng, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return Vec3::ZERO;
    }

    let angle = rng.gen::<f32>() * TAU;
    let distance = radius * rng.gen::<f32>().sqrt();
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Hook на смену состояния (анимации, звук, vignette)
pub trait TransitionHook: Send {
    fn on_transition(&mut self, transition: &PursuitTransition);
}

impl<F> TransitionHook for F
where
    F: FnMut(&PursuitTransition) + Send,
{
    fn on_transition(&mut self, transition: &PursuitTransition) {
        self(transition)
    }
}

/// Pursuit AI Controller вне ECS: config + brain + hooks
///
/// Для хостов без Bevy (или тестов): сам вызывает hooks на каждом transition.
pub struct PursuitController {
    config: PursuitConfig,
    brain: PursuitBrain,
    hooks: Vec<Box<dyn TransitionHook>>,
}

impl PursuitController {
    /// Конфиг клампится здесь — отрицательные значения не доходят до команд движения
    pub fn new(config: PursuitConfig) -> Self {
        let config = config.sanitized();
        let brain = PursuitBrain::new(&config);
        Self {
            config,
            brain,
            hooks: Vec::new(),
        }
    }

    pub fn add_hook(&mut self, hook: impl TransitionHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    pub fn brain(&self) -> &PursuitBrain {
        &self.brain
    }

    pub fn state(&self) -> PursuitState {
        self.brain.state()
    }

    pub fn tick(
        &mut self,
        pose: AgentPose,
        target: &impl TargetSource,
        delta: f32,
        sight: &impl SightQuery,
        locomotion: &mut impl Locomotion,
    ) -> Option<PursuitTransition> {
        let input = TickInput {
            pose,
            target: target.current_position(),
            delta,
        };
        let transition = self.brain.tick(&self.config, &input, sight, locomotion);
        self.dispatch(transition)
    }

    pub fn hear(
        &mut self,
        pose: AgentPose,
        position: Vec3,
        loudness: f32,
        locomotion: &mut impl Locomotion,
    ) -> Option<PursuitTransition> {
        let transition = self.brain.hear(&self.config, &pose, position, loudness, locomotion);
        self.dispatch(transition)
    }

    fn dispatch(&mut self, transition: Option<PursuitTransition>) -> Option<PursuitTransition> {
        if let Some(transition) = &transition {
            for hook in self.hooks.iter_mut() {
                hook.on_transition(transition);
            }
        }
        transition
    }
}
