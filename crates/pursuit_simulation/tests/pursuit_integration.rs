//! Pursuit integration test
//!
//! Headless App + SimulationPlugin: агенты, цель, стены, шум.
//!
//! Проверяем:
//! - Видимая цель → Chasing, агент сокращает дистанцию
//! - Стена → цель не видна
//! - Потеря цели → Searching → Patrolling после памяти
//! - NoiseEvent → Searching у агентов со слухом
//! - Нет цели → никакой паники, патруль

use bevy::prelude::*;
use pursuit_simulation::ai::{NoiseEvent, PursuitTransitionEvent};
use pursuit_simulation::*;

/// Все transitions за прогон (events живут 2 кадра — копим в resource)
#[derive(Resource, Default)]
struct TransitionLog(Vec<PursuitTransitionEvent>);

fn record_transitions(mut events: EventReader<PursuitTransitionEvent>, mut log: ResMut<TransitionLog>) {
    log.0.extend(events.read().cloned());
}

/// Helper: создать полный pursuit App с всеми plugins
fn create_pursuit_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .init_resource::<TransitionLog>()
        .add_systems(Update, record_transitions);
    app
}

fn spawn_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((PursuitTarget, Transform::from_translation(position)))
        .id()
}

fn spawn_agent(app: &mut App, config: PursuitConfig, position: Vec3) -> Entity {
    spawn_pursuer(
        &mut app.world_mut().commands(),
        config,
        Transform::from_translation(position),
    )
}

fn state_of(app: &App, agent: Entity) -> Option<PursuitState> {
    app.world().get::<PursuitBrain>(agent).map(|brain| brain.state())
}

fn position_of(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|transform| transform.translation)
        .unwrap_or(Vec3::NAN)
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn has_transition(app: &App, agent: Entity, from: PursuitState, to: PursuitState) -> bool {
    app.world()
        .resource::<TransitionLog>()
        .0
        .iter()
        .any(|event| event.entity == agent && event.from == from && event.to == to)
}

fn short_memory_config() -> PursuitConfig {
    PursuitConfig {
        memory_duration: 1.0,
        ..PursuitProfile::Sentry.config()
    }
}

/// Test: цель прямо перед агентом → погоня
#[test]
fn test_visible_target_is_chased() {
    let mut app = create_pursuit_app(42);

    // Transform по умолчанию смотрит в -Z
    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -6.0));
    let agent = spawn_agent(&mut app, short_memory_config(), Vec3::ZERO);

    run(&mut app, 10);

    assert_eq!(state_of(&app, agent), Some(PursuitState::Chasing));
    assert!(has_transition(&app, agent, PursuitState::Patrolling, PursuitState::Chasing));

    let distance = position_of(&app, agent).distance(position_of(&app, target));
    assert!(distance < 6.0, "agent did not close in: {}", distance);
}

/// Test: стена между агентом и целью → не видит
#[test]
fn test_wall_hides_target() {
    let mut app = create_pursuit_app(42);

    spawn_target(&mut app, Vec3::new(0.0, 0.0, -6.0));
    app.world_mut().spawn((
        Obstruction::wall(Vec3::new(3.0, 2.0, 0.5)),
        Transform::from_xyz(0.0, 1.0, -3.0),
    ));
    let agent = spawn_agent(&mut app, short_memory_config(), Vec3::ZERO);

    run(&mut app, 30);

    assert_eq!(state_of(&app, agent), Some(PursuitState::Patrolling));
    // Маршрута нет → стоим
    let nav = app.world().get::<NavAgent>(agent).cloned().unwrap_or_default();
    assert_eq!(nav.destination, None);
    assert_eq!(position_of(&app, agent), Vec3::ZERO);
}

/// Test: цель ушла из радиуса → поиск → патруль
#[test]
fn test_lost_target_is_searched_then_forgotten() {
    let mut app = create_pursuit_app(7);

    let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -4.0));
    let config = short_memory_config().with_route([Vec3::new(0.0, 0.0, 30.0), Vec3::new(10.0, 0.0, 30.0)]);
    let agent = spawn_agent(&mut app, config, Vec3::ZERO);

    run(&mut app, 5);
    assert_eq!(state_of(&app, agent), Some(PursuitState::Chasing));

    // Телепорт цели далеко за sight_range
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(target) {
        transform.translation = Vec3::new(0.0, 0.0, -200.0);
    }

    run(&mut app, 5);
    assert_eq!(state_of(&app, agent), Some(PursuitState::Searching));

    // memory_duration = 1s при 60Hz
    run(&mut app, 120);
    assert_eq!(state_of(&app, agent), Some(PursuitState::Patrolling));
    assert!(has_transition(&app, agent, PursuitState::Chasing, PursuitState::Searching));
    assert!(has_transition(&app, agent, PursuitState::Searching, PursuitState::Patrolling));

    // Вернулся к маршруту
    let nav = app.world().get::<NavAgent>(agent).cloned().unwrap_or_default();
    assert!(nav.destination.is_some());
}

/// Test: шум → агент со слухом идёт проверять, глухой — нет
#[test]
fn test_noise_draws_listening_agents() {
    let mut app = create_pursuit_app(3);

    // Цель за спиной (вне конуса) — видеть не должны
    spawn_target(&mut app, Vec3::new(0.0, 0.0, 50.0));
    let listener = spawn_agent(&mut app, PursuitProfile::Stalker.config(), Vec3::ZERO);
    let deaf = spawn_agent(&mut app, PursuitProfile::Sentry.config(), Vec3::new(1.0, 0.0, 0.0));

    run(&mut app, 3);

    app.world_mut().send_event(NoiseEvent {
        source: None,
        position: Vec3::new(6.0, 0.0, 0.0),
        loudness: 12.0,
    });
    run(&mut app, 3);

    assert_eq!(state_of(&app, listener), Some(PursuitState::Searching));
    assert_eq!(state_of(&app, deaf), Some(PursuitState::Patrolling));

    let nav = app.world().get::<NavAgent>(listener).cloned().unwrap_or_default();
    assert_eq!(nav.destination, Some(Vec3::new(6.0, 0.0, 0.0)));
}

/// Test: без цели агенты патрулируют и не падают
#[test]
fn test_agents_patrol_without_target() {
    let mut app = create_pursuit_app(11);

    let route = [Vec3::new(0.0, 0.0, -3.0), Vec3::new(3.0, 0.0, -3.0)];
    let agent = spawn_agent(&mut app, PursuitProfile::Sentry.config().with_route(route), Vec3::ZERO);

    run(&mut app, 300);

    assert_eq!(state_of(&app, agent), Some(PursuitState::Patrolling));
    let position = position_of(&app, agent);
    assert!(position.is_finite());
    assert_ne!(position, Vec3::ZERO);

    let brain = app.world().get::<PursuitBrain>(agent).cloned();
    let index = brain.map(|brain| brain.route().index()).unwrap_or(usize::MAX);
    assert!(index < route.len());
}
