//! Headless pursuit симуляция
//!
//! Запускает Bevy App без рендера: игрок ходит по кругу вокруг стены,
//! враги разных профилей патрулируют, замечают, ищут.
//!
//! Usage: `pursuit_simulation [config.json]` — JSON переопределяет профиль первого врага.

use bevy::prelude::*;
use pursuit_simulation::ai::{PursuitSystems, PursuitTransitionEvent};
use pursuit_simulation::logger::{self, LogLevel};
use pursuit_simulation::{
    create_headless_app, log_error, log_info, spawn_pursuer, DeterministicRng, Obstruction,
    PursuitConfig, PursuitProfile, PursuitTarget, SimulationPlugin,
};

const TICKS: usize = 1200;

/// Игрок: бежит по кругу радиусом 12м вокруг центра
#[derive(Component)]
struct CirclingPlayer {
    angle: f32,
    radius: f32,
    angular_speed: f32,
}

fn move_player(mut players: Query<(&mut CirclingPlayer, &mut Transform)>, time: Res<Time<Fixed>>) {
    for (mut player, mut transform) in players.iter_mut() {
        player.angle += player.angular_speed * time.delta_secs();
        transform.translation = Vec3::new(player.angle.cos(), 0.0, player.angle.sin()) * player.radius;
    }
}

fn report_transitions(mut transitions: EventReader<PursuitTransitionEvent>) {
    for event in transitions.read() {
        log_info(&format!(
            "{:?}: {} → {}",
            event.entity,
            event.from.name(),
            event.to.name()
        ));
    }
}

fn main() {
    let seed = 42;

    // Logger до загрузки конфига: ошибки и clamp warnings не должны теряться
    logger::init_logger();
    // DEBUG (каждый transition внутри brain) — слишком шумно для демо, transitions печатает report_transitions
    logger::set_log_level(LogLevel::Info);

    println!("Starting pursuit headless simulation (seed: {})", seed);

    let first_config = match std::env::args().nth(1) {
        Some(path) => match PursuitConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("{}", err));
                std::process::exit(1);
            }
        },
        None => PursuitProfile::Stalker.config(),
    };

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .add_systems(FixedUpdate, move_player.before(PursuitSystems))
        .add_systems(Update, report_transitions);

    let route = [
        Vec3::new(-15.0, 0.0, -15.0),
        Vec3::new(15.0, 0.0, -15.0),
        Vec3::new(15.0, 0.0, 15.0),
        Vec3::new(-15.0, 0.0, 15.0),
    ];

    let configs = [
        first_config,
        PursuitProfile::Sentry.config(),
        PursuitProfile::Aggressive.config(),
        PursuitProfile::Jumper.config(),
    ];

    let world = app.world_mut();
    world.spawn((
        PursuitTarget,
        CirclingPlayer {
            angle: 0.0,
            radius: 12.0,
            angular_speed: 0.4,
        },
        Transform::from_xyz(12.0, 0.0, 0.0),
    ));
    world.spawn((
        Obstruction::wall(Vec3::new(4.0, 2.0, 0.5)),
        Transform::from_xyz(0.0, 1.0, 0.0),
    ));

    let seeds: Vec<u64> = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        (0..configs.len()).map(|_| rng.next_seed()).collect()
    };

    {
        let mut commands = world.commands();
        for (index, (config, agent_seed)) in configs.into_iter().zip(seeds).enumerate() {
            let start = route[index % route.len()];
            let config = if config.patrol_route.is_empty() && config.wander.is_none() {
                config.with_route(route)
            } else {
                config
            };
            spawn_pursuer(&mut commands, config.with_seed(agent_seed), Transform::from_translation(start));
        }
    }
    world.flush();

    for tick in 0..TICKS {
        app.update();

        if tick % 200 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}
