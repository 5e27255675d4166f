//! Tests for pursuit config loading and clamping.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::config::{ConfigError, DeviationKind, PursuitConfig, PursuitProfile};
    use crate::ai::ports::ObstructionFilter;

    #[test]
    fn test_pursuit_config_default() {
        let config = PursuitConfig::default();
        assert_eq!(config.sight_range, 10.0);
        assert_eq!(config.field_of_view, 120.0);
        assert_eq!(config.half_fov(), 60.0);
        assert_eq!(config.memory_duration, 5.0);
        assert_eq!(config.arrival_threshold, 0.5);
        assert_eq!(config.obstruction_filter, ObstructionFilter::ENVIRONMENT);
        assert!(config.patrol_route.is_empty());
        assert!(config.special.is_none());
    }

    #[test]
    fn test_sanitized_clamps_negative_values() {
        let config = PursuitConfig {
            sight_range: -5.0,
            memory_duration: -1.0,
            patrol_speed: -2.0,
            chase_speed: -0.1,
            search_speed: f32::NAN,
            field_of_view: 720.0,
            ..default()
        }
        .sanitized();

        assert_eq!(config.sight_range, 0.0);
        assert_eq!(config.memory_duration, 0.0);
        assert_eq!(config.patrol_speed, 0.0);
        assert_eq!(config.chase_speed, 0.0);
        assert_eq!(config.search_speed, 0.0);
        assert_eq!(config.field_of_view, 360.0);
    }

    #[test]
    fn test_sanitized_keeps_valid_config_untouched() {
        let config = PursuitProfile::Aggressive.config();
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_sanitized_drops_non_finite_waypoints() {
        let config = PursuitConfig::default()
            .with_route([Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Z])
            .sanitized();

        assert_eq!(config.patrol_route, vec![Vec3::X, Vec3::Z]);
    }

    #[test]
    fn test_from_json_uses_defaults_for_missing_fields() {
        let config = PursuitConfig::from_json_str(
            r#"{
                "sight_range": 25.0,
                "chase_speed": -3.0,
                "obstruction_filter": 3,
                "patrol_route": [[0.0, 0.0, 0.0], [5.0, 0.0, 5.0]]
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.sight_range, 25.0);
        assert_eq!(config.chase_speed, 0.0); // Отрицательное → 0
        assert_eq!(config.field_of_view, 120.0);
        assert_eq!(config.obstruction_filter, ObstructionFilter::ENVIRONMENT | ObstructionFilter::PROPS);
        assert_eq!(config.patrol_route, vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0)]);
    }

    #[test]
    fn test_from_json_with_capabilities() {
        let config = PursuitConfig::from_json_str(
            r#"{
                "hearing": { "range": 8.0 },
                "special": {
                    "threshold": 0,
                    "repeat_radius": 1.5,
                    "deviation": { "Offset": { "max_offset": 4.0 } }
                }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.hearing.map(|h| h.range), Some(8.0));

        let special = config.special.expect("special section");
        assert_eq!(special.threshold, 1); // 0 → 1
        assert_eq!(special.repeat_radius, 1.5);
        assert_eq!(special.deviation, DeviationKind::Offset { max_offset: 4.0 });
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let result = PursuitConfig::from_json_str("{ sight_range: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = PursuitConfig::from_json_file("/nonexistent/pursuit_config.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("pursuit_config_{}.json", std::process::id()));
        let config = PursuitProfile::Stalker.config().with_seed(99);

        let json = serde_json::to_string_pretty(&config).expect("serialize");
        std::fs::write(&path, json).expect("write temp config");

        let loaded = PursuitConfig::from_json_file(&path).expect("load");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_profiles_capabilities() {
        let stalker = PursuitProfile::Stalker.config();
        assert!(stalker.hearing.is_some());
        assert!(stalker.elevation.is_none());

        let aggressive = PursuitProfile::Aggressive.config();
        assert_eq!(aggressive.sight_range, 25.0);
        assert_eq!(aggressive.field_of_view, 140.0);
        assert!(aggressive.elevation.is_some());
        assert!(aggressive.wander.is_some());

        let sentry = PursuitProfile::Sentry.config();
        assert_eq!(sentry.memory_duration, 0.0);

        let stealth = PursuitProfile::StealthChaser.config();
        assert_eq!(stealth.field_of_view, 90.0);
        assert_eq!(stealth.eye_height, 1.5);

        let jumper = PursuitProfile::Jumper.config();
        assert_eq!(jumper.field_of_view, 360.0);
        assert!(jumper.obstruction_filter.is_empty());
        assert_eq!(jumper.special.map(|s| s.threshold), Some(1));
    }
}
