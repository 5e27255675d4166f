//! Config logging test
//!
//! Clamp warnings из `PursuitConfig::sanitized` доходят до установленного LogPrinter,
//! а `set_log_level` отсекает уровни ниже порога.
//!
//! Logger глобальный — весь сценарий в одном тесте, чтобы параллельные тесты
//! не подменяли printer.

use std::sync::{Arc, Mutex};

use pursuit_simulation::logger::{self, LogLevel, LogPrinter};
use pursuit_simulation::PursuitConfig;

/// Printer, складывающий строки в общий буфер
#[derive(Clone, Default)]
struct RecordingLogger {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl RecordingLogger {
    fn take(&self) -> Vec<(LogLevel, String)> {
        self.lines
            .lock()
            .map(|mut lines| std::mem::take(&mut *lines))
            .unwrap_or_default()
    }
}

impl LogPrinter for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

#[test]
fn test_config_clamp_warnings_reach_installed_logger() {
    let recorder = RecordingLogger::default();
    logger::set_logger(Box::new(recorder.clone()));
    // Уровень как у headless bin: DEBUG отсекается, warnings проходят
    logger::set_log_level(LogLevel::Info);

    let config = PursuitConfig::from_json_str(r#"{ "chase_speed": -3.0 }"#).expect("valid json");
    assert_eq!(config.chase_speed, 0.0);

    let lines = recorder.take();
    assert!(
        lines
            .iter()
            .any(|(level, line)| *level == LogLevel::Warning && line.contains("chase_speed") && line.contains("clamped")),
        "clamp warning not logged: {:?}",
        lines
    );

    // Ниже порога — не доходит до printer'а
    logger::log("debug line");
    assert!(recorder.take().is_empty());

    // Ошибки загрузки хост логирует через log_error
    let err = PursuitConfig::from_json_file("/nonexistent/pursuit_config.json").expect_err("missing file");
    logger::log_error(&format!("{}", err));

    let lines = recorder.take();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, LogLevel::Error);
    assert!(lines[0].1.contains("pursuit_config.json"));

    // Порог Error — warnings тоже отсекаются
    logger::set_log_level(LogLevel::Error);
    let _ = PursuitConfig::from_json_str(r#"{ "patrol_speed": -1.0 }"#);
    assert!(recorder.take().is_empty());
}
