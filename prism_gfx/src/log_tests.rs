//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger and the process-wide logger.

use crate::log::{self, Logger, LogEntry, LogSeverity, DefaultLogger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// Helpers
// ============================================================================

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "prism::Test".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

/// Captures entries whose source starts with `prefix`
struct CaptureLogger {
    prefix: &'static str,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn install(prefix: &'static str) -> Arc<Mutex<Vec<LogEntry>>> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        log::set_logger(CaptureLogger { prefix, entries: entries.clone() });
        entries
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with(self.prefix) {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

const ALL_SEVERITIES: [LogSeverity; 5] = [
    LogSeverity::Trace,
    LogSeverity::Debug,
    LogSeverity::Info,
    LogSeverity::Warn,
    LogSeverity::Error,
];

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug_names() {
    let names: Vec<String> = ALL_SEVERITIES.iter().map(|s| format!("{:?}", s)).collect();
    assert_eq!(names, vec!["Trace", "Debug", "Info", "Warn", "Error"]);
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_without_location() {
    let e = entry(LogSeverity::Info, None, None);
    assert_eq!(e.source, "prism::Test");
    assert_eq!(e.message, "Info message");
    assert!(e.file.is_none());
    assert!(e.line.is_none());
}

#[test]
fn test_log_entry_with_location_clone() {
    let e1 = entry(LogSeverity::Error, Some("pipeline.rs"), Some(42));
    let e2 = e1.clone();
    assert_eq!(e2.severity, LogSeverity::Error);
    assert_eq!(e2.file, Some("pipeline.rs"));
    assert_eq!(e2.line, Some(42));
    assert_eq!(e1.timestamp, e2.timestamp);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in ALL_SEVERITIES {
        // Both output branches, must not panic
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("render_device.rs"), Some(7)));
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}

// ============================================================================
// GLOBAL LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_emit_routes_to_installed_logger() {
    let entries = CaptureLogger::install("prism::LogTest");

    log::emit(LogSeverity::Info, "prism::LogTest", "hello".to_string());
    log::emit(LogSeverity::Warn, "prism::LogTest", "careful".to_string());

    log::reset_logger();
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].message, "hello");
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert!(captured[1].file.is_none());
}

#[test]
#[serial]
fn test_emit_detailed_carries_location() {
    let entries = CaptureLogger::install("prism::LogTest");

    log::emit_detailed(LogSeverity::Error, "prism::LogTest", "boom".to_string(), "mesh.rs", 12);

    log::reset_logger();
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].file, Some("mesh.rs"));
    assert_eq!(captured[0].line, Some(12));
}

#[test]
#[serial]
fn test_macros_use_severity_and_location() {
    let entries = CaptureLogger::install("prism::MacroTest");

    crate::engine_trace!("prism::MacroTest", "t {}", 1);
    crate::engine_debug!("prism::MacroTest", "d {}", 2);
    crate::engine_info!("prism::MacroTest", "i {}", 3);
    crate::engine_warn!("prism::MacroTest", "w {}", 4);
    crate::engine_error!("prism::MacroTest", "e {}", 5);

    log::reset_logger();
    let captured = entries.lock().unwrap();
    let severities: Vec<LogSeverity> = captured.iter().map(|e| e.severity).collect();
    assert_eq!(severities, ALL_SEVERITIES.to_vec());
    assert_eq!(captured[2].message, "i 3");

    // Only errors carry file:line
    assert!(captured[..4].iter().all(|e| e.file.is_none()));
    assert_eq!(captured[4].file, Some(file!()));
    assert!(captured[4].line.is_some());
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    let entries = CaptureLogger::install("prism::ResetTest");
    log::reset_logger();

    log::emit(LogSeverity::Info, "prism::ResetTest", "after reset".to_string());

    assert!(entries.lock().unwrap().is_empty());
}
