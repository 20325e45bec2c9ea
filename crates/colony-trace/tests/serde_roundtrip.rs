#![cfg(feature = "serde")]

use colony_trace::{TraceEvent, TraceLog};

#[test]
fn trace_log_serializes_as_plain_json() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(5, "task.cancel").for_agent(2).with_a(7));

    let json = serde_json::to_string(&log).unwrap();
    assert!(json.contains("\"tag\":\"task.cancel\""));

    let back: TraceLog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, log);
}
