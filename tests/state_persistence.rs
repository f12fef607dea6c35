mod common;

use common::sample_state;
use devloop::effect::Effect;
use devloop::msg::Msg;
use devloop::reducer::reduce;
use devloop::state::persist::{decode, encode, from_json, from_yaml, to_json, to_yaml};
use devloop::state::{AppState, PersistError, StateFormat, WorkflowRequest};

/// A state with every kind of workflow outcome, log lines and an error.
fn busy_state() -> AppState {
    let mut state = sample_state().with_snapshot_path("/tmp/devloop-state.yaml");
    let msgs = vec![
        Msg::key("enter"),
        Msg::WorkflowStartRequested {
            workflow_id: "cmd-1".to_string(),
            request: WorkflowRequest::Command {
                program: "make".to_string(),
                args: vec!["test".to_string()],
                cwd: Some("/tmp".to_string()),
                timeout_ms: 1_000,
            },
        },
        Msg::StreamDelta {
            workflow_id: "ask-0".to_string(),
            delta: "half an answer".to_string(),
        },
        Msg::WorkflowProgress {
            workflow_id: "ask-0".to_string(),
            progress: 0.25,
        },
        Msg::CommandCompleted {
            request_id: Some("cmd-1".to_string()),
            program: "make".to_string(),
            exit_code: 2,
            stdout: "running".to_string(),
            stderr: "failed: 1 test".to_string(),
            timed_out: false,
        },
        Msg::error("something went wrong"),
        Msg::Resized { cols: 120, rows: 40 },
    ];
    for msg in msgs {
        state = reduce(&state, msg).0;
    }
    state
}

#[test]
fn test_json_round_trip_is_lossless() {
    let state = busy_state();
    let text = to_json(&state).expect("encode");
    assert_eq!(from_json(&text).expect("decode"), state);
}

#[test]
fn test_yaml_round_trip_is_lossless() {
    let state = busy_state();
    let text = to_yaml(&state).expect("encode");
    assert_eq!(from_yaml(&text).expect("decode"), state);
}

#[test]
fn test_format_dispatch_matches_direct_calls() {
    let state = busy_state();
    assert_eq!(
        encode(&state, StateFormat::Json).expect("json"),
        to_json(&state).expect("json")
    );
    let yaml = encode(&state, StateFormat::Yaml).expect("yaml");
    assert_eq!(decode(&yaml, StateFormat::Yaml).expect("decode"), state);
}

/// Workflows are keyed in a stable order so snapshots diff cleanly.
#[test]
fn test_json_is_canonical() {
    let state = busy_state();
    let first = to_json(&state).expect("encode");
    let second = to_json(&from_json(&first).expect("decode")).expect("encode");
    assert_eq!(first, second);
}

#[test]
fn test_snapshot_with_mismatched_workflow_key_is_rejected() {
    let state = busy_state();
    let text = to_json(&state)
        .expect("encode")
        .replacen("\"cmd-1\": {", "\"renamed\": {", 1);
    assert!(matches!(from_json(&text), Err(PersistError::Invalid(_))));
}

#[test]
fn test_foreign_message_tags_decode_as_unknown() {
    let msg: Msg = serde_json::from_str(r#"{"type": "telemetry_ping"}"#).expect("decode");
    assert_eq!(msg, Msg::Unknown);
    let effect: Effect = serde_json::from_str(r#"{"type": "launch_rocket"}"#).expect("decode");
    assert_eq!(effect, Effect::Unknown);
}

#[test]
fn test_messages_round_trip_through_json() {
    let msgs = vec![
        Msg::key("ctrl+c"),
        Msg::Tick {
            timer_id: "spinner".to_string(),
        },
        Msg::WorkflowCompleted {
            workflow_id: "wf-1".to_string(),
            success: false,
            error: Some("bad".to_string()),
        },
        Msg::StateLoaded {
            state: Box::new(busy_state()),
        },
    ];
    for msg in msgs {
        let text = serde_json::to_string(&msg).expect("encode");
        assert_eq!(serde_json::from_str::<Msg>(&text).expect("decode"), msg);
    }
}

/// Progress fractions reported by the echo agent survive a snapshot exactly.
#[test]
fn test_fractional_progress_round_trips() {
    let mut state = reduce(
        &AppState::default().with_snapshot_path("/tmp/devloop-state.json"),
        Msg::WorkflowStartRequested {
            workflow_id: "wf-1".to_string(),
            request: WorkflowRequest::Agent {
                prompt: "count".to_string(),
            },
        },
    )
    .0;
    for total in [3u32, 7, 11, 49, 397] {
        for step in 1..total {
            state = reduce(
                &state,
                Msg::WorkflowProgress {
                    workflow_id: "wf-1".to_string(),
                    progress: f64::from(step) / f64::from(total),
                },
            )
            .0;

            let json = to_json(&state).expect("encode json");
            assert_eq!(from_json(&json).expect("decode json"), state, "{step}/{total}");
            let yaml = to_yaml(&state).expect("encode yaml");
            assert_eq!(from_yaml(&yaml).expect("decode yaml"), state, "{step}/{total}");
        }
    }

    let loaded = Msg::StateLoaded {
        state: Box::new(state),
    };
    let text = serde_json::to_string(&loaded).expect("encode");
    assert_eq!(serde_json::from_str::<Msg>(&text).expect("decode"), loaded);
}
