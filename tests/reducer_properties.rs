mod common;

use common::{sample_commands, sample_state};
use devloop::effect::Effect;
use devloop::msg::Msg;
use devloop::reducer::reduce;
use devloop::state::{AppState, View, WorkflowRequest, WorkflowStatus};

fn agent(prompt: &str) -> WorkflowRequest {
    WorkflowRequest::Agent {
        prompt: prompt.to_string(),
    }
}

fn start(id: &str) -> Msg {
    Msg::WorkflowStartRequested {
        workflow_id: id.to_string(),
        request: agent("say hi"),
    }
}

/// Feed messages in order, returning the final state and the effects of
/// the last step.
fn run(state: &AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    let mut state = state.clone();
    let mut effects = Vec::new();
    for msg in msgs {
        let (next, out) = reduce(&state, msg);
        state = next;
        effects = out;
    }
    (state, effects)
}

fn messages() -> Vec<Msg> {
    vec![
        Msg::key("j"),
        Msg::key("enter"),
        start("wf-1"),
        Msg::StreamDelta {
            workflow_id: "wf-1".to_string(),
            delta: "partial".to_string(),
        },
        Msg::Tick {
            timer_id: "spinner".to_string(),
        },
        Msg::Resized { cols: 100, rows: 30 },
        Msg::error("boom"),
        Msg::key("tab"),
        Msg::Unknown,
        Msg::Quit,
    ]
}

/// Equal inputs give equal outputs.
#[test]
fn test_reduce_is_deterministic() {
    let state = sample_state();
    for msg in messages() {
        let first = reduce(&state, msg.clone());
        let second = reduce(&state, msg);
        assert_eq!(first, second);
    }
}

/// The borrowed state is never modified.
#[test]
fn test_reduce_leaves_input_untouched() {
    let state = sample_state();
    let before = state.clone();
    for msg in messages() {
        let _ = reduce(&state, msg);
        assert_eq!(state, before);
    }
}

/// Every reachable state passes validation.
#[test]
fn test_reachable_states_are_valid() {
    let mut state = sample_state();
    for msg in messages() {
        state = reduce(&state, msg).0;
        assert!(state.validate().is_ok(), "invalid state: {:?}", state.validate());
    }
}

/// Quit gives the same result from any state, including after a quit.
#[test]
fn test_quit_is_idempotent() {
    let expected = vec![
        Effect::QuitApp,
        Effect::LogInfo {
            message: "quit requested".to_string(),
        },
    ];
    let (once, effects) = reduce(&sample_state(), Msg::Quit);
    assert!(!once.running);
    assert_eq!(effects, expected);

    let (twice, effects) = reduce(&once, Msg::Quit);
    assert!(!twice.running);
    assert_eq!(effects, expected);
}

/// `j` moves down one entry and clamps at the end of the list.
#[test]
fn test_j_moves_selection_and_clamps() {
    let state = sample_state();
    assert_eq!(state.commands.entries.len(), 3);

    let (state, effects) = reduce(&state, Msg::key("j"));
    assert_eq!(state.commands.selected_index, 1);
    assert_eq!(effects, vec![Effect::Render]);

    let (state, _) = reduce(&state, Msg::key("j"));
    assert_eq!(state.commands.selected_index, 2);
    let (state, effects) = reduce(&state, Msg::key("j"));
    assert_eq!(state.commands.selected_index, 2);
    assert!(effects.is_empty());
}

/// Start, stream, complete.
#[test]
fn test_workflow_happy_path() {
    let (state, effects) = reduce(&AppState::default(), start("wf-1"));
    assert_eq!(
        state.workflow("wf-1").map(|wf| wf.status),
        Some(WorkflowStatus::Pending)
    );
    assert!(effects.contains(&Effect::SpawnAgent {
        workflow_id: "wf-1".to_string(),
        kind: devloop::state::WorkflowKind::Agent,
        prompt: "say hi".to_string(),
    }));
    assert!(effects.contains(&Effect::Render));

    let (state, _) = run(
        &state,
        vec![
            Msg::StreamDelta {
                workflow_id: "wf-1".to_string(),
                delta: "hi".to_string(),
            },
            Msg::WorkflowCompleted {
                workflow_id: "wf-1".to_string(),
                success: true,
                error: None,
            },
        ],
    );
    let wf = state.workflow("wf-1").expect("workflow");
    assert_eq!(wf.status, WorkflowStatus::Completed);
    assert_eq!(wf.progress, 1.0);
    assert!(wf.output().contains("hi"));
}

/// A second start for an active id is rejected without touching the state.
#[test]
fn test_double_start_is_rejected() {
    let (state, _) = reduce(&AppState::default(), start("wf-1"));
    let (again, effects) = reduce(&state, start("wf-1"));
    assert_eq!(again, state);
    assert!(matches!(effects.as_slice(), [Effect::LogError { .. }]));
}

/// A finished id can be started again.
#[test]
fn test_restart_after_terminal_status() {
    let (state, _) = run(
        &AppState::default(),
        vec![
            start("wf-1"),
            Msg::WorkflowFailed {
                workflow_id: "wf-1".to_string(),
                error: "nope".to_string(),
            },
            start("wf-1"),
        ],
    );
    assert_eq!(
        state.workflow("wf-1").map(|wf| wf.status),
        Some(WorkflowStatus::Pending)
    );
}

/// Terminal statuses never change again.
#[test]
fn test_status_is_monotonic() {
    let (state, _) = run(
        &AppState::default(),
        vec![
            start("wf-1"),
            Msg::WorkflowCancelled {
                workflow_id: "wf-1".to_string(),
            },
        ],
    );
    let (after, effects) = reduce(
        &state,
        Msg::AgentCompleted {
            workflow_id: "wf-1".to_string(),
        },
    );
    assert_eq!(after, state);
    assert!(matches!(effects.as_slice(), [Effect::LogDebug { .. }]));

    let (after, _) = reduce(
        &state,
        Msg::StreamDelta {
            workflow_id: "wf-1".to_string(),
            delta: "late".to_string(),
        },
    );
    assert_eq!(after, state);
}

/// A failed completion without an error still explains itself.
#[test]
fn test_failure_without_error_gets_default_message() {
    let (state, _) = run(
        &AppState::default(),
        vec![
            start("wf-1"),
            Msg::WorkflowCompleted {
                workflow_id: "wf-1".to_string(),
                success: false,
                error: None,
            },
        ],
    );
    let wf = state.workflow("wf-1").expect("workflow");
    assert_eq!(wf.status, WorkflowStatus::Failed);
    assert_eq!(wf.error.as_deref(), Some("workflow reported failure"));
}

/// Command results settle the command workflow they belong to.
#[test]
fn test_command_result_settles_tracked_workflow() {
    let state = AppState::new(sample_commands());
    // Select "fail" and run it.
    let (state, _) = run(&state, vec![Msg::key("j"), Msg::key("j"), Msg::key("enter")]);
    assert!(state.workflow("fail-0").is_some());

    let (state, _) = reduce(
        &state,
        Msg::CommandCompleted {
            request_id: Some("fail-0".to_string()),
            program: "sh".to_string(),
            exit_code: 3,
            stdout: String::new(),
            stderr: "bad".to_string(),
            timed_out: false,
        },
    );
    let wf = state.workflow("fail-0").expect("workflow");
    assert_eq!(wf.status, WorkflowStatus::Failed);
    assert_eq!(wf.error.as_deref(), Some("sh exited with code 3"));
}

/// Untracked command results only reach the log view.
#[test]
fn test_untracked_command_result_is_logged() {
    let state = AppState::default();
    let (next, effects) = reduce(
        &state,
        Msg::CommandCompleted {
            request_id: None,
            program: "ls".to_string(),
            exit_code: 0,
            stdout: "a\nb".to_string(),
            stderr: String::new(),
            timed_out: false,
        },
    );
    assert!(next.workflows.is_empty());
    assert_eq!(next.logs.entries.len(), state.logs.entries.len() + 1);
    assert_eq!(effects, vec![Effect::Render]);
}

/// Cancelling the selected workflow from the workflows view.
#[test]
fn test_cancel_key_requests_cancellation() {
    let (state, _) = run(
        &AppState::default(),
        vec![start("wf-1"), Msg::SwitchView { view: View::Workflows }],
    );
    let (after, effects) = reduce(&state, Msg::key("c"));
    assert_eq!(after.workflow("wf-1").map(|wf| wf.status), Some(WorkflowStatus::Pending));
    assert_eq!(
        effects[0],
        Effect::CancelAgent {
            workflow_id: "wf-1".to_string()
        }
    );
}

/// Unknown messages are a logged no-op.
#[test]
fn test_unknown_message_is_logged_noop() {
    let state = sample_state();
    let (next, effects) = reduce(&state, Msg::Unknown);
    assert_eq!(next, state);
    assert!(matches!(effects.as_slice(), [Effect::LogDebug { .. }]));
}

/// Errors are shown until dismissed.
#[test]
fn test_error_banner_and_dismiss() {
    let (state, _) = reduce(&sample_state(), Msg::error("disk full"));
    assert_eq!(state.error_message.as_deref(), Some("disk full"));
    let (state, effects) = reduce(&state, Msg::key("esc"));
    assert_eq!(state.error_message, None);
    assert_eq!(effects, vec![Effect::Render]);
}

/// Workflows started before a snapshot arrives survive the restore, and the
/// next run gets a fresh id.
#[test]
fn test_restore_keeps_live_workflows_and_sequence() {
    let live = AppState::new(sample_commands());
    let (live, _) = reduce(&live, Msg::key("enter"));
    assert!(live.workflow("ask-0").is_some());
    assert_eq!(live.next_workflow_seq, 1);

    let mut snapshot = AppState::new(sample_commands());
    snapshot.workflows.insert(
        "ask-0".to_string(),
        devloop::state::WorkflowState::pending("ask-0", agent("stale prompt")),
    );
    let (restored, _) = reduce(
        &live,
        Msg::StateLoaded {
            state: Box::new(snapshot),
        },
    );

    let wf = restored.workflow("ask-0").expect("live workflow kept");
    assert_eq!(wf.status, WorkflowStatus::Pending);
    assert_eq!(wf, live.workflow("ask-0").expect("live workflow"));
    assert_eq!(restored.next_workflow_seq, 1);
    assert!(restored.validate().is_ok());

    let (next, effects) = reduce(&restored, Msg::key("enter"));
    assert!(next.workflow("ask-1").is_some());
    assert!(!effects.iter().any(|effect| matches!(
        effect,
        Effect::SpawnAgent { workflow_id, .. } if workflow_id == "ask-0"
    )));
}
