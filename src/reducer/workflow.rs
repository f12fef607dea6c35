//! Workflow lifecycle and the workflows view.
//!
//! Starting a workflow both records it as `Pending` and asks the executor to
//! run it. Every later message only moves a workflow forward; messages for
//! unknown or already finished workflows leave the state alone and produce a
//! single debug log effect.

use crate::effect::Effect;
use crate::mvi::{Intent, Reducer};
use crate::state::{AppState, LogLevel, WorkflowKind, WorkflowRequest, WorkflowState};

/// How a workflow ended, as reported by a completion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowIntent {
    Start {
        workflow_id: String,
        request: WorkflowRequest,
    },
    Started {
        workflow_id: String,
    },
    Progress {
        workflow_id: String,
        progress: f64,
    },
    Delta {
        workflow_id: String,
        delta: String,
    },
    Finished {
        workflow_id: String,
        outcome: Outcome,
    },
    CommandResult {
        request_id: Option<String>,
        program: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
        timed_out: bool,
    },
    CancelRequested {
        workflow_id: String,
    },
    Cancelled {
        workflow_id: String,
    },
    SelectNext,
    SelectPrev,
    CancelSelected,
    CopySelected,
}

impl Intent for WorkflowIntent {}

pub struct WorkflowReducer;

impl Reducer for WorkflowReducer {
    type State = AppState;
    type Intent = WorkflowIntent;
    type Effect = Effect;

    fn reduce(mut state: AppState, intent: WorkflowIntent) -> (AppState, Vec<Effect>) {
        match intent {
            WorkflowIntent::Start {
                workflow_id,
                request,
            } => start(state, workflow_id, request),

            WorkflowIntent::Started { workflow_id } => {
                let changed = state
                    .workflows
                    .get_mut(&workflow_id)
                    .is_some_and(WorkflowState::mark_running);
                render_if(state, changed)
            }

            WorkflowIntent::Progress {
                workflow_id,
                progress,
            } => {
                let changed = state
                    .workflows
                    .get_mut(&workflow_id)
                    .is_some_and(|wf| wf.set_progress(progress));
                render_if(state, changed)
            }

            WorkflowIntent::Delta { workflow_id, delta } => {
                match state.workflows.get_mut(&workflow_id) {
                    Some(wf) if !wf.is_terminal() => {
                        wf.append_output(&delta);
                        (state, vec![Effect::Render])
                    }
                    Some(_) => {
                        let note = format!("dropped output for finished workflow {workflow_id}");
                        (state, vec![Effect::log_debug(note)])
                    }
                    None => (state, vec![unknown_workflow(&workflow_id)]),
                }
            }

            WorkflowIntent::Finished {
                workflow_id,
                outcome,
            } => finish(state, &workflow_id, outcome),

            WorkflowIntent::CommandResult {
                request_id,
                program,
                exit_code,
                stdout,
                stderr,
                timed_out,
            } => {
                let tracked = request_id.as_deref().and_then(|id| {
                    state
                        .workflows
                        .get_mut(id)
                        .filter(|wf| wf.kind() == WorkflowKind::Command && !wf.is_terminal())
                });
                match tracked {
                    Some(wf) => {
                        wf.record_command_result(&stdout, &stderr, exit_code);
                        let id = wf.id.clone();
                        let outcome = if timed_out {
                            Outcome::Failed(format!("{program} timed out"))
                        } else if exit_code != 0 {
                            Outcome::Failed(format!("{program} exited with code {exit_code}"))
                        } else {
                            Outcome::Succeeded
                        };
                        finish(state, &id, outcome)
                    }
                    None => {
                        let level = if exit_code == 0 && !timed_out {
                            LogLevel::Info
                        } else {
                            LogLevel::Warn
                        };
                        let suffix = if timed_out { " (timed out)" } else { "" };
                        state.push_log(level, format!("{program} exited with code {exit_code}{suffix}"));
                        (state, vec![Effect::Render])
                    }
                }
            }

            WorkflowIntent::CancelRequested { workflow_id } => request_cancel(state, &workflow_id),

            WorkflowIntent::Cancelled { workflow_id } => {
                match state.workflows.get_mut(&workflow_id) {
                    Some(wf) => {
                        if !wf.cancel() {
                            return (state, Vec::new());
                        }
                        state.push_log(LogLevel::Info, format!("workflow {workflow_id} cancelled"));
                        (state, vec![Effect::Render])
                    }
                    None => (state, vec![unknown_workflow(&workflow_id)]),
                }
            }

            WorkflowIntent::SelectNext => move_selection(state, 1),
            WorkflowIntent::SelectPrev => move_selection(state, -1),

            WorkflowIntent::CancelSelected => match state.selected_workflow() {
                Some(wf) => {
                    let id = wf.id.clone();
                    request_cancel(state, &id)
                }
                None => (state, Vec::new()),
            },

            WorkflowIntent::CopySelected => {
                let text = state
                    .selected_workflow()
                    .map(|wf| wf.output().to_string())
                    .unwrap_or_default();
                if text.is_empty() {
                    return (state, vec![Effect::log_debug("nothing to copy")]);
                }
                (state, vec![Effect::CopyToClipboard { text }])
            }
        }
    }
}

/// Insert a pending workflow and request its execution.
///
/// An id that is still pending or running is rejected; a finished one may be
/// started again and replaces the old record.
pub(super) fn start(
    mut state: AppState,
    workflow_id: String,
    request: WorkflowRequest,
) -> (AppState, Vec<Effect>) {
    if workflow_id.trim().is_empty() {
        return (state, vec![Effect::log_error("refusing to start workflow with blank id")]);
    }
    if state
        .workflows
        .get(&workflow_id)
        .is_some_and(|wf| !wf.is_terminal())
    {
        let message = format!("workflow {workflow_id} is already active");
        return (state, vec![Effect::log_error(message)]);
    }

    let run = match &request {
        WorkflowRequest::Agent { prompt } => Effect::SpawnAgent {
            workflow_id: workflow_id.clone(),
            kind: WorkflowKind::Agent,
            prompt: prompt.clone(),
        },
        WorkflowRequest::Command {
            program,
            args,
            cwd,
            timeout_ms,
        } => Effect::RunCommand {
            request_id: Some(workflow_id.clone()),
            program: program.clone(),
            args: args.clone(),
            cwd: cwd.clone(),
            timeout_ms: *timeout_ms,
        },
    };

    let kind = request.kind();
    state
        .workflows
        .insert(workflow_id.clone(), WorkflowState::pending(&workflow_id, request));
    if state.workflows_view.selected.is_none() {
        state.workflows_view.selected = Some(workflow_id.clone());
    }
    state.push_log(
        LogLevel::Info,
        format!("{} workflow {workflow_id} requested", kind.as_str()),
    );
    (state, vec![run, Effect::Render])
}

fn finish(mut state: AppState, workflow_id: &str, outcome: Outcome) -> (AppState, Vec<Effect>) {
    let Some(wf) = state.workflows.get_mut(workflow_id) else {
        return (state, vec![unknown_workflow(workflow_id)]);
    };
    let changed = match &outcome {
        Outcome::Succeeded => wf.complete(),
        Outcome::Failed(error) => wf.fail(error),
    };
    if !changed {
        let note = format!("ignored completion for finished workflow {workflow_id}");
        return (state, vec![Effect::log_debug(note)]);
    }
    let (level, line) = match &wf.error {
        Some(error) => (LogLevel::Error, format!("workflow {workflow_id} failed: {error}")),
        None => (LogLevel::Info, format!("workflow {workflow_id} completed")),
    };
    state.push_log(level, line);
    (state, vec![Effect::Render])
}

fn request_cancel(state: AppState, workflow_id: &str) -> (AppState, Vec<Effect>) {
    let Some(wf) = state.workflows.get(workflow_id) else {
        return (state, vec![unknown_workflow(workflow_id)]);
    };
    if wf.is_terminal() {
        let note = format!("workflow {workflow_id} already finished");
        return (state, vec![Effect::log_debug(note)]);
    }
    let cancel = match wf.kind() {
        WorkflowKind::Agent => Effect::CancelAgent {
            workflow_id: workflow_id.to_string(),
        },
        WorkflowKind::Command => Effect::CancelWorkflow {
            workflow_id: workflow_id.to_string(),
        },
    };
    (
        state,
        vec![cancel, Effect::log_info(format!("cancelling workflow {workflow_id}"))],
    )
}

/// Step through workflow ids in key order, stopping at either end.
fn move_selection(mut state: AppState, step: isize) -> (AppState, Vec<Effect>) {
    let ids: Vec<&String> = state.workflows.keys().collect();
    if ids.is_empty() {
        return (state, Vec::new());
    }
    let current = state
        .workflows_view
        .selected
        .as_ref()
        .and_then(|selected| ids.iter().position(|id| *id == selected));
    let next = match current {
        Some(index) => index.saturating_add_signed(step).min(ids.len() - 1),
        None => 0,
    };
    let next_id = ids[next].clone();
    if state.workflows_view.selected.as_ref() == Some(&next_id) {
        return (state, Vec::new());
    }
    state.workflows_view.selected = Some(next_id);
    (state, vec![Effect::Render])
}

fn render_if(state: AppState, changed: bool) -> (AppState, Vec<Effect>) {
    let effects = if changed { vec![Effect::Render] } else { Vec::new() };
    (state, effects)
}

fn unknown_workflow(workflow_id: &str) -> Effect {
    Effect::log_debug(format!("no workflow with id {workflow_id}"))
}
