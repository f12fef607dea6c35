//! The transition function.
//!
//! [`reduce`] is the only entry point the driver loop uses. It routes each
//! message to a sub-reducer by tag:
//!
//! - `navigation` - view switching, scrolling, resize, error dismissal
//! - `commands` - command list selection and activation
//! - `workflow` - workflow lifecycle and the workflows view
//! - `system` - startup, quit, timers, logs, file and snapshot results
//!
//! Key presses are first mapped to a sub-reducer intent by `keys`, which
//! depends on the active view.

mod commands;
mod keys;
mod navigation;
mod system;
mod workflow;

use crate::effect::Effect;
use crate::msg::{MouseKind, Msg};
use crate::mvi::Reducer;
use crate::state::AppState;

pub use commands::{CommandListIntent, CommandListReducer};
pub use keys::{route_key, KeyRoute};
pub use navigation::{NavIntent, NavigationReducer};
pub use system::{StartupOptions, SystemIntent, SystemReducer, AUTOSAVE_TIMER, SPINNER_TIMER};
pub use workflow::{Outcome, WorkflowIntent, WorkflowReducer};

/// Pure `(state, message) -> (state, effects)`.
///
/// The borrowed state is never modified; the returned state is a new value.
pub fn reduce(state: &AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    AppReducer::reduce(state.clone(), msg)
}

/// Root reducer: dispatches on the message tag.
pub struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;
    type Intent = Msg;
    type Effect = Effect;

    fn reduce(state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
        match msg {
            Msg::KeyPressed { key } => match route_key(&state, &key) {
                Some(route) => dispatch_route(state, route),
                None => (state, Vec::new()),
            },
            Msg::Mouse { kind, column, row } => {
                let intent = match kind {
                    MouseKind::Click => NavIntent::Pointer { column, row },
                    MouseKind::ScrollUp => NavIntent::Scroll { delta: -1 },
                    MouseKind::ScrollDown => NavIntent::Scroll { delta: 1 },
                };
                NavigationReducer::reduce(state, intent)
            }
            Msg::Resized { cols, rows } => {
                NavigationReducer::reduce(state, NavIntent::Resize { cols, rows })
            }
            Msg::SwitchView { view } => NavigationReducer::reduce(state, NavIntent::SwitchView(view)),
            Msg::DismissError => NavigationReducer::reduce(state, NavIntent::DismissError),

            Msg::Tick { timer_id } => SystemReducer::reduce(state, SystemIntent::Tick { timer_id }),

            Msg::CommandCompleted {
                request_id,
                program,
                exit_code,
                stdout,
                stderr,
                timed_out,
            } => WorkflowReducer::reduce(
                state,
                WorkflowIntent::CommandResult {
                    request_id,
                    program,
                    exit_code,
                    stdout,
                    stderr,
                    timed_out,
                },
            ),
            Msg::StreamDelta { workflow_id, delta } => {
                WorkflowReducer::reduce(state, WorkflowIntent::Delta { workflow_id, delta })
            }
            Msg::AgentCompleted { workflow_id } => WorkflowReducer::reduce(
                state,
                WorkflowIntent::Finished {
                    workflow_id,
                    outcome: Outcome::Succeeded,
                },
            ),

            Msg::FileReadCompleted { path, contents } => {
                SystemReducer::reduce(state, SystemIntent::FileRead { path, contents })
            }
            Msg::FileWritten { path } => {
                SystemReducer::reduce(state, SystemIntent::FileWritten { path })
            }
            Msg::StateSaved { path } => SystemReducer::reduce(state, SystemIntent::StateSaved { path }),
            Msg::StateLoaded { state: loaded } => {
                SystemReducer::reduce(state, SystemIntent::StateLoaded(loaded))
            }
            Msg::EffectCompleted { description } => {
                SystemReducer::reduce(state, SystemIntent::EffectCompleted { description })
            }

            Msg::WorkflowStartRequested {
                workflow_id,
                request,
            } => WorkflowReducer::reduce(
                state,
                WorkflowIntent::Start {
                    workflow_id,
                    request,
                },
            ),
            Msg::WorkflowStarted { workflow_id } => {
                WorkflowReducer::reduce(state, WorkflowIntent::Started { workflow_id })
            }
            Msg::WorkflowProgress {
                workflow_id,
                progress,
            } => WorkflowReducer::reduce(
                state,
                WorkflowIntent::Progress {
                    workflow_id,
                    progress,
                },
            ),
            Msg::WorkflowCompleted {
                workflow_id,
                success,
                error,
            } => {
                let outcome = if success {
                    Outcome::Succeeded
                } else {
                    Outcome::Failed(error.unwrap_or_default())
                };
                WorkflowReducer::reduce(state, WorkflowIntent::Finished { workflow_id, outcome })
            }
            Msg::WorkflowFailed { workflow_id, error } => WorkflowReducer::reduce(
                state,
                WorkflowIntent::Finished {
                    workflow_id,
                    outcome: Outcome::Failed(error),
                },
            ),
            Msg::WorkflowCancelRequested { workflow_id } => {
                WorkflowReducer::reduce(state, WorkflowIntent::CancelRequested { workflow_id })
            }
            Msg::WorkflowCancelled { workflow_id } => {
                WorkflowReducer::reduce(state, WorkflowIntent::Cancelled { workflow_id })
            }

            Msg::AppStarted {
                spinner_ms,
                autosave_ms,
                restore_snapshot,
            } => SystemReducer::reduce(
                state,
                SystemIntent::Started(StartupOptions {
                    spinner_ms,
                    autosave_ms,
                    restore_snapshot,
                }),
            ),
            Msg::Quit => SystemReducer::reduce(state, SystemIntent::Quit),
            Msg::Log { level, message } => {
                SystemReducer::reduce(state, SystemIntent::Log { level, message })
            }
            Msg::ErrorOccurred { message } => {
                SystemReducer::reduce(state, SystemIntent::Error { message })
            }
            Msg::Unknown => SystemReducer::reduce(
                state,
                SystemIntent::Unrecognized {
                    tag: Msg::Unknown.tag(),
                },
            ),
        }
    }
}

fn dispatch_route(state: AppState, route: KeyRoute) -> (AppState, Vec<Effect>) {
    match route {
        KeyRoute::Navigation(intent) => NavigationReducer::reduce(state, intent),
        KeyRoute::Commands(intent) => CommandListReducer::reduce(state, intent),
        KeyRoute::Workflow(intent) => WorkflowReducer::reduce(state, intent),
        KeyRoute::System(intent) => SystemReducer::reduce(state, intent),
    }
}
