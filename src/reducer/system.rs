//! Startup, quit, timers, logs and file/snapshot results.

use crate::effect::Effect;
use crate::mvi::{Intent, Reducer};
use crate::state::{AppState, LogLevel};

/// Drives the busy indicator while workflows are in flight.
pub const SPINNER_TIMER: &str = "spinner";
/// Periodically snapshots the state when a snapshot path is set.
pub const AUTOSAVE_TIMER: &str = "autosave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupOptions {
    pub spinner_ms: u64,
    pub autosave_ms: u64,
    pub restore_snapshot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SystemIntent {
    Started(StartupOptions),
    Quit,
    Tick { timer_id: String },
    Log { level: LogLevel, message: String },
    Error { message: String },
    SaveSnapshot,
    FileRead { path: String, contents: String },
    FileWritten { path: String },
    StateSaved { path: String },
    StateLoaded(Box<AppState>),
    EffectCompleted { description: String },
    Unrecognized { tag: &'static str },
}

impl Intent for SystemIntent {}

pub struct SystemReducer;

impl Reducer for SystemReducer {
    type State = AppState;
    type Intent = SystemIntent;
    type Effect = Effect;

    fn reduce(mut state: AppState, intent: SystemIntent) -> (AppState, Vec<Effect>) {
        match intent {
            SystemIntent::Started(options) => {
                let mut effects = Vec::new();
                if options.spinner_ms > 0 {
                    effects.push(Effect::StartTimer {
                        timer_id: SPINNER_TIMER.to_string(),
                        delay_ms: options.spinner_ms,
                    });
                }
                if let Some(path) = state.snapshot_path.clone() {
                    if options.autosave_ms > 0 {
                        effects.push(Effect::StartTimer {
                            timer_id: AUTOSAVE_TIMER.to_string(),
                            delay_ms: options.autosave_ms,
                        });
                    }
                    if options.restore_snapshot {
                        effects.push(Effect::LoadState { path });
                    }
                }
                let session = state.session_id.as_deref().unwrap_or("anonymous");
                let line = format!("session {session} started");
                effects.push(Effect::log_info(line.clone()));
                effects.push(Effect::Render);
                state.push_log(LogLevel::Info, line);
                (state, effects)
            }

            // Same result whatever the current state.
            SystemIntent::Quit => {
                state.running = false;
                (state, vec![Effect::QuitApp, Effect::log_info("quit requested")])
            }

            SystemIntent::Tick { timer_id } => match timer_id.as_str() {
                SPINNER_TIMER => {
                    if !state.has_active_workflows() {
                        return (state, Vec::new());
                    }
                    state.ui.spinner_frame = state.ui.spinner_frame.wrapping_add(1);
                    (state, vec![Effect::Render])
                }
                AUTOSAVE_TIMER => {
                    let effects = save_snapshot(&state).into_iter().collect();
                    (state, effects)
                }
                other => {
                    let note = format!("tick from unknown timer {other}");
                    (state, vec![Effect::log_debug(note)])
                }
            },

            SystemIntent::Log { level, message } => {
                state.push_log(level, message);
                (state, vec![Effect::Render])
            }

            SystemIntent::Error { message } => {
                state.push_log(LogLevel::Error, message.clone());
                state.error_message = Some(message);
                (state, vec![Effect::Render])
            }

            SystemIntent::SaveSnapshot => match save_snapshot(&state) {
                Some(effect) => (state, vec![effect]),
                None => (state, vec![Effect::log_debug("no snapshot path configured")]),
            },

            SystemIntent::FileRead { path, contents } => {
                state.push_log(
                    LogLevel::Info,
                    format!("read {} bytes from {path}", contents.len()),
                );
                (state, vec![Effect::Render])
            }

            SystemIntent::FileWritten { path } => {
                state.push_log(LogLevel::Info, format!("wrote {path}"));
                (state, vec![Effect::Render])
            }

            SystemIntent::StateSaved { path } => {
                state.push_log(LogLevel::Debug, format!("state saved to {path}"));
                (state, vec![Effect::Render])
            }

            SystemIntent::StateLoaded(loaded) => restore(state, *loaded),

            SystemIntent::EffectCompleted { description } => {
                state.push_log(LogLevel::Info, description);
                (state, vec![Effect::Render])
            }

            SystemIntent::Unrecognized { tag } => {
                let note = format!("ignored unrecognized message ({tag})");
                (state, vec![Effect::log_debug(note)])
            }
        }
    }
}

fn save_snapshot(state: &AppState) -> Option<Effect> {
    let path = state.snapshot_path.clone()?;
    Some(Effect::SaveState {
        path,
        state: Box::new(state.clone()),
    })
}

/// Adopt a loaded snapshot.
///
/// Lifecycle fields of the live session win over the snapshot. Workflows
/// that were still in flight when the snapshot was taken have no task
/// behind them any more, so they are marked failed. Workflows started in
/// this session are merged back in: an active live entry replaces a
/// snapshot entry with the same id, and the id sequence never rewinds.
fn restore(current: AppState, mut loaded: AppState) -> (AppState, Vec<Effect>) {
    loaded.running = current.running;
    loaded.ui.viewport = current.ui.viewport;
    loaded.snapshot_path = current.snapshot_path.or(loaded.snapshot_path);
    loaded.session_id = current.session_id.or(loaded.session_id);
    loaded.next_workflow_seq = loaded.next_workflow_seq.max(current.next_workflow_seq);

    let mut interrupted = 0usize;
    for wf in loaded.workflows.values_mut() {
        if wf.fail("interrupted before the snapshot was restored") {
            interrupted += 1;
        }
    }
    let restored = loaded.workflows.len();
    for (id, wf) in current.workflows {
        if !wf.is_terminal() || !loaded.workflows.contains_key(&id) {
            loaded.workflows.insert(id, wf);
        }
    }
    let mut line = format!("restored {restored} workflows from snapshot");
    if interrupted > 0 {
        line.push_str(&format!(", {interrupted} interrupted"));
    }
    loaded.push_log(LogLevel::Info, line);
    (loaded, vec![Effect::Render])
}
