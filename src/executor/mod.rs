//! The effect executor.
//!
//! The only place side effects happen. Each effect is either performed
//! inline and answered with a message, or handed to a background task that
//! reports back through the message channel. Long-lived work is tracked by
//! id in two maps, one for workflow tasks and one for timers, so it can be
//! cancelled or stopped later.
//!
//! Failures never escape `execute`; they come back as `ErrorOccurred` (or
//! a workflow-specific failure message).

mod agent;
mod clipboard;
mod error;
pub mod fs;
pub mod process;

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::effect::Effect;
use crate::msg::Msg;
use crate::state::WorkflowKind;

pub use agent::AgentBackend;
pub use error::ExecError;
pub use process::{ProcessOutput, ProcessSpec, SPAWN_FAILURE_EXIT_CODE, TIMEOUT_EXIT_CODE};

use clipboard::ClipboardHandler;

pub type MsgSender = mpsc::UnboundedSender<Msg>;
pub type MsgReceiver = mpsc::UnboundedReceiver<Msg>;

/// The message channel shared by the executor, its tasks and the input
/// adapter. Unbounded so a sender on the driver's own task never blocks.
pub fn channel() -> (MsgSender, MsgReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub agent: AgentBackend,
    /// Interpreter for `RunBashScript`, invoked as `<shell> -c <script>`.
    pub shell: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            agent: AgentBackend::default(),
            shell: "bash".to_string(),
        }
    }
}

struct TaskEntry {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TaskEntry {
    fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(body(cancel.clone()));
        Self { cancel, handle }
    }

    fn is_live(&self) -> bool {
        !self.handle.is_finished()
    }
}

pub struct Executor {
    tx: MsgSender,
    config: ExecutorConfig,
    /// Workflow tasks (agents and tracked commands), keyed by workflow id.
    tasks: HashMap<String, TaskEntry>,
    timers: HashMap<String, TaskEntry>,
    /// Untracked commands and cancellation waiters.
    detached: JoinSet<()>,
    clipboard: Option<ClipboardHandler>,
}

impl Executor {
    pub fn new(tx: MsgSender, config: ExecutorConfig) -> Self {
        Self {
            tx,
            config,
            tasks: HashMap::new(),
            timers: HashMap::new(),
            detached: JoinSet::new(),
            clipboard: None,
        }
    }

    /// Ids of workflow tasks that are still running, sorted.
    pub fn active_tasks(&mut self) -> Vec<String> {
        self.reap();
        let mut ids: Vec<String> = self.tasks.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids of running timers, sorted.
    pub fn active_timers(&mut self) -> Vec<String> {
        self.reap();
        let mut ids: Vec<String> = self.timers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Perform one effect. Never fails; problems are reported as messages.
    pub async fn execute(&mut self, effect: Effect) {
        self.dispatch(effect, false).await;
    }

    /// Cancel every task and timer and wait for them to wind down.
    /// Calling it again is a no-op.
    pub async fn shutdown(&mut self) {
        let entries: Vec<(String, TaskEntry)> =
            self.tasks.drain().chain(self.timers.drain()).collect();
        for (_, entry) in &entries {
            entry.cancel.cancel();
        }
        for (id, entry) in entries {
            join_quietly(&id, entry.handle).await;
        }
        self.detached.shutdown().await;
        debug!("executor shut down");
    }

    fn emit(&self, msg: Msg) {
        if self.tx.send(msg).is_err() {
            trace!("executor: message dropped (receiver gone)");
        }
    }

    fn report(&self, err: ExecError) {
        warn!("effect failed: {err}");
        self.emit(Msg::error(err.to_string()));
    }

    /// Drop bookkeeping for tasks that have already run to completion.
    fn reap(&mut self) {
        self.tasks.retain(|_, entry| entry.is_live());
        self.timers.retain(|_, entry| entry.is_live());
        while self.detached.try_join_next().is_some() {}
    }

    /// `inline` is set inside a batch, where commands are awaited in place
    /// so that later effects observe their completion.
    async fn dispatch(&mut self, effect: Effect, inline: bool) {
        self.reap();
        trace!(effect = effect.tag(), inline, "executing effect");

        match effect {
            Effect::WriteFile { path, contents } => match fs::write_file(&path, &contents).await {
                Ok(()) => self.emit(Msg::FileWritten { path }),
                Err(err) => self.report(err),
            },
            Effect::ReadFile { path } => match fs::read_file(&path).await {
                Ok(contents) => self.emit(Msg::FileReadCompleted { path, contents }),
                Err(err) => self.report(err),
            },
            Effect::DeleteFile { path } => match fs::delete_file(&path).await {
                Ok(()) => self.emit(Msg::EffectCompleted {
                    description: format!("deleted {path}"),
                }),
                Err(err) => self.report(err),
            },

            Effect::RunCommand {
                request_id,
                program,
                args,
                cwd,
                timeout_ms,
            } => {
                let spec = ProcessSpec {
                    program,
                    args,
                    cwd,
                    timeout: Duration::from_millis(timeout_ms),
                };
                self.run_command(request_id, spec, inline).await;
            }
            Effect::RunBashScript {
                request_id,
                script,
                cwd,
                timeout_ms,
            } => {
                let spec = ProcessSpec {
                    program: self.config.shell.clone(),
                    args: vec!["-c".to_string(), script],
                    cwd,
                    timeout: Duration::from_millis(timeout_ms),
                };
                self.run_command(request_id, spec, inline).await;
            }

            Effect::SpawnAgent {
                workflow_id,
                kind,
                prompt,
            } => self.spawn_agent(workflow_id, kind, prompt),
            Effect::CancelAgent { workflow_id } | Effect::CancelWorkflow { workflow_id } => {
                self.cancel_task(workflow_id)
            }

            Effect::StartTimer { timer_id, delay_ms } => self.start_timer(timer_id, delay_ms),
            Effect::StopTimer { timer_id } => self.stop_timer(&timer_id),

            Effect::SaveState { path, state } => match fs::save_state(&path, &state).await {
                Ok(()) => self.emit(Msg::StateSaved { path }),
                Err(err) => self.report(err),
            },
            Effect::LoadState { path } => match fs::load_state(&path).await {
                Ok(state) => self.emit(Msg::StateLoaded {
                    state: Box::new(state),
                }),
                Err(err) => self.report(err),
            },

            Effect::LogInfo { message } => info!(target: "devloop::effect", "{message}"),
            Effect::LogError { message } => error!(target: "devloop::effect", "{message}"),
            Effect::LogDebug { message } => debug!(target: "devloop::effect", "{message}"),

            // Drawing is owned by the frontend, which redraws after every
            // state change.
            Effect::Render => trace!("render requested"),
            Effect::QuitApp => self.emit(Msg::Quit),

            Effect::CopyToClipboard { text } => match self.copy_to_clipboard(&text) {
                Ok(()) => self.emit(Msg::EffectCompleted {
                    description: format!("copied {} characters to clipboard", text.chars().count()),
                }),
                Err(err) => self.report(err),
            },

            Effect::Batch { effects } => {
                for effect in effects {
                    Box::pin(self.dispatch(effect, true)).await;
                }
            }

            Effect::Unknown => self.report(ExecError::UnknownEffect),
        }
    }

    async fn run_command(&mut self, request_id: Option<String>, spec: ProcessSpec, inline: bool) {
        if let Some(id) = &request_id {
            if self.tasks.contains_key(id) {
                self.report(ExecError::AlreadyRunning {
                    workflow_id: id.clone(),
                });
                return;
            }
        }

        if inline {
            let msg = command_result(request_id, &spec, process::run(&spec).await);
            self.emit(msg);
            return;
        }

        let tx = self.tx.clone();
        match request_id {
            // Tracked so `CancelWorkflow` can stop it.
            Some(id) => {
                let entry = TaskEntry::spawn({
                    let id = id.clone();
                    move |cancel| async move {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => debug!(workflow_id = %id, "command cancelled"),
                            result = process::run(&spec) => {
                                let _ = tx.send(command_result(Some(id), &spec, result));
                            }
                        }
                    }
                });
                self.tasks.insert(id, entry);
            }
            None => {
                self.detached.spawn(async move {
                    let result = process::run(&spec).await;
                    let _ = tx.send(command_result(None, &spec, result));
                });
            }
        }
    }

    fn spawn_agent(&mut self, workflow_id: String, kind: WorkflowKind, prompt: String) {
        if kind != WorkflowKind::Agent {
            self.report(ExecError::NotAnAgent {
                kind: kind.as_str(),
            });
            return;
        }
        if self.tasks.contains_key(&workflow_id) {
            self.report(ExecError::AlreadyRunning { workflow_id });
            return;
        }

        debug!(workflow_id = %workflow_id, "spawning agent task");
        let backend = self.config.agent.clone();
        let tx = self.tx.clone();
        let entry = TaskEntry::spawn({
            let workflow_id = workflow_id.clone();
            move |cancel| agent::run(backend, workflow_id, prompt, cancel, tx)
        });
        self.tasks.insert(workflow_id, entry);
    }

    /// Request cancellation and report `WorkflowCancelled` once the task has
    /// stopped. An id with no running task is reported cancelled right away.
    fn cancel_task(&mut self, workflow_id: String) {
        let Some(entry) = self.tasks.remove(&workflow_id) else {
            debug!(workflow_id = %workflow_id, "cancel: no running task");
            self.emit(Msg::WorkflowCancelled { workflow_id });
            return;
        };

        entry.cancel.cancel();
        let tx = self.tx.clone();
        self.detached.spawn(async move {
            join_quietly(&workflow_id, entry.handle).await;
            let _ = tx.send(Msg::WorkflowCancelled { workflow_id });
        });
    }

    fn start_timer(&mut self, timer_id: String, delay_ms: u64) {
        if delay_ms == 0 {
            self.report(ExecError::InvalidTimer { timer_id });
            return;
        }
        // Restarting replaces the old schedule.
        self.stop_timer(&timer_id);

        let period = Duration::from_millis(delay_ms);
        let tx = self.tx.clone();
        let entry = TaskEntry::spawn({
            let timer_id = timer_id.clone();
            move |cancel| async move {
                let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            if tx.send(Msg::Tick { timer_id: timer_id.clone() }).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });
        debug!(timer_id = %timer_id, delay_ms, "timer started");
        self.timers.insert(timer_id, entry);
    }

    fn stop_timer(&mut self, timer_id: &str) {
        if let Some(entry) = self.timers.remove(timer_id) {
            entry.cancel.cancel();
            entry.handle.abort();
            debug!(timer_id, "timer stopped");
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), ExecError> {
        let handler = match self.clipboard.take() {
            Some(handler) => handler,
            None => ClipboardHandler::open()?,
        };
        self.clipboard.insert(handler).set_text(text)
    }
}

fn command_result(
    request_id: Option<String>,
    spec: &ProcessSpec,
    result: Result<ProcessOutput, ExecError>,
) -> Msg {
    match result {
        Ok(output) => Msg::CommandCompleted {
            request_id,
            program: spec.program.clone(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            timed_out: output.timed_out,
        },
        // A tracked workflow still needs a result to settle on.
        Err(err) if request_id.is_some() => Msg::CommandCompleted {
            request_id,
            program: spec.program.clone(),
            exit_code: SPAWN_FAILURE_EXIT_CODE,
            stdout: String::new(),
            stderr: err.to_string(),
            timed_out: false,
        },
        Err(err) => Msg::error(err.to_string()),
    }
}

/// Await a task handle, treating cancellation as the expected outcome.
async fn join_quietly(id: &str, handle: JoinHandle<()>) {
    match handle.await {
        Ok(()) => {}
        Err(err) if err.is_cancelled() => {}
        Err(err) => warn!(id, "task ended abnormally: {err}"),
    }
}
