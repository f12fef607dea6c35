//! The driver loop.
//!
//! One channel carries every message, whether it came from the input
//! adapter, a timer or a finished task, so messages are reduced strictly in
//! arrival order. Each step reduces, swaps in the new state, executes the
//! effects in order and redraws if anything changed.

use std::io;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::executor::{channel, Executor, ExecutorConfig, MsgReceiver, MsgSender};
use crate::msg::Msg;
use crate::reducer::{reduce, StartupOptions};
use crate::state::AppState;

/// Something that can draw the state.
pub trait Frontend {
    fn render(&mut self, state: &AppState) -> io::Result<()>;
}

/// Draws nothing. For scripted runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Frontend for Headless {
    fn render(&mut self, _state: &AppState) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("render failed: {0}")]
    Render(#[from] io::Error),
}

pub struct Runtime<F: Frontend> {
    state: AppState,
    executor: Executor,
    tx: MsgSender,
    rx: MsgReceiver,
    frontend: F,
}

impl<F: Frontend> Runtime<F> {
    pub fn new(state: AppState, config: ExecutorConfig, frontend: F) -> Self {
        let (tx, rx) = channel();
        let executor = Executor::new(tx.clone(), config);
        Self {
            state,
            executor,
            tx,
            rx,
            frontend,
        }
    }

    /// A handle for producers outside the loop (input thread, signals).
    pub fn sender(&self) -> MsgSender {
        self.tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.executor
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// Wait for the next queued message.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.rx.recv().await
    }

    /// Process one message. Returns `false` once the app has stopped
    /// running, after the executor has been shut down.
    pub async fn dispatch(&mut self, msg: Msg) -> Result<bool, RuntimeError> {
        trace!(msg = msg.tag(), category = ?msg.category(), "dispatch");
        let (next, effects) = reduce(&self.state, msg);
        debug_assert!(next.validate().is_ok(), "reduce produced an invalid state");

        let changed = next != self.state;
        self.state = next;
        for effect in effects {
            self.executor.execute(effect).await;
        }
        if changed {
            self.frontend.render(&self.state)?;
        }

        if !self.state.running {
            self.executor.shutdown().await;
            return Ok(false);
        }
        Ok(true)
    }

    /// Run until the app quits, then return the final state.
    ///
    /// The runtime keeps its own sender, so the channel never closes under
    /// the loop; only `Quit` ends it.
    ///
    /// `AppStarted` is reduced before anything already queued.
    pub async fn run(mut self, startup: StartupOptions) -> Result<AppState, RuntimeError> {
        self.frontend.render(&self.state)?;
        info!("event loop started");

        let started = Msg::AppStarted {
            spinner_ms: startup.spinner_ms,
            autosave_ms: startup.autosave_ms,
            restore_snapshot: startup.restore_snapshot,
        };
        if self.dispatch(started).await? {
            while let Some(msg) = self.rx.recv().await {
                if !self.dispatch(msg).await? {
                    break;
                }
            }
        }

        // Already done on quit; shutdown is idempotent.
        self.executor.shutdown().await;
        debug!("event loop finished");
        Ok(self.state)
    }
}
