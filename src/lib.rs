//! devloop: a terminal workbench that runs shell commands and agent
//! prompts as tracked workflows.
//!
//! The core is a message loop. [`reducer::reduce`] is a pure transition
//! from state and message to a new state plus [`effect::Effect`] values;
//! the [`executor::Executor`] performs those effects and reports back with
//! further [`msg::Msg`] values; [`runtime::Runtime`] ties the two together
//! with a [`runtime::Frontend`].

pub mod config;
pub mod effect;
pub mod executor;
pub mod logging;
pub mod msg;
pub mod mvi;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod ui;
