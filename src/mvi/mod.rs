//! Model-View-Intent primitives.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ (State, [Effect]) ──→ Executor
//!    ↑                                            │
//!    └────────────────── Msg ─────────────────────┘
//! ```
//!
//! - **State**: plain-data snapshot, replaced wholesale on every step
//! - **Intent**: something that happened (user input, task results)
//! - **Reducer**: pure function from state and intent to a new state plus
//!   the side effects it wants performed

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::ModelState;
