//! Reducer trait.

use super::intent::Intent;
use super::state::ModelState;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen. It must be
/// a pure function: (State, Intent) -> (State, [Effect]). Effects are data
/// describing work for the executor; the reducer never performs them.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: ModelState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// The side-effect descriptions this reducer may request.
    type Effect;

    /// Process an intent and return the new state with requested effects.
    fn reduce(state: Self::State, intent: Self::Intent) -> (Self::State, Vec<Self::Effect>);
}
