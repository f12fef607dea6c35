//! Command list selection and activation.

use crate::effect::Effect;
use crate::mvi::{Intent, Reducer};
use crate::state::AppState;

use super::workflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandListIntent {
    MoveDown,
    MoveUp,
    /// Start a workflow for the selected command.
    Activate,
}

impl Intent for CommandListIntent {}

pub struct CommandListReducer;

impl Reducer for CommandListReducer {
    type State = AppState;
    type Intent = CommandListIntent;
    type Effect = Effect;

    fn reduce(mut state: AppState, intent: CommandListIntent) -> (AppState, Vec<Effect>) {
        match intent {
            CommandListIntent::MoveDown => {
                let moved = state.commands.select_next();
                render_if(state, moved)
            }
            CommandListIntent::MoveUp => {
                let moved = state.commands.select_prev();
                render_if(state, moved)
            }
            CommandListIntent::Activate => {
                let Some(entry) = state.commands.selected() else {
                    return (state, vec![Effect::log_debug("no command selected")]);
                };
                // Ids come from a counter in the state so that reduce stays deterministic.
                let workflow_id = format!("{}-{}", entry.id, state.next_workflow_seq);
                let request = entry.request();
                state.next_workflow_seq += 1;
                workflow::start(state, workflow_id, request)
            }
        }
    }
}

fn render_if(state: AppState, changed: bool) -> (AppState, Vec<Effect>) {
    let effects = if changed { vec![Effect::Render] } else { Vec::new() };
    (state, effects)
}
