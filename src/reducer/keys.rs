//! Key bindings: maps a normalised key name to a sub-reducer intent.

use crate::state::{AppState, View};

use super::commands::CommandListIntent;
use super::navigation::NavIntent;
use super::system::SystemIntent;
use super::workflow::WorkflowIntent;

/// Lines moved by page keys in scrollable views.
const PAGE: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum KeyRoute {
    Navigation(NavIntent),
    Commands(CommandListIntent),
    Workflow(WorkflowIntent),
    System(SystemIntent),
}

/// Resolve a key for the current state. Unbound keys yield `None`.
pub fn route_key(state: &AppState, key: &str) -> Option<KeyRoute> {
    let global = match key {
        "q" | "ctrl+c" => Some(KeyRoute::System(SystemIntent::Quit)),
        "tab" => Some(KeyRoute::Navigation(NavIntent::NextView)),
        "esc" => Some(KeyRoute::Navigation(NavIntent::DismissError)),
        "s" => Some(KeyRoute::System(SystemIntent::SaveSnapshot)),
        "1" | "2" | "3" | "4" => key
            .parse::<usize>()
            .ok()
            .and_then(|n| View::from_index(n - 1))
            .map(|view| KeyRoute::Navigation(NavIntent::SwitchView(view))),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    match state.active_view {
        View::Commands => match key {
            "j" | "down" => Some(KeyRoute::Commands(CommandListIntent::MoveDown)),
            "k" | "up" => Some(KeyRoute::Commands(CommandListIntent::MoveUp)),
            "enter" => Some(KeyRoute::Commands(CommandListIntent::Activate)),
            _ => None,
        },
        View::Workflows => match key {
            "j" | "down" => Some(KeyRoute::Workflow(WorkflowIntent::SelectNext)),
            "k" | "up" => Some(KeyRoute::Workflow(WorkflowIntent::SelectPrev)),
            "c" => Some(KeyRoute::Workflow(WorkflowIntent::CancelSelected)),
            "y" => Some(KeyRoute::Workflow(WorkflowIntent::CopySelected)),
            _ => None,
        },
        View::Logs => match key {
            "j" | "down" => Some(KeyRoute::Navigation(NavIntent::Scroll { delta: 1 })),
            "k" | "up" => Some(KeyRoute::Navigation(NavIntent::Scroll { delta: -1 })),
            "pagedown" => Some(KeyRoute::Navigation(NavIntent::Scroll { delta: PAGE })),
            "pageup" => Some(KeyRoute::Navigation(NavIntent::Scroll { delta: -PAGE })),
            _ => None,
        },
        View::Help => None,
    }
}
