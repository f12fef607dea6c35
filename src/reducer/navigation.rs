//! View navigation and global UI state.

use crate::effect::Effect;
use crate::mvi::{Intent, Reducer};
use crate::state::{AppState, Cursor, View};

#[derive(Debug, Clone, PartialEq)]
pub enum NavIntent {
    SwitchView(View),
    NextView,
    /// Positive scrolls towards newer content.
    Scroll { delta: i32 },
    Pointer { column: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
    DismissError,
}

impl Intent for NavIntent {}

pub struct NavigationReducer;

impl Reducer for NavigationReducer {
    type State = AppState;
    type Intent = NavIntent;
    type Effect = Effect;

    fn reduce(mut state: AppState, intent: NavIntent) -> (AppState, Vec<Effect>) {
        let changed = match intent {
            NavIntent::SwitchView(view) => switch_view(&mut state, view),
            NavIntent::NextView => {
                let next = state.active_view.next();
                switch_view(&mut state, next)
            }
            NavIntent::Scroll { delta } => {
                let max = state.logs.entries.len().saturating_sub(1);
                let max = u16::try_from(max).unwrap_or(u16::MAX);
                let current = i64::from(state.ui.scroll_offset);
                let next = (current + i64::from(delta)).clamp(0, i64::from(max));
                let next = u16::try_from(next).unwrap_or(max);
                if next == state.ui.scroll_offset {
                    false
                } else {
                    state.ui.scroll_offset = next;
                    true
                }
            }
            NavIntent::Pointer { column, row } => {
                let cursor = Some(Cursor { column, row });
                if state.ui.cursor == cursor {
                    false
                } else {
                    state.ui.cursor = cursor;
                    true
                }
            }
            NavIntent::Resize { cols, rows } => {
                if state.ui.viewport == (cols, rows) {
                    false
                } else {
                    state.ui.viewport = (cols, rows);
                    true
                }
            }
            NavIntent::DismissError => state.error_message.take().is_some(),
        };

        let effects = if changed { vec![Effect::Render] } else { Vec::new() };
        (state, effects)
    }
}

/// Scroll position is per view, so switching resets it.
fn switch_view(state: &mut AppState, view: View) -> bool {
    if state.active_view == view {
        return false;
    }
    state.active_view = view;
    state.ui.scroll_offset = 0;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LogLevel;

    #[test]
    fn switch_view_requests_render() {
        let (state, effects) =
            NavigationReducer::reduce(AppState::default(), NavIntent::SwitchView(View::Logs));
        assert_eq!(state.active_view, View::Logs);
        assert_eq!(effects, vec![Effect::Render]);
    }

    #[test]
    fn switching_to_current_view_is_silent() {
        let (state, effects) =
            NavigationReducer::reduce(AppState::default(), NavIntent::SwitchView(View::Commands));
        assert_eq!(state.active_view, View::Commands);
        assert!(effects.is_empty());
    }

    #[test]
    fn scroll_is_bounded_by_log_length() {
        let mut state = AppState::default();
        for i in 0..3 {
            state.push_log(LogLevel::Info, format!("line {i}"));
        }
        let (state, _) = NavigationReducer::reduce(state, NavIntent::Scroll { delta: 10 });
        assert_eq!(state.ui.scroll_offset, 2);
        let (state, _) = NavigationReducer::reduce(state, NavIntent::Scroll { delta: -10 });
        assert_eq!(state.ui.scroll_offset, 0);
    }

    #[test]
    fn dismiss_error_clears_message() {
        let state = AppState {
            error_message: Some("boom".to_string()),
            ..AppState::default()
        };
        let (state, effects) = NavigationReducer::reduce(state, NavIntent::DismissError);
        assert!(state.error_message.is_none());
        assert_eq!(effects, vec![Effect::Render]);

        let (_, effects) = NavigationReducer::reduce(state, NavIntent::DismissError);
        assert!(effects.is_empty());
    }

    #[test]
    fn resize_records_viewport() {
        let (state, effects) =
            NavigationReducer::reduce(AppState::default(), NavIntent::Resize { cols: 120, rows: 40 });
        assert_eq!(state.ui.viewport, (120, 40));
        assert_eq!(effects, vec![Effect::Render]);
    }
}
