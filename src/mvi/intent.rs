//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (key presses, mouse, resize)
/// - System events (task results, timer ticks)
/// - Workflow lifecycle events
///
/// Intents are processed by reducers to produce new states and effects.
pub trait Intent: Send + 'static {}
