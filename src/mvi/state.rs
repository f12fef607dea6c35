//! Base trait for reducer-owned state.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable from the reducer's point of view (Clone to create new states)
/// - Self-contained (all data needed to render every view)
/// - Comparable (PartialEq for detecting changes)
pub trait ModelState: Clone + PartialEq + Default + Send + 'static {}
