//! Engine-wide constants.
//!
//! Centralizes magic numbers and style values to make the codebase
//! more maintainable and self-documenting.

// ============================================================================
// Animation & Timing
// ============================================================================

/// Target frame time for 60 FPS
pub const TARGET_FRAME_MS: f64 = 16.67;

/// Duration of the pick-up transition in milliseconds
pub const PICKUP_DURATION_MS: f64 = 210.0;

/// Duration of the hover (resize on enter/leave) transition in milliseconds
pub const HOVER_DURATION_MS: f64 = 120.0;

/// Duration of the settle transition in milliseconds
pub const SETTLE_DURATION_MS: f64 = 210.0;

// ============================================================================
// Pointer Handling
// ============================================================================

/// Default distance the pointer must travel before an armed item starts dragging
pub const DEFAULT_DRAG_THRESHOLD: f32 = 0.0;

/// Default capture margin around zones (0 = containment only)
pub const DEFAULT_CAPTURE_MARGIN: f32 = 0.0;

// ============================================================================
// Drag Styles
// ============================================================================

/// Top-most stacking order for the floating preview
pub const FLOATING_Z_INDEX: &str = "2147483647";

/// Opacity of the floating preview
pub const DRAG_OPACITY: &str = "90%";

/// Shadow applied to the floating preview
pub const DRAG_SHADOW: &str = "0 0 18px 0 rgba(40,40,40,0.18)";

/// Opacity of the placeholder left behind in `duplicate` mode
pub const PLACEHOLDER_OPACITY: &str = "60%";

/// Style property set on the root while a session is active
pub const SELECTION_GUARD_PROPERTY: &str = "user-select";
