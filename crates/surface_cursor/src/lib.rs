//! Surface cursor for AR placement.
//!
//! Every frame a ray is cast through a point on screen (by default the
//! center) against an invisible surface. The hit point is exposed as
//! [`SurfaceCursor::position`] and marked by a visible indicator. Callers
//! lock the cursor to freeze the position, e.g. right before placing content.

mod cursor;
mod picking;
mod plugin;

pub use cursor::{IndicatorState, SurfaceCursor, TickOutcome};
pub use picking::{SurfacePicker, intersect_surface};
pub use plugin::{
    CursorCamera, CursorIndicator, CursorParts, CursorSurface, SurfaceCursorConfig,
    SurfaceCursorPlugin, SurfaceCursorSystems, SurfaceRayPicker, camera_ray, spawn_surface_cursor,
    sync_cursor_indicators, tick_surface_cursors, window_center,
};
