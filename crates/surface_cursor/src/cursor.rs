//! Surface cursor state machine.
//!
//! The cursor keeps a target point on screen and, once per frame, asks a
//! [`SurfacePicker`] where a ray through that point meets its surface. The
//! result is cached as [`SurfaceCursor::position`] and mirrored into an
//! [`IndicatorState`] that the host copies onto the visible marker.
//!
//! Locking freezes the cached position. Disabling hides the marker at once and
//! clears the position on the next unlocked tick.

use crate::picking::SurfacePicker;
use app::LOG_CURSOR;
use bevy::prelude::*;
use tracing::debug;

/// Visual state of the cursor's marker mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorState {
    pub visible: bool,
    pub translation: Vec3,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Locked: nothing was recomputed.
    Frozen,
    /// Disabled or no target: no pick was attempted.
    Inactive,
    /// The ray hit the surface at this point.
    Hit(Vec3),
    /// The ray missed the surface.
    Missed,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct SurfaceCursor {
    target_screen_position: Option<Vec2>,
    position: Option<Vec3>,
    enabled: bool,
    locked: bool,
    indicator: IndicatorState,
}

impl Default for SurfaceCursor {
    fn default() -> Self {
        Self {
            target_screen_position: None,
            position: None,
            enabled: true,
            locked: false,
            indicator: IndicatorState::default(),
        }
    }
}

impl SurfaceCursor {
    pub fn new(target_screen_position: Option<Vec2>) -> Self {
        Self {
            target_screen_position,
            ..default()
        }
    }

    /// Last sampled world position. `None` when nothing was hit or the cursor is disabled.
    pub fn position(&self) -> Option<Vec3> {
        self.position
    }

    pub fn target_screen_position(&self) -> Option<Vec2> {
        self.target_screen_position
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn indicator(&self) -> IndicatorState {
        self.indicator
    }

    /// Takes effect on the next tick.
    pub fn set_target_screen_position(&mut self, target: Vec2) {
        self.target_screen_position = Some(target);
    }

    pub fn clear_target_screen_position(&mut self) {
        self.target_screen_position = None;
    }

    /// Freezes (`true`) or resumes (`false`) recomputation from the next tick on.
    pub fn lock(&mut self, lock: bool) {
        if self.locked != lock {
            debug!(target: LOG_CURSOR, "Cursor {} at {:?}", if lock { "locked" } else { "unlocked" }, self.position);
        }
        self.locked = lock;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!(target: LOG_CURSOR, "Cursor {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        // Hiding is immediate, even while locked
        self.indicator.visible = enabled && self.position.is_some();
    }

    /// Per-frame update. Performs at most one pick.
    pub fn tick<P: SurfacePicker + ?Sized>(&mut self, picker: &mut P) -> TickOutcome {
        if self.locked {
            return TickOutcome::Frozen;
        }

        let target = match self.target_screen_position {
            Some(target) if self.enabled => target,
            _ => {
                self.position = None;
                self.indicator.visible = false;
                return TickOutcome::Inactive;
            }
        };

        self.position = picker.pick(target);
        match self.position {
            Some(hit) => {
                self.indicator = IndicatorState {
                    visible: true,
                    translation: hit,
                };
                TickOutcome::Hit(hit)
            }
            None => {
                self.indicator.visible = false;
                TickOutcome::Missed
            }
        }
    }
}
