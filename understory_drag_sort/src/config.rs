// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for [`DragSort`](crate::DragSort).

/// Cooldown between two overlap checks, in milliseconds.
pub const DEFAULT_HOVER_COOLDOWN_MS: u64 = 10;

/// Stacking order given to the dragged element.
pub const DEFAULT_RAISED_Z_INDEX: i32 = 100;

/// What a pointer-down does while another drag is still open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ReentrantDrag {
    /// Ignore the new pointer-down; the open drag continues.
    #[default]
    Ignore,
    /// End the open drag as if its pointer-up arrived, then start the new one.
    Restart,
}

/// Configuration for a [`DragSort`](crate::DragSort) instance.
///
/// ```rust
/// use understory_drag_sort::{DragSortConfig, ReentrantDrag};
///
/// let config = DragSortConfig::default()
///     .with_hover_cooldown_ms(16)
///     .with_reentrant(ReentrantDrag::Restart);
/// assert_eq!(config.hover_cooldown_ms, 16);
/// assert_eq!(config.raised_z_index, 100);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DragSortConfig {
    /// Minimum time between two overlap checks while dragging.
    ///
    /// Pointer moves inside the window still move the dragged element; they
    /// just cannot trigger another reorder. Zero disables throttling.
    pub hover_cooldown_ms: u64,
    /// Z-index applied to the dragged element while it follows the pointer.
    pub raised_z_index: i32,
    /// Policy for a pointer-down arriving while a drag is open.
    pub reentrant: ReentrantDrag,
}

impl Default for DragSortConfig {
    fn default() -> Self {
        Self {
            hover_cooldown_ms: DEFAULT_HOVER_COOLDOWN_MS,
            raised_z_index: DEFAULT_RAISED_Z_INDEX,
            reentrant: ReentrantDrag::Ignore,
        }
    }
}

impl DragSortConfig {
    /// Sets [`hover_cooldown_ms`](Self::hover_cooldown_ms).
    #[must_use]
    pub const fn with_hover_cooldown_ms(mut self, ms: u64) -> Self {
        self.hover_cooldown_ms = ms;
        self
    }

    /// Sets [`raised_z_index`](Self::raised_z_index).
    #[must_use]
    pub const fn with_raised_z_index(mut self, z_index: i32) -> Self {
        self.raised_z_index = z_index;
        self
    }

    /// Sets [`reentrant`](Self::reentrant).
    #[must_use]
    pub const fn with_reentrant(mut self, reentrant: ReentrantDrag) -> Self {
        self.reentrant = reentrant;
        self
    }
}
