// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture drag bookkeeping: pointer anchor, baseline geometry, hover gate.
//!
//! A drag session lives exactly as long as one pointer-down/pointer-up
//! gesture. The translation shown on the dragged element is always
//! `last_pointer - anchor`; reorders and layout changes move the anchor rather
//! than the element, so the displayed position stays continuous.

use kurbo::{Point, Vec2};

use crate::SortKey;

/// Cooldown throttle for overlap checks.
///
/// Time is supplied by the caller as a monotonically non-decreasing
/// millisecond timestamp. The gate never schedules anything itself: it simply
/// stays closed until the first event at or after its reopen time.
///
/// ```rust
/// use understory_drag_sort::HoverGate;
///
/// let mut gate = HoverGate::default();
/// assert!(gate.try_pass(100, 10));
/// assert!(!gate.try_pass(105, 10));
/// assert!(gate.try_pass(110, 10));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverGate {
    reopens_at: Option<u64>,
}

impl HoverGate {
    /// Returns `true` if a check may run at `now`.
    #[must_use]
    pub fn is_open(&self, now: u64) -> bool {
        self.reopens_at.is_none_or(|at| now >= at)
    }

    /// Passes the gate if it is open at `now`, closing it for `cooldown_ms`.
    pub fn try_pass(&mut self, now: u64, cooldown_ms: u64) -> bool {
        if !self.is_open(now) {
            return false;
        }
        self.reopens_at = (cooldown_ms > 0).then(|| now.saturating_add(cooldown_ms));
        true
    }

    /// Reopens the gate immediately.
    pub fn reset(&mut self) {
        self.reopens_at = None;
    }
}

/// State of one open drag gesture.
#[derive(Debug)]
pub(crate) struct DragSession<E, S> {
    pub(crate) key: SortKey,
    pub(crate) element: E,
    /// Pointer position the current translation is measured from.
    pub(crate) anchor: Point,
    pub(crate) last_pointer: Point,
    /// Recorded top-left of the dragged element.
    pub(crate) baseline: Point,
    /// Translation currently applied to the dragged element.
    pub(crate) translation: Vec2,
    pub(crate) gate: HoverGate,
    pub(crate) subscription: S,
}

impl<E, S> DragSession<E, S> {
    pub(crate) fn new(
        key: SortKey,
        element: E,
        pointer: Point,
        baseline: Point,
        subscription: S,
    ) -> Self {
        Self {
            key,
            element,
            anchor: pointer,
            last_pointer: pointer,
            baseline,
            translation: Vec2::ZERO,
            gate: HoverGate::default(),
            subscription,
        }
    }

    /// Records a pointer position and returns the translation that follows it.
    pub(crate) fn follow(&mut self, pointer: Point) -> Vec2 {
        self.last_pointer = pointer;
        self.translation = pointer - self.anchor;
        self.translation
    }

    /// Restarts delta tracking at `pointer` after a reorder.
    pub(crate) fn rebase(&mut self, pointer: Point, baseline: Point) {
        self.anchor = pointer;
        self.last_pointer = pointer;
        self.baseline = baseline;
    }

    /// Absorbs a layout jump of the dragged element.
    ///
    /// `layout` is the element's top-left without any translation. The anchor
    /// moves by the same delta as the layout, and the returned translation
    /// keeps the element where it was displayed.
    pub(crate) fn compensate(&mut self, layout: Point) -> Vec2 {
        let delta = layout - self.baseline;
        self.anchor += delta;
        self.baseline = layout;
        self.translation = self.last_pointer - self.anchor;
        self.translation
    }
}
