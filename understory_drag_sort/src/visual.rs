// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: rendered element handles, their drag visuals, and pointer capture.
//!
//! The engine never owns rendered elements. Hosts hand it cheap, cloneable
//! handles (a DOM node reference, a widget id plus a shared scene, …) that can
//! report where the element currently is and accept the few style overrides a
//! drag needs.

use kurbo::{Point, Rect, Vec2};

/// Drag-related style overrides the engine applies to a rendered element.
///
/// Each call to [`SortElement::set_visual`] replaces the previous overrides as
/// a whole; [`ItemVisual::CLEARED`] means "render with default styling".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ItemVisual {
    /// Translation applied on top of the element's layout position.
    pub translation: Option<Vec2>,
    /// Stacking order override.
    pub z_index: Option<i32>,
    /// Whether the "grabbing" cursor affordance is shown.
    pub grabbing: bool,
}

impl ItemVisual {
    /// No overrides at all.
    pub const CLEARED: Self = Self {
        translation: None,
        z_index: None,
        grabbing: false,
    };

    /// The affordance shown right after a pointer-down: no translation, grabbing cursor.
    pub const GRABBED: Self = Self {
        translation: None,
        z_index: None,
        grabbing: true,
    };

    /// The visual of an element being dragged by `translation`.
    #[must_use]
    pub const fn dragging(translation: Vec2, z_index: i32) -> Self {
        Self {
            translation: Some(translation),
            z_index: Some(z_index),
            grabbing: true,
        }
    }

    /// Returns the applied translation, treating `None` as zero.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.translation.unwrap_or(Vec2::ZERO)
    }
}

/// A non-owning handle to one rendered element.
///
/// Implementations are expected to be cheap to clone and to use interior
/// mutability for [`set_visual`](Self::set_visual), the way a DOM element
/// reference does.
pub trait SortElement: Clone {
    /// The element's current rendered box, in the same space as pointer coordinates.
    ///
    /// This must include any translation previously applied through
    /// [`set_visual`](Self::set_visual). Returns `None` once the element is no
    /// longer mounted.
    fn bounding_box(&self) -> Option<Rect>;

    /// Replaces the element's drag-related style overrides.
    fn set_visual(&self, visual: &ItemVisual);
}

/// Source of process-wide pointer-move / pointer-up delivery.
///
/// A drag must keep receiving pointer events after the pointer leaves the
/// element it started on. The engine asks for a subscription when a drag
/// starts and hands it back when the drag ends; it never holds more than one.
pub trait PointerCapture {
    /// Token identifying one installed pair of move/up listeners.
    type Subscription;

    /// Installs global move/up listeners that route into the engine.
    fn subscribe(&mut self) -> Self::Subscription;

    /// Removes the listeners identified by `subscription`.
    fn release(&mut self, subscription: Self::Subscription);
}

/// A capture for hosts that already route every pointer event to the engine.
impl PointerCapture for () {
    type Subscription = ();

    fn subscribe(&mut self) -> Self::Subscription {}

    fn release(&mut self, _subscription: Self::Subscription) {}
}

/// Strict containment: `point` lies inside all four edges of `rect`.
///
/// Unlike [`Rect::contains`], points on any edge are outside, so a pointer
/// resting exactly on the seam between two neighbors hovers neither.
#[must_use]
pub fn contains_strict(rect: Rect, point: Point) -> bool {
    point.x > rect.x0 && point.x < rect.x1 && point.y > rect.y0 && point.y < rect.y1
}
