// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-to-reorder engine.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::mem;

use hashbrown::HashMap;
use kurbo::{Point, Vec2};

use crate::config::{DragSortConfig, ReentrantDrag};
use crate::key::{
    DuplicateHandling, DuplicateValue, KeyRegistry, SortKey, dedup_values, unique_values,
};
use crate::session::DragSession;
use crate::visual::{ItemVisual, PointerCapture, SortElement, contains_strict};

/// One value of the list, as handed to the host for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortItem<'a, T> {
    /// Stable identity to key the rendered element by.
    pub key: SortKey,
    /// The value itself.
    pub value: &'a T,
}

/// A single-slot move of one item.
///
/// The item at `from` was removed and reinserted at `to`; every item between
/// the two positions shifted by one slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reorder {
    /// The moved item.
    pub key: SortKey,
    /// Index before the move.
    pub from: usize,
    /// Index after the move.
    pub to: usize,
}

#[derive(Debug)]
struct TrackedItem<T, E> {
    key: SortKey,
    value: T,
    element: Option<E>,
    /// Last recorded top-left of the rendered element.
    geometry: Option<Point>,
}

impl<T, E> TrackedItem<T, E> {
    fn detach(&mut self) {
        self.element = None;
        self.geometry = None;
    }
}

#[derive(Debug)]
enum DragPhase<E, S> {
    Idle,
    Dragging(DragSession<E, S>),
}

/// Drag-to-reorder state for one rendered list.
///
/// `DragSort` owns the order of a list of values and the state of at most one
/// drag gesture over it. The host renders the values in [`items`](Self::items)
/// order and forwards three kinds of input:
///
/// - After every render pass, [`register_element`](Self::register_element) for
///   each item, with its element handle or `None` if the element went away.
/// - [`pointer_down`](Self::pointer_down) when the pointer is pressed on an item.
/// - While a capture subscription is live, every global pointer move to
///   [`pointer_move`](Self::pointer_move) and the release to
///   [`pointer_up`](Self::pointer_up).
///
/// Moves and releases outside of a drag are ignored, as are bindings for keys
/// the engine does not know. None of these operations can fail.
///
/// Values are identified by equality (see [`KeyRegistry`]); they must be unique
/// within one list.
pub struct DragSort<T, E: SortElement, C: PointerCapture> {
    items: Vec<TrackedItem<T, E>>,
    keys: KeyRegistry<T>,
    phase: DragPhase<E, C::Subscription>,
    capture: C,
    config: DragSortConfig,
    revision: u64,
}

impl<T, E, C> fmt::Debug for DragSort<T, E, C>
where
    T: fmt::Debug,
    E: SortElement,
    C: PointerCapture,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dragged = match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(session) => Some(session.key),
        };
        f.debug_struct("DragSort")
            .field(
                "items",
                &self
                    .items
                    .iter()
                    .map(|item| (item.key, &item.value))
                    .collect::<Vec<_>>(),
            )
            .field("dragged", &dragged)
            .field("config", &self.config)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl<T, E, C> DragSort<T, E, C>
where
    T: Eq + Hash + Clone,
    E: SortElement,
    C: PointerCapture,
{
    /// Creates an engine over `values` with the default configuration.
    ///
    /// Repeated values are handled with [`DuplicateHandling::DebugAssert`].
    pub fn new(values: impl IntoIterator<Item = T>, capture: C) -> Self {
        Self::with_config(values, capture, DragSortConfig::default())
    }

    /// Creates an engine over `values` with an explicit configuration.
    ///
    /// Repeated values are handled with [`DuplicateHandling::DebugAssert`].
    pub fn with_config(
        values: impl IntoIterator<Item = T>,
        capture: C,
        config: DragSortConfig,
    ) -> Self {
        let mut this = Self {
            items: Vec::new(),
            keys: KeyRegistry::new(),
            phase: DragPhase::Idle,
            capture,
            config,
            revision: 0,
        };
        for value in unique_values(values.into_iter().collect()) {
            let key = this.keys.key_for(&value);
            this.items.push(TrackedItem {
                key,
                value,
                element: None,
                geometry: None,
            });
        }
        this
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DragSortConfig {
        &self.config
    }

    /// Returns the pointer capture.
    #[must_use]
    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// Number of values in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Counter bumped whenever the order or membership of the list changes.
    ///
    /// Hosts can compare it against the revision they last rendered.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The list in its current order, ready to render.
    pub fn items(&self) -> impl ExactSizeIterator<Item = SortItem<'_, T>> + DoubleEndedIterator {
        self.items.iter().map(|item| SortItem {
            key: item.key,
            value: &item.value,
        })
    }

    /// Keys in current order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = SortKey> + DoubleEndedIterator {
        self.items.iter().map(|item| item.key)
    }

    /// Values in current order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &T> + DoubleEndedIterator {
        self.items.iter().map(|item| &item.value)
    }

    /// Returns the key of `value` if it is in the list.
    #[must_use]
    pub fn key_of(&self, value: &T) -> Option<SortKey> {
        self.keys.lookup(value)
    }

    /// Returns the value for `key` if it is in the list.
    #[must_use]
    pub fn value(&self, key: SortKey) -> Option<&T> {
        self.keys.get(key)
    }

    /// Current index of `key`.
    #[must_use]
    pub fn position(&self, key: SortKey) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    /// Last recorded top-left of the element rendered for `key`.
    ///
    /// `None` until the element has been registered, and again after it was
    /// unregistered.
    #[must_use]
    pub fn geometry(&self, key: SortKey) -> Option<Point> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .and_then(|item| item.geometry)
    }

    /// Returns `true` while a drag gesture is open.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Key of the item being dragged.
    #[must_use]
    pub fn dragged(&self) -> Option<SortKey> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(session) => Some(session.key),
        }
    }

    /// Pointer position the dragged element's translation is measured from.
    #[must_use]
    pub fn pointer_anchor(&self) -> Option<Point> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(session) => Some(session.anchor),
        }
    }

    /// Translation currently applied to the dragged element.
    #[must_use]
    pub fn drag_offset(&self) -> Option<Vec2> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(session) => Some(session.translation),
        }
    }

    /// Records the rendered element for `key` after a render pass.
    ///
    /// Passing `None` (the element was unmounted) detaches the item: it keeps
    /// its place in the list but drops its geometry and no longer takes part
    /// in overlap checks. Detaching the dragged item ends the drag.
    ///
    /// For the dragged item, a change of its layout position (typically the
    /// host reflowing it into its new slot after a reorder) is absorbed: the
    /// pointer anchor moves by the same delta and a corrective translation
    /// keeps the element where it was displayed. The element may be a fresh
    /// handle: it is measured without translation, and the handle it replaces
    /// has its visual cleared.
    pub fn register_element(&mut self, key: SortKey, element: Option<E>) {
        let Some(index) = self.position(key) else {
            return;
        };
        let Some((element, rect)) =
            element.and_then(|element| element.bounding_box().map(|rect| (element, rect)))
        else {
            self.items[index].detach();
            if self.dragged() == Some(key) {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = key.as_u32(), "dragged element unmounted; ending drag");
                self.end_drag();
            }
            return;
        };

        let item = &mut self.items[index];
        match &mut self.phase {
            DragPhase::Dragging(session) if session.key == key => {
                // The handle may be new; measure it without any translation.
                session.element.set_visual(&ItemVisual::CLEARED);
                element.set_visual(&ItemVisual::GRABBED);
                let layout = element
                    .bounding_box()
                    .map_or(rect.origin(), |measured| measured.origin());
                let translation = session.compensate(layout);
                session.element = element.clone();
                element.set_visual(&ItemVisual::dragging(
                    translation,
                    self.config.raised_z_index,
                ));
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    key = key.as_u32(),
                    x = translation.x,
                    y = translation.y,
                    "compensated dragged element"
                );
                item.geometry = Some(layout);
            }
            _ => item.geometry = Some(rect.origin()),
        }
        item.element = Some(element);
    }

    /// Starts dragging `key` from `pointer`.
    ///
    /// `element` is the element the pointer was pressed on. Returns `false`
    /// (and changes nothing) if the key is unknown, the element is not
    /// mounted, or another drag is open under [`ReentrantDrag::Ignore`].
    pub fn pointer_down(&mut self, key: SortKey, pointer: Point, element: &E) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };
        if element.bounding_box().is_none() {
            return false;
        }
        if self.is_dragging() {
            match self.config.reentrant {
                ReentrantDrag::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(key = key.as_u32(), "ignoring pointer-down during drag");
                    return false;
                }
                ReentrantDrag::Restart => {
                    self.end_drag();
                }
            }
        }

        element.set_visual(&ItemVisual::GRABBED);
        let Some(rect) = element.bounding_box() else {
            return false;
        };
        let baseline = rect.origin();

        let item = &mut self.items[index];
        item.element = Some(element.clone());
        item.geometry = Some(baseline);

        let subscription = self.capture.subscribe();
        self.phase = DragPhase::Dragging(DragSession::new(
            key,
            element.clone(),
            pointer,
            baseline,
            subscription,
        ));
        #[cfg(feature = "tracing")]
        tracing::debug!(
            key = key.as_u32(),
            index,
            x = pointer.x,
            y = pointer.y,
            "drag started"
        );
        true
    }

    /// Feeds a global pointer move at timestamp `now` (milliseconds).
    ///
    /// While dragging, this first checks (at most once per cooldown) whether the
    /// pointer is strictly inside another item's element; the first such item
    /// in list order receives the dragged item in its slot. Then the dragged
    /// element is translated to follow the pointer.
    ///
    /// Returns the reorder, if one happened, so the host can re-render.
    pub fn pointer_move(&mut self, pointer: Point, now: u64) -> Option<Reorder> {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return None;
        };

        let mut reorder = None;
        if session.gate.try_pass(now, self.config.hover_cooldown_ms) {
            let key = session.key;
            if let Some(from) = self.items.iter().position(|item| item.key == key) {
                let hovered = self.items.iter().enumerate().position(|(index, item)| {
                    index != from
                        && item
                            .element
                            .as_ref()
                            .and_then(|element| element.bounding_box())
                            .is_some_and(|rect| contains_strict(rect, pointer))
                });
                if let Some(to) = hovered {
                    let baseline = session
                        .element
                        .bounding_box()
                        .map_or(session.baseline, |rect| rect.origin());
                    let mut item = self.items.remove(from);
                    item.geometry = Some(baseline);
                    self.items.insert(to, item);
                    session.rebase(pointer, baseline);
                    self.revision += 1;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(key = key.as_u32(), from, to, "reordered");
                    reorder = Some(Reorder { key, from, to });
                }
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(now, "hover gate closed");
        }

        let translation = session.follow(pointer);
        session.element.set_visual(&ItemVisual::dragging(
            translation,
            self.config.raised_z_index,
        ));
        reorder
    }

    /// Feeds a global pointer release, ending the open drag.
    ///
    /// Returns `false` if no drag was open.
    pub fn pointer_up(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.end_drag();
        true
    }

    /// Moves the item at `from` to `to` with the same single-slot semantics
    /// as a drag reorder.
    ///
    /// Returns `None` if either index is out of range or they are equal.
    pub fn move_item(&mut self, from: usize, to: usize) -> Option<Reorder> {
        if from == to || from >= self.items.len() || to >= self.items.len() {
            return None;
        }
        let item = self.items.remove(from);
        let key = item.key;
        self.items.insert(to, item);
        self.revision += 1;
        Some(Reorder { key, from, to })
    }

    /// Replaces the list with `values`, keeping keys and geometry of values
    /// that survive.
    ///
    /// Values no longer present are forgotten; if the dragged value is among
    /// them the drag ends. On error the engine is left unchanged.
    pub fn set_items(
        &mut self,
        values: impl IntoIterator<Item = T>,
        handling: DuplicateHandling,
    ) -> Result<(), DuplicateValue<T>> {
        let values = dedup_values(values.into_iter().collect(), handling)?;

        let before: Vec<SortKey> = self.keys().collect();
        let mut previous: HashMap<SortKey, TrackedItem<T, E>> = self
            .items
            .drain(..)
            .map(|item| (item.key, item))
            .collect();

        for value in values {
            let key = self.keys.key_for(&value);
            let (element, geometry) = previous
                .remove(&key)
                .map_or((None, None), |old| (old.element, old.geometry));
            self.items.push(TrackedItem {
                key,
                value,
                element,
                geometry,
            });
        }

        for (_, removed) in previous {
            self.keys.forget(&removed.value);
            if self.dragged() == Some(removed.key) {
                self.end_drag();
            }
        }

        if !self.keys().eq(before) {
            self.revision += 1;
        }
        Ok(())
    }

    /// Ends any open drag and returns the values in their current order.
    pub fn into_values(mut self) -> Vec<T> {
        self.end_drag();
        mem::take(&mut self.items)
            .into_iter()
            .map(|item| item.value)
            .collect()
    }
}

impl<T, E: SortElement, C: PointerCapture> DragSort<T, E, C> {
    /// Closes the open session: clears the dragged element's visual and
    /// releases the capture subscription.
    fn end_drag(&mut self) {
        if let DragPhase::Dragging(session) = mem::replace(&mut self.phase, DragPhase::Idle) {
            session.element.set_visual(&ItemVisual::CLEARED);
            self.capture.release(session.subscription);
            #[cfg(feature = "tracing")]
            tracing::debug!(key = session.key.as_u32(), "drag ended");
        }
    }
}

impl<T, E: SortElement, C: PointerCapture> Drop for DragSort<T, E, C> {
    fn drop(&mut self) {
        self.end_drag();
    }
}
