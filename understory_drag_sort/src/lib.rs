// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_sort --heading-base-level=0

//! Understory Drag Sort: headless drag-to-reorder for lists of rendered items.
//!
//! This crate implements free reordering by drag-and-drop for a list of values
//! that a host renders as elements in some flex or grid layout. The user picks
//! an element up with the pointer, drags it over its siblings, and the list
//! reorders live whenever the pointer enters another element.
//!
//! The core type is [`DragSort`], a small state machine with two phases:
//!
//! - **Idle**: no drag. Pointer moves and releases are ignored.
//! - **Dragging**: entered by [`DragSort::pointer_down`] and left by
//!   [`DragSort::pointer_up`]. Each [`DragSort::pointer_move`] may move the
//!   dragged item into the slot of the item under the pointer, and always
//!   translates the dragged element so it follows the pointer.
//!
//! The crate does not lay anything out and does not own any element. Hosts:
//!
//! - Render [`DragSort::items`] in order, keyed by [`SortKey`].
//! - Register each rendered element after every render pass with
//!   [`DragSort::register_element`]. Elements are reached through the
//!   [`SortElement`] trait: they report their rendered box and accept the few
//!   [`ItemVisual`] overrides a drag needs (translation, z-index, cursor).
//! - Provide a [`PointerCapture`] that installs global move/up listeners. The
//!   engine subscribes on drag start and releases on drag end, so at most one
//!   pair of listeners is ever installed per engine.
//! - Re-render when a move returns a [`Reorder`] (or [`DragSort::revision`]
//!   changes).
//!
//! When the host reflows the dragged element into its new slot, the next
//! registration absorbs the jump: the pointer anchor shifts by the layout delta
//! and a corrective translation keeps the element visually in place.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Rect};
//! use understory_drag_sort::{DragSort, ItemVisual, SortElement};
//!
//! // A stand-in for a rendered element: a layout box plus the applied visual.
//! #[derive(Clone)]
//! struct Row(Rc<Cell<(Rect, ItemVisual)>>);
//!
//! impl SortElement for Row {
//!     fn bounding_box(&self) -> Option<Rect> {
//!         let (rect, visual) = self.0.get();
//!         Some(rect + visual.offset())
//!     }
//!     fn set_visual(&self, visual: &ItemVisual) {
//!         let (rect, _) = self.0.get();
//!         self.0.set((rect, *visual));
//!     }
//! }
//!
//! let mut sort: DragSort<&str, Row, ()> = DragSort::new(["a", "b", "c"], ());
//!
//! // Render pass: one 100x40 row per item, stacked vertically.
//! let rows: Vec<Row> = (0..3_u8)
//!     .map(|i| {
//!         let y = 40.0 * f64::from(i);
//!         Row(Rc::new(Cell::new((
//!             Rect::new(0.0, y, 100.0, y + 40.0),
//!             ItemVisual::CLEARED,
//!         ))))
//!     })
//!     .collect();
//! let keys: Vec<_> = sort.keys().collect();
//! for (key, row) in keys.iter().zip(&rows) {
//!     sort.register_element(*key, Some(row.clone()));
//! }
//!
//! // Pick up "a" and drag it into the middle of "c".
//! assert!(sort.pointer_down(keys[0], Point::new(50.0, 20.0), &rows[0]));
//! let reorder = sort.pointer_move(Point::new(50.0, 100.0), 0).unwrap();
//! assert_eq!((reorder.from, reorder.to), (0, 2));
//! assert_eq!(sort.values().copied().collect::<Vec<_>>(), ["b", "c", "a"]);
//!
//! // Releasing clears every drag override.
//! assert!(sort.pointer_up());
//! assert_eq!(rows[0].0.get().1, ItemVisual::CLEARED);
//! ```
//!
//! ## Identity
//!
//! Keys come from a [`KeyRegistry`] and are decided by `Eq`/`Hash`: equal
//! values share one key. Values in one list must therefore be unique, for
//! example by carrying an id. [`DuplicateHandling`] picks what happens when
//! they are not.
//!
//! ## Features
//!
//! - `std` (default) / `libm`: forwarded to `kurbo`.
//! - `tracing`: emit `tracing` events for drag start/end, reorders, and
//!   compensation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod key;
mod session;
mod sort;
mod visual;

pub use config::{DEFAULT_HOVER_COOLDOWN_MS, DEFAULT_RAISED_Z_INDEX, DragSortConfig, ReentrantDrag};
pub use key::{DuplicateHandling, DuplicateValue, KeyRegistry, SortKey};
pub use session::HoverGate;
pub use sort::{DragSort, Reorder, SortItem};
pub use visual::{ItemVisual, PointerCapture, SortElement, contains_strict};
