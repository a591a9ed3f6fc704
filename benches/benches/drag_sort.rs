// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};
use std::cell::Cell;
use std::rc::Rc;
use understory_drag_sort::{
    DragSort, DragSortConfig, DuplicateHandling, ItemVisual, SortElement,
};

const CELL: f64 = 40.0;
const COLUMNS: usize = 32;

#[derive(Clone)]
struct Tile {
    rect: Rect,
    visual: Rc<Cell<ItemVisual>>,
}

impl SortElement for Tile {
    fn bounding_box(&self) -> Option<Rect> {
        Some(self.rect + self.visual.get().offset())
    }

    fn set_visual(&self, visual: &ItemVisual) {
        self.visual.set(*visual);
    }
}

fn tile(index: usize) -> Tile {
    let x = CELL * (index % COLUMNS) as f64;
    let y = CELL * (index / COLUMNS) as f64;
    Tile {
        rect: Rect::new(x, y, x + CELL, y + CELL),
        visual: Rc::default(),
    }
}

fn center(tile: &Tile) -> Point {
    tile.rect.center()
}

/// A grid of `len` tiles with the first one picked up.
fn dragging_grid(len: usize) -> (DragSort<u32, Tile, ()>, Point) {
    let config = DragSortConfig::default().with_hover_cooldown_ms(0);
    let mut sort = DragSort::with_config(0..len as u32, (), config);
    let keys: Vec<_> = sort.keys().collect();
    let tiles: Vec<Tile> = (0..len).map(tile).collect();
    for (key, tile) in keys.iter().zip(&tiles) {
        sort.register_element(*key, Some(tile.clone()));
    }
    sort.pointer_down(keys[0], center(&tiles[0]), &tiles[0]);
    (sort, center(&tiles[len - 1]))
}

fn bench_pointer_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_sort/pointer_move");

    // The overlap scan is linear in the list length; the worst case is a hit on the last tile.
    for len in [64usize, 512, 4_096] {
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("hit_last", len), &len, |b, &len| {
            b.iter_batched(
                || dragging_grid(len),
                |(mut sort, target)| {
                    black_box(sort.pointer_move(target, 0));
                    black_box(sort);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("miss", len), &len, |b, &len| {
            let (mut sort, _) = dragging_grid(len);
            let outside = Point::new(-10.0, -10.0);
            let mut now = 0_u64;
            b.iter(|| {
                now += 1;
                black_box(sort.pointer_move(outside, now));
            });
        });
    }

    group.finish();
}

fn bench_set_items(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_sort/set_items");

    for len in [512usize, 4_096] {
        let reversed: Vec<u32> = (0..len as u32).rev().collect();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("reverse", len), &reversed, |b, values| {
            b.iter_batched(
                || DragSort::<u32, Tile, ()>::new(0..len as u32, ()),
                |mut sort| {
                    sort.set_items(values.iter().copied(), DuplicateHandling::Error)
                        .unwrap();
                    black_box(sort);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pointer_move, bench_set_items);
criterion_main!(benches);
