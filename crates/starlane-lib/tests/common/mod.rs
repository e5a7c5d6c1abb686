#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use starlane_lib::{StarlaneGraph, StarlaneMap, SystemId, SystemPosition};

/// Systems `1..=n` one unit apart on the x axis, linked in order.
pub fn line_map(n: i64) -> StarlaneMap {
    StarlaneMap::from_parts(
        (1..=n).map(|id| (id, SystemPosition::new(id as f64, 0.0, 0.0))),
        (1..n).map(|id| (id, id + 1)),
    )
    .expect("valid line fixture")
}

/// Grid id for column `x`, row `y` of a grid `width` systems wide.
pub fn grid_id(width: i64, x: i64, y: i64) -> SystemId {
    y * width + x + 1
}

/// `width` x `height` grid with unit spacing and lanes to the right and below.
pub fn grid_map(width: i64, height: i64) -> StarlaneMap {
    let mut systems = Vec::new();
    let mut lanes = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let id = grid_id(width, x, y);
            systems.push((id, SystemPosition::new(x as f64, y as f64, 0.0)));
            if x + 1 < width {
                lanes.push((id, grid_id(width, x + 1, y)));
            }
            if y + 1 < height {
                lanes.push((id, grid_id(width, x, y + 1)));
            }
        }
    }
    StarlaneMap::from_parts(systems, lanes).expect("valid grid fixture")
}

/// Line `1-2-3-4` plus a supply depot `5` far off the line, linked to 2 and 3.
pub fn depot_detour_map() -> StarlaneMap {
    StarlaneMap::from_parts(
        [
            (1, SystemPosition::new(0.0, 0.0, 0.0)),
            (2, SystemPosition::new(1.0, 0.0, 0.0)),
            (3, SystemPosition::new(2.0, 0.0, 0.0)),
            (4, SystemPosition::new(3.0, 0.0, 0.0)),
            (5, SystemPosition::new(1.5, 10.0, 0.0)),
        ],
        [(1, 2), (2, 3), (3, 4), (2, 5), (5, 3)],
    )
    .expect("valid depot fixture")
}

/// Graph wrapper counting `neighbors` calls.
pub struct CountingGraph<G> {
    pub inner: G,
    neighbor_calls: AtomicUsize,
}

impl<G> CountingGraph<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            neighbor_calls: AtomicUsize::new(0),
        }
    }

    pub fn neighbor_calls(&self) -> usize {
        self.neighbor_calls.load(Ordering::SeqCst)
    }
}

impl<G: StarlaneGraph> StarlaneGraph for CountingGraph<G> {
    fn contains(&self, system: SystemId) -> bool {
        self.inner.contains(system)
    }

    fn neighbors(&self, system: SystemId) -> &[SystemId] {
        self.neighbor_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.neighbors(system)
    }

    fn jump_distance(&self, from: SystemId, to: SystemId) -> i64 {
        self.inner.jump_distance(from, to)
    }

    fn linear_distance(&self, from: SystemId, to: SystemId) -> f64 {
        self.inner.linear_distance(from, to)
    }
}

/// Graph wrapper whose heuristic overestimates every remaining distance.
pub struct OverestimatingGraph<G>(pub G);

impl<G: StarlaneGraph> StarlaneGraph for OverestimatingGraph<G> {
    fn contains(&self, system: SystemId) -> bool {
        self.0.contains(system)
    }

    fn neighbors(&self, system: SystemId) -> &[SystemId] {
        self.0.neighbors(system)
    }

    fn jump_distance(&self, from: SystemId, to: SystemId) -> i64 {
        self.0.jump_distance(from, to)
    }

    fn linear_distance(&self, from: SystemId, to: SystemId) -> f64 {
        self.0.linear_distance(from, to)
    }

    fn lower_bound(&self, from: SystemId, to: SystemId) -> f64 {
        10.0 * self.0.linear_distance(from, to) + 1.0
    }
}
