//! Hex-grid addressing, neighbor enumeration, and flood primitives.
//!
//! The playable region is a hexagon carved out of a `width * height`
//! rectangle. Row `y` is playable for `xmin(y) <= x < xmax(y)`; everything
//! else in the rectangle, and everything outside it, holds no tile.
//!
//! Flood fills run on an explicit stack but visit positions in exactly the
//! order a depth-first recursion over [`Direction::ALL`] would, because
//! several generation passes depend on that order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{DIRECTION_COUNT, Direction, Pos};

pub const DEFAULT_WIDTH: i32 = 48;
pub const DEFAULT_HEIGHT: i32 = 31;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub width: i32,
    pub height: i32,
}

impl Default for GridShape {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl GridShape {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn xy2pos(self, x: i32, y: i32) -> Pos {
        Pos(x + y * self.width)
    }

    pub fn pos2xy(self, pos: Pos) -> (i32, i32) {
        (pos.0.rem_euclid(self.width), pos.0.div_euclid(self.width))
    }

    /// First playable x in row `y`, inclusive.
    pub fn xmin(self, y: i32) -> i32 {
        (self.height - y).div_euclid(2)
    }

    /// Last playable x in row `y`, exclusive.
    pub fn xmax(self, y: i32) -> i32 {
        self.width - y.div_euclid(2)
    }

    pub fn in_bounds(self, pos: Pos) -> bool {
        let (x, y) = self.pos2xy(pos);
        y >= 0 && y < self.height && x >= self.xmin(y) && x < self.xmax(y)
    }

    /// Index into the backing array, for in-bounds positions only.
    pub fn index(self, pos: Pos) -> Option<usize> {
        if self.in_bounds(pos) { usize::try_from(pos.0).ok() } else { None }
    }

    pub fn cell_count(self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// True for playable positions on the outermost ring.
    pub fn on_border(self, pos: Pos) -> bool {
        let (x, y) = self.pos2xy(pos);
        self.in_bounds(pos)
            && (y == 0 || y == self.height - 1 || x == self.xmin(y) || x == self.xmax(y) - 1)
    }

    /// Every playable position, row by row.
    pub fn positions(self) -> impl Iterator<Item = Pos> {
        (0..self.height).flat_map(move |y| {
            (self.xmin(y)..self.xmax(y)).map(move |x| self.xy2pos(x, y))
        })
    }

    /// Every playable position except the outer ring, row by row.
    ///
    /// Generation only ever rewrites these, so the ring stays solid wall.
    pub fn inner_positions(self) -> impl Iterator<Item = Pos> {
        (1..(self.height - 1).max(1)).flat_map(move |y| {
            ((self.xmin(y) + 1)..(self.xmax(y) - 1)).map(move |x| self.xy2pos(x, y))
        })
    }

    pub fn is_inner(self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.on_border(pos)
    }

    pub fn offset(self, direction: Direction) -> i32 {
        direction.offset(self.width)
    }

    pub fn step(self, pos: Pos, direction: Direction) -> Pos {
        pos + self.offset(direction)
    }

    pub fn neighbors(self, pos: Pos) -> [Pos; DIRECTION_COUNT] {
        Direction::ALL.map(|direction| self.step(pos, direction))
    }

    pub fn for_each_neighbor(self, pos: Pos, mut callback: impl FnMut(Pos)) {
        for neighbor in self.neighbors(pos) {
            callback(neighbor);
        }
    }

    /// Whether every neighbor of `pos` satisfies `predicate`.
    pub fn surrounded(self, pos: Pos, mut predicate: impl FnMut(Pos) -> bool) -> bool {
        self.neighbors(pos).into_iter().all(|neighbor| predicate(neighbor))
    }

    /// Number of contiguous runs of neighbors satisfying `in_group`, reading
    /// the six neighbors as a ring.
    ///
    /// A ring with no boundary is a single group if the first neighbor is in
    /// it, and no group otherwise.
    pub fn count_groups(self, pos: Pos, mut in_group: impl FnMut(Pos) -> bool) -> u32 {
        let members = self.neighbors(pos).map(|neighbor| in_group(neighbor));
        let mut group_count = 0;
        for index in 0..DIRECTION_COUNT {
            let next = (index + 1) % DIRECTION_COUNT;
            if !members[index] && members[next] {
                group_count += 1;
            }
        }
        if group_count > 0 { group_count } else { u32::from(members[0]) }
    }

    /// Floods from `start` through positions for which `floodable` holds,
    /// calling `visit` once per position before expanding its neighbors.
    ///
    /// `floodable` must turn false for positions already visited (usually by
    /// consulting what `visit` recorded in `state`), otherwise the flood
    /// never ends. Returns the number of visited positions.
    pub fn floodfill<S>(
        self,
        start: Pos,
        state: &mut S,
        floodable: impl Fn(&S, Pos) -> bool,
        mut visit: impl FnMut(&mut S, Pos),
    ) -> usize {
        if !floodable(state, start) {
            return 0;
        }
        visit(state, start);
        let mut visited = 1;
        let mut stack = vec![(start, 0_usize)];
        while let Some(top) = stack.last_mut() {
            let (pos, next_direction) = *top;
            if next_direction == DIRECTION_COUNT {
                stack.pop();
                continue;
            }
            top.1 += 1;
            let neighbor = self.step(pos, Direction::ALL[next_direction]);
            if floodable(state, neighbor) {
                visit(state, neighbor);
                visited += 1;
                stack.push((neighbor, 0));
            }
        }
        visited
    }

    /// Floods from `start` through `passable` positions, recording them in
    /// `visited`. Positions already in `visited` are not re-entered, so the
    /// same set can accumulate several calls.
    pub fn floodfill_set(
        self,
        start: Pos,
        passable: impl Fn(Pos) -> bool,
        visited: &mut Flooded,
    ) -> usize {
        self.floodfill(
            start,
            visited,
            |visited, pos| passable(pos) && !visited.contains(pos),
            |visited, pos| {
                visited.insert(pos);
            },
        )
    }
}

/// Positions reached by a flood, remembered in the order they were visited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Flooded {
    order: Vec<Pos>,
    members: BTreeSet<Pos>,
}

impl Flooded {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: Pos) -> bool {
        if self.members.insert(pos) {
            self.order.push(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.members.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.order.iter().copied()
    }
}
