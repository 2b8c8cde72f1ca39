//! Recursive shadowcasting on the hex grid.
//!
//! Each of the six 60-degree sectors is mapped onto a canonical triangle of
//! rows by a normal and a tangent direction, then scanned row by row while
//! narrowing the visible slope interval around opaque tiles.
//!
//! `transparent` must report false for every position outside the playable
//! region; the scan only stops at opaque tiles or an empty slope interval.

use crate::geometry::GridShape;
use crate::types::{Direction, Pos};

/// Calls `reveal` for every position visible from `center`, including
/// `center` itself and the opaque tiles bounding the view. A position may be
/// revealed more than once.
pub fn shadowcast(
    shape: GridShape,
    center: Pos,
    transparent: impl Fn(Pos) -> bool,
    mut reveal: impl FnMut(Pos),
) {
    reveal(center);
    for normal in Direction::ALL {
        let tangent = normal.rotated(2);
        let mut scan = SectorScan {
            center,
            tangent: shape.offset(tangent),
            normal: shape.offset(normal),
            transparent: &transparent,
            reveal: &mut reveal,
        };
        scan.scan(1, 0.0, 1.0);
    }
}

struct SectorScan<'a, T, R> {
    center: Pos,
    tangent: i32,
    normal: i32,
    transparent: &'a T,
    reveal: &'a mut R,
}

impl<T, R> SectorScan<'_, T, R>
where
    T: Fn(Pos) -> bool,
    R: FnMut(Pos),
{
    fn transform(&self, x: i32, y: i32) -> Pos {
        self.center + (x * self.tangent + y * self.normal)
    }

    fn scan(&mut self, y: i32, mut start: f64, end: f64) {
        if start >= end {
            return;
        }
        let row = f64::from(y);
        // Opaque tiles are considered over a slightly wider span than
        // transparent ones so the lit area stays left/right symmetric.
        let xmin = round_half_up(row * start);
        let xmax = round_half_down(row * end);
        let mut run_has_transparent = false;
        for x in xmin..=xmax {
            let pos = self.transform(x, y);
            let column = f64::from(x);
            if (self.transparent)(pos) {
                if column >= row * start && column <= row * end {
                    (self.reveal)(pos);
                    run_has_transparent = true;
                }
            } else {
                if run_has_transparent {
                    self.scan(y + 1, start, (column - 0.5) / row);
                }
                (self.reveal)(pos);
                run_has_transparent = false;
                start = (column + 0.5) / row;
                if start >= end {
                    return;
                }
            }
        }
        if run_has_transparent {
            self.scan(y + 1, start, end);
        }
    }
}

fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}

fn round_half_down(value: f64) -> i32 {
    (value - 0.5).ceil() as i32
}
