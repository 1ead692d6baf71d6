use serde::Serialize;

use crate::fixed::{
    ceil_to_tile, cos_lookup, floor_to_tile, isqrt, sin_lookup, squared_len, TILE, UNREACHABLE,
};
use crate::map::{Cell, Map};
use crate::player::PlayerState;

/// Outcome of one column's traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RayHit {
    /// Wall kind struck, `None` when the ray left the map or ran out of range.
    pub cell: Option<Cell>,
    pub dist: i32,
    /// Position across the struck wall face, 0..=999.
    pub offset: i32,
    pub steps: u32,
}

/// A cast ray together with the column it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColumnRay {
    pub col: i32,
    /// Offset from `facing` in native angle units.
    pub angle: i32,
    pub hit: RayHit,
}

struct Ray {
    x: i32,
    y: i32,
    dist: i32,
    offset: i32,
}

/// Angle of `col` relative to the view direction. Linear across the field
/// of view; `fov / width` is computed once, so the edges are slightly uneven.
/// Wraps like any other angle when `col` is far outside the view.
#[inline]
pub fn column_angle(col: i32, width: i32, fov: i32) -> i32 {
    (fov / width).wrapping_mul(col.wrapping_sub(width / 2))
}

/// Distance to the next gridline along one axis: the step on that axis, the
/// matching step on the other axis, and the squared length of the move.
#[inline]
fn next_gridline(along: i32, main: i32, cross: i32) -> (i32, i32, i32) {
    if main == 0 {
        return (0, 0, UNREACHABLE);
    }
    let step = if main > 0 {
        floor_to_tile(along.saturating_add(TILE)) - along
    } else {
        ceil_to_tile(along.saturating_sub(TILE)) - along
    };
    // |step| <= TILE and |cross| <= TRIG_MAX_RATIO, so this fits an i32
    let cross_step = (step as i64 * cross as i64 / main as i64) as i32;
    (step, cross_step, squared_len(step, cross_step))
}

/// Casts a ray from `origin` toward `heading` through `map`, one gridline at
/// a time, until it strikes a wall, leaves the map heading away from it, or
/// travels further than `range`.
pub fn cast(map: &Map, origin: &PlayerState, heading: i32, range: i32) -> RayHit {
    let sin = sin_lookup(heading);
    let cos = cos_lookup(heading);
    let extent = map.extent();

    let mut ray = Ray {
        x: origin.x,
        y: origin.y,
        dist: 0,
        offset: 0,
    };
    let mut steps = 0;

    loop {
        let (xdx, xdy, xlen) = next_gridline(ray.x, cos, sin);
        let (ydy, ydx, ylen) = next_gridline(ray.y, sin, cos);

        // equal lengths step along Y
        let sample = if xlen < ylen {
            ray.x = ray.x.saturating_add(xdx);
            ray.y = ray.y.saturating_add(xdy);
            ray.dist = ray.dist.saturating_add(isqrt(xlen));
            ray.offset = ray.y;
            let back = if cos < 0 { TILE } else { 0 };
            map.lookup(floor_to_tile(ray.x.saturating_sub(back)), floor_to_tile(ray.y))
        } else {
            ray.x = ray.x.saturating_add(ydx);
            ray.y = ray.y.saturating_add(ydy);
            ray.dist = ray.dist.saturating_add(isqrt(ylen));
            ray.offset = ray.x;
            let back = if sin < 0 { TILE } else { 0 };
            map.lookup(floor_to_tile(ray.x), floor_to_tile(ray.y.saturating_sub(back)))
        };
        steps += 1;

        if let Some(cell) = sample.filter(|cell| cell.is_wall()) {
            return RayHit {
                cell: Some(cell),
                dist: ray.dist,
                offset: ray.offset.rem_euclid(TILE),
                steps,
            };
        }

        let (x, y) = (ray.x as i64, ray.y as i64);
        let leaving = (sin < 0 && y < 0)
            || (sin > 0 && y >= extent)
            || (cos < 0 && x < 0)
            || (cos > 0 && x >= extent);
        // a saturated dist can never exceed an i32::MAX range
        if leaving || ray.dist > range || ray.dist == i32::MAX {
            return RayHit {
                cell: None,
                dist: ray.dist,
                offset: ray.offset.rem_euclid(TILE),
                steps,
            };
        }
    }
}

/// Casts every column of a `width`-wide view into `out`, reusing its storage.
pub fn cast_view(
    map: &Map,
    player: &PlayerState,
    width: i32,
    fov: i32,
    range: i32,
    out: &mut Vec<ColumnRay>,
) {
    let column = |col: i32| {
        let angle = column_angle(col, width, fov);
        ColumnRay {
            col,
            angle,
            hit: cast(map, player, player.facing.wrapping_add(angle), range),
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..width).into_par_iter().map(column).collect_into_vec(out);
    }

    #[cfg(not(feature = "parallel"))]
    {
        out.clear();
        out.extend((0..width).map(column));
    }
}
