//! Integer math at a 1000-per-tile scale.
//!
//! Positions and distances are `i32` where 1000 is one tile edge. Angles use
//! a native unit where `TRIG_MAX_ANGLE` is a full turn, and sin/cos come back
//! scaled by `TRIG_MAX_RATIO`.

use std::sync::OnceLock;

pub const TILE: i32 = 1000;

pub const TRIG_MAX_ANGLE: i32 = 0x10000;
pub const TRIG_MAX_RATIO: i32 = 0xffff;

/// Refinement rounds for `isqrt`. 20 is enough to converge from `i32::MAX`.
pub const ISQRT_ITERATIONS: u32 = 20;

/// Length used for an axis the ray can never reach, and for overflowed squares.
pub const UNREACHABLE: i32 = i32::MAX;

const QUARTER: usize = (TRIG_MAX_ANGLE / 4) as usize;

/// Rounds down to a multiple of `TILE`, toward negative infinity.
#[inline]
pub fn floor_to_tile(v: i32) -> i32 {
    let b = v - v % TILE;
    if b != v && v < 0 {
        b.saturating_sub(TILE)
    } else {
        b
    }
}

/// Rounds up to a multiple of `TILE`, toward positive infinity.
#[inline]
pub fn ceil_to_tile(v: i32) -> i32 {
    let b = v - v % TILE;
    if b != v && v > 0 {
        b.saturating_add(TILE)
    } else {
        b
    }
}

/// Babylonian square root with a fixed number of rounds.
///
/// Starts from `a` itself, so large inputs spend the first rounds halving.
/// Non-positive input returns 0.
pub fn isqrt(a: i32) -> i32 {
    if a <= 0 {
        return 0;
    }
    // b + a/b can exceed i32 on the first round
    let a = a as i64;
    let mut b = a;
    for _ in 0..ISQRT_ITERATIONS {
        b = (b + a / b) / 2;
    }
    b as i32
}

/// `dx*dx + dy*dy`, or `UNREACHABLE` if the sum does not fit in an `i32`.
#[inline]
pub fn squared_len(dx: i32, dy: i32) -> i32 {
    dx.checked_mul(dx)
        .zip(dy.checked_mul(dy))
        .and_then(|(xx, yy)| xx.checked_add(yy))
        .unwrap_or(UNREACHABLE)
}

fn quarter_wave() -> &'static [i32] {
    static TABLE: OnceLock<Vec<i32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        (0..=QUARTER)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / TRIG_MAX_ANGLE as f64;
                (theta.sin() * TRIG_MAX_RATIO as f64).round() as i32
            })
            .collect()
    })
}

/// Sine of a native angle, scaled by `TRIG_MAX_RATIO`. Any `i32` wraps.
pub fn sin_lookup(angle: i32) -> i32 {
    let table = quarter_wave();
    let a = angle.rem_euclid(TRIG_MAX_ANGLE) as usize;
    let i = a % QUARTER;
    match a / QUARTER {
        0 => table[i],
        1 => table[QUARTER - i],
        2 => -table[i],
        _ => -table[QUARTER - i],
    }
}

/// Cosine of a native angle, scaled by `TRIG_MAX_RATIO`.
#[inline]
pub fn cos_lookup(angle: i32) -> i32 {
    sin_lookup(angle.wrapping_add(TRIG_MAX_ANGLE / 4))
}
