use rand::Rng;

use crate::config::Viewport;
use crate::draw::{DrawSink, Tone};
use crate::fixed::{cos_lookup, isqrt, TILE, TRIG_MAX_RATIO};
use crate::raycast::ColumnRay;

/// Offsets this close to either side of a wall face draw as a dark edge.
pub const EDGE_WIDTH: i32 = 50;

/// Period of the light/dark bands, in rows.
pub const BAND_PERIOD: i32 = 9;

/// Rows covered by one wall column, relative to the top of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub top: i32,
    pub bottom: i32,
    /// Depth after fisheye correction, never below 1.
    pub z: i32,
}

impl ColumnSpan {
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Flat dark line.
    Edge,
    /// Per-pixel run; larger `band` means a darker, more distant wall.
    Banded { band: i32 },
}

/// Ray distance projected onto the view direction.
#[inline]
pub fn depth(dist: i32, angle: i32) -> i32 {
    let z = dist as i64 * cos_lookup(angle) as i64 / TRIG_MAX_RATIO as i64;
    z.max(1) as i32
}

/// Top and bottom rows for a wall at depth `z`, clamped into the view.
pub fn span(z: i32, view_h: i32) -> ColumnSpan {
    let z = z.max(1);
    let h = view_h as i64;
    let zl = z as i64;
    let bottom = (h / 2) * (zl + TILE as i64) / zl;
    let top = bottom - (h * TILE as i64) / zl;
    let last = h - 1;
    ColumnSpan {
        top: top.clamp(0, last) as i32,
        bottom: bottom.clamp(0, last) as i32,
        z,
    }
}

pub fn shading(offset: i32, z: i32) -> Shading {
    if offset < EDGE_WIDTH || offset > TILE - EDGE_WIDTH {
        Shading::Edge
    } else {
        Shading::Banded {
            band: (isqrt(z / 2) / 7).max(1),
        }
    }
}

/// Span and shading for a column, `None` when its ray hit nothing.
pub fn project(ray: &ColumnRay, view_h: i32) -> Option<(ColumnSpan, Shading)> {
    ray.hit.cell?;
    let span = span(depth(ray.hit.dist, ray.angle), view_h);
    Some((span, shading(ray.hit.offset, span.z)))
}

/// Emits draw commands for one column in screen coordinates.
///
/// Banded columns light a row when it falls on a light band or when the
/// noise roll comes up zero; both get rarer as `band` grows.
pub fn emit<R, S>(
    col: i32,
    span: &ColumnSpan,
    shading: Shading,
    offset: i32,
    view: &Viewport,
    rng: &mut R,
    sink: &mut S,
) where
    R: Rng + ?Sized,
    S: DrawSink + ?Sized,
{
    let x = view.x + col;
    match shading {
        Shading::Edge => sink.vline(x, view.y + span.top, view.y + span.bottom, Tone::Black),
        Shading::Banded { band } => {
            for row in 0..=span.height() {
                let lit = (row + offset) % BAND_PERIOD >= band || rng.random_range(0..band) == 0;
                let tone = if lit { Tone::White } else { Tone::Black };
                sink.pixel(x, view.y + span.top + row, tone);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Command, DrawList};
    use crate::map::Cell;
    use crate::raycast::RayHit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_depth_corrects_fisheye() {
        assert_eq!(depth(2000, 0), 2000);
        // 60 degrees off axis halves the depth
        let z = depth(2000, 0x10000 / 6);
        assert!((z - 1000).abs() <= 1, "z = {z}");
        assert_eq!(depth(0, 0), 1);
        assert_eq!(depth(i32::MAX, 0), i32::MAX);
    }

    #[test]
    fn test_span_values() {
        // one tile away on a 140 row view
        let s = span(1000, 140);
        assert_eq!((s.top, s.bottom), (0, 139));
        let s = span(2000, 140);
        assert_eq!((s.top, s.bottom), (35, 105));
        let s = span(10_000, 140);
        assert_eq!((s.top, s.bottom), (63, 77));
    }

    #[test]
    fn test_span_shrinks_with_depth() {
        for h in [1, 2, 100, 140, 141, 168] {
            let mut previous = i32::MAX;
            for z in (1..200_000).step_by(7).chain([i32::MAX / 2, i32::MAX]) {
                let s = span(z, h);
                assert!((0..h).contains(&s.top), "h {h} z {z} top {}", s.top);
                assert!((0..h).contains(&s.bottom), "h {h} z {z} bottom {}", s.bottom);
                assert!(s.height() <= previous, "h {h} z {z}");
                previous = s.height();
            }
        }
    }

    #[test]
    fn test_shading_edges_and_bands() {
        assert_eq!(shading(0, 3000), Shading::Edge);
        assert_eq!(shading(49, 3000), Shading::Edge);
        assert_eq!(shading(951, 3000), Shading::Edge);
        assert_eq!(shading(500, 10_000), Shading::Banded { band: 10 });
        assert_eq!(shading(500, 2000), Shading::Banded { band: 4 });
        // very close walls must not produce a zero band
        assert_eq!(shading(500, 1), Shading::Banded { band: 1 });
        assert_eq!(shading(50, 0), Shading::Banded { band: 1 });
    }

    #[test]
    fn test_project_skips_misses() {
        let miss = ColumnRay { col: 3, angle: 0, hit: RayHit::default() };
        assert_eq!(project(&miss, 140), None);

        let hit = ColumnRay {
            col: 3,
            angle: 0,
            hit: RayHit { cell: Some(Cell::Solid), dist: 2000, offset: 10, steps: 2 },
        };
        let (s, shade) = project(&hit, 140).unwrap();
        assert_eq!((s.top, s.bottom, s.z), (35, 105, 2000));
        assert_eq!(shade, Shading::Edge);
    }

    #[test]
    fn test_emit_edge_line() {
        let view = Viewport { x: 1, y: 25, w: 142, h: 140 };
        let mut sink = DrawList::new();
        let s = span(2000, view.h);
        emit(7, &s, Shading::Edge, 10, &view, &mut StdRng::seed_from_u64(1), &mut sink);
        let commands: Vec<_> = sink.commands().collect();
        assert_eq!(
            commands,
            vec![Command::VLine { x: 8, y0: 60, y1: 130, tone: Tone::Black }]
        );
    }

    #[test]
    fn test_emit_banded_pixels() {
        let view = Viewport { x: 0, y: 0, w: 10, h: 140 };
        let s = span(2000, view.h);
        let mut sink = DrawList::new();
        let mut rng = StdRng::seed_from_u64(7);
        emit(2, &s, Shading::Banded { band: 1 }, 500, &view, &mut rng, &mut sink);
        assert_eq!(sink.len() as i32, s.height() + 1);
        // band 1 always lights
        assert!(sink.commands().all(|c| matches!(c, Command::Pixel { x: 2, tone: Tone::White, .. })));

        let mut dim = DrawList::new();
        emit(2, &s, Shading::Banded { band: 10 }, 500, &view, &mut rng, &mut dim);
        let lit = dim
            .commands()
            .filter(|c| matches!(c, Command::Pixel { tone: Tone::White, .. }))
            .count();
        assert!(lit < dim.len() / 2, "lit {lit} of {}", dim.len());
    }

    #[test]
    fn test_emit_same_seed_same_pixels() {
        let view = Viewport::default();
        let s = span(5000, view.h);
        let run = |seed| {
            let mut sink = DrawList::new();
            emit(0, &s, Shading::Banded { band: 7 }, 321, &view, &mut StdRng::seed_from_u64(seed), &mut sink);
            sink.words().to_vec()
        };
        assert_eq!(run(9), run(9));
    }
}
