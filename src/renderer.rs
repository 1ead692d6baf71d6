use rand::Rng;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::draw::{DrawSink, Rect, Tone};
use crate::fixed::TILE;
use crate::map::Map;
use crate::player::PlayerState;
use crate::projector;
use crate::raycast::{cast_view, ColumnRay};

/// Where the status line goes when `draw_textbox` is on.
pub const TEXTBOX: Rect = Rect::new(0, 0, 143, 20);

/// Millisecond timestamps for frame timing. Only feeds the status line.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub columns: u32,
    pub hits: u32,
    pub elapsed_ms: u64,
}

impl FrameStats {
    pub fn fps(&self) -> u64 {
        1000 / self.elapsed_ms.max(1)
    }
}

/// Scaled coordinate as tiles with one decimal, e.g. -2500 -> "-2.5".
fn tenths(v: i32) -> String {
    let sign = if v < 0 { "-" } else { "" };
    let a = v.unsigned_abs();
    let tile = TILE as u32;
    format!("{sign}{}.{}", a / tile, (a % tile) / 100)
}

pub fn status_line(player: &PlayerState, stats: &FrameStats) -> String {
    format!(
        " ({},{}) {}ms {}fps",
        tenths(player.x),
        tenths(player.y),
        stats.elapsed_ms,
        stats.fps()
    )
}

/// Draws one full frame: border, horizon, one wall column per ray, status line.
pub fn render_frame<R, C, S>(
    map: &Map,
    player: &PlayerState,
    config: &EngineConfig,
    rays: &mut Vec<ColumnRay>,
    rng: &mut R,
    clock: &C,
    sink: &mut S,
) -> FrameStats
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
    S: DrawSink + ?Sized,
{
    let started = clock.now_ms();
    let view = &config.view;

    if config.view_border {
        sink.rect(Rect::new(view.x - 1, view.y - 1, view.w + 2, view.h + 2), Tone::White);
    }
    let horizon = view.y + view.h / 2;
    sink.hline(view.x, view.x + view.w, horizon, Tone::White);

    cast_view(map, player, view.w, config.fov, config.range, rays);

    let mut hits = 0;
    for ray in rays.iter() {
        if let Some((span, shading)) = projector::project(ray, view.h) {
            projector::emit(ray.col, &span, shading, ray.hit.offset, view, rng, sink);
            hits += 1;
        }
    }

    let stats = FrameStats {
        columns: rays.len() as u32,
        hits,
        elapsed_ms: clock.now_ms().saturating_sub(started),
    };

    if config.draw_textbox {
        sink.fill_rect(TEXTBOX, Tone::Black);
        sink.rect(TEXTBOX, Tone::White);
        sink.text(TEXTBOX, &status_line(player, &stats));
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Command, DrawList};
    use crate::map::Cell;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell as Counter;

    /// Advances 4ms every time it is read.
    struct SteppingClock(Counter<u64>);

    impl Clock for SteppingClock {
        fn now_ms(&self) -> u64 {
            let now = self.0.get();
            self.0.set(now + 4);
            now
        }
    }

    fn boxed_in() -> Map {
        let mut map = Map::empty(5);
        for i in 0..5 {
            map.set(i, 0, Cell::Solid);
            map.set(i, 4, Cell::Solid);
            map.set(0, i, Cell::Solid);
            map.set(4, i, Cell::Striped);
        }
        map
    }

    #[test]
    fn test_tenths() {
        assert_eq!(tenths(5000), "5.0");
        assert_eq!(tenths(-2500), "-2.5");
        assert_eq!(tenths(-50), "-0.0");
        assert_eq!(tenths(1999), "1.9");
    }

    #[test]
    fn test_frame_layout() {
        let map = boxed_in();
        let player = PlayerState { x: 2500, y: 2500, facing: 0 };
        let config = EngineConfig::default();
        let mut rays = Vec::new();
        let mut sink = DrawList::new();
        let clock = SteppingClock(Counter::new(100));
        let stats = render_frame(
            &map,
            &player,
            &config,
            &mut rays,
            &mut StdRng::seed_from_u64(3),
            &clock,
            &mut sink,
        );

        assert_eq!(stats, FrameStats { columns: 142, hits: 142, elapsed_ms: 4 });
        let commands: Vec<_> = sink.commands().collect();
        assert_eq!(
            commands[0],
            Command::Rect { rect: Rect::new(0, 24, 144, 142), tone: Tone::White }
        );
        assert_eq!(commands[1], Command::HLine { x0: 1, x1: 143, y: 95, tone: Tone::White });
        let n = commands.len();
        assert_eq!(commands[n - 3], Command::FillRect { rect: TEXTBOX, tone: Tone::Black });
        assert_eq!(commands[n - 2], Command::Rect { rect: TEXTBOX, tone: Tone::White });
        assert_eq!(commands[n - 1], Command::Text { frame: TEXTBOX });
        assert_eq!(sink.overlay_text(), " (2.5,2.5) 4ms 250fps");

        // every wall pixel stays inside the viewport
        for command in &commands[2..n - 3] {
            match *command {
                Command::Pixel { x, y, .. } => {
                    assert!((1..143).contains(&x) && (25..165).contains(&y));
                }
                Command::VLine { x, y0, y1, .. } => {
                    assert!((1..143).contains(&x));
                    assert!(25 <= y0 && y0 <= y1 && y1 < 165);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_frame_without_decorations() {
        let map = Map::empty(3);
        let player = PlayerState { x: 1500, y: 1500, facing: 0 };
        let config = EngineConfig {
            view_border: false,
            draw_textbox: false,
            ..EngineConfig::default()
        };
        let mut rays = Vec::new();
        let mut sink = DrawList::new();
        let stats = render_frame(
            &map,
            &player,
            &config,
            &mut rays,
            &mut StdRng::seed_from_u64(3),
            &SteppingClock(Counter::new(0)),
            &mut sink,
        );
        assert_eq!(stats.hits, 0);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.overlay_text(), "");
    }
}
