use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, EngineConfig};
use crate::draw::DrawSink;
use crate::map::Map;
use crate::player::{Impulse, PlayerState};
use crate::raycast::{cast, column_angle, ColumnRay};
use crate::renderer::{render_frame, Clock, FrameStats};

/// Mixed into the configured seed so shading noise does not replay the
/// numbers used to build the map.
const SHADE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Everything a session owns: map, player, options and the noise source.
pub struct World {
    config: EngineConfig,
    map: Map,
    player: PlayerState,
    shade_rng: StdRng,
    rays: Vec<ColumnRay>,
}

impl World {
    /// Validates `config` and generates a random map.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut map_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let map = Map::generate(config.map_size, &mut map_rng);
        console_log!("generated {0}x{0} map, seed {1:?}", config.map_size, config.seed);
        Self::with_map(config, map)
    }

    /// Uses a prepared map. Its size replaces `config.map_size`.
    pub fn with_map(mut config: EngineConfig, map: Map) -> Result<Self, ConfigError> {
        config.map_size = map.size();
        config.validate()?;
        let shade_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ SHADE_SEED_SALT),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            player: config.start,
            rays: Vec::with_capacity(config.view.w as usize),
            config,
            map,
            shade_rng,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    /// Swaps in a new map, e.g. one loaded by the host.
    pub fn replace_map(&mut self, map: Map) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.map_size = map.size();
        config.validate()?;
        self.config = config;
        self.map = map;
        Ok(())
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn set_player(&mut self, player: PlayerState) {
        self.player = player;
    }

    /// One simulation step driven by the input provider.
    pub fn tick(&mut self, impulse: Impulse) {
        self.player.tick(
            &self.map,
            impulse,
            self.config.steer_gain,
            self.config.pass_through,
        );
    }

    /// Casts a single column of the current view.
    pub fn cast_column(&self, col: i32) -> ColumnRay {
        let angle = column_angle(col, self.config.view.w, self.config.fov);
        ColumnRay {
            col,
            angle,
            hit: cast(
                &self.map,
                &self.player,
                self.player.facing.wrapping_add(angle),
                self.config.range,
            ),
        }
    }

    pub fn render<C, S>(&mut self, clock: &C, sink: &mut S) -> FrameStats
    where
        C: Clock + ?Sized,
        S: DrawSink + ?Sized,
    {
        render_frame(
            &self.map,
            &self.player,
            &self.config,
            &mut self.rays,
            &mut self.shade_rng,
            clock,
            sink,
        )
    }
}
