use helpers::{int32_view, DateClock};
use wasm_bindgen::prelude::*;

#[macro_use]
mod helpers;
pub mod config;
pub mod draw;
pub mod fixed;
pub mod map;
pub mod player;
pub mod projector;
pub mod raycast;
pub mod renderer;
pub mod world;

pub use config::{ConfigError, EngineConfig, Viewport};
pub use draw::{Command, DrawList, DrawSink, Rect, Tone, COMMAND_STRIDE};
pub use map::{Cell, Map, MapError, OUT_OF_BOUNDS};
pub use player::{Impulse, PlayerState};
pub use raycast::{ColumnRay, RayHit};
pub use renderer::{Clock, FrameStats};
pub use world::World;

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

/// JS-facing handle: one world plus the command buffer the host reads after
/// each `render`.
#[wasm_bindgen]
pub struct Engine {
    world: World,
    draw: DrawList,
}

#[wasm_bindgen]
impl Engine {
    /// `config` is an `EngineConfig`-shaped object; `undefined` uses defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Engine, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let world = World::new(config).map_err(JsError::from)?;
        Ok(Engine {
            world,
            draw: DrawList::new(),
        })
    }

    /// Simulation step with this tick's steering and throttle.
    pub fn tick(&mut self, angular: i32, forward: i32) {
        self.world.tick(Impulse { angular, forward });
    }

    /// Records a frame into the command buffer and returns its `FrameStats`.
    pub fn render(&mut self) -> Result<JsValue, JsValue> {
        self.draw.clear();
        let stats = self.world.render(&DateClock, &mut self.draw);
        Ok(serde_wasm_bindgen::to_value(&stats)?)
    }

    /// Recorded commands, `COMMAND_STRIDE` words each.
    #[wasm_bindgen(getter, js_name = commands)]
    pub fn commands(&mut self) -> js_sys::Int32Array {
        int32_view(self.draw.words_mut())
    }

    #[wasm_bindgen(getter, js_name = commandsPtr)]
    pub fn commands_ptr(&mut self) -> *mut i32 {
        self.draw.words_mut().as_mut_ptr()
    }

    #[wasm_bindgen(getter, js_name = commandsLen)]
    pub fn commands_len(&self) -> usize {
        self.draw.words().len()
    }

    #[wasm_bindgen(getter, js_name = commandStride)]
    pub fn command_stride(&self) -> usize {
        COMMAND_STRIDE
    }

    #[wasm_bindgen(getter, js_name = overlayText)]
    pub fn overlay_text(&self) -> String {
        self.draw.overlay_text().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn player(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.world.player())?)
    }

    #[wasm_bindgen(js_name = setPlayer)]
    pub fn set_player(&mut self, player: JsValue) -> Result<(), JsValue> {
        let player: PlayerState = serde_wasm_bindgen::from_value(player)?;
        self.world.set_player(player);
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = mapSize)]
    pub fn map_size(&self) -> usize {
        self.world.map().size()
    }

    /// Row-major cell codes of the current map.
    #[wasm_bindgen(js_name = mapCodes)]
    pub fn map_codes(&self) -> Vec<i8> {
        self.world.map().cells().iter().map(|cell| cell.code()).collect()
    }

    #[wasm_bindgen(js_name = loadMap)]
    pub fn load_map(&mut self, size: usize, codes: Vec<i8>) -> Result<(), JsValue> {
        let map = Map::from_codes(size, &codes).map_err(JsError::from)?;
        self.world.replace_map(map).map_err(JsError::from)?;
        console_log!("loaded {0}x{0} map", size);
        Ok(())
    }

    /// Cell code under a scaled world coordinate, `OUT_OF_BOUNDS` off the map.
    #[wasm_bindgen(js_name = cellAt)]
    pub fn cell_at(&self, x: i32, y: i32) -> i8 {
        self.world.map().code_at(x, y)
    }

    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&mut self, col: usize, row: usize, code: i8) -> Result<(), JsValue> {
        let cell = Cell::from_code(code)
            .ok_or_else(|| JsError::new(&format!("unknown cell code {code}")))?;
        self.world.map_mut().set(col, row, cell);
        Ok(())
    }

    /// Traversal result for one column, for debugging overlays.
    #[wasm_bindgen(js_name = castColumn)]
    pub fn cast_column(&self, col: i32) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.world.cast_column(col))?)
    }
}
