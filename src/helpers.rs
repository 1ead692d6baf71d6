use crate::renderer::Clock;

/// `format!`-style logging to the browser console. Off wasm32 there is no
/// console to talk to, so the arguments are only type-checked.
macro_rules! console_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!($($t)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format_args!($($t)*);
    }};
}

/// Wall clock of the JS host.
pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Int32Array aliasing `words` in wasm memory. The view is invalidated as
/// soon as the buffer reallocates or wasm memory grows, so the host must
/// read it before calling back into the engine.
pub fn int32_view(words: &mut [i32]) -> js_sys::Int32Array {
    unsafe { js_sys::Int32Array::view_mut_raw(words.as_mut_ptr(), words.len()) }
}
