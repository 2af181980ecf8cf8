use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

macro_rules! console_log {
    ($fmt:expr, $($arg1:expr),*) => {
        crate::wasm_util::log(&format!($fmt, $($arg1),+))
    };
    ($fmt:expr) => {
        crate::wasm_util::log($fmt)
    }
}

pub(crate) use console_log;

pub(crate) fn window() -> web_sys::Window {
    web_sys::window().expect("no global `window` exists")
}
