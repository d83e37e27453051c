pub mod bindings;
pub mod platform;

pub use bindings::{configure_simple_modal, option_value, page_context, JsSimpleModal};
pub use platform::{WebListener, WebPlatform, WebTimer};

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already installed");
    }
}
