use sauron::prelude::*;

mod api;
pub mod app;
pub mod form;
pub mod store;

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(app::Model::default());
}
