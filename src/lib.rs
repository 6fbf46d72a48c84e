mod app;
mod pages;
mod plan;
mod session;
mod stopwatch;
mod storage;
mod store;
mod supabase;
mod sync;
mod types;

use leptos::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(app::App);
}
