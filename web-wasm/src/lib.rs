//! 스카이 영혼 대백과 Web App (Leptos + WASM)

mod api;
mod app;
mod components;
mod list_view;
mod navigation;
mod pages;
mod routes;
mod session_store;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    navigation::install();
    leptos::mount::mount_to_body(app::App);
}
