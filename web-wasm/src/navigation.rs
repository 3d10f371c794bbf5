//! 一覧に入ったときのナビゲーション種別
//!
//! SPAではNavigation Timingが最初の読み込みしか表さないため、
//! `popstate` の発生先パスを記録してクライアント側の戻る・進むを判別する。

use gloo::events::EventListener;
use sky_souls_common::NavigationType;
use std::cell::{Cell, RefCell};
use wasm_bindgen::prelude::*;
use web_sys::ScrollRestoration;

thread_local! {
    /// 直近の popstate で表示されたパス
    static POPPED_PATH: RefCell<Option<String>> = const { RefCell::new(None) };
    static FIRST_ENTRY: Cell<bool> = const { Cell::new(true) };
}

fn current_path() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

/// 起動時に1回だけ呼ぶ
pub fn install() {
    let Some(window) = web_sys::window() else {
        return;
    };

    // スクロール位置は自前で戻す
    if let Ok(history) = window.history() {
        let _ = history.set_scroll_restoration(ScrollRestoration::Manual);
    }

    // アプリの寿命と同じなので外さない
    EventListener::new(&window, "popstate", |_event| {
        POPPED_PATH.with(|p| *p.borrow_mut() = current_path());
    })
    .forget();
}

/// ルーター経由の遷移の直前に呼ぶ
pub fn mark_push() {
    POPPED_PATH.with(|p| p.borrow_mut().take());
}

/// 一覧のマウント時に1回だけ呼ぶ
pub fn current() -> NavigationType {
    let first = FIRST_ENTRY.with(|f| f.replace(false));
    let popped = POPPED_PATH.with(|p| p.borrow_mut().take());

    if popped.is_some() && popped == current_path() {
        NavigationType::Pop
    } else if first {
        timing_type()
    } else {
        NavigationType::Push
    }
}

/// 最初の読み込みのNavigation Timing
fn timing_type() -> NavigationType {
    let entry = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.get_entries_by_type("navigation"))
        .map(|entries| entries.get(0))
        .filter(|entry| !entry.is_undefined());

    entry
        .and_then(|entry| js_sys::Reflect::get(&entry, &JsValue::from_str("type")).ok())
        .and_then(|value| value.as_string())
        .map(|value| NavigationType::from_timing_type(&value))
        .unwrap_or(NavigationType::Unknown)
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn dispatch_popstate() {
        let window = web_sys::window().expect("windowが無い");
        let event = web_sys::Event::new("popstate").expect("イベント作成失敗");
        window.dispatch_event(&event).expect("イベント送信失敗");
    }

    #[wasm_bindgen_test]
    fn popstate_on_current_path_is_pop() {
        install();
        dispatch_popstate();
        assert_eq!(current(), NavigationType::Pop);
        // 一度読んだら消える
        assert_ne!(current(), NavigationType::Pop);
    }

    #[wasm_bindgen_test]
    fn router_navigation_clears_pending_pop() {
        install();
        dispatch_popstate();
        mark_push();
        assert_ne!(current(), NavigationType::Pop);
    }

    #[wasm_bindgen_test]
    fn popstate_for_another_path_is_ignored() {
        POPPED_PATH.with(|p| *p.borrow_mut() = Some("/somewhere/else".to_string()));
        assert_ne!(current(), NavigationType::Pop);
        assert!(POPPED_PATH.with(|p| p.borrow().is_none()));
    }
}
