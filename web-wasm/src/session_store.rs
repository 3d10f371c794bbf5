//! sessionStorage をスナップショットの保存先にする

use gloo::storage::{SessionStorage, Storage};
use sky_souls_common::{Error, Result, ViewStateStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore;

impl ViewStateStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        SessionStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // 容量超過はここでErrになる
        SessionStorage::raw()
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("sessionStorage.setItem failed: {:?}", e)))
    }

    fn remove(&mut self, key: &str) {
        let _ = SessionStorage::raw().remove_item(key);
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use sky_souls_common::{
        FilterState, ListPage, MountAction, NavigationType, Soul, ViewStateController,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn set_get_remove_round_trip() {
        let mut store = SessionStore;
        store.set("sessionStoreTest_scrollY", "1200").expect("書き込み失敗");
        assert_eq!(store.get("sessionStoreTest_scrollY").as_deref(), Some("1200"));

        store.remove("sessionStoreTest_scrollY");
        assert_eq!(store.get("sessionStoreTest_scrollY"), None);
    }

    #[wasm_bindgen_test]
    fn missing_snapshot_mounts_as_fresh_entry() {
        let page = ListPage::TravelingEncyclopedia;
        let mut store = SessionStore;
        for key in ["_scrollY", "_state", "_items"] {
            store.remove(&format!("{}{}", page.cache_prefix(), key));
        }

        let mut controller: ViewStateController<Soul, SessionStore> =
            ViewStateController::new(page, store);
        let action = controller.mount(NavigationType::Pop, FilterState::defaults(page));
        assert!(matches!(action, MountAction::Fetch(request) if request.page == 0));
    }
}
