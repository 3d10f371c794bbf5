//! セッションストアのテスト
//!
//! ファイルストア上でスナップショットの保存・復元・消費を検証

use sky_souls::store::FileStore;
use sky_souls_common::{
    FilterState, ListPage, MountAction, NavigationType, PageCache, PagedItem, RestoreSnapshot, Soul,
    ViewStateController, ViewStateStore,
};
use tempfile::tempdir;

fn snapshot(count: i64) -> RestoreSnapshot<Soul> {
    RestoreSnapshot {
        scroll_y: 3200.0,
        filter: FilterState::defaults(ListPage::SeasonDictionary),
        page: 2,
        total_pages: 5,
        total_elements: 100,
        items: (0..count)
            .map(|id| PagedItem {
                page: (id / 20) as u32,
                item: Soul {
                    id,
                    name: format!("영혼{}", id),
                    ..Default::default()
                },
            })
            .collect(),
        timestamp_ms: 1_700_000_000_000,
    }
}

/// 存在しないキーは None
#[test]
fn test_file_store_missing_key() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path().join("session"));
    assert_eq!(store.get("seasonDict_scrollY"), None);
    assert!(store.entries().is_empty());
}

/// 書き込みと削除
#[test]
fn test_file_store_set_get_remove() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path().join("session"));

    store.set("seasonDict_scrollY", "3200").expect("書き込み失敗");
    assert_eq!(store.get("seasonDict_scrollY").as_deref(), Some("3200"));

    store.remove("seasonDict_scrollY");
    assert_eq!(store.get("seasonDict_scrollY"), None);

    // 存在しないキーの削除はエラーにならない
    store.remove("seasonDict_scrollY");
}

/// キャッシュの保存と読み込み
#[test]
fn test_page_cache_round_trip_on_disk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());
    let mut cache = PageCache::for_page(store, ListPage::SeasonDictionary);

    cache.save(&snapshot(60)).expect("保存失敗");
    assert!(cache.has_snapshot());

    let keys: Vec<String> = cache.store().entries().into_iter().map(|e| e.key).collect();
    assert_eq!(
        keys,
        vec!["seasonDict_items", "seasonDict_scrollY", "seasonDict_state"]
    );

    let loaded: RestoreSnapshot<Soul> = cache.load().expect("読み込み失敗").expect("スナップショットがない");
    assert_eq!(loaded.items.len(), 60);
    assert_eq!(loaded.page, 2);
    assert!((loaded.scroll_y - 3200.0).abs() < f64::EPSILON);

    cache.clear();
    assert!(!cache.has_snapshot());
    assert!(cache.store().entries().is_empty());
}

/// 別プロセス相当（ストアを作り直し）でも戻る操作で復元できる
#[test]
fn test_restore_across_store_instances() {
    let dir = tempdir().expect("Failed to create temp dir");
    {
        let mut cache = PageCache::for_page(FileStore::new(dir.path()), ListPage::SeasonDictionary);
        cache.save(&snapshot(60)).expect("保存失敗");
    }

    let mut controller: ViewStateController<Soul, FileStore> =
        ViewStateController::new(ListPage::SeasonDictionary, FileStore::new(dir.path()));
    let action = controller.mount(
        NavigationType::Pop,
        FilterState::defaults(ListPage::SeasonDictionary),
    );
    assert!(matches!(action, MountAction::Restore(_)));
    assert_eq!(controller.list().len(), 60);

    controller.finish_restore();
    assert!(FileStore::new(dir.path()).entries().is_empty());
}

/// 壊れたファイルは無視して通常取得
#[test]
fn test_corrupted_files_fall_back_to_fetch() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("travelingEncy_scrollY"), "not-a-number").expect("書き込み失敗");
    std::fs::write(dir.path().join("travelingEncy_state"), "{}").expect("書き込み失敗");
    std::fs::write(dir.path().join("travelingEncy_items"), "[]").expect("書き込み失敗");

    let mut controller: ViewStateController<Soul, FileStore> =
        ViewStateController::new(ListPage::TravelingEncyclopedia, FileStore::new(dir.path()));
    let action = controller.mount(
        NavigationType::Unknown,
        FilterState::defaults(ListPage::TravelingEncyclopedia),
    );

    assert!(matches!(action, MountAction::Fetch(_)));
    assert!(FileStore::new(dir.path()).entries().is_empty());
}

/// 全削除
#[test]
fn test_clear_all() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path());
    store.set("a", "1").expect("書き込み失敗");
    store.set("b", "2").expect("書き込み失敗");

    assert_eq!(store.clear_all().expect("削除失敗"), 2);
    assert!(store.entries().is_empty());
}
