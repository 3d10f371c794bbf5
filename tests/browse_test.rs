//! 対話閲覧セッションの統合テスト
//!
//! wiremockで一覧APIを立て、ファイルストアでスナップショットを保存する。

use serde_json::json;
use sky_souls::browse::{BrowseSession, Entry};
use sky_souls::{ApiClient, FileStore};
use sky_souls_common::{ApplyOutcome, FilterState, ListPage, NavigationType, Soul};
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOTAL_PAGES: u32 = 3;

fn page_body(page: u32) -> serde_json::Value {
    let content: Vec<serde_json::Value> = (0..20)
        .map(|i| {
            let id = (page * 20 + i) as i64 + 1;
            json!({ "id": id, "name": format!("영혼{}", id), "seasonName": "감사" })
        })
        .collect();
    json!({
        "data": {
            "content": content,
            "totalPages": TOTAL_PAGES,
            "totalElements": TOTAL_PAGES * 20,
            "last": page + 1 == TOTAL_PAGES
        }
    })
}

async fn mount_pages(server: &MockServer) {
    for page in 0..TOTAL_PAGES {
        Mock::given(method("GET"))
            .and(path("/api/v1/souls"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(page)))
            .expect(1)
            .mount(server)
            .await;
    }
}

/// 3ページ読み込むと60件、4回目の要求は出ない
#[tokio::test]
async fn test_load_all_pages_then_stop() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let dir = tempdir().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let mut session: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);

    let entry = session
        .enter(NavigationType::Push, FilterState::defaults(ListPage::SeasonDictionary))
        .await;
    assert_eq!(entry, Entry::Fetched(ApplyOutcome::Applied { added: 20 }));

    assert_eq!(
        session.load_more().await,
        Some(ApplyOutcome::Applied { added: 20 })
    );
    assert_eq!(
        session.load_more().await,
        Some(ApplyOutcome::Applied { added: 20 })
    );
    assert_eq!(session.load_more().await, None);

    assert_eq!(session.visible().len(), 60);
    assert!(!session.controller().list().has_more());
}

/// 詳細から戻ると通信せずに60件とスクロール位置を復元する
#[tokio::test]
async fn test_back_from_detail_restores_without_network() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let dir = tempdir().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let mut session: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);

    session
        .enter(NavigationType::Push, FilterState::defaults(ListPage::SeasonDictionary))
        .await;
    session.load_more().await;
    session.load_more().await;

    assert_eq!(session.open_detail(45), Some(46));
    assert!(!FileStore::new(dir.path()).entries().is_empty());

    match session.back().await {
        Entry::Restored(restoration) => {
            assert_eq!(restoration.restored, 60);
            assert!((restoration.scroll_y - 45.0).abs() < f64::EPSILON);
        }
        other => panic!("expected restoration, got {:?}", other),
    }
    assert_eq!(session.visible().len(), 60);

    // 消費済みなので、もう一度戻っても復元されない
    assert!(FileStore::new(dir.path()).entries().is_empty());
    // 各ページはちょうど1回ずつ（MockServerのdropで検証）
}

/// 新規遷移では古いスナップショットを捨てて取得し直す
#[tokio::test]
async fn test_push_navigation_discards_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0)))
        .expect(2)
        .mount(&server)
        .await;
    let dir = tempdir().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let mut session: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);
    let filter = FilterState::defaults(ListPage::SeasonDictionary);

    session.enter(NavigationType::Push, filter.clone()).await;
    assert_eq!(session.open_detail(0), Some(1));

    let mut fresh: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);
    let entry = fresh.enter(NavigationType::Push, filter).await;

    assert_eq!(entry, Entry::Fetched(ApplyOutcome::Applied { added: 20 }));
    assert!(FileStore::new(dir.path()).entries().is_empty());
}

/// 取得失敗後に再試行できる
#[tokio::test]
async fn test_retry_after_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0)))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempdir().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let mut session: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);

    let entry = session
        .enter(NavigationType::Push, FilterState::defaults(ListPage::SeasonDictionary))
        .await;
    assert_eq!(entry, Entry::Fetched(ApplyOutcome::Failed));
    assert!(session.controller().list().error().is_some());
    assert!(session.visible().is_empty());
    // 失敗中は番兵から次ページを要求しない
    assert_eq!(session.load_more().await, None);

    assert_eq!(
        session.retry().await,
        Some(ApplyOutcome::Applied { added: 20 })
    );
    assert!(session.controller().list().error().is_none());
    assert_eq!(session.visible().len(), 20);
}

/// 次ページの取得に失敗しても読み込み済みの項目は残り、再試行は同じページを取る
#[tokio::test]
async fn test_retry_after_append_failure_keeps_loaded_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1)))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempdir().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let mut session: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);

    session
        .enter(NavigationType::Push, FilterState::defaults(ListPage::SeasonDictionary))
        .await;
    assert_eq!(session.load_more().await, Some(ApplyOutcome::Failed));
    assert_eq!(session.visible().len(), 20);
    assert!(session.controller().list().error().is_some());

    assert_eq!(
        session.retry().await,
        Some(ApplyOutcome::Applied { added: 20 })
    );
    assert_eq!(session.visible().len(), 40);
    assert!(session.controller().list().error().is_none());
    assert!(session.controller().list().has_more());
}

/// フィルタ変更はURL相当のクエリを返し、0ページ目から取り直す
#[tokio::test]
async fn test_change_filter_refetches_from_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .and(query_param("seasonName", "감사"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "content": [{ "id": 99, "name": "감사 영혼" }], "totalPages": 1, "totalElements": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0)))
        .mount(&server)
        .await;
    let dir = tempdir().expect("Failed to create temp dir");

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let mut session: BrowseSession<Soul> =
        BrowseSession::new(&api, ListPage::SeasonDictionary, FileStore::new(dir.path()), 20);
    let defaults = FilterState::defaults(ListPage::SeasonDictionary);
    session.enter(NavigationType::Push, defaults.clone()).await;

    let (query_string, outcome) = session
        .change_filter(FilterState {
            season: Some("감사".to_string()),
            ..defaults
        })
        .await;

    assert!(query_string.contains("season="));
    assert_eq!(outcome, ApplyOutcome::Applied { added: 1 });
    assert_eq!(session.visible().len(), 1);
    assert_eq!(session.visible()[0].id, 99);
}
