//! APIクライアントの統合テスト（wiremock）

use serde_json::json;
use sky_souls::api::UploadFile;
use sky_souls::{ApiClient, SkySoulsError};
use sky_souls_common::{Error, FilterState, ImageType, ListPage, Soul, TravelingVisit};
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn soul_json(id: i64) -> serde_json::Value {
    json!({ "id": id, "name": format!("영혼{}", id), "seasonName": "감사" })
}

/// エンベロープを展開して詳細を取得
#[tokio::test]
async fn test_soul_detail_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": soul_json(7) })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let soul = api.soul(7).await.expect("取得失敗");

    assert_eq!(soul.id, 7);
    assert_eq!(soul.name, "영혼7");
}

/// サーバーのメッセージがそのままエラーになる
#[tokio::test]
async fn test_http_error_uses_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "영혼을 찾을 수 없습니다" })))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let err = api.soul(404).await.unwrap_err();

    match &err {
        SkySoulsError::Common(Error::Http { status, message }) => {
            assert_eq!(*status, 404);
            assert_eq!(message, "영혼을 찾을 수 없습니다");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.user_message(), "영혼을 찾을 수 없습니다");
}

/// 시즌 사전の一覧リクエスト（クエリパラメータ）
#[tokio::test]
async fn test_fetch_list_season_dictionary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .and(query_param("seasonName", "감사"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "content": [soul_json(1), soul_json(2)],
                "totalPages": 1,
                "totalElements": 2,
                "last": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = FilterState {
        season: Some("감사".to_string()),
        ..FilterState::defaults(ListPage::SeasonDictionary)
    };
    let request = ListPage::SeasonDictionary.list_request(&filter, 0, 20);

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let page = api.fetch_list::<Soul>(&request, 0).await.expect("取得失敗");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 1);
}

/// 検索が配列で返っても1ページとして扱う
#[tokio::test]
async fn test_fetch_list_search_flat_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/souls/search"))
        .and(query_param("query", "박수"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 3, "name": "박수치는 정령", "globalOrder": 12 },
                { "id": 3, "name": "박수치는 정령", "globalOrder": -2 }
            ]
        })))
        .mount(&server)
        .await;

    let filter = FilterState {
        query: " 박수 ".to_string(),
        ..FilterState::defaults(ListPage::TravelingEncyclopedia)
    };
    let request = ListPage::TravelingEncyclopedia.list_request(&filter, 0, 20);

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let page = api
        .fetch_list::<TravelingVisit>(&request, 0)
        .await
        .expect("取得失敗");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 1);
}

/// 接続できない場合はネットワークエラー
#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let api = ApiClient::new("http://127.0.0.1:9", 1).expect("クライアント作成失敗");
    let err = api.seasons().await.unwrap_err();
    assert!(matches!(err, SkySoulsError::Common(Error::Network(_))));
}

/// 영혼に紐付けない一時アップロード
#[tokio::test]
async fn test_upload_without_soul_uses_upload_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/images/upload"))
        .and(header_exists("content-type"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "url": "https://cdn.example.com/a.png" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let file = UploadFile {
        file_name: "a.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    let uploaded = api
        .upload_image(file, ImageType::Representative, None)
        .await
        .expect("アップロード失敗");

    assert_eq!(uploaded.url, "https://cdn.example.com/a.png");

    let requests = server.received_requests().await.expect("リクエスト記録がない");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("REPRESENTATIVE"));
    assert!(!body.contains("soulId"));
}

/// 영혼指定のアップロードは `/images` へ
#[tokio::test]
async fn test_upload_with_soul_attaches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "url": "https://cdn.example.com/b.png" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    let file = UploadFile {
        file_name: "b.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![1, 2, 3],
    };
    api.upload_image(file, ImageType::NodeChart, Some(42))
        .await
        .expect("アップロード失敗");

    let requests = server.received_requests().await.expect("リクエスト記録がない");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("soulId"));
    assert!(body.contains("42"));
    assert!(body.contains("NODE_CHART"));
}

/// URL指定の削除はJSONボディ
#[tokio::test]
async fn test_delete_image_by_url_sends_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/images"))
        .and(body_json(json!({ "url": "https://cdn.example.com/old.png" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri(), 5).expect("クライアント作成失敗");
    api.delete_image_by_url("https://cdn.example.com/old.png")
        .await
        .expect("削除失敗");
}
