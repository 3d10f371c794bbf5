//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use sky_souls::commands::read_upload;
use sky_souls::error::SkySoulsError;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルをアップロードしようとした場合
#[test]
fn test_upload_nonexistent_file() {
    let result = read_upload(Path::new("/nonexistent/path/12345.png"));
    assert!(matches!(result, Err(SkySoulsError::FileNotFound(_))));
}

/// 画像ではないファイル
#[test]
fn test_upload_not_an_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("memo.txt");
    std::fs::write(&path, "hello").expect("書き込み失敗");

    let result = read_upload(&path);
    assert!(matches!(result, Err(SkySoulsError::ImageFormat(_))));
}

/// PNGシグネチャのファイルは形式判定を通る
#[test]
fn test_upload_png_signature() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("rep.png");
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 32]);
    std::fs::write(&path, &bytes).expect("書き込み失敗");

    let upload = read_upload(&path).expect("判定失敗");
    assert_eq!(upload.mime_type, "image/png");
    assert_eq!(upload.file_name, "rep.png");
    assert_eq!(upload.bytes.len(), 40);
}

/// SkySoulsErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        SkySoulsError::Config("テスト設定エラー".to_string()),
        SkySoulsError::FileNotFound("test.png".to_string()),
        SkySoulsError::ImageFormat("unknown".to_string()),
        SkySoulsError::InvalidArgument("bad".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty());
    }
}

/// 共通エラーは透過的に表示され、サーバーメッセージが優先される
#[test]
fn test_common_error_is_transparent() {
    let common = sky_souls_common::Error::Http {
        status: 409,
        message: "이미 존재하는 시즌 순서입니다.".to_string(),
    };
    let err: SkySoulsError = common.into();

    assert_eq!(err.to_string(), "HTTP 409: 이미 존재하는 시즌 순서입니다.");
    assert_eq!(err.user_message(), "이미 존재하는 시즌 순서입니다.");
}

/// 検証エラーはメッセージのみ表示
#[test]
fn test_validation_user_message() {
    let err: SkySoulsError =
        sky_souls_common::Error::Validation("파일 크기는 10MB를 초과할 수 없습니다.".into()).into();
    assert_eq!(err.user_message(), "파일 크기는 10MB를 초과할 수 없습니다.");
}

/// IOエラーの変換
#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: SkySoulsError = io_error.into();
    assert!(matches!(err, SkySoulsError::Io(_)));
    assert!(err.to_string().contains("입출력 오류"));
}

/// JSONエラーの変換
#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: SkySoulsError = json_error.into();
    assert!(matches!(err, SkySoulsError::JsonParse(_)));
}
