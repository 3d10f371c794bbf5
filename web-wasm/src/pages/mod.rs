//! ページコンポーネント

pub mod image_upload;
pub mod list;
pub mod season_list;
pub mod soul_detail;
pub mod soul_edit;

use sky_souls_common::{Error, GENERIC_ERROR_MESSAGE};

/// フォーム失敗時に alert へ出す文言
///
/// サーバー・検証のメッセージはそのまま、それ以外は汎用メッセージ。
pub fn form_error_message(err: &Error) -> String {
    match err {
        Error::Http { message, .. } | Error::Validation(message) => message.clone(),
        other => {
            gloo::console::error!(other.to_string());
            GENERIC_ERROR_MESSAGE.to_string()
        }
    }
}

pub fn alert_error(err: &Error) {
    gloo::dialogs::alert(&form_error_message(err));
}
