//! 読み込み中・エラー表示

use leptos::prelude::*;

#[component]
pub fn LoadingIndicator(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="loading">
            <div class="spinner" />
            <p class="loading-text">{message}</p>
        </div>
    }
}

/// 一覧の取得失敗（再試行ボタン付き）
#[component]
pub fn ErrorBox<F>(message: String, on_retry: F) -> impl IntoView
where
    F: Fn() + 'static,
{
    view! {
        <div class="error-box">
            <p>{message}</p>
            <button class="btn btn-secondary" on:click=move |_| on_retry()>
                "다시 시도"
            </button>
        </div>
    }
}
