//! ヘッダーコンポーネント

use crate::routes::{IMAGE_UPLOAD, SEASON_LIST};
use leptos::prelude::*;
use sky_souls_common::ListPage;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"스카이 영혼 대백과"</h1>
            <nav class="header-nav">
                <a href=ListPage::SeasonDictionary.path()>{ListPage::SeasonDictionary.title()}</a>
                <a href=ListPage::TravelingEncyclopedia.path()>{ListPage::TravelingEncyclopedia.title()}</a>
                <a href=ListPage::GeneralVisits.path()>{ListPage::GeneralVisits.title()}</a>
                <a href=SEASON_LIST>"시즌 관리"</a>
                <a href=IMAGE_UPLOAD>"이미지 업로드"</a>
            </nav>
        </header>
    }
}
