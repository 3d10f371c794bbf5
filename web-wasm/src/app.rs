//! メインアプリケーションコンポーネント

use crate::components::header::Header;
use crate::pages::image_upload::ImageUploadPage;
use crate::pages::list::{GeneralVisitsPage, SeasonDictionaryPage, TravelingEncyclopediaPage};
use crate::pages::season_list::SeasonListPage;
use crate::pages::soul_detail::SoulDetailPage;
use crate::pages::soul_edit::SoulEditPage;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div class="container">
                <Header />
                <main>
                    <Routes fallback=|| view! { <p class="text-muted">"페이지를 찾을 수 없습니다."</p> }>
                        <Route path=path!("/") view=SeasonDictionaryPage />
                        <Route path=path!("/sky/SeasonDictionary") view=SeasonDictionaryPage />
                        <Route path=path!("/sky/travelingSprits/travelingEncyclopedia") view=TravelingEncyclopediaPage />
                        <Route path=path!("/sky/travelingSprits/generalVisits/list") view=GeneralVisitsPage />
                        <Route path=path!("/sky/SeasonDictionary/souls/:soul_id") view=SoulDetailPage />
                        <Route path=path!("/sky/SeasonDictionary/souls/:soul_id/edit") view=SoulEditPage />
                        <Route path=path!("/sky/SeasonDictionary/seasons") view=SeasonListPage />
                        <Route path=path!("/sky/SeasonDictionary/Images/upload") view=ImageUploadPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
