//! 一覧の対話閲覧
//!
//! ブラウザ版と同じ一覧エンジン・表示状態コントローラを端末で動かす。
//! - 「더 보기」が番兵の代わり（取得中の再要求は無視される）
//! - 詳細を開く直前にスナップショットを保存し、戻ると通信なしで復元する
//! - スクロール位置は選択していた行番号で代用する

use crate::api::ApiClient;
use crate::error::Result;
use crate::render::{self, Describe};
use crate::store::FileStore;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sky_souls_common::palette::season_names;
use sky_souls_common::{
    ApplyOutcome, FilterState, ListItem, ListPage, MountAction, NavigationType, PageRequest,
    Restoration, ViewStateController,
};
use std::time::Duration;

/// 一覧に入ったときの結果
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Restored(Restoration),
    Fetched(ApplyOutcome),
}

pub struct BrowseSession<'a, T: ListItem> {
    api: &'a ApiClient,
    controller: ViewStateController<T, FileStore>,
    show_spinner: bool,
}

impl<'a, T> BrowseSession<'a, T>
where
    T: ListItem + Describe + Clone + Serialize + DeserializeOwned,
{
    pub fn new(api: &'a ApiClient, page: ListPage, store: FileStore, page_size: u32) -> Self {
        Self {
            api,
            controller: ViewStateController::new(page, store).with_page_size(page_size),
            show_spinner: false,
        }
    }

    /// 取得中にスピナーを出す
    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    /// 一覧に入る（復元 or 0ページ目の取得）
    pub async fn enter(&mut self, navigation: NavigationType, url_filter: FilterState) -> Entry {
        match self.controller.mount(navigation, url_filter) {
            MountAction::Restore(restoration) => {
                // 端末では描画と同時に位置が決まるので即座に確定
                self.controller.finish_restore();
                Entry::Restored(restoration)
            }
            MountAction::Fetch(request) => Entry::Fetched(self.run(request).await),
        }
    }

    async fn run(&mut self, request: PageRequest) -> ApplyOutcome {
        let list_request = self.controller.list_request(&request);
        let spinner = self.show_spinner.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!("{}페이지 불러오는 중...", request.page + 1));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = self.api.fetch_list::<T>(&list_request, request.page).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        let outcome = self.controller.apply(request, result);
        self.controller.sync_observer();
        outcome
    }

    /// 次ページ（続きが無い・取得中なら `None`）
    pub async fn load_more(&mut self) -> Option<ApplyOutcome> {
        let request = self.controller.on_sentinel_visible()?;
        Some(self.run(request).await)
    }

    /// フィルタ変更。URL相当のクエリ文字列を返す
    pub async fn change_filter(&mut self, filter: FilterState) -> (String, ApplyOutcome) {
        let change = self.controller.change_filter(filter);
        let outcome = self.run(change.request).await;
        (change.query_string, outcome)
    }

    pub async fn retry(&mut self) -> Option<ApplyOutcome> {
        let request = self.controller.retry()?;
        Some(self.run(request).await)
    }

    /// 表示中の `index` 番目の詳細を開く前にスナップショットを保存し、영혼IDを返す
    pub fn open_detail(&mut self, index: usize) -> Option<i64> {
        let soul_id = self.visible().get(index).map(|item| item.soul_id())?;
        let saved = self
            .controller
            .capture(index as f64, chrono::Utc::now().timestamp_millis());
        if !saved {
            tracing::debug!(index, "snapshot was not saved; back navigation will refetch");
        }
        Some(soul_id)
    }

    /// 詳細から戻る
    pub async fn back(&mut self) -> Entry {
        self.controller.teardown();
        let filter = self.controller.filter().clone();
        self.enter(NavigationType::Pop, filter).await
    }

    /// クライアント側フィルタ適用後の項目
    pub fn visible(&self) -> Vec<&T> {
        let filter = self.controller.filter();
        self.controller
            .list()
            .iter()
            .filter(|item| item.visible_under(filter))
            .collect()
    }

    pub fn controller(&self) -> &ViewStateController<T, FileStore> {
        &self.controller
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    LoadMore,
    OpenDetail,
    Search,
    ChooseSeason,
    ShowAll,
    ToggleMode,
    ToggleWarband,
    Retry,
    Quit,
}

impl BrowseAction {
    fn label(&self) -> &'static str {
        match self {
            BrowseAction::LoadMore => "더 보기",
            BrowseAction::OpenDetail => "상세 보기",
            BrowseAction::Search => "검색",
            BrowseAction::ChooseSeason => "시즌 선택",
            BrowseAction::ShowAll => "전체 보기",
            BrowseAction::ToggleMode => "카드/리스트 전환",
            BrowseAction::ToggleWarband => "유랑단만 보기 전환",
            BrowseAction::Retry => "다시 시도",
            BrowseAction::Quit => "종료",
        }
    }
}

fn available_actions<T>(session: &BrowseSession<'_, T>) -> Vec<BrowseAction>
where
    T: ListItem + Describe + Clone + Serialize + DeserializeOwned,
{
    let controller = session.controller();
    let list = controller.list();
    let page = controller.page();
    let mut actions = Vec::new();

    if list.has_more() {
        actions.push(BrowseAction::LoadMore);
    }
    if !session.visible().is_empty() {
        actions.push(BrowseAction::OpenDetail);
    }
    actions.push(BrowseAction::Search);
    if page.uses_season() {
        actions.push(BrowseAction::ChooseSeason);
    }
    if controller.filter() != &FilterState::defaults(page) {
        actions.push(BrowseAction::ShowAll);
    }
    if page.uses_mode() {
        actions.push(BrowseAction::ToggleMode);
    }
    if page.uses_warband() {
        actions.push(BrowseAction::ToggleWarband);
    }
    if list.error().is_some() {
        actions.push(BrowseAction::Retry);
    }
    actions.push(BrowseAction::Quit);
    actions
}

fn print_list<T>(session: &BrowseSession<'_, T>, cursor: usize)
where
    T: ListItem + Describe + Clone + Serialize + DeserializeOwned,
{
    let controller = session.controller();
    let list = controller.list();
    let filter = controller.filter();
    let strategy = render::strategy(filter.view_mode);

    println!("\n=== {} ===", controller.page().title());
    if filter.is_search() {
        println!("검색: \"{}\"", filter.trimmed_query());
    }
    if let Some(season) = &filter.season {
        println!("시즌: {}", season);
    }

    let visible = session.visible();
    for (index, item) in visible.iter().enumerate() {
        let marker = if index == cursor { "▶" } else { " " };
        println!("{}{}", marker, strategy.render(index, *item));
    }

    if let Some(error) = list.error() {
        println!("⚠ {}", error);
    } else if visible.is_empty() {
        println!("검색 결과가 없습니다.");
    }
    println!(
        "-- {}건 표시 / 전체 {}건{}",
        visible.len(),
        list.total_elements(),
        if list.has_more() { " (더 있음)" } else { "" }
    );
}

fn report(outcome: ApplyOutcome) {
    match outcome {
        ApplyOutcome::Applied { added } => tracing::debug!(added, "page applied"),
        ApplyOutcome::Stale => tracing::debug!("stale response ignored"),
        ApplyOutcome::Failed => {}
    }
}

/// 対話ループ
pub async fn run_interactive<T>(
    mut session: BrowseSession<'_, T>,
    navigation: NavigationType,
    url_filter: FilterState,
) -> Result<()>
where
    T: ListItem + Describe + Clone + Serialize + DeserializeOwned,
{
    let mut cursor = match session.enter(navigation, url_filter).await {
        Entry::Restored(restoration) => {
            println!(
                "↩ 이전 목록을 복원했습니다 ({}건)",
                restoration.restored
            );
            restoration.scroll_y.max(0.0) as usize
        }
        Entry::Fetched(outcome) => {
            report(outcome);
            0
        }
    };

    loop {
        print_list(&session, cursor);
        let actions = available_actions(&session);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("무엇을 할까요?")
            .items(&labels)
            .default(0)
            .interact()?;

        let page = session.controller().page();
        let current = session.controller().filter().clone();
        let next_filter = match actions[choice] {
            BrowseAction::LoadMore => {
                if let Some(outcome) = session.load_more().await {
                    report(outcome);
                }
                None
            }
            BrowseAction::OpenDetail => {
                let names: Vec<String> = session
                    .visible()
                    .iter()
                    .map(|item| format!("{} [{}]", item.name(), item.season_name()))
                    .collect();
                let index = Select::new()
                    .with_prompt("영혼 선택")
                    .items(&names)
                    .default(cursor.min(names.len().saturating_sub(1)))
                    .interact()?;
                let Some(soul_id) = session.open_detail(index) else {
                    continue;
                };
                cursor = index;

                match session.api.soul(soul_id).await {
                    Ok(soul) => render::print_soul_detail(&soul),
                    Err(err) => println!("⚠ {}", err.user_message()),
                }

                let back = Select::new()
                    .items(&["목록으로 돌아가기", "종료"])
                    .default(0)
                    .interact()?;
                if back != 0 {
                    println!("목록 상태를 저장했습니다. `--back` 으로 다시 열 수 있습니다.");
                    return Ok(());
                }
                match session.back().await {
                    Entry::Restored(restoration) => {
                        cursor = restoration.scroll_y.max(0.0) as usize;
                    }
                    Entry::Fetched(outcome) => {
                        report(outcome);
                        cursor = 0;
                    }
                }
                None
            }
            BrowseAction::Search => {
                let query: String = Input::new()
                    .with_prompt("검색어")
                    .with_initial_text(current.query.clone())
                    .allow_empty(true)
                    .interact_text()?;
                Some(FilterState { query, ..current })
            }
            BrowseAction::ChooseSeason => {
                let mut options: Vec<&str> = vec!["전체"];
                options.extend(season_names());
                let index = Select::new()
                    .with_prompt("시즌")
                    .items(&options)
                    .default(0)
                    .interact()?;
                let season = (index > 0).then(|| options[index].to_string());
                Some(FilterState { season, ..current })
            }
            BrowseAction::ShowAll => Some(FilterState {
                view_mode: current.view_mode,
                ..FilterState::defaults(page)
            }),
            BrowseAction::ToggleMode => Some(FilterState {
                view_mode: current.view_mode.toggled(),
                ..current
            }),
            BrowseAction::ToggleWarband => Some(FilterState {
                warband: !current.warband,
                ..current
            }),
            BrowseAction::Retry => {
                if let Some(outcome) = session.retry().await {
                    report(outcome);
                }
                None
            }
            BrowseAction::Quit => return Ok(()),
        };

        if let Some(filter) = next_filter {
            let (query_string, outcome) = session.change_filter(filter).await;
            report(outcome);
            cursor = 0;
            if query_string.is_empty() {
                println!("🔗 {}", page.path());
            } else {
                println!("🔗 {}?{}", page.path(), query_string);
            }
        }
    }
}
