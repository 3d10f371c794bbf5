//! 一覧の1件の表示
//!
//! 영혼と유랑を同じ見た目の値に揃え、カード/リストの2通りで描く。

use crate::routes::soul_anchor;
use chrono::NaiveDate;
use leptos::prelude::*;
use sky_souls_common::display::{format_period, VisitStatus};
use sky_souls_common::palette::season_color;
use sky_souls_common::{FilterState, Soul, TravelingVisit, ViewMode};

#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    /// 描画キー（同じ영혼が複数回現れるため영혼IDとは別）
    pub key: String,
    pub soul_id: i64,
    pub name: String,
    pub season_name: String,
    pub period: String,
    pub compact_period: String,
    pub badge: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<VisitStatus>,
}

pub trait ListEntry {
    fn to_entry(&self, today: NaiveDate) -> EntryView;

    /// クライアント側フィルタ
    fn visible_under(&self, _filter: &FilterState) -> bool {
        true
    }
}

fn periods(start: &str, end: &str) -> (String, String) {
    if start.is_empty() {
        (String::new(), String::new())
    } else {
        (format_period(start, end, false), format_period(start, end, true))
    }
}

impl ListEntry for Soul {
    fn to_entry(&self, _today: NaiveDate) -> EntryView {
        let (period, compact_period) = periods(&self.start_date, &self.end_date);
        let badge = if self.is_season_guide {
            Some("시즌 가이드".to_string())
        } else {
            self.order_num.map(|n| format!("{}번째 영혼", n))
        };
        EntryView {
            key: self.id.to_string(),
            soul_id: self.id,
            name: self.name.clone(),
            season_name: self.season_name.clone(),
            period,
            compact_period,
            badge,
            image_url: self.representative_url().map(str::to_string),
            status: None,
        }
    }
}

impl ListEntry for TravelingVisit {
    fn to_entry(&self, today: NaiveDate) -> EntryView {
        let (period, compact_period) = periods(&self.start_date, &self.end_date);
        EntryView {
            key: format!("{}:{}", self.id, self.global_order),
            soul_id: self.id,
            name: self.name.clone(),
            season_name: self.season_name.clone(),
            period,
            compact_period,
            badge: Some(self.order_label()),
            image_url: self.representative_url().map(str::to_string),
            status: VisitStatus::on(&self.start_date, &self.end_date, today),
        }
    }

    fn visible_under(&self, filter: &FilterState) -> bool {
        !filter.warband || self.is_warband()
    }
}

/// ブラウザのローカル日付
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

fn status_badge(status: Option<VisitStatus>) -> impl IntoView {
    status.map(|s| view! { <span class=format!("badge {}", s.css_class())>{s.label()}</span> })
}

#[component]
pub fn CardItem<F>(entry: EntryView, anchored: bool, on_open: F) -> impl IntoView
where
    F: Fn(i64) + 'static,
{
    let soul_id = entry.soul_id;
    let color = season_color(&entry.season_name);
    view! {
        <div
            class="soul-card"
            id=anchored.then(|| soul_anchor(soul_id))
            data-soul-id=soul_id.to_string()
            on:click=move |_| on_open(soul_id)
        >
            <div class="soul-card-image">
                {match entry.image_url {
                    Some(url) => view! { <img src=url alt=entry.name.clone() loading="lazy" /> }.into_any(),
                    None => view! { <div class="no-image">"이미지 없음"</div> }.into_any(),
                }}
            </div>
            <div class="soul-card-body">
                <span class="season-badge" style=format!("background-color: {}", color)>
                    {entry.season_name.clone()}
                </span>
                {status_badge(entry.status)}
                <h3 class="soul-name">{entry.name.clone()}</h3>
                {entry.badge.map(|b| view! { <p class="soul-badge">{b}</p> })}
                <p class="soul-period">{entry.period}</p>
            </div>
        </div>
    }
}

#[component]
pub fn RowItem<F>(entry: EntryView, anchored: bool, on_open: F) -> impl IntoView
where
    F: Fn(i64) + 'static,
{
    let soul_id = entry.soul_id;
    view! {
        <div
            class="soul-row"
            id=anchored.then(|| soul_anchor(soul_id))
            data-soul-id=soul_id.to_string()
            on:click=move |_| on_open(soul_id)
        >
            <span class="soul-row-name">{entry.name}</span>
            <span class="soul-row-season">{entry.season_name}</span>
            <span class="soul-row-period">{entry.compact_period}</span>
            <span class="soul-row-badge">{entry.badge.unwrap_or_default()}</span>
            {status_badge(entry.status)}
        </div>
    }
}

/// 表示モードで描画戦略を選ぶ
pub fn render_entry<F>(mode: ViewMode, entry: EntryView, anchored: bool, on_open: F) -> AnyView
where
    F: Fn(i64) + 'static,
{
    match mode {
        ViewMode::Card => view! { <CardItem entry=entry anchored=anchored on_open=on_open /> }.into_any(),
        ViewMode::List => view! { <RowItem entry=entry anchored=anchored on_open=on_open /> }.into_any(),
    }
}
