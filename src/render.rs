//! 端末への描画
//!
//! 一覧の1行（カード/リスト）は表示モードで選ぶ描画戦略に任せる。
//! 戦略は状態を持たず、取得・ページングには関与しない。

use sky_souls_common::display::{format_compact_date, format_dotted_date, format_period, VisitStatus};
use sky_souls_common::types::ImageRecord;
use sky_souls_common::{FilterState, ImageType, Season, Soul, TravelingVisit, ViewMode, VisitRecord};

/// 一覧に出す項目の見え方
pub trait Describe {
    /// 詳細ページで開く영혼のID
    fn soul_id(&self) -> i64;
    fn name(&self) -> &str;
    fn season_name(&self) -> &str;
    fn start_date(&self) -> &str;
    fn end_date(&self) -> &str;
    /// 順番などの補足
    fn badge(&self) -> Option<String>;
    fn image_url(&self) -> Option<&str>;

    /// クライアント側フィルタ（유랑단のみ表示など）
    fn visible_under(&self, _filter: &FilterState) -> bool {
        true
    }
}

impl Describe for Soul {
    fn soul_id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn season_name(&self) -> &str {
        &self.season_name
    }

    fn start_date(&self) -> &str {
        &self.start_date
    }

    fn end_date(&self) -> &str {
        &self.end_date
    }

    fn badge(&self) -> Option<String> {
        if self.is_season_guide {
            Some("시즌 가이드".to_string())
        } else {
            self.order_num.map(|n| format!("{}번째 영혼", n))
        }
    }

    fn image_url(&self) -> Option<&str> {
        self.representative_url()
    }
}

impl Describe for TravelingVisit {
    fn soul_id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn season_name(&self) -> &str {
        &self.season_name
    }

    fn start_date(&self) -> &str {
        &self.start_date
    }

    fn end_date(&self) -> &str {
        &self.end_date
    }

    fn badge(&self) -> Option<String> {
        Some(self.order_label())
    }

    fn image_url(&self) -> Option<&str> {
        self.representative_url()
    }

    fn visible_under(&self, filter: &FilterState) -> bool {
        !filter.warband || self.is_warband()
    }
}

/// 描画戦略
pub trait Render {
    fn render(&self, index: usize, item: &dyn Describe) -> String;
}

/// 複数行のカード表示
pub struct CardView;

/// 1行のリスト表示
pub struct ListView;

impl Render for CardView {
    fn render(&self, index: usize, item: &dyn Describe) -> String {
        let mut lines = vec![format!(
            "┌ {:>3}. {} [{}]",
            index + 1,
            item.name(),
            item.season_name()
        )];
        if let Some(badge) = item.badge() {
            lines.push(format!("│      {}", badge));
        }
        if !item.start_date().is_empty() {
            lines.push(format!(
                "│      기간: {}",
                format_period(item.start_date(), item.end_date(), false)
            ));
        }
        lines.push(format!(
            "└      이미지: {}",
            item.image_url().unwrap_or("-")
        ));
        lines.join("\n")
    }
}

impl Render for ListView {
    fn render(&self, index: usize, item: &dyn Describe) -> String {
        let period = if item.start_date().is_empty() {
            "-".to_string()
        } else {
            format_period(item.start_date(), item.end_date(), true)
        };
        format!(
            "{:>4}. {} | {} | {} | {}",
            index + 1,
            item.name(),
            item.season_name(),
            period,
            item.badge().unwrap_or_default()
        )
    }
}

pub fn strategy(mode: ViewMode) -> &'static dyn Render {
    match mode {
        ViewMode::Card => &CardView,
        ViewMode::List => &ListView,
    }
}

pub fn print_soul_detail(soul: &Soul) {
    println!("🕊  {} (#{})", soul.name, soul.id);
    println!("  시즌: {}", soul.season_name);
    if let Some(order) = soul.order_num {
        println!("  순서: {}", order);
    }
    if soul.is_season_guide {
        println!("  시즌 가이드");
    }
    if !soul.location.is_empty() {
        println!("  위치: {}", soul.location);
    }
    if !soul.start_date.is_empty() {
        println!(
            "  기간: {} ~ {}",
            format_dotted_date(&soul.start_date),
            format_dotted_date(&soul.end_date)
        );
    }
    if !soul.keywords.is_empty() {
        println!("  키워드: {}", soul.keywords.join(", "));
    }
    if !soul.description.is_empty() {
        println!("  설명: {}", soul.description);
    }
    if !soul.creator.is_empty() {
        println!("  작성자: {}", soul.creator);
    }
    for image_type in ImageType::ALL {
        if let Some(image) = soul.image(image_type) {
            println!("  {}: {}", image_type.label(), image.url);
        }
    }
    if !soul.traveling_visits.is_empty() {
        println!("  유랑 이력 ({}회):", soul.traveling_visits.len());
        for visit in &soul.traveling_visits {
            println!(
                "    {}차{} {}",
                visit.visit_number,
                if visit.is_warband_visit { " (유랑단)" } else { "" },
                format_period(&visit.start_date, &visit.end_date, true)
            );
        }
    }
}

pub fn print_season_row(season: &Season) {
    println!(
        "  {:>3}. {} (#{}) {} ~ {}{}",
        season.order_num,
        season.name,
        season.id,
        format_dotted_date(&season.start_date),
        format_dotted_date(&season.end_date),
        if season.is_collaboration { " [콜라보]" } else { "" }
    );
}

pub fn print_visit_row(visit: &TravelingVisit, status: Option<VisitStatus>) {
    println!(
        "  {} | {} [{}] | {} | {}",
        visit.order_label(),
        visit.name,
        visit.season_name,
        format_period(&visit.start_date, &visit.end_date, true),
        status.map(|s| s.label()).unwrap_or("-")
    );
}

pub fn print_visit_record(record: &VisitRecord) {
    println!("유랑 이력 #{}", record.id);
    println!("  영혼: {} (#{})", record.soul_name, record.soul_id);
    if !record.season_name.is_empty() {
        println!("  시즌: {}", record.season_name);
    }
    println!("  방문 차수: {}", record.visit_number);
    println!(
        "  기간: {} ~ {}",
        format_compact_date(&record.start_date),
        format_compact_date(&record.end_date)
    );
    if record.is_warband_visit {
        println!("  유랑단");
    }
}

pub fn print_image_row(image: &ImageRecord) {
    println!(
        "  #{} {} | {} | {}",
        image.id,
        image.image_type.label(),
        if image.soul_name.is_empty() {
            "-"
        } else {
            image.soul_name.as_str()
        },
        image.url
    );
}
