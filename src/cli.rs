use clap::{Args, Parser, Subcommand};
use sky_souls_common::{ImageType, ListPage, ViewMode};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "sky-souls")]
#[command(about = "스카이 영혼 대백과 CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのベースURL（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 一覧を対話的に閲覧（無限スクロール・戻る復元）
    Browse {
        /// 一覧ページ (dictionary/encyclopedia/visits)
        #[arg(required = true)]
        page: BrowsePage,

        /// 検索語
        #[arg(short, long)]
        query: Option<String>,

        /// シーズン名で絞り込み（dictionaryのみ）
        #[arg(short, long)]
        season: Option<String>,

        /// 表示モード (card/list)
        #[arg(short, long)]
        mode: Option<ViewMode>,

        /// 유랑단のみ（encyclopediaのみ）
        #[arg(long)]
        warband: bool,

        /// 戻る操作として開く（保存済みの一覧を復元）
        #[arg(long)]
        back: bool,
    },

    /// 영혼の管理
    Soul {
        #[command(subcommand)]
        action: SoulAction,
    },

    /// 시즌の管理
    Season {
        #[command(subcommand)]
        action: SeasonAction,
    },

    /// 유랑 이력の管理
    Visit {
        #[command(subcommand)]
        action: VisitAction,
    },

    /// 이미지の管理
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },

    /// 設定を表示/編集
    Config {
        /// APIのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 1ページの件数を設定
        #[arg(long)]
        set_page_size: Option<u32>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 一覧スナップショットの管理
    Session {
        /// 保存内容を表示
        #[arg(long)]
        info: bool,

        /// すべて削除
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
pub enum SoulAction {
    /// 詳細を表示
    Show { id: i64 },

    /// 作成（未指定の項目は対話入力）
    Create(SoulArgs),

    /// 更新
    Update {
        id: i64,

        #[command(flatten)]
        fields: SoulArgs,

        /// 画像を差し替え（例: representative=./rep.png）
        #[arg(long = "image", value_name = "TYPE=PATH")]
        images: Vec<ImageAssignment>,

        /// 画像を外す
        #[arg(long = "remove-image", value_name = "TYPE")]
        remove_images: Vec<ImageType>,
    },

    /// 削除
    Delete {
        id: i64,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SoulArgs {
    /// 영혼 이름
    #[arg(long)]
    pub name: Option<String>,

    /// 시즌 ID
    #[arg(long)]
    pub season_id: Option<i64>,

    /// シーズン内の順番
    #[arg(long)]
    pub order: Option<i32>,

    /// キーワード（カンマ区切り）
    #[arg(long)]
    pub keywords: Option<String>,

    /// 説明
    #[arg(long)]
    pub description: Option<String>,

    /// 作成者
    #[arg(long)]
    pub creator: Option<String>,

    /// 位置
    #[arg(long)]
    pub location: Option<String>,

    /// 시즌 가이드
    #[arg(long)]
    pub guide: Option<bool>,
}

#[derive(Subcommand)]
pub enum SeasonAction {
    /// 一覧
    List,

    /// 詳細（所属する영혼も表示）
    Show { id: i64 },

    /// 作成
    Create(SeasonArgs),

    /// 更新
    Update {
        id: i64,

        #[command(flatten)]
        fields: SeasonArgs,
    },

    /// 削除
    Delete {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SeasonArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub order: Option<i32>,

    /// 開始日 (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// 終了日 (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// 表示色 (#RRGGBB)
    #[arg(long)]
    pub color: Option<String>,

    /// コラボシーズン
    #[arg(long)]
    pub collaboration: Option<bool>,
}

#[derive(Subcommand)]
pub enum VisitAction {
    /// 復刻訪問の一覧（ステータス付き）
    List {
        /// ページ番号（0始まり）
        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// 詳細
    Show { id: i64 },

    /// 作成
    Create(VisitArgs),

    /// 更新
    Update {
        id: i64,

        #[command(flatten)]
        fields: VisitArgs,
    },

    /// 削除
    Delete {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct VisitArgs {
    #[arg(long)]
    pub soul_id: Option<i64>,

    /// 何回目の訪問か
    #[arg(long)]
    pub number: Option<u32>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    /// 유랑단
    #[arg(long)]
    pub warband: Option<bool>,
}

#[derive(Subcommand)]
pub enum ImageAction {
    /// 一覧
    List {
        #[arg(short, long, default_value = "0")]
        page: u32,

        #[arg(long)]
        soul_id: Option<i64>,

        /// 画像の種類 (representative/location/wearing/node-chart)
        #[arg(short = 't', long = "type")]
        image_type: Option<ImageType>,
    },

    /// アップロード（영혼指定なしは一時アップロード）
    Upload {
        /// 画像ファイル
        #[arg(required = true)]
        file: PathBuf,

        #[arg(short = 't', long = "type", default_value = "representative")]
        image_type: ImageType,

        #[arg(long)]
        soul_id: Option<i64>,
    },

    /// IDで削除
    Delete {
        id: i64,

        #[arg(short, long)]
        yes: bool,
    },

    /// URLで削除
    DeleteUrl {
        url: String,

        #[arg(short, long)]
        yes: bool,
    },
}

/// 閲覧する一覧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowsePage {
    Dictionary,
    Encyclopedia,
    Visits,
}

impl BrowsePage {
    pub fn list_page(&self) -> ListPage {
        match self {
            BrowsePage::Dictionary => ListPage::SeasonDictionary,
            BrowsePage::Encyclopedia => ListPage::TravelingEncyclopedia,
            BrowsePage::Visits => ListPage::GeneralVisits,
        }
    }
}

impl FromStr for BrowsePage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dictionary" | "dict" | "season" => Ok(BrowsePage::Dictionary),
            "encyclopedia" | "ency" | "traveling" => Ok(BrowsePage::Encyclopedia),
            "visits" | "general" => Ok(BrowsePage::Visits),
            _ => Err(format!(
                "Unknown page: {}. Use dictionary, encyclopedia, or visits",
                s
            )),
        }
    }
}

/// `--image TYPE=PATH`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAssignment {
    pub image_type: ImageType,
    pub path: PathBuf,
}

impl FromStr for ImageAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, path) = s
            .split_once('=')
            .ok_or_else(|| format!("TYPE=PATH 형식으로 지정하세요: {}", s))?;
        if path.trim().is_empty() {
            return Err(format!("경로가 비어 있습니다: {}", s));
        }
        Ok(Self {
            image_type: kind.parse()?,
            path: PathBuf::from(path.trim()),
        })
    }
}
