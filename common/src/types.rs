//! 図鑑データの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Soul: 영혼（シーズンアイテムを持つ精霊）
//! - Season: 시즌
//! - TravelingVisit: 유랑（復刻訪問）の結合ビュー
//! - VisitRecord / ImageRecord: 管理画面用のレコード
//! - *Payload: 作成・更新リクエストのボディ

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 画像の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Representative,
    Location,
    Wearing,
    NodeChart,
}

impl ImageType {
    pub const ALL: [ImageType; 4] = [
        ImageType::Representative,
        ImageType::Location,
        ImageType::Wearing,
        ImageType::NodeChart,
    ];

    /// APIに渡す値
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Representative => "REPRESENTATIVE",
            ImageType::Location => "LOCATION",
            ImageType::Wearing => "WEARING",
            ImageType::NodeChart => "NODE_CHART",
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            ImageType::Representative => "대표 이미지",
            ImageType::Location => "위치 이미지",
            ImageType::Wearing => "착용샷",
            ImageType::NodeChart => "노드표",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "REPRESENTATIVE" | "REP" => Ok(ImageType::Representative),
            "LOCATION" => Ok(ImageType::Location),
            "WEARING" => Ok(ImageType::Wearing),
            "NODE_CHART" | "NODECHART" => Ok(ImageType::NodeChart),
            _ => Err(format!(
                "Unknown image type: {}. Use representative, location, wearing, or node-chart",
                s
            )),
        }
    }
}

/// 영혼に紐づく画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoulImage {
    #[serde(default)]
    pub id: Option<i64>,
    pub image_type: ImageType,
    pub url: String,
}

/// 영혼詳細に含まれる訪問履歴
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitSummary {
    pub visit_number: u32,
    pub start_date: String,
    pub end_date: String,
    pub is_warband_visit: bool,
}

/// 영혼
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Soul {
    pub id: i64,
    pub name: String,
    pub season_id: Option<i64>,
    pub season_name: String,
    pub order_num: Option<i32>,
    pub location: String,
    pub is_season_guide: bool,
    pub keywords: Vec<String>,
    pub description: String,
    pub creator: String,
    pub start_date: String,
    pub end_date: String,
    pub total_visits: u32,
    pub images: Vec<SoulImage>,
    pub traveling_visits: Vec<VisitSummary>,
}

impl Soul {
    pub fn image(&self, image_type: ImageType) -> Option<&SoulImage> {
        self.images.iter().find(|img| img.image_type == image_type)
    }

    /// 대표 이미지のURL
    pub fn representative_url(&self) -> Option<&str> {
        self.image(ImageType::Representative).map(|img| img.url.as_str())
    }
}

/// 시즌
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub order_num: i32,
    pub start_date: String,
    pub end_date: String,
    pub color: String,
    pub is_collaboration: bool,
}

/// 유랑 대백과の1行（영혼・시즌結合済み）
///
/// `id` は영혼のIDなので同じ영혼が訪問回数ぶん現れる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelingVisit {
    pub id: i64,
    pub name: String,
    pub season_name: String,
    pub order_num: Option<i32>,
    /// 負の値は유랑단
    pub global_order: i32,
    pub start_date: String,
    pub end_date: String,
    pub visit_number: u32,
    pub is_warband_visit: bool,
    pub is_active: bool,
    pub images: Vec<SoulImage>,
}

impl TravelingVisit {
    pub fn is_warband(&self) -> bool {
        self.global_order < 0
    }

    /// `#N` 表示用の順位
    pub fn rank(&self) -> u32 {
        self.global_order.unsigned_abs()
    }

    pub fn order_label(&self) -> String {
        if self.is_warband() {
            format!("{}번째 유랑단", self.rank())
        } else {
            format!("{}번째 유랑", self.global_order)
        }
    }

    pub fn representative_url(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|img| img.image_type == ImageType::Representative)
            .map(|img| img.url.as_str())
    }
}

/// 유랑 이력レコード（管理用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitRecord {
    pub id: i64,
    pub soul_id: i64,
    pub soul_name: String,
    pub season_name: String,
    pub visit_number: u32,
    pub start_date: String,
    pub end_date: String,
    pub is_warband_visit: bool,
}

/// 画像レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: i64,
    #[serde(default)]
    pub soul_id: Option<i64>,
    #[serde(default)]
    pub soul_name: String,
    pub image_type: ImageType,
    pub url: String,
}

/// `/images/upload` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// 영혼作成・更新のボディ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoulPayload {
    pub name: String,
    pub season_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub order_num: i32,
    pub is_season_guide: bool,
    pub keywords: Vec<String>,
    pub description: String,
    pub creator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub images: Vec<ImagePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub image_type: ImageType,
    pub url: String,
}

/// 시즌作成・更新のボディ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPayload {
    pub name: String,
    pub order_num: i32,
    pub start_date: String,
    pub end_date: String,
    pub color: String,
    pub is_collaboration: bool,
}

/// 유랑 이력作成・更新のボディ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    pub soul_id: i64,
    pub visit_number: u32,
    pub start_date: String,
    pub end_date: String,
    pub is_warband_visit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soul_deserialize_partial() {
        let json = r#"{
            "id": 12,
            "name": "감사하는 정령",
            "seasonName": "감사",
            "isSeasonGuide": true,
            "images": [
                {"imageType": "WEARING", "url": "https://cdn/w.png"},
                {"imageType": "REPRESENTATIVE", "url": "https://cdn/r.png"}
            ]
        }"#;

        let soul: Soul = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(soul.id, 12);
        assert_eq!(soul.season_name, "감사");
        assert!(soul.is_season_guide);
        assert!(soul.keywords.is_empty());
        assert_eq!(soul.representative_url(), Some("https://cdn/r.png"));
    }

    #[test]
    fn test_traveling_visit_warband_labels() {
        let normal = TravelingVisit {
            global_order: 87,
            ..Default::default()
        };
        let warband = TravelingVisit {
            global_order: -3,
            ..Default::default()
        };

        assert!(!normal.is_warband());
        assert_eq!(normal.order_label(), "87번째 유랑");
        assert!(warband.is_warband());
        assert_eq!(warband.rank(), 3);
        assert_eq!(warband.order_label(), "3번째 유랑단");
    }

    #[test]
    fn test_image_type_from_str() {
        assert_eq!("node-chart".parse::<ImageType>(), Ok(ImageType::NodeChart));
        assert_eq!("REPRESENTATIVE".parse::<ImageType>(), Ok(ImageType::Representative));
        assert!("banner".parse::<ImageType>().is_err());
    }

    #[test]
    fn test_soul_payload_skips_absent_fields() {
        let payload = SoulPayload {
            name: "테스트".to_string(),
            season_id: 1,
            order_num: 2,
            ..Default::default()
        };

        let json = serde_json::to_string(&payload).expect("シリアライズ失敗");
        assert!(json.contains("\"seasonId\":1"));
        assert!(!json.contains("seasonName"));
        assert!(!json.contains("images"));
    }
}
