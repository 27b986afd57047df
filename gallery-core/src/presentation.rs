//! 详情和对比视图的视图模型
//!
//! 这里只产生数据，颜色和动画由页面根据等级和百分比决定。

use gallery_common::{Category, GalleryItem};
use serde::Serialize;

/// 卡片分数小圆点使用的标签长度
const PIP_LABEL_LEN: usize = 3;
/// 对比视图分数行使用的标签长度
const COMPARE_LABEL_LEN: usize = 5;

/// 分数等级
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

impl ScoreTier {
    /// 单个类别分数的等级 (0-10)
    pub fn for_category(score: u32) -> Self {
        if score >= 9 {
            ScoreTier::High
        } else if score >= 7 {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }

    /// 总分徽章的等级 (0-50)
    pub fn for_total(total: u32) -> Self {
        if total >= 43 {
            ScoreTier::High
        } else if total >= 37 {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }
}

/// 类别分数条
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScoreBar {
    pub category: Category,
    pub label: String,
    pub value: u32,
    pub tier: ScoreTier,
    /// 进度条填充百分比 (0-100)
    pub fill_percent: u32,
}

impl ScoreBar {
    fn new(category: Category, value: u32, label_len: Option<usize>) -> Self {
        Self {
            category,
            label: match label_len {
                Some(len) => category.short_label(len),
                None => category.name().to_string(),
            },
            value,
            tier: ScoreTier::for_category(value),
            fill_percent: value.saturating_mul(10).min(100),
        }
    }
}

/// 卡片上的分数小圆点
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScorePip {
    pub label: String,
    pub value: u32,
}

/// 网格中的卡片
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CardView {
    pub id: String,
    pub number: u32,
    pub name: String,
    pub image_ref: String,
    pub total: u32,
    pub total_tier: ScoreTier,
    pub pips: Vec<ScorePip>,
    pub favorited: bool,
    pub compared: bool,
    pub stagger_ms: u32,
}

impl CardView {
    pub fn new(item: &GalleryItem, favorited: bool, compared: bool, stagger_ms: u32) -> Self {
        Self {
            id: item.id.clone(),
            number: item.number,
            name: item.name.clone(),
            image_ref: item.image_ref.clone(),
            total: item.total,
            total_tier: ScoreTier::for_total(item.total),
            pips: Category::ALL
                .iter()
                .map(|c| ScorePip {
                    label: c.short_label(PIP_LABEL_LEN),
                    value: item.score(*c),
                })
                .collect(),
            favorited,
            compared,
            stagger_ms,
        }
    }
}

/// 单个条目的详情视图
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DetailView {
    pub id: String,
    pub number: u32,
    pub name: String,
    pub image_ref: String,
    pub total: u32,
    pub total_tier: ScoreTier,
    pub scores: Vec<ScoreBar>,
    /// 提示词文本，缺失时为占位文本
    pub payload_text: String,
    pub has_payload: bool,
}

impl DetailView {
    pub fn new(item: &GalleryItem, empty_payload_text: &str) -> Self {
        Self {
            id: item.id.clone(),
            number: item.number,
            name: item.name.clone(),
            image_ref: item.image_ref.clone(),
            total: item.total,
            total_tier: ScoreTier::for_total(item.total),
            scores: score_bars(item, None),
            payload_text: item
                .payload
                .clone()
                .unwrap_or_else(|| empty_payload_text.to_string()),
            has_payload: item.payload.is_some(),
        }
    }
}

/// 对比视图中的一列
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CompareColumn {
    pub id: String,
    pub number: u32,
    pub name: String,
    pub image_ref: String,
    pub total: u32,
    pub scores: Vec<ScoreBar>,
}

/// 并排对比视图
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CompareView {
    pub columns: usize,
    pub items: Vec<CompareColumn>,
}

impl CompareView {
    /// 少于两个条目时没有可对比的内容
    pub fn new(items: &[&GalleryItem]) -> Option<Self> {
        if items.len() < 2 {
            return None;
        }

        let columns = items
            .iter()
            .map(|item| CompareColumn {
                id: item.id.clone(),
                number: item.number,
                name: item.name.clone(),
                image_ref: item.image_ref.clone(),
                total: item.total,
                scores: score_bars(item, Some(COMPARE_LABEL_LEN)),
            })
            .collect::<Vec<_>>();

        Some(Self {
            columns: columns.len(),
            items: columns,
        })
    }
}

fn score_bars(item: &GalleryItem, label_len: Option<usize>) -> Vec<ScoreBar> {
    Category::ALL
        .iter()
        .map(|c| ScoreBar::new(*c, item.score(*c), label_len))
        .collect()
}
