use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 评分维度 - 固定的五个类别
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Legibility,
    Hierarchy,
    Consistency,
    Atmosphere,
    #[serde(rename = "Theme Fit")]
    ThemeFit,
}

impl Category {
    /// 所有类别，按展示顺序排列
    pub const ALL: [Category; 5] = [
        Category::Legibility,
        Category::Hierarchy,
        Category::Consistency,
        Category::Atmosphere,
        Category::ThemeFit,
    ];

    /// 数据文件中使用的类别名称
    pub fn name(&self) -> &'static str {
        match self {
            Category::Legibility => "Legibility",
            Category::Hierarchy => "Hierarchy",
            Category::Consistency => "Consistency",
            Category::Atmosphere => "Atmosphere",
            Category::ThemeFit => "Theme Fit",
        }
    }

    /// 截取名称前 `len` 个字符作为短标签
    pub fn short_label(&self, len: usize) -> String {
        self.name().chars().take(len).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知的评分类别: {}", s))
    }
}

/// 图库条目 - 加载后不可变
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GalleryItem {
    /// 条目唯一标识符
    pub id: String,
    /// 展示序号（不保证唯一或连续）
    pub number: u32,
    /// 展示名称
    pub name: String,
    /// 图片地址
    #[serde(rename = "img")]
    pub image_ref: String,
    /// 类别名 -> 分数 (0-10)
    pub scores: BTreeMap<String, u32>,
    /// 总分 (0-50)，直接信任数据文件中的值
    pub total: u32,
    /// 提示词内容（YAML 文本，可选）
    #[serde(rename = "yaml", default)]
    pub payload: Option<String>,
}

impl GalleryItem {
    /// 获取某个类别的分数，缺失时为0
    pub fn score(&self, category: Category) -> u32 {
        self.scores.get(category.name()).copied().unwrap_or(0)
    }

    /// 提示词文本，缺失时为空字符串
    pub fn payload_text(&self) -> &str {
        self.payload.as_deref().unwrap_or("")
    }

    /// 名称、ID或提示词是否包含已转为小写的查询
    pub fn matches_text(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.id.to_lowercase().contains(query_lower)
            || self
                .payload
                .as_ref()
                .map(|p| p.to_lowercase().contains(query_lower))
                .unwrap_or(false)
    }

    /// 各类别分数之和，用于校验数据文件中的总分
    pub fn category_sum(&self) -> u32 {
        Category::ALL.iter().map(|c| self.score(*c)).sum()
    }
}

/// 快照元数据
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SnapshotMetadata {
    /// 条目数量
    pub item_count: usize,
    /// 快照创建时间
    pub created_at: DateTime<Utc>,
    /// 生成快照的工具版本
    pub version: String,
}

/// 图库快照 - 预处理后的完整数据集
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GallerySnapshot {
    pub metadata: SnapshotMetadata,
    pub items: Vec<GalleryItem>,
}
