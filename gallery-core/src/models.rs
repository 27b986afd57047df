use gallery_common::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 排序方式
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortMode {
    /// 总分降序
    #[default]
    #[serde(rename = "score-desc")]
    ScoreDesc,
    /// 总分升序
    #[serde(rename = "score-asc")]
    ScoreAsc,
    /// 序号升序
    #[serde(rename = "number-asc")]
    NumberAsc,
    /// 只显示收藏，按总分降序
    #[serde(rename = "favs", alias = "favorites")]
    Favorites,
}

/// 查询状态 - 驱动筛选和渲染
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QueryState {
    /// 排序方式
    pub sort_mode: SortMode,
    /// 总分下限，0表示不限
    pub min_total_score: u32,
    /// 各类别分数下限，0表示不限
    pub min_per_category: BTreeMap<Category, u32>,
    /// 搜索文本（不区分大小写）
    pub search_text: String,
}

impl QueryState {
    /// 某类别的下限，未设置时为0
    pub fn category_min(&self, category: Category) -> u32 {
        self.min_per_category.get(&category).copied().unwrap_or(0)
    }

    /// 设置类别下限，0会移除该条件
    pub fn set_category_min(&mut self, category: Category, min: u32) {
        if min == 0 {
            self.min_per_category.remove(&category);
        } else {
            self.min_per_category.insert(category, min);
        }
    }

    pub fn favorites_only(&self) -> bool {
        self.sort_mode == SortMode::Favorites
    }
}

/// 结果为空的原因
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// 收藏模式下没有任何收藏条目
    NoFavorites,
    /// 筛选条件下没有匹配条目
    NoMatches,
}

impl EmptyReason {
    pub fn for_query(query: &QueryState) -> Self {
        if query.favorites_only() {
            EmptyReason::NoFavorites
        } else {
            EmptyReason::NoMatches
        }
    }

    /// 空状态提示文本
    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::NoFavorites => "No favorites yet.",
            EmptyReason::NoMatches => "No prompts found.",
        }
    }
}
