use std::collections::BTreeSet;

use gallery_common::{Category, GalleryItem};

use crate::models::{QueryState, SortMode};

/// 条目过滤器 - 纯函数，不持有任何状态
pub struct GalleryFilter;

impl GalleryFilter {
    /// 按查询状态筛选并排序条目
    ///
    /// 所有条件（收藏限制、总分下限、类别下限、搜索文本）都必须同时满足。
    /// 排序是稳定的，同分条目保持原始顺序。
    pub fn filter_and_sort<'a>(
        items: &'a [GalleryItem],
        query: &QueryState,
        favorites: &BTreeSet<String>,
    ) -> Vec<&'a GalleryItem> {
        let search = query.search_text.to_lowercase();

        let mut filtered: Vec<&GalleryItem> = items
            .iter()
            .filter(|item| Self::matches(item, query, favorites, &search))
            .collect();

        Self::apply_sorting(&mut filtered, query.sort_mode);
        filtered
    }

    /// 单个条目是否满足查询条件，`search` 需已转为小写
    pub fn matches(
        item: &GalleryItem,
        query: &QueryState,
        favorites: &BTreeSet<String>,
        search: &str,
    ) -> bool {
        if query.favorites_only() && !favorites.contains(&item.id) {
            return false;
        }

        if query.min_total_score > 0 && item.total < query.min_total_score {
            return false;
        }

        let below_category_min = Category::ALL.iter().any(|&category| {
            let min = query.category_min(category);
            min > 0 && item.score(category) < min
        });
        if below_category_min {
            return false;
        }

        search.is_empty() || item.matches_text(search)
    }

    // 应用排序
    fn apply_sorting(items: &mut [&GalleryItem], sort_mode: SortMode) {
        match sort_mode {
            SortMode::ScoreAsc => items.sort_by(|a, b| a.total.cmp(&b.total)),
            SortMode::NumberAsc => items.sort_by(|a, b| a.number.cmp(&b.number)),
            SortMode::ScoreDesc | SortMode::Favorites => {
                items.sort_by(|a, b| b.total.cmp(&a.total))
            }
        }
    }
}
