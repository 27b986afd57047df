use std::collections::HashMap;

use gallery_common::compression as utils;
use gallery_common::{GalleryItem, GallerySnapshot};
use tracing::{info, warn};

use crate::error::{GalleryError, Result};

/// 条目存储 - 启动时加载一次，会话期间只读
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    items: Vec<GalleryItem>,
    by_id: HashMap<String, usize>,
}

impl ItemStore {
    /// 从条目列表构建存储，重复ID只保留第一个
    pub fn from_items(items: Vec<GalleryItem>) -> Self {
        let mut store = ItemStore {
            items: Vec::with_capacity(items.len()),
            by_id: HashMap::with_capacity(items.len()),
        };

        for item in items {
            if store.by_id.contains_key(&item.id) {
                warn!(id = %item.id, "忽略重复的条目ID");
                continue;
            }
            store.by_id.insert(item.id.clone(), store.items.len());
            store.items.push(item);
        }

        store
    }

    /// 解析静态数据文件（JSON数组）
    ///
    /// 顶层不是数组时整体失败；单条记录缺少必填字段时跳过该记录。
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| GalleryError::DataFetchFailed(format!("解析数据失败: {}", e)))?;

        let total = records.len();
        let items: Vec<GalleryItem> = records
            .into_iter()
            .enumerate()
            .filter_map(|(position, record)| match serde_json::from_value(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(position, error = %e, "跳过无效的条目记录");
                    None
                }
            })
            .collect();

        info!(loaded = items.len(), skipped = total - items.len(), "条目数据解析完成");
        Ok(Self::from_items(items))
    }

    /// 从压缩快照恢复
    pub fn from_snapshot(data: &[u8]) -> Result<Self> {
        let snapshot: GallerySnapshot = utils::from_compressed(data)?;
        info!(
            items = snapshot.items.len(),
            created_at = %snapshot.metadata.created_at,
            "快照加载完成"
        );
        Ok(Self::from_items(snapshot.items))
    }

    pub fn get(&self, id: &str) -> Option<&GalleryItem> {
        self.by_id.get(id).and_then(|&i| self.items.get(i))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// 按数据文件原始顺序返回所有条目
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
