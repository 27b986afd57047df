use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use gallery_common::compression::to_compressed;
use gallery_common::{GalleryItem, GallerySnapshot, SnapshotMetadata, SNAPSHOT_VERSION};
use tracing::{debug, info, warn};

use crate::error::{GalleryError, Result};

/// 原始数据中需要丢弃的字段
const DROPPED_FIELDS: &[&str] = &["comments"];
/// 需要改写为绝对地址的图片前缀
const RELATIVE_ASSET_PREFIX: &str = "assets/";

/// 快照构建器 - 离线整理评测数据
pub struct CollectionBuilder {
    items: Vec<GalleryItem>,
    seen: HashSet<String>,
    asset_base: Option<String>,
}

impl CollectionBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            asset_base: None,
        }
    }

    /// 设置相对图片地址的前缀，如 `https://example.org/gallery/`
    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = Some(base.into());
        self
    }

    /// 添加条目，重复ID会被拒绝
    pub fn add_item(&mut self, item: GalleryItem) -> bool {
        if !self.seen.insert(item.id.clone()) {
            warn!(id = %item.id, "跳过重复的条目ID");
            return false;
        }
        if item.total != item.category_sum() {
            warn!(id = %item.id, total = item.total, sum = item.category_sum(), "总分与各类别之和不一致");
        }
        self.items.push(item);
        true
    }

    /// 整理一条原始记录并添加
    pub fn add_raw_record(&mut self, mut record: serde_json::Value) -> Result<bool> {
        if let Some(fields) = record.as_object_mut() {
            for field in DROPPED_FIELDS {
                fields.remove(*field);
            }
            if let (Some(base), Some(serde_json::Value::String(img))) =
                (&self.asset_base, fields.get_mut("img"))
            {
                if img.starts_with(RELATIVE_ASSET_PREFIX) {
                    *img = format!("{}{}", base, img);
                }
            }
        }

        let item: GalleryItem = serde_json::from_value(record)
            .map_err(|e| GalleryError::Build(format!("无效的条目记录: {}", e)))?;
        debug!(id = %item.id, "添加条目");
        Ok(self.add_item(item))
    }

    /// 解析一个JSON数组并逐条添加，返回 (添加数, 跳过数)
    pub fn add_json_array(&mut self, json: &str) -> Result<(usize, usize)> {
        let records: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| GalleryError::Build(format!("数据文件不是JSON数组: {}", e)))?;

        let mut added = 0;
        let mut skipped = 0;
        for record in records {
            match self.add_raw_record(record) {
                Ok(true) => added += 1,
                Ok(false) => skipped += 1,
                Err(e) => {
                    warn!(error = %e, "跳过无效记录");
                    skipped += 1;
                }
            }
        }
        Ok((added, skipped))
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// 构建快照
    pub fn build_snapshot(&self) -> Result<GallerySnapshot> {
        if self.items.is_empty() {
            return Err(GalleryError::Build("没有条目数据".to_string()));
        }

        Ok(GallerySnapshot {
            metadata: SnapshotMetadata {
                item_count: self.items.len(),
                created_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            items: self.items.clone(),
        })
    }

    /// 保存压缩快照
    pub fn save_snapshot(&self, path: &Path) -> Result<usize> {
        let snapshot = self.build_snapshot()?;
        let data = to_compressed(&snapshot, SNAPSHOT_VERSION)?;

        let mut file = File::create(path)?;
        file.write_all(&data)?;

        info!(path = %path.display(), bytes = data.len(), items = snapshot.items.len(), "快照已写入");
        Ok(data.len())
    }

    /// 保存页面直接读取的JSON数据文件
    pub fn save_json(&self, path: &Path) -> Result<usize> {
        if self.items.is_empty() {
            return Err(GalleryError::Build("没有条目数据".to_string()));
        }

        let json = serde_json::to_string_pretty(&self.items)
            .map_err(|e| GalleryError::Build(format!("序列化失败: {}", e)))?;
        std::fs::write(path, &json)?;

        info!(path = %path.display(), items = self.items.len(), "JSON数据已写入");
        Ok(json.len())
    }
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
