use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::error::{GalleryError, Result};

/// 本地键值存储
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// 内存存储，用于测试和没有 localStorage 的环境
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 浏览器 localStorage
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    /// 获取窗口的 localStorage，不可用时返回 None
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| GalleryError::PersistenceReadFailed(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| GalleryError::PersistenceWriteFailed(format!("{:?}", e)))
    }
}

/// 收藏记录 - 持久化的条目ID集合
pub struct FavoritesLedger {
    store: Box<dyn KeyValueStore>,
    key: String,
    ids: BTreeSet<String>,
}

impl FavoritesLedger {
    /// 从存储中读取收藏，数据缺失或损坏时视为空集合
    pub fn load(store: Box<dyn KeyValueStore>, key: &str) -> Self {
        let ids = match Self::read(store.as_ref(), key) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "收藏数据不可用，使用空集合");
                BTreeSet::new()
            }
        };

        Self {
            store,
            key: key.to_string(),
            ids,
        }
    }

    fn read(store: &dyn KeyValueStore, key: &str) -> Result<BTreeSet<String>> {
        match store.get(key)? {
            Some(raw) => {
                let list: Vec<String> = serde_json::from_str(&raw)
                    .map_err(|e| GalleryError::PersistenceReadFailed(e.to_string()))?;
                Ok(list.into_iter().collect())
            }
            None => Ok(BTreeSet::new()),
        }
    }

    /// 切换收藏状态，返回切换后是否已收藏
    ///
    /// 每次切换都按ID排序重写整个列表，旧版按插入顺序保存的数据会在第一次切换时被规整。
    pub fn toggle(&mut self, id: &str) -> bool {
        let favorited = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };

        if let Err(e) = self.persist() {
            warn!(error = %e, "收藏保存失败，仅保留内存状态");
        }
        favorited
    }

    /// 按ID排序后的JSON列表
    pub fn serialized(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }

    fn persist(&self) -> Result<()> {
        self.store.set(&self.key, &self.serialized())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn all(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
