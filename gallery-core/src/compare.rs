use crate::error::{GalleryError, Result};

/// 对比选择 - 有容量上限的条目ID集合，保持加入顺序
#[derive(Debug, Clone)]
pub struct ComparisonSelection {
    members: Vec<String>,
    capacity: usize,
    ready_at: usize,
}

impl ComparisonSelection {
    pub fn new(capacity: usize, ready_at: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
            ready_at,
        }
    }

    /// 切换条目，返回切换后是否在集合中
    ///
    /// 集合已满时加入新条目会失败，集合保持不变。
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        if let Some(pos) = self.members.iter().position(|m| m == id) {
            self.members.remove(pos);
            return Ok(false);
        }

        if self.members.len() >= self.capacity {
            return Err(GalleryError::CapacityExceeded { limit: self.capacity });
        }

        self.members.push(id.to_string());
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 是否达到可以打开对比视图的数量
    pub fn is_ready(&self) -> bool {
        self.members.len() >= self.ready_at
    }
}
