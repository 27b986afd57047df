use serde::{Deserialize, Serialize};

/// 图库配置 - 页面可通过JSON覆盖任意字段
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// 每批渲染的条目数
    pub page_size: usize,
    /// 对比选择的容量上限
    pub max_compare: usize,
    /// 可以打开对比视图的最少条目数
    pub compare_ready_at: usize,
    /// 入场动画的错开步长（毫秒）
    pub stagger_step_ms: u32,
    /// 入场动画的最大延迟（毫秒）
    pub stagger_max_ms: u32,
    /// 本地存储中收藏列表的键名
    pub favorites_key: String,
    /// 条目没有提示词时展示的文本
    pub empty_payload_text: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: 30,
            max_compare: 3,
            compare_ready_at: 2,
            stagger_step_ms: 30,
            stagger_max_ms: 450,
            favorites_key: "promptzoo_favs".to_string(),
            empty_payload_text: "No prompt available".to_string(),
        }
    }
}

impl GalleryConfig {
    /// 从JSON解析配置，缺失字段使用默认值
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// 将不合法的零值修正为1
    pub fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.max_compare = self.max_compare.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GalleryConfig::from_json(r#"{"page_size": 12}"#).unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.max_compare, 3);
        assert_eq!(config.favorites_key, "promptzoo_favs");
    }

    #[test]
    fn test_zero_sizes_are_clamped() {
        let config = GalleryConfig::from_json(r#"{"page_size": 0, "max_compare": 0}"#).unwrap();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.max_compare, 1);
    }
}
