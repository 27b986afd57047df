use thiserror::Error;

/// 图库核心可能出现的错误
#[derive(Error, Debug)]
pub enum GalleryError {
    /// 数据获取失败（网络/HTTP错误或数据格式错误），可重试
    #[error("数据加载失败: {0}")]
    DataFetchFailed(String),

    /// 对比选择已满
    #[error("最多只能对比 {limit} 个条目")]
    CapacityExceeded { limit: usize },

    /// 本地收藏数据损坏或无法读取，调用方会降级为空集合
    #[error("读取收藏数据失败: {0}")]
    PersistenceReadFailed(String),

    /// 本地收藏数据写入失败
    #[error("写入收藏数据失败: {0}")]
    PersistenceWriteFailed(String),

    /// 快照容器读写失败
    #[error("快照读写失败: {0}")]
    Snapshot(#[from] std::io::Error),

    /// 离线构建快照失败
    #[error("快照构建失败: {0}")]
    Build(String),

    /// 页面传入的命令无法解析
    #[error("无效的命令: {0}")]
    InvalidCommand(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
