use serde::Serialize;
use tracing::debug;

/// 分页驱动的状态
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PagerState {
    /// 尚未渲染任何列表
    Idle,
    /// 正在物化一个批次
    Loading,
    /// 等待滚动触发或“加载更多”
    AwaitingTrigger,
    /// 当前列表已全部加载
    Exhausted,
}

/// 批次中的单个条目
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BatchEntry {
    pub id: String,
    /// 在完整列表中的位置
    pub position: usize,
    /// 入场动画延迟（毫秒），由展示层决定如何使用
    pub stagger_ms: u32,
}

/// 一次物化的批次
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Batch {
    /// 所属的渲染代数，用于识别过期批次
    pub generation: u64,
    /// 批次序号，从0开始
    pub page_index: usize,
    pub entries: Vec<BatchEntry>,
    /// 加上本批次后已加载的条目数
    pub loaded: usize,
    /// 列表总条目数
    pub total: usize,
    /// 是否还有后续批次
    pub has_more: bool,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 推进请求的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// 物化了新的批次
    Batch(Batch),
    /// 已有批次正在加载，本次请求被忽略
    Busy,
    /// 没有更多条目
    Exhausted,
}

/// 分页渲染驱动 - 按固定大小的批次逐步物化列表
#[derive(Debug, Clone)]
pub struct PaginationDriver {
    ids: Vec<String>,
    page_size: usize,
    stagger_step_ms: u32,
    stagger_max_ms: u32,
    cursor: usize,
    state: PagerState,
    generation: u64,
}

impl PaginationDriver {
    pub fn new(page_size: usize, stagger_step_ms: u32, stagger_max_ms: u32) -> Self {
        Self {
            ids: Vec::new(),
            page_size: page_size.max(1),
            stagger_step_ms,
            stagger_max_ms,
            cursor: 0,
            state: PagerState::Idle,
            generation: 0,
        }
    }

    /// 用新列表替换当前列表并加载第一批
    ///
    /// 任何正在进行的批次都会失效。空列表直接进入 Exhausted。
    pub fn render(&mut self, ids: Vec<String>) -> Advance {
        self.generation += 1;
        self.ids = ids;
        self.cursor = 0;
        self.state = PagerState::AwaitingTrigger;
        debug!(generation = self.generation, total = self.ids.len(), "分页重置");

        self.advance()
    }

    /// 加载下一批（开始并立即完成）
    pub fn advance(&mut self) -> Advance {
        match self.begin_advance() {
            Advance::Batch(batch) => {
                self.finish_advance(batch.generation);
                Advance::Batch(batch)
            }
            other => other,
        }
    }

    /// 开始加载下一批，完成后需调用 [`finish_advance`](Self::finish_advance)
    pub fn begin_advance(&mut self) -> Advance {
        match self.state {
            PagerState::Loading => return Advance::Busy,
            PagerState::Exhausted => return Advance::Exhausted,
            PagerState::Idle | PagerState::AwaitingTrigger => {}
        }

        let start = (self.cursor * self.page_size).min(self.ids.len());
        let end = (start + self.page_size).min(self.ids.len());
        if start == end {
            self.state = PagerState::Exhausted;
            debug!(generation = self.generation, "列表已全部加载");
            return Advance::Exhausted;
        }

        self.state = PagerState::Loading;
        let entries = self.ids[start..end]
            .iter()
            .enumerate()
            .map(|(i, id)| BatchEntry {
                id: id.clone(),
                position: start + i,
                stagger_ms: self.stagger_for(i),
            })
            .collect();

        Advance::Batch(Batch {
            generation: self.generation,
            page_index: self.cursor,
            entries,
            loaded: end,
            total: self.ids.len(),
            has_more: end < self.ids.len(),
        })
    }

    /// 批次物化完成，返回该批次是否仍属于当前列表
    pub fn finish_advance(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != PagerState::Loading {
            debug!(generation, current = self.generation, "忽略过期批次");
            return false;
        }
        self.cursor += 1;
        self.state = PagerState::AwaitingTrigger;
        true
    }

    /// 列表末尾进入可视区域
    pub fn on_proximity(&mut self) -> Advance {
        self.advance()
    }

    fn stagger_for(&self, index_in_batch: usize) -> u32 {
        (index_in_batch as u32)
            .saturating_mul(self.stagger_step_ms)
            .min(self.stagger_max_ms)
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    /// 已物化的批次数
    pub fn page_index(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn total(&self) -> usize {
        self.ids.len()
    }

    pub fn loaded(&self) -> usize {
        (self.cursor * self.page_size).min(self.ids.len())
    }
}
