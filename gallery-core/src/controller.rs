//! 图库控制器
//!
//! 持有全部页面状态，页面事件以 [`Command`] 的形式分发进来，
//! 控制器应用状态转换后返回一组 [`Effect`] 交给页面绑定到DOM。

use gallery_common::Category;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compare::ComparisonSelection;
use crate::config::GalleryConfig;
use crate::engine::GalleryFilter;
use crate::error::{GalleryError, Result};
use crate::favorites::{FavoritesLedger, KeyValueStore};
use crate::models::{EmptyReason, QueryState, SortMode};
use crate::pager::{Advance, Batch, PaginationDriver};
use crate::presentation::{CardView, CompareView, DetailView};
use crate::store::ItemStore;

const LOAD_FAILED_TEXT: &str = "Could not load prompt data. Check your connection and try again.";

/// 页面发出的命令
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetSearch { text: String },
    SetSort { mode: SortMode },
    SetMinTotal { min: u32 },
    SetMinCategory { category: Category, min: u32 },
    ToggleFavorite { id: String },
    ToggleCompare { id: String },
    OpenDetail { id: String },
    OpenCompare,
    ClearCompare,
    /// 关闭最上层的浮层（Esc）
    CloseOverlay,
    CopyPayload { id: String },
    /// 从当前结果中随机打开一个，`roll` 取值 [0, 1)
    PickRandom { roll: f64 },
    /// “加载更多”按钮
    ShowMore,
    /// 列表末尾进入可视区域
    SentinelVisible,
    ScrollToTop,
    RetryLoad,
}

/// 空结果提示
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EmptyNotice {
    pub reason: EmptyReason,
    pub message: String,
}

/// 浮层类型，`None` 表示没有打开的浮层
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    None,
    Detail { id: String },
    Compare,
}

/// 数据加载状态
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

/// 控制器请求页面执行的动作
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// 清空网格并更新计数徽章
    ResetGrid {
        count: usize,
        favorites_active: bool,
        empty: Option<EmptyNotice>,
    },
    /// 追加一批卡片
    AppendBatch {
        generation: u64,
        page_index: usize,
        cards: Vec<CardView>,
        loaded: usize,
        total: usize,
        has_more: bool,
    },
    /// 隐藏“加载更多”
    Exhausted,
    UpdateCard { id: String, favorited: bool, compared: bool },
    CompareBar { visible: bool, count: usize },
    /// 取消所有卡片的对比勾选
    CompareCleared,
    ShowDetail { view: DetailView },
    ShowCompare { view: CompareView },
    CloseOverlay { overlay: Overlay },
    CopyToClipboard { text: String },
    Toast { message: String },
    ScrollToTop,
    /// 隐藏错误提示并清空网格，页面应开始获取数据
    LoadStarted,
    LoadFailed { message: String },
}

/// 图库控制器
pub struct GalleryController {
    config: GalleryConfig,
    store: ItemStore,
    query: QueryState,
    favorites: FavoritesLedger,
    selection: ComparisonSelection,
    pager: PaginationDriver,
    filtered: Vec<String>,
    /// 详情浮层显示的条目
    detail: Option<String>,
    /// 对比浮层叠在详情浮层之上
    compare_open: bool,
    load_state: LoadState,
}

impl GalleryController {
    pub fn new(config: GalleryConfig, storage: Box<dyn KeyValueStore>) -> Self {
        let config = config.normalized();
        let favorites = FavoritesLedger::load(storage, &config.favorites_key);
        let selection = ComparisonSelection::new(config.max_compare, config.compare_ready_at);
        let pager = PaginationDriver::new(
            config.page_size,
            config.stagger_step_ms,
            config.stagger_max_ms,
        );

        Self {
            config,
            store: ItemStore::default(),
            query: QueryState::default(),
            favorites,
            selection,
            pager,
            filtered: Vec::new(),
            detail: None,
            compare_open: false,
            load_state: LoadState::Idle,
        }
    }

    /// 开始加载数据，只在尚未加载或加载失败时生效
    pub fn begin_load(&mut self) -> Vec<Effect> {
        if !matches!(self.load_state, LoadState::Idle | LoadState::Failed { .. }) {
            debug!(state = ?self.load_state, "忽略加载请求");
            return Vec::new();
        }
        self.load_state = LoadState::Loading;
        vec![Effect::LoadStarted]
    }

    /// 完成数据加载
    ///
    /// 失败时保留原有数据，页面显示可重试的错误。
    pub fn finish_load(&mut self, result: Result<ItemStore>) -> Vec<Effect> {
        if self.load_state != LoadState::Loading {
            warn!("忽略未请求的加载结果");
            return Vec::new();
        }

        match result {
            Ok(store) => {
                info!(items = store.len(), "图库数据已加载");
                self.store = store;
                self.load_state = LoadState::Loaded;
                self.render()
            }
            Err(e) => {
                warn!(error = %e, "图库数据加载失败");
                let message = match e {
                    GalleryError::DataFetchFailed(cause) if !cause.is_empty() => cause,
                    _ => LOAD_FAILED_TEXT.to_string(),
                };
                self.load_state = LoadState::Failed { message: message.clone() };
                vec![Effect::LoadFailed { message }]
            }
        }
    }

    /// 应用一条命令
    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        debug!(?command, "分发命令");
        match command {
            Command::SetSearch { text } => {
                self.query.search_text = text;
                self.render()
            }
            Command::SetSort { mode } => {
                self.query.sort_mode = mode;
                self.render()
            }
            Command::SetMinTotal { min } => {
                self.query.min_total_score = min;
                self.render()
            }
            Command::SetMinCategory { category, min } => {
                self.query.set_category_min(category, min);
                self.render()
            }
            Command::ToggleFavorite { id } => self.toggle_favorite(&id),
            Command::ToggleCompare { id } => self.toggle_compare(&id),
            Command::OpenDetail { id } => self.open_detail(&id),
            Command::OpenCompare => self.open_compare(),
            Command::ClearCompare => {
                self.selection.clear();
                vec![Effect::CompareCleared, self.compare_bar()]
            }
            Command::CloseOverlay => self.close_overlay(),
            Command::CopyPayload { id } => self.copy_payload(&id),
            Command::PickRandom { roll } => self.pick_random(roll),
            Command::ShowMore | Command::SentinelVisible => {
                let advance = self.pager.on_proximity();
                self.advance_effects(advance)
            }
            Command::ScrollToTop => vec![Effect::ScrollToTop],
            Command::RetryLoad => self.begin_load(),
        }
    }

    /// 从JSON解析并分发命令
    pub fn dispatch_json(&mut self, json: &str) -> Result<Vec<Effect>> {
        let command: Command = serde_json::from_str(json)
            .map_err(|e| GalleryError::InvalidCommand(e.to_string()))?;
        Ok(self.dispatch(command))
    }

    /// 重新筛选排序并从第一批开始渲染
    fn render(&mut self) -> Vec<Effect> {
        self.filtered = GalleryFilter::filter_and_sort(
            self.store.items(),
            &self.query,
            self.favorites.all(),
        )
        .into_iter()
        .map(|item| item.id.clone())
        .collect();

        let empty = if self.filtered.is_empty() {
            let reason = EmptyReason::for_query(&self.query);
            Some(EmptyNotice {
                reason,
                message: reason.message().to_string(),
            })
        } else {
            None
        };

        let mut effects = vec![Effect::ResetGrid {
            count: self.filtered.len(),
            favorites_active: self.query.favorites_only(),
            empty,
        }];
        let advance = self.pager.render(self.filtered.clone());
        effects.extend(self.advance_effects(advance));
        effects
    }

    fn advance_effects(&self, advance: Advance) -> Vec<Effect> {
        match advance {
            Advance::Batch(batch) => vec![self.batch_effect(batch)],
            Advance::Exhausted => vec![Effect::Exhausted],
            Advance::Busy => Vec::new(),
        }
    }

    fn batch_effect(&self, batch: Batch) -> Effect {
        let cards = batch
            .entries
            .iter()
            .filter_map(|entry| {
                let item = self.store.get(&entry.id)?;
                Some(CardView::new(
                    item,
                    self.favorites.contains(&item.id),
                    self.selection.contains(&item.id),
                    entry.stagger_ms,
                ))
            })
            .collect();

        Effect::AppendBatch {
            generation: batch.generation,
            page_index: batch.page_index,
            cards,
            loaded: batch.loaded,
            total: batch.total,
            has_more: batch.has_more,
        }
    }

    fn toggle_favorite(&mut self, id: &str) -> Vec<Effect> {
        let favorited = self.favorites.toggle(id);
        let mut effects = vec![Effect::UpdateCard {
            id: id.to_string(),
            favorited,
            compared: self.selection.contains(id),
        }];
        if self.query.favorites_only() {
            effects.extend(self.render());
        }
        effects
    }

    fn toggle_compare(&mut self, id: &str) -> Vec<Effect> {
        if !self.store.contains(id) {
            debug!(id, "忽略未知条目的对比请求");
            return Vec::new();
        }

        match self.selection.toggle(id) {
            Ok(compared) => vec![
                Effect::UpdateCard {
                    id: id.to_string(),
                    favorited: self.favorites.contains(id),
                    compared,
                },
                self.compare_bar(),
            ],
            Err(GalleryError::CapacityExceeded { limit }) => vec![Effect::Toast {
                message: format!("Max {} items for comparison", limit),
            }],
            Err(e) => vec![Effect::Toast { message: e.to_string() }],
        }
    }

    fn compare_bar(&self) -> Effect {
        Effect::CompareBar {
            visible: self.selection.is_ready(),
            count: self.selection.size(),
        }
    }

    fn open_detail(&mut self, id: &str) -> Vec<Effect> {
        let Some(item) = self.store.get(id) else {
            return Vec::new();
        };
        let view = DetailView::new(item, &self.config.empty_payload_text);
        self.detail = Some(id.to_string());
        vec![Effect::ShowDetail { view }]
    }

    fn open_compare(&mut self) -> Vec<Effect> {
        if !self.selection.is_ready() {
            return Vec::new();
        }

        let items: Vec<_> = self
            .selection
            .members()
            .iter()
            .filter_map(|id| self.store.get(id))
            .collect();

        match CompareView::new(&items) {
            Some(view) => {
                self.compare_open = true;
                vec![Effect::ShowCompare { view }]
            }
            None => Vec::new(),
        }
    }

    // 先关对比浮层，再关详情浮层
    fn close_overlay(&mut self) -> Vec<Effect> {
        if self.compare_open {
            self.compare_open = false;
            return vec![Effect::CloseOverlay { overlay: Overlay::Compare }];
        }
        match self.detail.take() {
            Some(id) => vec![Effect::CloseOverlay { overlay: Overlay::Detail { id } }],
            None => Vec::new(),
        }
    }

    fn copy_payload(&self, id: &str) -> Vec<Effect> {
        let Some(item) = self.store.get(id) else {
            return Vec::new();
        };
        vec![
            Effect::CopyToClipboard { text: item.payload_text().to_string() },
            Effect::Toast { message: "Prompt copied!".to_string() },
        ]
    }

    fn pick_random(&mut self, roll: f64) -> Vec<Effect> {
        if self.filtered.is_empty() {
            return vec![Effect::Toast { message: "No prompts to pick from".to_string() }];
        }

        let roll = if roll.is_finite() { roll.clamp(0.0, 1.0) } else { 0.0 };
        let index = ((roll * self.filtered.len() as f64) as usize).min(self.filtered.len() - 1);
        let id = self.filtered[index].clone();
        self.open_detail(&id)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// 当前筛选排序后的条目ID
    pub fn filtered_ids(&self) -> &[String] {
        &self.filtered
    }

    pub fn favorites(&self) -> &FavoritesLedger {
        &self.favorites
    }

    pub fn selection(&self) -> &ComparisonSelection {
        &self.selection
    }

    pub fn pager(&self) -> &PaginationDriver {
        &self.pager
    }

    /// 最上层的浮层
    pub fn overlay(&self) -> Overlay {
        if self.compare_open {
            Overlay::Compare
        } else {
            match &self.detail {
                Some(id) => Overlay::Detail { id: id.clone() },
                None => Overlay::None,
            }
        }
    }

    pub fn detail_open(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn compare_open(&self) -> bool {
        self.compare_open
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }
}
