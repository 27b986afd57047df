use wasm_bindgen::prelude::*;
use web_sys::console;

// 导出模块
pub mod builder;
pub mod compare;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod favorites;
pub mod models;
pub mod pager;
pub mod presentation;
pub mod store;

pub use compare::ComparisonSelection;
pub use config::GalleryConfig;
pub use controller::{Command, Effect, GalleryController, LoadState, Overlay};
pub use engine::GalleryFilter;
pub use error::{GalleryError, Result};
pub use favorites::{FavoritesLedger, KeyValueStore, MemoryStore, WebStorage};
pub use models::{EmptyReason, QueryState, SortMode};
pub use pager::{Advance, Batch, PaginationDriver, PagerState};
pub use store::ItemStore;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 图库JS接口 - 页面持有一个实例，所有事件都通过它分发
#[wasm_bindgen]
pub struct GalleryJS {
    controller: GalleryController,
}

#[wasm_bindgen]
impl GalleryJS {
    /// 创建图库，`config_json` 可覆盖默认配置
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<GalleryJS, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_json.as_deref() {
            Some(json) => GalleryConfig::from_json(json)
                .map_err(|e| JsValue::from_str(&format!("解析配置失败: {}", e)))?,
            None => GalleryConfig::default(),
        };

        let storage: Box<dyn KeyValueStore> = match WebStorage::local() {
            Some(storage) => Box::new(storage),
            None => {
                console::log_1(&JsValue::from_str("localStorage 不可用，收藏仅保存在内存中"));
                Box::new(MemoryStore::new())
            }
        };

        Ok(GalleryJS {
            controller: GalleryController::new(config, storage),
        })
    }

    /// 开始加载数据；返回空数组时说明已有加载在进行
    #[wasm_bindgen]
    pub fn begin_load(&mut self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.controller.begin_load())
    }

    /// 用获取到的JSON文本完成加载
    #[wasm_bindgen]
    pub fn finish_load_json(&mut self, json: &str) -> std::result::Result<JsValue, JsValue> {
        let result = ItemStore::from_json(json);
        self.finish(result)
    }

    /// 用压缩快照完成加载
    #[wasm_bindgen]
    pub fn finish_load_snapshot(&mut self, data: &[u8]) -> std::result::Result<JsValue, JsValue> {
        let result = ItemStore::from_snapshot(data);
        self.finish(result)
    }

    /// 网络或HTTP错误
    #[wasm_bindgen]
    pub fn fail_load(&mut self, message: &str) -> std::result::Result<JsValue, JsValue> {
        self.finish(Err(GalleryError::DataFetchFailed(message.to_string())))
    }

    /// 分发JSON格式的命令，返回需要执行的动作列表
    #[wasm_bindgen]
    pub fn dispatch(&mut self, command_json: &str) -> std::result::Result<JsValue, JsValue> {
        let effects = self
            .controller
            .dispatch_json(command_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&effects)
    }

    /// 从当前结果中随机打开一个条目
    #[wasm_bindgen]
    pub fn pick_random(&mut self) -> std::result::Result<JsValue, JsValue> {
        let roll = js_sys::Math::random();
        to_js(&self.controller.dispatch(Command::PickRandom { roll }))
    }

    /// 当前查询状态
    #[wasm_bindgen]
    pub fn query(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.controller.query())
    }

    /// 当前结果数量
    #[wasm_bindgen]
    pub fn filtered_count(&self) -> usize {
        self.controller.filtered_ids().len()
    }

    /// 所有收藏的ID
    #[wasm_bindgen]
    pub fn favorites(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.controller.favorites().all())
    }
}

impl GalleryJS {
    fn finish(&mut self, result: Result<ItemStore>) -> std::result::Result<JsValue, JsValue> {
        if let Err(e) = &result {
            console::log_1(&JsValue::from_str(&format!("加载图库数据失败: {}", e)));
        }
        to_js(&self.controller.finish_load(result))
    }
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}
