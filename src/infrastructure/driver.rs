//! 页面驱动能力 - 基础设施层
//!
//! 核心流程只消费这里的两个 trait，不关心背后是真实浏览器还是内存中的假页面。

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::AppResult;

/// 滚动到页面底部的脚本
pub const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// 页面中的一个元素
///
/// 查找未命中返回 `Ok(None)` / 空列表；`Err` 只表示驱动层面的失败。
#[async_trait]
pub trait DomNode: Send + Sync + Sized {
    /// 在子树中查找第一个匹配的元素
    async fn find(&self, selector: &str) -> AppResult<Option<Self>>;

    /// 在子树中查找所有匹配的元素
    async fn find_all(&self, selector: &str) -> AppResult<Vec<Self>>;

    /// 元素的可见文本
    async fn text(&self) -> AppResult<Option<String>>;

    /// 读取属性（`href` 等 URL 属性返回解析后的绝对地址）
    async fn attribute(&self, name: &str) -> AppResult<Option<String>>;

    /// 是否可见且可用
    async fn is_interactable(&self) -> AppResult<bool>;

    async fn scroll_into_view(&self) -> AppResult<()>;

    async fn click(&self) -> AppResult<()>;
}

/// 页面驱动
///
/// 同一时刻只有一个调用方持有它，所有操作顺序执行。
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Node: DomNode;

    async fn navigate(&self, url: &str) -> AppResult<()>;

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Self::Node>>;

    async fn find(&self, selector: &str) -> AppResult<Option<Self::Node>>;

    /// 轮询等待选择器出现，至少检查一次；超时返回 `ScrapeError::Timeout`
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> AppResult<()>;

    async fn execute_script(&self, js: &str) -> AppResult<JsonValue>;

    async fn scroll_to_bottom(&self) -> AppResult<()> {
        self.execute_script(SCROLL_TO_BOTTOM_JS).await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> AppResult<()>;

    /// 释放浏览器资源；重复调用无副作用
    async fn quit(&self) -> AppResult<()>;
}
