//! 内存中的页面驱动
//!
//! 不需要真实浏览器即可驱动完整的采集流程。选择器按字符串精确匹配：
//! 节点通过 [`FakeNode::with`] 声明“用哪个选择器能找到哪些子节点”，
//! 页面通过快照声明“当前状态下哪个选择器能找到哪些节点”。
//! 每次点击控件或滚动到底部，页面前进到下一个快照；导航回到第一个快照。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{AppResult, ScrapeError};
use crate::infrastructure::driver::{DomNode, PageDriver, SCROLL_TO_BOTTOM_JS};

/// 假元素
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    text: Option<String>,
    attributes: HashMap<String, String>,
    children: HashMap<String, Vec<FakeNode>>,
    hidden: bool,
    broken: bool,
    step: Option<Arc<AtomicUsize>>,
    clicks: Arc<AtomicUsize>,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带文本的元素
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// 带单个属性的元素
    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::default().with_attribute(name, value)
    }

    /// 可点击的按钮
    pub fn button(label: impl Into<String>) -> Self {
        Self::text(label)
    }

    /// 公开搜索页上的标准职位卡片
    pub fn job_card(title: &str, company: &str, location: &str, link: &str, date: &str) -> Self {
        Self::new()
            .with("h3.base-search-card__title", FakeNode::text(title))
            .with("h4.base-search-card__subtitle", FakeNode::text(company))
            .with(".job-search-card__location", FakeNode::text(location))
            .with("a.base-card__full-link", FakeNode::attr("href", link))
            .with("time", FakeNode::attr("datetime", date))
    }

    pub fn with(mut self, selector: impl Into<String>, child: FakeNode) -> Self {
        self.children.entry(selector.into()).or_default().push(child);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// 不可见 / 不可用
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// 任何操作都返回驱动错误
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// 被点击的次数（克隆之间共享）
    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    fn bound(&self, step: &Arc<AtomicUsize>) -> Self {
        let mut node = self.clone();
        node.step = Some(step.clone());
        node
    }

    fn check(&self, selector: &str) -> AppResult<()> {
        if self.broken {
            return Err(ScrapeError::element(selector, "元素已失效"));
        }
        Ok(())
    }
}

#[async_trait]
impl DomNode for FakeNode {
    async fn find(&self, selector: &str) -> AppResult<Option<Self>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Self>> {
        self.check(selector)?;
        Ok(self.children.get(selector).cloned().unwrap_or_default())
    }

    async fn text(&self) -> AppResult<Option<String>> {
        self.check("text")?;
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> AppResult<Option<String>> {
        self.check(name)?;
        Ok(self.attributes.get(name).cloned())
    }

    async fn is_interactable(&self) -> AppResult<bool> {
        self.check("visibility")?;
        Ok(!self.hidden)
    }

    async fn scroll_into_view(&self) -> AppResult<()> {
        self.check("scroll")
    }

    async fn click(&self) -> AppResult<()> {
        self.check("click")?;
        self.clicks.fetch_add(1, Ordering::SeqCst);
        if let Some(step) = &self.step {
            step.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

type Snapshot = HashMap<String, Vec<FakeNode>>;

/// 假页面
#[derive(Debug, Default)]
pub struct FakePage {
    snapshots: Vec<Snapshot>,
    results_ready: bool,
    navigation_fails: bool,
    step: Arc<AtomicUsize>,
    navigations: Mutex<Vec<String>>,
    screenshots: Mutex<Vec<PathBuf>>,
    scrolls: AtomicUsize,
}

impl FakePage {
    /// 空页面：结果列表永远不会出现
    pub fn new() -> Self {
        Self::default()
    }

    /// 结果列表容器存在
    pub fn with_results_list(mut self) -> Self {
        self.results_ready = true;
        self
    }

    /// 导航总是失败
    pub fn with_failing_navigation(mut self) -> Self {
        self.navigation_fails = true;
        self
    }

    /// 追加一个页面状态
    pub fn with_snapshot(mut self, entries: Vec<(&str, Vec<FakeNode>)>) -> Self {
        let snapshot = entries
            .into_iter()
            .map(|(selector, nodes)| (selector.to_string(), nodes))
            .collect();
        self.snapshots.push(snapshot);
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.screenshots.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    fn current(&self) -> Option<&Snapshot> {
        if self.snapshots.is_empty() {
            return None;
        }
        let index = self.step.load(Ordering::SeqCst).min(self.snapshots.len() - 1);
        self.snapshots.get(index)
    }
}

#[async_trait]
impl PageDriver for FakePage {
    type Node = FakeNode;

    async fn navigate(&self, url: &str) -> AppResult<()> {
        if let Ok(mut navigations) = self.navigations.lock() {
            navigations.push(url.to_string());
        }
        if self.navigation_fails {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "net::ERR_FAILED");
            return Err(ScrapeError::navigation(url, io));
        }
        self.step.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<FakeNode>> {
        Ok(self
            .current()
            .and_then(|snapshot| snapshot.get(selector))
            .map(|nodes| nodes.iter().map(|n| n.bound(&self.step)).collect())
            .unwrap_or_default())
    }

    async fn find(&self, selector: &str) -> AppResult<Option<FakeNode>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        if self.results_ready {
            Ok(())
        } else {
            Err(ScrapeError::timeout(selector, timeout))
        }
    }

    async fn execute_script(&self, js: &str) -> AppResult<JsonValue> {
        if js == SCROLL_TO_BOTTOM_JS {
            self.scrolls.fetch_add(1, Ordering::SeqCst);
            self.step.fetch_add(1, Ordering::SeqCst);
        }
        Ok(JsonValue::Null)
    }

    async fn screenshot(&self, path: &Path) -> AppResult<()> {
        if let Ok(mut screenshots) = self.screenshots.lock() {
            screenshots.push(path.to_path_buf());
        }
        Ok(())
    }

    async fn quit(&self) -> AppResult<()> {
        Ok(())
    }
}
