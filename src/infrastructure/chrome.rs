//! chromiumoxide 实现的页面驱动 - 基础设施层
//!
//! 持有唯一的 Page 资源（以及自己启动的 Browser），只暴露页面驱动能力

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, Page};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::error::{AppResult, ScrapeError};
use crate::infrastructure::driver::{DomNode, PageDriver};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 判断元素是否可见、可用
const INTERACTABLE_JS: &str = r#"
function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return !this.disabled
        && rect.width > 0
        && rect.height > 0
        && style.visibility !== 'hidden'
        && style.display !== 'none';
}
"#;

/// 基于 Chromium 的页面驱动
pub struct ChromeDriver {
    browser: Mutex<Option<Browser>>,
    page: Page,
    /// 浏览器是否由本进程启动（连接到外部浏览器时只关闭页面）
    owns_browser: bool,
}

impl ChromeDriver {
    pub fn new(browser: Browser, page: Page, owns_browser: bool) -> Self {
        Self {
            browser: Mutex::new(Some(browser)),
            page,
            owns_browser,
        }
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    type Node = ChromeNode;

    async fn navigate(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<ChromeNode>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| ScrapeError::element(selector, e))?;
        Ok(elements.into_iter().map(ChromeNode::new).collect())
    }

    async fn find(&self, selector: &str) -> AppResult<Option<ChromeNode>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.page.find_elements(selector).await {
                Ok(found) if !found.is_empty() => return Ok(()),
                Ok(_) => {}
                Err(e) => debug!("等待 {} 时查找失败: {}", selector, e),
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::timeout(selector, timeout));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn execute_script(&self, js: &str) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js).await?;
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    async fn screenshot(&self, path: &Path) -> AppResult<()> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }

    async fn quit(&self) -> AppResult<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        if self.owns_browser {
            browser
                .close()
                .await
                .map_err(|e| ScrapeError::browser("关闭浏览器失败", e))?;
            if let Err(e) = browser.wait().await {
                warn!("等待浏览器进程退出失败: {}", e);
            }
            info!("✓ 浏览器已关闭");
        } else {
            self.page
                .clone()
                .close()
                .await
                .map_err(|e| ScrapeError::browser("关闭页面失败", e))?;
            info!("✓ 页面已关闭（外部浏览器保持运行）");
        }
        Ok(())
    }
}

/// Chromium 页面中的元素
pub struct ChromeNode {
    element: Element,
}

impl ChromeNode {
    fn new(element: Element) -> Self {
        Self { element }
    }
}

#[async_trait]
impl DomNode for ChromeNode {
    async fn find(&self, selector: &str) -> AppResult<Option<Self>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> AppResult<Vec<Self>> {
        let elements = self
            .element
            .find_elements(selector)
            .await
            .map_err(|e| ScrapeError::element(selector, e))?;
        Ok(elements.into_iter().map(ChromeNode::new).collect())
    }

    async fn text(&self) -> AppResult<Option<String>> {
        Ok(self.element.inner_text().await?)
    }

    async fn attribute(&self, name: &str) -> AppResult<Option<String>> {
        // 与 DOM 属性一致：href 取解析后的绝对地址
        if let Some(JsonValue::String(value)) = self.element.property(name).await? {
            return Ok(Some(value));
        }
        Ok(self.element.attribute(name).await?)
    }

    async fn is_interactable(&self) -> AppResult<bool> {
        let returns = self.element.call_js_fn(INTERACTABLE_JS, false).await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn scroll_into_view(&self) -> AppResult<()> {
        self.element.scroll_into_view().await?;
        Ok(())
    }

    async fn click(&self) -> AppResult<()> {
        self.element.click().await?;
        Ok(())
    }
}
