use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppResult, ScrapeError};

/// 启动参数：关闭与抓取无关、又容易在容器里报错的浏览器特性
const LAUNCH_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-software-rasterizer",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-notifications",
    "--disable-infobars",
    "--mute-audio",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-blink-features=AutomationControlled",
];

/// 启动新的浏览器（默认无头）并打开空白页面
pub async fn launch_headless_browser(config: &Config) -> AppResult<(Browser, Page)> {
    info!("🚀 启动浏览器 (无头模式: {})...", config.headless);

    let mut builder = BrowserConfig::builder()
        .window_size(1920, 1080)
        .args(LAUNCH_ARGS.to_vec());
    if config.headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    if let Some(executable) = &config.chrome_executable {
        debug!("使用浏览器可执行文件: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        ScrapeError::Browser {
            message: format!("配置浏览器失败: {}", e),
            source: None,
        }
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        ScrapeError::browser("启动浏览器失败", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        ScrapeError::browser("创建页面失败", e)
    })?;

    info!("✅ 浏览器已就绪");
    Ok((browser, page))
}
