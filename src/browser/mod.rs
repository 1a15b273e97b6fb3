pub mod connection;
pub mod headless;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ChromeDriver;

/// 按配置获得页面驱动：设置了调试端口则连接外部浏览器，否则启动新的浏览器
pub async fn open_driver(config: &Config) -> AppResult<ChromeDriver> {
    match config.browser_debug_port {
        Some(port) => {
            let (browser, page) = connect_to_browser_and_page(port).await?;
            Ok(ChromeDriver::new(browser, page, false))
        }
        None => {
            let (browser, page) = launch_headless_browser(config).await?;
            Ok(ChromeDriver::new(browser, page, true))
        }
    }
}
