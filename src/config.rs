use std::time::Duration;

use crate::error::{AppResult, ScrapeError};
use crate::utils::pacing::Pacing;

/// 程序运行配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 已运行浏览器的调试端口；设置后连接该浏览器而不是启动新的无头浏览器
    pub browser_debug_port: Option<u16>,
    /// Chrome / Chromium 可执行文件路径（为空时由 chromiumoxide 自动探测）
    pub chrome_executable: Option<String>,
    /// 是否以无头模式启动
    pub headless: bool,
    /// 结果输出目录
    pub output_dir: String,
    /// 每次查询最多翻页数
    pub page_cap: usize,
    /// 每次查询最多采集的职位数
    pub job_cap: usize,
    /// 每次查询的最大尝试次数
    pub max_retries: usize,
    /// 两次尝试之间的固定等待
    pub retry_delay: Duration,
    /// 等待结果列表出现的超时
    pub results_timeout: Duration,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 各类停顿时长
    pub pacing: Pacing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            output_dir: "output".to_string(),
            page_cap: 5,
            job_cap: 100,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            results_timeout: Duration::from_secs(15),
            verbose_logging: false,
            pacing: Pacing::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.trim().is_empty()),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            page_cap: std::env::var("PAGE_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_cap),
            job_cap: std::env::var("JOB_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(default.job_cap),
            max_retries: std::env::var("MAX_RETRIES").ok().and_then(|v| v.parse().ok()).filter(|n: &usize| *n > 0).unwrap_or(default.max_retries),
            retry_delay: std::env::var("RETRY_DELAY_SECS").ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default.retry_delay),
            results_timeout: std::env::var("RESULTS_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).map(Duration::from_secs).unwrap_or(default.results_timeout),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            pacing: default.pacing,
        }
    }

    /// 测试用配置：所有停顿为零，重试之间不等待
    pub fn instant() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            results_timeout: Duration::ZERO,
            pacing: Pacing::none(),
            ..Self::default()
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AppResult<()> {
        if self.page_cap == 0 {
            return Err(ScrapeError::Config("PAGE_CAP 必须大于 0".to_string()));
        }
        if self.job_cap == 0 {
            return Err(ScrapeError::Config("JOB_CAP 必须大于 0".to_string()));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ScrapeError::Config("OUTPUT_DIR 不能为空".to_string()));
        }
        Ok(())
    }
}
