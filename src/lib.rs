//! # Job Scraper
//!
//! 用无头浏览器采集 LinkedIn 公开职位搜索结果，并保存为 JSON 数据集
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 页面驱动抽象，只暴露能力
//! - `PageDriver` / `DomNode` - 导航、查找元素、执行脚本、截图
//! - `ChromeDriver` - 基于 chromiumoxide 的实现；`testing::FakePage` 为内存实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `field_extractor` - 按定位器列表提取字段，首个可用值胜出
//! - `card_parser` - 一张卡片 → 一条 `Job`
//! - `page_collector` - 在当前页面状态下按预算采集卡片
//! - `pagination` - 点击"加载更多"或滚动到底部
//! - `result_store` - 过滤、去重、排序、写入数据集
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次搜索"的完整处理流程
//! - `SearchCtx` - 上下文封装（搜索序号）
//! - `SearchFlow` - 导航 → 等待 → 采集 ⇄ 翻页，带重试
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批量执行、中断处理、结果保存
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::open_driver;
pub use config::Config;
pub use error::{AppResult, PersistError, ScrapeError};
pub use infrastructure::{ChromeDriver, DomNode, PageDriver};
pub use models::{Job, QuerySpec, RunResult, SearchConfig};
pub use orchestrator::{App, BatchRunner, BatchSummary, RunStatus};
pub use services::ResultStore;
pub use workflow::{QueryOutcome, SearchCtx, SearchFlow};
