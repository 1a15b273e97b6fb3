//! 批量搜索执行器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：按配置启动或连接浏览器，得到唯一的页面驱动
//! 2. **顺序执行**：按提交顺序逐个执行查询，同一 (职位, 地点) 的查询共享一个 RunResult
//! 3. **保存结果**：每个 (职位, 地点) 完成后写一个数据集文件
//! 4. **中断处理**：Ctrl-C 时保存当前 RunResult，关闭浏览器
//! 5. **全局统计**：汇总成功 / 失败 / 保存的职位数
//!
//! 单次查询的细节全部委托给 `workflow::SearchFlow`。

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{ChromeDriver, PageDriver};
use crate::models::query::{QueryBatch, RunResult, SearchConfig};
use crate::services::result_store::ResultStore;
use crate::utils::logging::{log_search_start, log_startup, print_final_stats};
use crate::utils::pacing::Pacing;
use crate::workflow::{QueryOutcome, SearchCtx, SearchFlow};

/// 运行结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Interrupted,
}

/// 批量运行统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub status: RunStatus,
    /// 计划的搜索总数
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// 写入文件的职位总数（过滤去重之后）
    pub jobs_saved: usize,
    pub saved_files: Vec<PathBuf>,
}

impl BatchSummary {
    fn new(total: usize) -> Self {
        Self {
            status: RunStatus::Completed,
            total,
            success: 0,
            failed: 0,
            jobs_saved: 0,
            saved_files: Vec::new(),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.status == RunStatus::Interrupted
    }
}

/// 批量执行器，不持有浏览器资源
pub struct BatchRunner {
    flow: SearchFlow,
    store: ResultStore,
    pacing: Pacing,
}

impl BatchRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            flow: SearchFlow::new(config),
            store: ResultStore::new(&config.output_dir),
            pacing: config.pacing.clone(),
        }
    }

    /// 按顺序执行所有批次
    ///
    /// `interrupt` 完成即视为用户中断：保存当前 RunResult 后立即返回。
    pub async fn run<D, F>(&self, page: &D, batches: &[QueryBatch], interrupt: F) -> BatchSummary
    where
        D: PageDriver,
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        let total = batches.iter().map(|b| b.queries.len()).sum();
        let mut summary = BatchSummary::new(total);
        let mut index = 0;

        for batch in batches {
            let mut run = RunResult::new(&batch.title, &batch.location);

            for query in &batch.queries {
                index += 1;
                let ctx = SearchCtx::new(index, total);
                log_search_start(&ctx, query);

                // 中断优先
                let step = tokio::select! {
                    biased;
                    _ = &mut interrupt => None,
                    outcome = self.flow.run(page, query, &ctx, &mut run) => Some(outcome),
                };

                match step {
                    Some(QueryOutcome::Success { .. }) => summary.success += 1,
                    Some(QueryOutcome::Failed { .. }) => summary.failed += 1,
                    None => {
                        warn!("{} ⛔ 搜索被用户中断，正在保存已采集的结果...", ctx);
                        return self.finish_interrupted(&run, summary).await;
                    }
                }

                if !ctx.is_last() {
                    let interrupted = tokio::select! {
                        biased;
                        _ = &mut interrupt => true,
                        _ = self.pacing.between_searches() => false,
                    };
                    if interrupted {
                        warn!("⛔ 等待下一次搜索时被用户中断，正在保存已采集的结果...");
                        return self.finish_interrupted(&run, summary).await;
                    }
                }
            }

            self.save(&run, &mut summary).await;
        }

        summary
    }

    async fn finish_interrupted(&self, run: &RunResult, mut summary: BatchSummary) -> BatchSummary {
        summary.status = RunStatus::Interrupted;
        self.save(run, &mut summary).await;
        summary
    }

    /// 保存一个 RunResult，失败只记录日志
    async fn save(&self, run: &RunResult, summary: &mut BatchSummary) {
        match self.store.persist(run, Local::now()).await {
            Ok(path) => {
                summary.jobs_saved += ResultStore::prepare(run.jobs()).len();
                summary.saved_files.push(path);
            }
            Err(e) => error!("❌ 保存 {} @ {} 的结果失败: {}", run.title, run.location, e),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    driver: ChromeDriver,
}

impl App {
    /// 初始化应用：检查配置并打开浏览器
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        let driver = browser::open_driver(&config).await?;
        info!("✓ 浏览器已就绪");
        Ok(Self { config, driver })
    }

    /// 运行所有搜索，Ctrl-C 视为中断
    pub async fn run(&self, search: &SearchConfig) -> BatchSummary {
        let batches = search.batches();
        let total = batches.iter().map(|b| b.queries.len()).sum();
        log_startup(&self.config, total);
        info!("职位: {}", search.job_titles.join(", "));
        info!("地点: {}", search.locations.join(", "));
        info!("经验: {}", search.experience_levels.join(", "));

        let runner = BatchRunner::new(&self.config);
        let summary = runner.run(&self.driver, &batches, ctrl_c()).await;

        print_final_stats(summary.success, summary.failed, summary.total, summary.jobs_saved);
        for file in &summary.saved_files {
            info!("📄 {}", file.display());
        }
        summary
    }

    /// 关闭浏览器
    pub async fn shutdown(&self) {
        info!("正在关闭浏览器...");
        if let Err(e) = self.driver.quit().await {
            warn!("关闭浏览器时出错: {}", e);
        }
    }
}

/// 等待 Ctrl-C；无法注册信号时永不完成
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
