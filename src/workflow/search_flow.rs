//! 单次查询流程 - 流程层
//!
//! 核心职责：定义"一次搜索"的完整处理流程
//!
//! 状态：`Idle → Searching → (Success | Retrying | Failed)`
//! 1. Searching：导航 → 等待结果列表 → 逐页 采集 ⇄ 翻页
//! 2. 本次尝试零结果 → Retrying → 固定等待后重新 Searching
//! 3. 尝试次数用尽 → Failed（记录日志，批次继续）
//!
//! 单张卡片、单个字段的失败不会重试，只会降级为哨兵值。

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::query::{QuerySpec, RunResult};
use crate::services::page_collector::{collect, PageCollection};
use crate::services::pagination::PaginationController;
use crate::utils::pacing::{pause, Pacing};
use crate::workflow::search_ctx::SearchCtx;

/// 结果列表容器
pub const RESULTS_LIST_SELECTOR: &str = ".jobs-search__results-list, .job-search-resultsList";

/// 结果列表没有出现时保存的截图文件名
pub const DEBUG_SCREENSHOT: &str = "linkedin_debug.png";

/// 查询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching { attempt: usize },
    Retrying { attempt: usize },
    Success,
    Failed,
}

impl Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchState::Idle => write!(f, "空闲"),
            SearchState::Searching { attempt } => write!(f, "搜索中 (第 {} 次尝试)", attempt),
            SearchState::Retrying { attempt } => write!(f, "等待重试 (第 {} 次尝试无结果)", attempt),
            SearchState::Success => write!(f, "成功"),
            SearchState::Failed => write!(f, "失败"),
        }
    }
}

/// 单次尝试的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 正常结束（可能为零条）
    Collected { jobs: usize, pages: usize },
    /// 导航失败
    NavigationFailed,
    /// 结果列表没有在超时内出现
    NoResultsList,
    /// 第一页就没有任何卡片（被拦截或搜索无结果）
    NoCardsOnFirstPage,
}

impl AttemptOutcome {
    /// 没有结果时的原因，用于重试日志
    pub fn reason(&self) -> &'static str {
        match self {
            AttemptOutcome::Collected { .. } => "页面上没有可用的职位",
            AttemptOutcome::NavigationFailed => "打开搜索页失败",
            AttemptOutcome::NoResultsList => "结果列表没有出现",
            AttemptOutcome::NoCardsOnFirstPage => "第一页没有职位卡片",
        }
    }
}

/// 一次查询的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Success { jobs: usize, attempts: usize },
    Failed { attempts: usize },
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success { .. })
    }
}

/// 单次查询流程
///
/// - 不持有页面资源，只借用
/// - 结果逐页追加到调用方的 RunResult，中断时已解析的页面不会丢失
pub struct SearchFlow {
    page_cap: usize,
    job_cap: usize,
    max_retries: usize,
    retry_delay: Duration,
    results_timeout: Duration,
    pacing: Pacing,
    debug_dir: PathBuf,
    pagination: PaginationController,
}

impl SearchFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            page_cap: config.page_cap,
            job_cap: config.job_cap,
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay,
            results_timeout: config.results_timeout,
            pacing: config.pacing.clone(),
            debug_dir: PathBuf::from(&config.output_dir),
            pagination: PaginationController::new(config.pacing.clone()),
        }
    }

    /// 执行一次查询（含重试）
    pub async fn run<D: PageDriver>(
        &self,
        page: &D,
        query: &QuerySpec,
        ctx: &SearchCtx,
        run: &mut RunResult,
    ) -> QueryOutcome {
        let mut state = SearchState::Idle;

        for attempt in 1..=self.max_retries {
            transition(ctx, &mut state, SearchState::Searching { attempt });
            if attempt > 1 {
                info!("{} 🔁 第 {}/{} 次重试...", ctx, attempt - 1, self.max_retries - 1);
            }

            let outcome = self.attempt(page, query, ctx, run).await;
            debug!("{} 第 {} 次尝试结束: {:?}", ctx, attempt, outcome);

            if let AttemptOutcome::Collected { jobs, pages } = outcome {
                if jobs > 0 {
                    transition(ctx, &mut state, SearchState::Success);
                    info!("{} ✅ 成功采集 {} 个职位 (共 {} 页)", ctx, jobs, pages);
                    return QueryOutcome::Success {
                        jobs,
                        attempts: attempt,
                    };
                }
            }

            if attempt < self.max_retries {
                transition(ctx, &mut state, SearchState::Retrying { attempt });
                info!(
                    "{} {}，{} 秒后重试",
                    ctx,
                    outcome.reason(),
                    self.retry_delay.as_secs()
                );
                pause(self.retry_delay).await;
            } else {
                warn!("{} 最后一次尝试: {}", ctx, outcome.reason());
            }
        }

        transition(ctx, &mut state, SearchState::Failed);
        error!(
            "{} ❌ {} 次尝试后仍未采集到职位: {}",
            ctx, self.max_retries, query
        );
        QueryOutcome::Failed {
            attempts: self.max_retries,
        }
    }

    /// 单次尝试：导航、等待、逐页采集
    async fn attempt<D: PageDriver>(
        &self,
        page: &D,
        query: &QuerySpec,
        ctx: &SearchCtx,
        run: &mut RunResult,
    ) -> AttemptOutcome {
        let url = query.search_url();
        info!("{} 🌐 打开搜索页: {}", ctx, url);
        if let Err(e) = page.navigate(&url).await {
            warn!("{} ⚠️ {}", ctx, e);
            return AttemptOutcome::NavigationFailed;
        }
        pause(self.pacing.after_navigate).await;

        if let Err(e) = page
            .wait_for_selector(RESULTS_LIST_SELECTOR, self.results_timeout)
            .await
        {
            warn!(
                "{} ⚠️ 没有找到职位结果列表，页面可能已改版或访问被拦截: {}",
                ctx, e
            );
            self.save_debug_screenshot(page, ctx).await;
            return AttemptOutcome::NoResultsList;
        }

        // 累计已处理的卡片数（包括被丢弃的卡片），也是下一页的起始偏移
        let mut processed = 0;
        let mut jobs = 0;
        let mut pages = 0;

        for page_index in 0..self.page_cap {
            if processed >= self.job_cap {
                break;
            }

            match collect(page, processed, self.job_cap).await {
                PageCollection::NoCards if page_index == 0 => {
                    warn!("{} ⚠️ 第一页没有任何职位卡片，所有选择器均未命中", ctx);
                    return AttemptOutcome::NoCardsOnFirstPage;
                }
                PageCollection::NoCards => {
                    info!("{} 第 {} 页没有更多职位卡片，停止翻页", ctx, page_index + 1);
                    break;
                }
                PageCollection::Collected(collected) => {
                    pages += 1;
                    processed += collected.processed;
                    jobs += collected.jobs.len();
                    info!(
                        "{} 第 {} 页: 新增 {} 个职位 (累计 {})",
                        ctx,
                        page_index + 1,
                        collected.jobs.len(),
                        jobs
                    );
                    run.extend(collected.jobs);
                }
            }

            if processed >= self.job_cap {
                info!("{} 已达到职位上限 {}，停止翻页", ctx, self.job_cap);
                break;
            }

            if page_index + 1 < self.page_cap
                && self.pagination.advance(page, page_index).await.is_exhausted()
            {
                break;
            }
        }

        AttemptOutcome::Collected { jobs, pages }
    }

    /// 保存调试截图，失败只记录日志
    async fn save_debug_screenshot<D: PageDriver>(&self, page: &D, ctx: &SearchCtx) {
        if let Err(e) = tokio::fs::create_dir_all(&self.debug_dir).await {
            warn!("{} 无法创建截图目录: {}", ctx, e);
            return;
        }
        let path = self.debug_dir.join(DEBUG_SCREENSHOT);
        match page.screenshot(&path).await {
            Ok(()) => info!("{} 📸 调试截图已保存: {}", ctx, path.display()),
            Err(e) => warn!("{} 保存调试截图失败: {}", ctx, e),
        }
    }
}

fn transition(ctx: &SearchCtx, state: &mut SearchState, next: SearchState) {
    debug!("{} 状态: {} → {}", ctx, state, next);
    *state = next;
}
