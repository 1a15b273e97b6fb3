//! 日志工具模块
//!
//! 启动横幅、单次搜索开始与最终统计的格式化输出

use tracing::info;

use crate::config::Config;
use crate::models::query::QuerySpec;
use crate::workflow::search_ctx::SearchCtx;

/// 记录程序启动信息
pub fn log_startup(config: &Config, total_searches: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - LinkedIn 职位采集");
    info!("🔎 计划执行 {} 次搜索", total_searches);
    info!(
        "📊 每次搜索最多 {} 页 / {} 个职位，最多尝试 {} 次",
        config.page_cap, config.job_cap, config.max_retries
    );
    info!("📁 输出目录: {}", config.output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录单次搜索开始
pub fn log_search_start(ctx: &SearchCtx, query: &QuerySpec) {
    info!("\n{}", "─".repeat(60));
    info!("{} 🔍 开始搜索 {}", ctx, query);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 有结果的搜索数
/// - `failed`: 重试用尽仍无结果的搜索数
/// - `total`: 计划的搜索总数
/// - `jobs`: 写入文件的职位总数
pub fn print_final_stats(success: usize, failed: usize, total: usize, jobs: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部搜索完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("💼 保存职位: {}", jobs);
    info!("{}", "=".repeat(60));
}
