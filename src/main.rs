use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use job_scraper::models::load_search_config_or_default;
use job_scraper::{logger, App, Config, ResultStore};

/// LinkedIn 职位采集
#[derive(Parser, Debug)]
#[command(name = "job_scraper", version, about = "采集 LinkedIn 公开职位搜索结果")]
struct Args {
    /// 职位名称，覆盖配置文件中的列表
    #[arg(short, long)]
    title: Option<String>,

    /// 地点，覆盖配置文件中的列表
    #[arg(short, long)]
    location: Option<String>,

    /// 经验筛选，覆盖配置文件中的列表
    #[arg(short, long)]
    experience: Option<String>,

    /// 输出详细日志
    #[arg(short, long)]
    debug: bool,

    /// 搜索参数配置文件（.json 或 .toml）
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 列出已保存的数据集后退出
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init(args.debug || config.verbose_logging);

    match run(args, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args, config: Config) -> Result<ExitCode> {
    if args.list {
        list_datasets(&config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let search = load_search_config_or_default(&args.config)
        .await
        .with_overrides(args.title, args.location, args.experience);

    let app = App::initialize(config).await?;
    let summary = app.run(&search).await;
    app.shutdown().await;

    if summary.is_interrupted() {
        info!("已保存部分结果，程序退出");
        return Ok(ExitCode::from(130));
    }
    info!("完成！");
    Ok(ExitCode::SUCCESS)
}

async fn list_datasets(config: &Config) -> Result<()> {
    let store = ResultStore::new(&config.output_dir);
    let datasets = store.list_datasets().await?;
    if datasets.is_empty() {
        info!("📁 {} 中没有已保存的数据集", store.output_dir().display());
        return Ok(());
    }

    info!("📁 已保存的数据集 ({} 个):", datasets.len());
    for dataset in datasets {
        match dataset.job_count {
            Some(count) => info!("  {} ({} 个职位)", dataset.file_name, count),
            None => info!("  {} (无法解析)", dataset.file_name),
        }
    }
    Ok(())
}
