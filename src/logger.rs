//! 日志初始化
//!
//! `RUST_LOG` 优先；未设置时普通模式为 info，详细模式为 debug。

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_level = if verbose {
        "info,job_scraper=debug"
    } else {
        "info,chromiumoxide=warn"
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_target(verbose))
        .try_init();
}
