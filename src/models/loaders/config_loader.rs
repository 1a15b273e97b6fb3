use crate::models::query::SearchConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 JSON 或 TOML 文件加载搜索参数（按扩展名区分）
pub async fn load_search_config(config_path: &Path) -> Result<SearchConfig> {
    let content = fs::read_to_string(config_path)
        .await
        .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

    let config: SearchConfig = match config_path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("无法解析TOML配置: {}", config_path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("无法解析JSON配置: {}", config_path.display()))?,
    };

    if !config.is_usable() {
        anyhow::bail!("配置文件 {} 缺少职位或地点", config_path.display());
    }

    Ok(config)
}

/// 加载搜索参数；文件不存在或无效时回退到默认值
pub async fn load_search_config_or_default(config_path: &Path) -> SearchConfig {
    if !config_path.exists() {
        tracing::info!(
            "配置文件 {} 不存在，使用默认搜索参数",
            config_path.display()
        );
        return SearchConfig::default();
    }

    match load_search_config(config_path).await {
        Ok(config) => {
            tracing::info!("✓ 已加载配置文件: {}", config_path.display());
            config
        }
        Err(e) => {
            tracing::warn!("⚠️ 加载配置文件失败: {:#}，使用默认搜索参数", e);
            SearchConfig::default()
        }
    }
}
