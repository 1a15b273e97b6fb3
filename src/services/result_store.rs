//! 结果存储服务 - 业务能力层
//!
//! 过滤、去重、排序后把一个 RunResult 写成带时间戳的 JSON 文件

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::PersistError;
use crate::models::job::Job;
use crate::models::query::RunResult;

const TITLE_SLUG_LEN: usize = 20;
const LOCATION_SLUG_LEN: usize = 15;

/// 已保存的数据集
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub file_name: String,
    pub path: PathBuf,
    /// 无法解析时为 `None`
    pub job_count: Option<usize>,
}

/// 结果存储服务
pub struct ResultStore {
    output_dir: PathBuf,
}

impl ResultStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 规整空白 → 丢弃不完整记录 → 按链接去重（保留首次出现）→ 排序
    ///
    /// 排序按 (source, date_posted) 降序做字符串比较；日期格式不统一，
    /// 哨兵文本也参与比较，所以这不是严格的时间顺序。
    pub fn prepare(jobs: &[Job]) -> Vec<Job> {
        let mut complete = Vec::with_capacity(jobs.len());
        for job in jobs {
            let mut job = job.clone();
            job.normalize_whitespace();
            if job.is_complete() {
                complete.push(job);
            } else {
                debug!(
                    "跳过不完整记录: 标题 '{}' 公司 '{}'",
                    job.title, job.company
                );
            }
        }
        let dropped = jobs.len() - complete.len();
        if dropped > 0 {
            info!("🧹 过滤掉 {} 条缺少标题或公司的记录", dropped);
        }

        let mut seen_links = HashSet::new();
        let before_dedup = complete.len();
        let mut unique: Vec<Job> = complete
            .into_iter()
            .filter(|job| seen_links.insert(job.link.clone()))
            .collect();
        if unique.len() < before_dedup {
            info!("🧹 移除 {} 条重复记录", before_dedup - unique.len());
        }

        unique.sort_by(|a, b| {
            b.source
                .cmp(&a.source)
                .then_with(|| b.date_posted.cmp(&a.date_posted))
        });
        unique
    }

    /// 渲染为 4 空格缩进的 JSON 数组
    pub fn render(jobs: &[Job]) -> Result<String, PersistError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        jobs.serialize(&mut serializer)?;
        // serde_json 只输出合法 UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// 数据集文件路径：`<职位>_<地点>_<日期>_<时间>.json`
    pub fn dataset_path(
        &self,
        title: &str,
        locations: &[String],
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf, PersistError> {
        let title_slug = slugify(title, TITLE_SLUG_LEN)?;
        let location_slug = match locations {
            [single] => slugify(single, LOCATION_SLUG_LEN)?,
            _ => "multiple_locations".to_string(),
        };
        let file_name = format!(
            "{}_{}_{}_{}.json",
            title_slug,
            location_slug,
            timestamp.format("%b%d_%Y"),
            timestamp.format("%H%M")
        );
        Ok(self.output_dir.join(file_name))
    }

    /// 保存一个 RunResult，返回文件路径
    pub async fn persist(
        &self,
        run: &RunResult,
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf, PersistError> {
        let path = self.dataset_path(&run.title, &[run.location.clone()], timestamp)?;
        self.write_jobs(run.jobs(), &path).await
    }

    /// 准备并写入一组职位到指定路径
    pub async fn write_jobs(&self, jobs: &[Job], path: &Path) -> Result<PathBuf, PersistError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let prepared = Self::prepare(jobs);
        let content = Self::render(&prepared)?;

        info!("💾 正在保存结果到: {}", path.display());
        fs::write(path, content)
            .await
            .map_err(|source| PersistError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        info!("✓ 已保存 {} 条职位到 {}", prepared.len(), path.display());
        Ok(path.to_path_buf())
    }

    /// 列出已保存的数据集，最新的在前
    pub async fn list_datasets(&self) -> std::io::Result<Vec<DatasetSummary>> {
        if !self.output_dir.exists() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        let mut entries = fs::read_dir(&self.output_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let modified = entry.metadata().await.and_then(|m| m.modified()).ok();
            let job_count = match fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str::<Vec<Job>>(&content).ok().map(|j| j.len()),
                Err(e) => {
                    warn!("读取数据集失败 {}: {}", path.display(), e);
                    None
                }
            };
            let file_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            found.push((
                modified,
                DatasetSummary {
                    file_name,
                    path,
                    job_count,
                },
            ));
        }

        found.sort_by(|(a_time, a), (b_time, b)| {
            b_time.cmp(a_time).then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(found.into_iter().map(|(_, summary)| summary).collect())
    }
}

/// 小写、空格换下划线、去掉文件名中的非法字符，并截断长度
fn slugify(value: &str, max_len: usize) -> Result<String, regex::Error> {
    let unsafe_chars = Regex::new(r#"[\\/:*?"<>|]"#)?;
    let lowered = value.trim().to_lowercase().replace(' ', "_");
    let cleaned = unsafe_chars.replace_all(&lowered, "");
    Ok(cleaned.chars().take(max_len).collect())
}
