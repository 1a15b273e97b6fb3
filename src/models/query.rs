//! 搜索查询与运行结果

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::job::Job;

/// LinkedIn 公开职位搜索地址
pub const LINKEDIN_SEARCH_URL: &str = "https://www.linkedin.com/jobs/search/";

/// 单次搜索的输入，运行期间不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub title: String,
    pub location: String,
    /// 经验筛选（作为查询参数，不参与结果分组）
    pub experience_level: Option<String>,
}

impl QuerySpec {
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        experience_level: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            experience_level: experience_level.filter(|e| !e.trim().is_empty()),
        }
    }

    /// 构建搜索 URL
    pub fn search_url(&self) -> String {
        let mut params = vec![
            ("keywords", self.title.as_str()),
            ("location", self.location.as_str()),
        ];
        if let Some(experience) = &self.experience_level {
            params.push(("f_E", experience.as_str()));
        }

        match Url::parse_with_params(LINKEDIN_SEARCH_URL, &params) {
            Ok(url) => url.to_string(),
            // 基础地址是常量，这里只是兜底
            Err(_) => LINKEDIN_SEARCH_URL.to_string(),
        }
    }
}

impl Display for QuerySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.experience_level {
            Some(experience) => write!(
                f,
                "[{} @ {} | 经验 {}]",
                self.title, self.location, experience
            ),
            None => write!(f, "[{} @ {}]", self.title, self.location),
        }
    }
}

/// 一个 (职位, 地点) 组合的累积结果
///
/// 同一组合下不同经验筛选的结果追加到同一个 RunResult。
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub title: String,
    pub location: String,
    jobs: Vec<Job>,
}

impl RunResult {
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            jobs: Vec::new(),
        }
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn extend(&mut self, jobs: impl IntoIterator<Item = Job>) {
        self.jobs.extend(jobs);
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// 搜索参数配置文件内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub job_titles: Vec<String>,
    pub locations: Vec<String>,
    #[serde(default)]
    pub experience_levels: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            job_titles: vec!["Software Engineer".to_string()],
            locations: vec!["New York".to_string()],
            experience_levels: vec!["0-1".to_string()],
        }
    }
}

impl SearchConfig {
    /// 命令行参数覆盖配置文件中的列表
    pub fn with_overrides(
        mut self,
        title: Option<String>,
        location: Option<String>,
        experience: Option<String>,
    ) -> Self {
        if let Some(title) = title {
            self.job_titles = vec![title];
        }
        if let Some(location) = location {
            self.locations = vec![location];
        }
        if let Some(experience) = experience {
            self.experience_levels = vec![experience];
        }
        self
    }

    /// 展开为按 (职位, 地点) 分组的查询批次，保持提交顺序
    pub fn batches(&self) -> Vec<QueryBatch> {
        let levels: Vec<Option<String>> = if self.experience_levels.is_empty() {
            vec![None]
        } else {
            self.experience_levels.iter().cloned().map(Some).collect()
        };

        let mut batches = Vec::new();
        for title in &self.job_titles {
            for location in &self.locations {
                let queries = levels
                    .iter()
                    .map(|level| QuerySpec::new(title.clone(), location.clone(), level.clone()))
                    .collect();
                batches.push(QueryBatch {
                    title: title.clone(),
                    location: location.clone(),
                    queries,
                });
            }
        }
        batches
    }

    /// 配置是否可用
    pub fn is_usable(&self) -> bool {
        !self.job_titles.is_empty() && !self.locations.is_empty()
    }
}

/// 共享同一个 RunResult 的一组查询
#[derive(Debug, Clone)]
pub struct QueryBatch {
    pub title: String,
    pub location: String,
    pub queries: Vec<QuerySpec>,
}
