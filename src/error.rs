use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
///
/// 只有 `Browser` 属于致命错误；其余错误都由所在组件就地降级
/// （哨兵值、减少结果或显式失败信号），不会跨组件向上传播。
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 浏览器启动 / 连接失败
    #[error("浏览器错误: {message}")]
    Browser {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    Navigation {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 等待页面状态超时
    #[error("等待选择器 {selector} 超时 ({timeout_secs} 秒)")]
    Timeout { selector: String, timeout_secs: u64 },

    /// 元素查找 / 交互失败
    #[error("元素操作失败 ({selector}): {message}")]
    Element { selector: String, message: String },

    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    Script(String),

    /// 结果写入失败
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

/// 结果落盘失败
///
/// 由 `ResultStore::persist` 返回，调用方据此得知保存失败，批处理继续。
#[derive(Debug, Error)]
pub enum PersistError {
    /// 创建输出目录失败
    #[error("无法创建输出目录 {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("序列化结果失败: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 文件名清洗规则无效
    #[error("文件名清洗规则无效: {0}")]
    FileName(#[from] regex::Error),

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Script(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl ScrapeError {
    /// 创建浏览器错误
    pub fn browser(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ScrapeError::Browser {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// 创建导航错误
    pub fn navigation(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ScrapeError::Navigation {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// 创建元素操作错误
    pub fn element(selector: impl Into<String>, message: impl ToString) -> Self {
        ScrapeError::Element {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// 创建等待超时错误
    pub fn timeout(selector: impl Into<String>, timeout: std::time::Duration) -> Self {
        ScrapeError::Timeout {
            selector: selector.into(),
            timeout_secs: timeout.as_secs(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, ScrapeError>;
