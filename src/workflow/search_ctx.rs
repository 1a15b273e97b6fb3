//! 搜索上下文
//!
//! 封装"我正在执行批次中的第几次搜索"这一信息，仅用于日志

use std::fmt::Display;

/// 搜索上下文
#[derive(Debug, Clone, Copy)]
pub struct SearchCtx {
    /// 搜索序号（从1开始）
    pub index: usize,
    /// 本次运行的搜索总数
    pub total: usize,
}

impl SearchCtx {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// 是否为最后一次搜索
    pub fn is_last(&self) -> bool {
        self.index >= self.total
    }
}

impl Display for SearchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[搜索 {}/{}]", self.index, self.total)
    }
}
