//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量搜索和资源管理，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_runner (处理 Vec<QueryBatch>，持有浏览器)
//!     ↓
//! workflow::SearchFlow (处理单个 QuerySpec)
//!     ↓
//! services (能力层：page_collector / pagination / card_parser / result_store)
//!     ↓
//! infrastructure (基础设施：PageDriver / DomNode)
//! ```
//!
//! 只有编排层持有浏览器；下层只借用 `PageDriver`。

pub mod batch_runner;

pub use batch_runner::{App, BatchRunner, BatchSummary, RunStatus};
