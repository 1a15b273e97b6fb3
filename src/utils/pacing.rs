//! 停顿控制
//!
//! 目标页面没有可用的完成事件，导航、点击、滚动之后只能固定或随机地等一会儿。

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info};

/// 各类停顿时长
#[derive(Clone, Debug, PartialEq)]
pub struct Pacing {
    /// 导航后等待页面渲染
    pub after_navigate: Duration,
    /// 控件滚入视野后等待 UI 稳定
    pub settle: Duration,
    /// 点击“加载更多”后等待新内容
    pub after_click: Duration,
    /// 滚动到底部后等待无限滚动触发
    pub after_scroll: Duration,
    /// 两次搜索之间的随机等待区间（秒）
    pub between_searches_secs: (f64, f64),
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_navigate: Duration::from_secs(5),
            settle: Duration::from_secs(1),
            after_click: Duration::from_secs(4),
            after_scroll: Duration::from_secs(3),
            between_searches_secs: (3.0, 5.0),
        }
    }
}

impl Pacing {
    /// 不做任何停顿
    pub fn none() -> Self {
        Self {
            after_navigate: Duration::ZERO,
            settle: Duration::ZERO,
            after_click: Duration::ZERO,
            after_scroll: Duration::ZERO,
            between_searches_secs: (0.0, 0.0),
        }
    }

    /// 随机取一个搜索间隔
    pub fn search_gap(&self) -> Duration {
        let (low, high) = self.between_searches_secs;
        if high <= low {
            return Duration::from_secs_f64(low.max(0.0));
        }
        Duration::from_secs_f64(rand::thread_rng().gen_range(low..high))
    }

    /// 两次搜索之间的随机停顿
    pub async fn between_searches(&self) {
        let delay = self.search_gap();
        if !delay.is_zero() {
            info!("⏳ 等待 {:.1} 秒后开始下一次搜索...", delay.as_secs_f64());
        }
        pause(delay).await;
    }
}

/// 暂停指定时长；零时长直接返回
pub async fn pause(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    debug!("暂停 {} ms", duration.as_millis());
    sleep(duration).await;
}
