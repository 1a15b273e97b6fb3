//! 翻页控制 - 业务能力层
//!
//! 决定如何显示更多结果：先找“加载更多 / 下一页”控件点击，找不到就滚动到底部。
//!
//! 决策顺序：
//! 1. 按优先级查找可点击的控件（编号分页只接受“下一页”的编号）
//! 2. 找到 → 滚入视野 → 稍等 → 点击 → 等待加载 → `Clicked`
//! 3. 找不到 → 滚动到底部 → 等待 → `Scrolled`
//! 4. 过程中任何错误 → `Exhausted`

use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::infrastructure::{DomNode, PageDriver};
use crate::utils::pacing::{pause, Pacing};

/// 控件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// 任何可见可用的匹配元素
    Generic,
    /// 编号分页按钮，只接受下一页的编号
    Numbered,
}

/// 翻页控件定位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLocator {
    pub selector: &'static str,
    pub kind: ControlKind,
}

pub const NEXT_CONTROLS: &[ControlLocator] = &[
    ControlLocator { selector: "button.infinite-scroller__show-more-button", kind: ControlKind::Generic },
    ControlLocator { selector: "button.see-more-jobs", kind: ControlKind::Generic },
    ControlLocator { selector: "button[aria-label='See more jobs']", kind: ControlKind::Generic },
    ControlLocator { selector: ".artdeco-pagination__button--next", kind: ControlKind::Generic },
    ControlLocator { selector: "li.artdeco-pagination__indicator--number button", kind: ControlKind::Numbered },
];

/// 翻页结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// 点击了控件
    Clicked { selector: &'static str },
    /// 没有控件，滚动到了底部
    Scrolled,
    /// 无法继续翻页
    Exhausted,
}

impl Advance {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Advance::Exhausted)
    }
}

/// 翻页控制器
pub struct PaginationController {
    pacing: Pacing,
}

impl PaginationController {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing }
    }

    /// 尝试显示下一页结果；`page_index` 从 0 开始
    pub async fn advance<D: PageDriver>(&self, page: &D, page_index: usize) -> Advance {
        match self.try_advance(page, page_index).await {
            Ok(advance) => advance,
            Err(e) => {
                warn!("⚠️ 加载更多职位失败，停止翻页: {}", e);
                Advance::Exhausted
            }
        }
    }

    async fn try_advance<D: PageDriver>(&self, page: &D, page_index: usize) -> AppResult<Advance> {
        // 人类可读的下一页编号
        let next_page_number = page_index + 2;

        if let Some((selector, control)) = find_next_control(page, next_page_number).await? {
            info!("➡️ 找到第 {} 页的控件 ({})，点击加载更多", next_page_number, selector);
            control.scroll_into_view().await?;
            pause(self.pacing.settle).await;
            control.click().await?;
            pause(self.pacing.after_click).await;
            return Ok(Advance::Clicked { selector });
        }

        info!("⬇️ 没有找到翻页控件，滚动到底部加载更多");
        page.scroll_to_bottom().await?;
        pause(self.pacing.after_scroll).await;
        Ok(Advance::Scrolled)
    }
}

/// 按优先级查找下一页控件
async fn find_next_control<D: PageDriver>(
    page: &D,
    next_page_number: usize,
) -> AppResult<Option<(&'static str, D::Node)>> {
    for locator in NEXT_CONTROLS {
        for control in page.find_all(locator.selector).await? {
            if !control.is_interactable().await? {
                continue;
            }
            if locator.kind == ControlKind::Numbered
                && !labels_page(&control, next_page_number).await?
            {
                continue;
            }
            debug!("候选控件: {}", locator.selector);
            return Ok(Some((locator.selector, control)));
        }
    }
    Ok(None)
}

async fn labels_page<N: DomNode>(control: &N, page_number: usize) -> AppResult<bool> {
    let label = control.text().await?.unwrap_or_default();
    Ok(label.trim().parse::<usize>().ok() == Some(page_number))
}
