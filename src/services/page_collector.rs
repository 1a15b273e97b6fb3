//! 页面采集 - 业务能力层
//!
//! 在当前页面状态下找到职位卡片，按预算切片后逐张解析

use std::ops::Range;

use tracing::{debug, info, warn};

use crate::infrastructure::PageDriver;
use crate::models::job::Job;
use crate::services::card_parser::{parse_card, CardOutcome};

/// 卡片容器选择器，顺序即优先级，第一个有命中的选择器胜出
pub const CARD_SELECTORS: &[&str] = &[
    ".jobs-search__results-list li",
    ".job-search-card",
    "li.jobs-search-results__list-item",
    ".jobs-search-results__list-item",
    ".job-card-container",
];

/// 一次采集的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCollection {
    /// 所有选择器都没有命中
    NoCards,
    Collected(CollectedPage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedPage {
    /// 命中的选择器
    pub selector: &'static str,
    /// 页面上的卡片总数（包含之前已处理的）
    pub discovered: usize,
    /// 本次实际解析的卡片数
    pub processed: usize,
    /// 被丢弃的卡片数
    pub rejected: usize,
    pub jobs: Vec<Job>,
}

/// 本次应处理的卡片下标区间
///
/// 之前已采集的卡片跳过，剩余预算之外的卡片也不处理，
/// 保证一次查询累计处理的卡片不超过 `job_cap`。
pub fn budget_window(discovered: usize, already_collected: usize, job_cap: usize) -> Range<usize> {
    let start = already_collected.min(discovered);
    let remaining = job_cap.saturating_sub(already_collected);
    let end = start + remaining.min(discovered - start);
    start..end
}

/// 采集当前页面上的新职位
pub async fn collect<D: PageDriver>(
    page: &D,
    already_collected: usize,
    job_cap: usize,
) -> PageCollection {
    let Some((selector, cards)) = discover_cards(page).await else {
        return PageCollection::NoCards;
    };

    let discovered = cards.len();
    let window = budget_window(discovered, already_collected, job_cap);
    let remaining = job_cap.saturating_sub(already_collected);
    if discovered - window.start > remaining {
        info!("📏 限制为再处理 {} 个职位，以免超过上限 {}", remaining, job_cap);
    }
    info!("📄 本页找到 {} 张卡片，处理其中 {} 张新卡片", discovered, window.len());

    let mut jobs = Vec::with_capacity(window.len());
    let mut rejected = 0;
    for (index, card) in cards[window.clone()].iter().enumerate() {
        match parse_card(card).await {
            CardOutcome::Parsed(job) => {
                debug!("卡片 {}: {} @ {}", window.start + index + 1, job.title, job.company);
                jobs.push(job);
            }
            CardOutcome::Rejected => rejected += 1,
        }
    }
    if rejected > 0 {
        warn!("⚠️ 跳过 {} 张标题和公司均缺失或被遮罩的卡片", rejected);
    }

    PageCollection::Collected(CollectedPage {
        selector,
        discovered,
        processed: window.len(),
        rejected,
        jobs,
    })
}

/// 依次尝试卡片选择器，返回第一个有命中的
async fn discover_cards<D: PageDriver>(page: &D) -> Option<(&'static str, Vec<D::Node>)> {
    for selector in CARD_SELECTORS {
        match page.find_all(selector).await {
            Ok(cards) if !cards.is_empty() => {
                debug!("使用选择器找到卡片: {}", selector);
                return Some((*selector, cards));
            }
            Ok(_) => {}
            Err(e) => debug!("选择器 {} 查找失败: {}", selector, e),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNode, FakePage};

    fn cards(count: usize) -> Vec<FakeNode> {
        (0..count)
            .map(|i| {
                FakeNode::job_card(
                    &format!("Engineer {}", i),
                    "Acme",
                    "Berlin",
                    &format!("https://www.linkedin.com/jobs/view/{}", i),
                    "2025-01-01",
                )
            })
            .collect()
    }

    #[test]
    fn window_respects_budget() {
        assert_eq!(budget_window(110, 80, 100), 80..100);
        assert_eq!(budget_window(25, 0, 100), 0..25);
        assert_eq!(budget_window(150, 0, 100), 0..100);
        assert_eq!(budget_window(50, 60, 100), 50..50);
        assert_eq!(budget_window(120, 100, 100), 100..100);
    }

    #[tokio::test]
    async fn only_remaining_budget_is_processed() {
        // 80 张已处理，再出现 30 张新卡片
        let page = FakePage::new().with_snapshot(vec![(".jobs-search__results-list li", cards(110))]);
        let PageCollection::Collected(collected) = collect(&page, 80, 100).await else {
            panic!("expected cards");
        };
        assert_eq!(collected.discovered, 110);
        assert_eq!(collected.processed, 20);
        assert_eq!(collected.jobs.len(), 20);
        assert_eq!(collected.jobs[0].title, "Engineer 80");
        assert_eq!(collected.jobs[19].title, "Engineer 99");
    }

    #[tokio::test]
    async fn first_matching_selector_wins() {
        let page = FakePage::new().with_snapshot(vec![
            (".job-search-card", cards(3)),
            (".job-card-container", cards(7)),
        ]);
        let PageCollection::Collected(collected) = collect(&page, 0, 100).await else {
            panic!("expected cards");
        };
        assert_eq!(collected.selector, ".job-search-card");
        assert_eq!(collected.jobs.len(), 3);
    }

    #[tokio::test]
    async fn rejected_cards_are_absent() {
        let mut page_cards = cards(2);
        page_cards.insert(1, FakeNode::new());
        let page = FakePage::new().with_snapshot(vec![(".job-card-container", page_cards)]);
        let PageCollection::Collected(collected) = collect(&page, 0, 100).await else {
            panic!("expected cards");
        };
        assert_eq!(collected.processed, 3);
        assert_eq!(collected.rejected, 1);
        assert_eq!(collected.jobs.len(), 2);
    }

    #[tokio::test]
    async fn no_selector_matches() {
        let page = FakePage::new().with_snapshot(vec![]);
        assert_eq!(collect(&page, 0, 100).await, PageCollection::NoCards);
    }
}
