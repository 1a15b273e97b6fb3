//! 字段提取 - 业务能力层
//!
//! 对一张卡片按优先级尝试一组定位方式，取第一个非空、未被遮罩的值。
//! 查找失败、元素不存在都视为“试下一个”，不会向外抛错。

use tracing::debug;

use crate::infrastructure::DomNode;
use crate::models::job::{is_fully_masked, is_majority_masked, NOT_AVAILABLE};

/// 一种定位方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// 选择器命中元素的文本（去首尾空白）
    Text(&'static str),
    /// 选择器命中元素的某个属性
    Attr(&'static str, &'static str),
    /// 卡片内任意 href 包含指定片段的链接
    AnchorHref(&'static str),
}

impl Locator {
    fn describe(&self) -> String {
        match self {
            Locator::Text(selector) => format!("text({})", selector),
            Locator::Attr(selector, attr) => format!("{}@{}", selector, attr),
            Locator::AnchorHref(pattern) => format!("a[href*={}]", pattern),
        }
    }
}

/// 候选值是否可用：非空，且不是（大部分）遮罩字符
pub fn is_acceptable(candidate: &str) -> bool {
    !candidate.is_empty() && !is_fully_masked(candidate) && !is_majority_masked(candidate)
}

/// 按顺序尝试所有定位方式，返回第一个可用值
pub async fn extract<N: DomNode>(card: &N, locators: &[Locator]) -> Option<String> {
    for locator in locators {
        match try_locator(card, locator).await {
            Some(value) if is_acceptable(&value) => return Some(value),
            Some(value) => debug!("{} 命中但内容被遮罩: {:?}", locator.describe(), value),
            None => {}
        }
    }
    None
}

/// 提取字段，失败时返回 `"Not available"`
pub async fn extract_or_unavailable<N: DomNode>(card: &N, locators: &[Locator]) -> String {
    extract(card, locators)
        .await
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

async fn try_locator<N: DomNode>(card: &N, locator: &Locator) -> Option<String> {
    let raw = match locator {
        Locator::Text(selector) => {
            let node = card.find(selector).await.ok()??;
            node.text().await.ok()?
        }
        Locator::Attr(selector, attr) => {
            let node = card.find(selector).await.ok()??;
            node.attribute(attr).await.ok()?
        }
        Locator::AnchorHref(pattern) => {
            let anchors = card.find_all("a").await.ok()?;
            let mut found = None;
            for anchor in anchors {
                if let Ok(Some(href)) = anchor.attribute("href").await {
                    if href.contains(pattern) {
                        found = Some(href);
                        break;
                    }
                }
            }
            found
        }
    };
    raw.map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeNode;

    const TITLE: &[Locator] = &[
        Locator::Text("h3.base-search-card__title"),
        Locator::Text(".job-search-card__title"),
        Locator::Text("h3"),
    ];

    #[tokio::test]
    async fn falls_through_to_third_locator() {
        let card = FakeNode::new().with("h3", FakeNode::text("  Senior Engineer \n"));
        assert_eq!(extract(&card, TITLE).await.as_deref(), Some("Senior Engineer"));
    }

    #[tokio::test]
    async fn lightly_masked_text_is_accepted() {
        let card = FakeNode::new().with("h3", FakeNode::text("**Senior Engineer"));
        assert_eq!(extract(&card, TITLE).await.as_deref(), Some("**Senior Engineer"));
    }

    #[tokio::test]
    async fn masked_text_falls_through_to_next_locator() {
        let card = FakeNode::new()
            .with(".job-search-card__title", FakeNode::text("****ior***"))
            .with("h3", FakeNode::text("Senior Engineer"));
        assert_eq!(extract(&card, TITLE).await.as_deref(), Some("Senior Engineer"));
    }

    #[tokio::test]
    async fn only_masked_candidates_give_sentinel() {
        let card = FakeNode::new()
            .with("h3.base-search-card__title", FakeNode::text("**********"))
            .with("h3", FakeNode::text("****ior***"));
        assert_eq!(extract_or_unavailable(&card, TITLE).await, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn empty_text_is_skipped() {
        let card = FakeNode::new()
            .with("h3.base-search-card__title", FakeNode::text("   "))
            .with(".job-search-card__title", FakeNode::text("Data Engineer"));
        assert_eq!(extract(&card, TITLE).await.as_deref(), Some("Data Engineer"));
    }

    #[tokio::test]
    async fn lookup_errors_are_swallowed() {
        let card = FakeNode::new().broken();
        assert_eq!(extract(&card, TITLE).await, None);
    }

    #[tokio::test]
    async fn broken_child_does_not_stop_later_locators() {
        let card = FakeNode::new()
            .with("h3.base-search-card__title", FakeNode::text("x").broken())
            .with("h3", FakeNode::text("Platform Engineer"));
        assert_eq!(extract(&card, TITLE).await.as_deref(), Some("Platform Engineer"));
    }

    #[tokio::test]
    async fn anchor_fallback_matches_href_pattern() {
        let card = FakeNode::new()
            .with("a", FakeNode::attr("href", "https://www.linkedin.com/company/acme"))
            .with("a", FakeNode::new())
            .with(
                "a",
                FakeNode::attr("href", "https://www.linkedin.com/jobs/view/123"),
            );
        let locators = [
            Locator::Attr("a.base-card__full-link", "href"),
            Locator::AnchorHref("linkedin.com/jobs/view"),
        ];
        assert_eq!(
            extract(&card, &locators).await.as_deref(),
            Some("https://www.linkedin.com/jobs/view/123")
        );
    }

    #[test]
    fn acceptance_rules() {
        assert!(is_acceptable("Senior Engineer"));
        assert!(is_acceptable("**Senior**"));
        assert!(!is_acceptable(""));
        assert!(!is_acceptable("*****"));
        assert!(!is_acceptable("*a**"));
    }
}
