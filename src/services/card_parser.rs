//! 卡片解析 - 业务能力层
//!
//! 只负责把一张职位卡片变成一条 `Job`，不关心分页和重试

use tracing::debug;

use crate::infrastructure::DomNode;
use crate::models::job::{is_majority_masked, Job, NOT_AVAILABLE, NOT_SPECIFIED, SOURCE_LINKEDIN};
use crate::services::field_extractor::{extract, extract_or_unavailable, Locator};

pub const TITLE_LOCATORS: &[Locator] = &[
    Locator::Text("h3.base-search-card__title"),
    Locator::Text(".job-search-card__title"),
    Locator::Text("h3"),
    Locator::Text(".job-card-list__title"),
];

pub const COMPANY_LOCATORS: &[Locator] = &[
    Locator::Text("h4.base-search-card__subtitle"),
    Locator::Text(".job-search-card__subtitle"),
    Locator::Text("h4"),
    Locator::Text(".job-card-container__company-name"),
];

pub const LOCATION_LOCATORS: &[Locator] = &[
    Locator::Text(".job-search-card__location"),
    Locator::Text(".job-result-card__location"),
    Locator::Text(".base-search-card__metadata"),
    Locator::Text(".job-card-container__metadata-item"),
];

/// 职位详情页链接的特征片段
pub const JOB_VIEW_PATTERN: &str = "linkedin.com/jobs/view";

pub const LINK_LOCATORS: &[Locator] = &[
    Locator::Attr("a.base-card__full-link", "href"),
    Locator::Attr("a.job-search-card__link", "href"),
    Locator::Attr("a.job-card-list__title", "href"),
    Locator::Attr("a.job-card-container__link", "href"),
    Locator::AnchorHref(JOB_VIEW_PATTERN),
];

pub const DATE_LOCATORS: &[Locator] = &[
    Locator::Attr("time", "datetime"),
    Locator::Text(".job-search-card__listdate"),
    Locator::Text(".job-card-container__footer-item"),
];

/// 卡片解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Parsed(Job),
    /// 标题和公司都不可用，卡片没有价值
    Rejected,
}

impl CardOutcome {
    pub fn into_job(self) -> Option<Job> {
        match self {
            CardOutcome::Parsed(job) => Some(job),
            CardOutcome::Rejected => None,
        }
    }
}

/// 解析一张职位卡片
pub async fn parse_card<N: DomNode>(card: &N) -> CardOutcome {
    let title = extract_or_unavailable(card, TITLE_LOCATORS).await;
    let company = extract_or_unavailable(card, COMPANY_LOCATORS).await;

    if is_unusable(&title) && is_unusable(&company) {
        debug!("跳过标题和公司均缺失或被遮罩的卡片");
        return CardOutcome::Rejected;
    }

    let location = extract_or_unavailable(card, LOCATION_LOCATORS).await;
    let link = extract_or_unavailable(card, LINK_LOCATORS).await;
    let date_posted = extract(card, DATE_LOCATORS)
        .await
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    debug!("解析到职位: {} @ {} ({})", title, company, location);

    CardOutcome::Parsed(Job {
        source: SOURCE_LINKEDIN.to_string(),
        title,
        company,
        location,
        link,
        date_posted,
    })
}

fn is_unusable(value: &str) -> bool {
    value == NOT_AVAILABLE || is_majority_masked(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeNode;

    #[tokio::test]
    async fn parses_public_search_card() {
        let card = FakeNode::job_card(
            "Backend Developer",
            "Acme",
            "New York, NY",
            "https://www.linkedin.com/jobs/view/1",
            "2025-02-20",
        );
        let job = parse_card(&card).await.into_job().unwrap();
        assert_eq!(job.source, "LinkedIn");
        assert_eq!(job.title, "Backend Developer");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.location, "New York, NY");
        assert_eq!(job.link, "https://www.linkedin.com/jobs/view/1");
        assert_eq!(job.date_posted, "2025-02-20");
    }

    #[tokio::test]
    async fn logged_in_layout_uses_fallback_locators() {
        let card = FakeNode::new()
            .with(".job-card-list__title", FakeNode::text("Rust Engineer"))
            .with(".job-card-container__company-name", FakeNode::text("Ferris Inc"))
            .with(".job-card-container__metadata-item", FakeNode::text("Remote"))
            .with(
                "a.job-card-container__link",
                FakeNode::attr("href", "https://www.linkedin.com/jobs/view/9"),
            )
            .with(".job-card-container__footer-item", FakeNode::text("3 days ago"));
        let job = parse_card(&card).await.into_job().unwrap();
        assert_eq!(job.title, "Rust Engineer");
        assert_eq!(job.company, "Ferris Inc");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.link, "https://www.linkedin.com/jobs/view/9");
        assert_eq!(job.date_posted, "3 days ago");
    }

    #[tokio::test]
    async fn missing_fields_become_sentinels() {
        let card = FakeNode::new().with("h3", FakeNode::text("Data Analyst"));
        let job = parse_card(&card).await.into_job().unwrap();
        assert_eq!(job.company, NOT_AVAILABLE);
        assert_eq!(job.location, NOT_AVAILABLE);
        assert_eq!(job.link, NOT_AVAILABLE);
        assert_eq!(job.date_posted, NOT_SPECIFIED);
    }

    #[tokio::test]
    async fn card_with_masked_title_and_company_is_rejected() {
        let card = FakeNode::new()
            .with("h3", FakeNode::text("********"))
            .with("h4", FakeNode::text("*****"))
            .with(".job-search-card__location", FakeNode::text("Austin"));
        assert_eq!(parse_card(&card).await, CardOutcome::Rejected);
    }

    #[tokio::test]
    async fn card_with_only_company_is_kept() {
        let card = FakeNode::new()
            .with("h3", FakeNode::text("********"))
            .with("h4", FakeNode::text("Acme"));
        let job = parse_card(&card).await.into_job().unwrap();
        assert_eq!(job.title, NOT_AVAILABLE);
        assert_eq!(job.company, "Acme");
    }

    #[tokio::test]
    async fn empty_card_is_rejected() {
        assert_eq!(parse_card(&FakeNode::new()).await, CardOutcome::Rejected);
    }
}
