//! 职位记录

use serde::{Deserialize, Serialize};

/// 字段提取失败时使用的哨兵值
pub const NOT_AVAILABLE: &str = "Not available";
/// 发布日期缺失时使用的哨兵值
pub const NOT_SPECIFIED: &str = "Not specified";
/// 来源站点标记
pub const SOURCE_LINKEDIN: &str = "LinkedIn";

/// 站点对未登录访客渲染的遮罩字符
pub const MASK_GLYPH: char = '*';

/// 职位记录（唯一落盘的实体）
///
/// 字段顺序即 JSON 输出中的键顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub source: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    pub date_posted: String,
}

impl Job {
    /// 标题和公司是否都是有效值
    pub fn is_complete(&self) -> bool {
        !is_sentinel(&self.title) && !is_sentinel(&self.company)
    }

    /// 折叠文本字段中的连续空白
    pub fn normalize_whitespace(&mut self) {
        self.title = collapse_whitespace(&self.title);
        self.company = collapse_whitespace(&self.company);
        self.location = collapse_whitespace(&self.location);
    }
}

/// 是否为哨兵值
pub fn is_sentinel(value: &str) -> bool {
    value == NOT_AVAILABLE || value == NOT_SPECIFIED
}

/// 把任意空白序列折叠为单个空格，并去掉首尾空白
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 遮罩字符占比是否超过一半
pub fn is_majority_masked(value: &str) -> bool {
    let total = value.chars().count();
    let masked = value.chars().filter(|c| *c == MASK_GLYPH).count();
    total > 0 && masked * 2 > total
}

/// 是否完全由遮罩字符组成
pub fn is_fully_masked(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c == MASK_GLYPH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, company: &str) -> Job {
        Job {
            source: SOURCE_LINKEDIN.into(),
            title: title.into(),
            company: company.into(),
            location: NOT_AVAILABLE.into(),
            link: NOT_AVAILABLE.into(),
            date_posted: NOT_SPECIFIED.into(),
        }
    }

    #[test]
    fn completeness_requires_title_and_company() {
        assert!(job("Backend Dev", "Acme").is_complete());
        assert!(!job(NOT_AVAILABLE, "Acme").is_complete());
        assert!(!job("Backend Dev", NOT_SPECIFIED).is_complete());
    }

    #[test]
    fn whitespace_is_collapsed() {
        let mut j = job("  Senior \n  Engineer ", "Acme\tCorp");
        j.location = " New   York ".into();
        j.normalize_whitespace();
        assert_eq!(j.title, "Senior Engineer");
        assert_eq!(j.company, "Acme Corp");
        assert_eq!(j.location, "New York");
    }

    #[test]
    fn mask_ratios() {
        assert!(is_fully_masked("*****"));
        assert!(!is_fully_masked(""));
        assert!(!is_majority_masked("**Senior Engineer"));
        assert!(!is_majority_masked("**Senior**"));
        assert!(is_majority_masked("****ior***"));
        assert!(!is_majority_masked("**ab"));
    }

    #[test]
    fn serializes_with_fixed_key_order() {
        let json = serde_json::to_string(&job("Backend Dev", "Acme")).unwrap();
        assert_eq!(
            json,
            r#"{"source":"LinkedIn","title":"Backend Dev","company":"Acme","location":"Not available","link":"Not available","date_posted":"Not specified"}"#
        );
    }
}
