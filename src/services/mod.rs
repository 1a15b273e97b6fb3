pub mod card_parser;
pub mod field_extractor;
pub mod page_collector;
pub mod pagination;
pub mod result_store;

pub use card_parser::{parse_card, CardOutcome};
pub use field_extractor::{extract, extract_or_unavailable, Locator};
pub use page_collector::{collect, CollectedPage, PageCollection};
pub use pagination::{Advance, PaginationController};
pub use result_store::{DatasetSummary, ResultStore};
