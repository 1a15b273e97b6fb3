pub mod chrome;
pub mod driver;

pub use chrome::{ChromeDriver, ChromeNode};
pub use driver::{DomNode, PageDriver};
