pub mod frontier;
pub mod menu;


pub use frontier::{CrawlBudget, CrawlFrontier};
pub use menu::{CrawlReport, MatchVerdict, MenuCrawler};
