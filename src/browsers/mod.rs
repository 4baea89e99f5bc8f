pub mod cleaner;
pub mod locator;
pub mod store;

pub use cleaner::{clean_all_browsers, clean_browser, AllBrowsersReport, BrowserCleanReport};
pub use locator::{
    discover_browsers, probe_browsers, BrowserKind, BrowserProfile, DataCategory,
};
pub use store::{clear_store, FileTransaction, StoreCategory};
