//! Rewrites the dates of HTML pages into `YYYY-MM-DD[ HH:MM:SS]`.
//!
//! A [`SiteRuleTable`] describes, per site, which nodes carry dates and how
//! to read them. The [`Dispatcher`] applies the matching rules to a
//! [`Page`] and re-applies them whenever an observed part of the page
//! changes.
//!
//! ```no_run
//! use yyyymmdd::{DateNormalizer, Dispatcher, Page, SiteRuleTable};
//!
//! let url = url::Url::parse("https://news.ycombinator.com/item?id=1").unwrap();
//! let mut page = Page::parse(&url, "<span class=\"age\"><a>Jan 5, 2021</a></span>").unwrap();
//! let mut dispatcher = Dispatcher::new(SiteRuleTable::parse(None), DateNormalizer::new());
//! dispatcher.run(&mut page);
//! println!("{}", page.to_html());
//! ```

mod config;
mod constants;
mod date;
mod dispatcher;
mod error;
mod fix;
mod observer;
mod page;
mod util;

#[cfg(test)]
mod test_logger;

pub use config::{ConfigError, DomainMatcher, Rule, SiteRule, SiteRuleTable};
pub use date::{month_code, pad2, DateNormalizer};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::DateFixError;
pub use fix::{AttributeFix, Fix, TextFix};
pub use observer::{
    MutationKind, MutationRecord, NodeKey, ObserveOptions, ObserverId, PausedObserver,
};
pub use page::Page;
