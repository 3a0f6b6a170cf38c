#[macro_use]
mod macros;
mod error;
mod rule_table;
mod site_rule;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use rule_table::SiteRuleTable;
pub use site_rule::{DomainMatcher, Rule, SiteRule};
