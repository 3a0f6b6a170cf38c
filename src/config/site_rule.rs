use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use std::rc::Rc;

use log::warn;
use regex::Regex;

use super::error::ConfigError;
use crate::fix::{AttributeFix, Fix};
use crate::util::Util;

/// Decides which hosts a site rule applies to.
#[derive(Clone, Debug)]
pub enum DomainMatcher {
    /// Host contains the string. The empty string matches every host.
    Substring(String),
    Pattern(Regex),
}

impl DomainMatcher {
    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Substring(domain) => host.contains(domain.as_str()),
            Self::Pattern(regex) => regex.is_match(host),
        }
    }
}

/// Selects nodes and names the fix applied to them.
#[derive(Clone)]
pub struct Rule {
    pub xpath: String,
    /// `None` applies the default text fix.
    pub fix: Option<Rc<dyn Fix>>,
}

impl Rule {
    pub fn text(xpath: &str) -> Self {
        Self {
            xpath: xpath.to_owned(),
            fix: None,
        }
    }

    pub fn with_fix<F: Fix + 'static>(xpath: &str, fix: F) -> Self {
        Self {
            xpath: xpath.to_owned(),
            fix: Some(Rc::new(fix)),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fix = self
            .fix
            .as_ref()
            .map(|fix| fix.describe())
            .unwrap_or_else(|| "text".into());
        f.debug_struct("Rule")
            .field("xpath", &self.xpath)
            .field("fix", &fix)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct SiteRule {
    pub name: String,
    pub domain: DomainMatcher,
    /// Only active if this xpath selects something.
    pub require: Option<String>,
    pub rules: Vec<Rule>,
    pub css: Option<String>,
    /// Roots whose subtrees are watched for changes.
    pub observe: Vec<String>,
}

impl SiteRule {
    pub fn new(name: &str, domain: DomainMatcher) -> Self {
        Self {
            name: name.to_owned(),
            domain,
            require: None,
            rules: Vec::new(),
            css: None,
            observe: Vec::new(),
        }
    }

    pub fn parse_path(config_path: &Path) -> Result<SiteRule, ConfigError> {
        let file = fs::File::open(config_path)?;
        let file_name = config_path.file_name().unwrap_or_default().to_string_lossy();
        let name = Self::name_from_file(&file_name);
        Self::parse(&name, BufReader::new(file))
    }

    pub fn parse_data(file_name: &str, data: Cow<'static, [u8]>) -> Result<SiteRule, ConfigError> {
        let cursor = Cursor::new(data.as_ref());
        Self::parse(&Self::name_from_file(file_name), cursor)
    }

    pub fn name_from_file(file_name: &str) -> String {
        file_name
            .strip_suffix(".txt")
            .unwrap_or(file_name)
            .to_owned()
    }

    fn parse<R: BufRead>(name: &str, buffer: R) -> Result<SiteRule, ConfigError> {
        let mut domain: Option<DomainMatcher> = None;
        let mut require: Option<String> = None;
        let mut rules: Vec<Rule> = Vec::new();
        let mut css: Vec<String> = Vec::new();
        let mut observe: Vec<String> = Vec::new();

        let domain_string = "domain:";
        let domain_regex = "domain_regex:";
        let presence = "require:";
        let text = "text:";
        let attribute = "attribute(";
        let stylesheet = "css:";
        let observe_root = "observe:";

        for line in buffer.lines() {
            let line = line?;
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }

            extract_option_single!(line, presence, require);
            extract_vec_single!(line, observe_root, observe);

            if line.starts_with(domain_string) {
                let value = Util::str_extract_value(domain_string, line);
                domain = Some(DomainMatcher::Substring(value.into()));
                continue;
            }

            if line.starts_with(domain_regex) {
                let value = Util::str_extract_value(domain_regex, line);
                domain = Some(DomainMatcher::Pattern(Regex::new(value)?));
                continue;
            }

            if line.starts_with(text) {
                rules.push(Rule::text(Util::str_extract_value(text, line)));
                continue;
            }

            if line.starts_with(attribute) {
                let value = Util::str_extract_value(attribute, line);
                let (arguments, xpath) = value
                    .split_once("):")
                    .ok_or_else(|| ConfigError::Attribute(line.into()))?;
                let mut arguments = arguments.split(',').map(|s| s.trim());
                let attribute_name = arguments
                    .next()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| ConfigError::Attribute(line.into()))?;
                let fix = match arguments.next() {
                    Some(max_len) => {
                        let max_len = max_len
                            .parse::<usize>()
                            .map_err(|_| ConfigError::Attribute(line.into()))?;
                        AttributeFix::truncated(attribute_name, max_len)
                    }
                    None => AttributeFix::new(attribute_name),
                };
                rules.push(Rule::with_fix(xpath.trim(), fix));
                continue;
            }

            // css is taken verbatim, '#' is a selector there and not a comment
            if line.starts_with(stylesheet) {
                css.push(line[stylesheet.len()..].trim().to_string());
                continue;
            }

            warn!("Ignoring unknown line in rule file '{}': '{}'", name, line);
        }

        let domain = domain.ok_or_else(|| ConfigError::MissingDomain(name.into()))?;

        Ok(SiteRule {
            name: name.into(),
            domain,
            require,
            rules,
            css: if css.is_empty() {
                None
            } else {
                Some(css.join("\n"))
            },
            observe,
        })
    }
}
