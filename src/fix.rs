use libxml::tree::Node;
use log::debug;

use crate::date::DateNormalizer;
use crate::error::DateFixError;
use crate::page::Page;
use crate::util::Util;

/// Rewrites one node selected by a site rule.
///
/// Returns whether the page was changed.
pub trait Fix {
    fn apply(
        &self,
        page: &mut Page,
        node: &mut Node,
        normalizer: &DateNormalizer,
    ) -> Result<bool, DateFixError>;

    fn describe(&self) -> String {
        "custom".into()
    }
}

/// Rewrites date mentions in the text directly inside the node.
///
/// Used for every rule that doesn't bring its own fix.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextFix;

impl Fix for TextFix {
    fn apply(
        &self,
        page: &mut Page,
        node: &mut Node,
        normalizer: &DateNormalizer,
    ) -> Result<bool, DateFixError> {
        let mut changed = false;

        for mut text_node in Util::text_children(node) {
            let text = text_node.get_content();
            let fixed = normalizer.fix_text(&text);
            if fixed != text {
                debug!("'{}' -> '{}'", text.trim(), fixed.trim());
                page.set_node_value(&mut text_node, &fixed)?;
                changed = true;
            }
        }

        Ok(changed)
    }

    fn describe(&self) -> String {
        "text".into()
    }
}

/// Replaces the text of the node with the normalized value of one of its
/// attributes. The attribute itself is left alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeFix {
    attribute: String,
    max_len: Option<usize>,
}

impl AttributeFix {
    pub fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_owned(),
            max_len: None,
        }
    }

    /// Only the first `max_len` characters of the attribute are read,
    /// e.g. `title="2021-01-05 10:00:00Z, License: CC BY-SA 4.0"`.
    pub fn truncated(attribute: &str, max_len: usize) -> Self {
        Self {
            attribute: attribute.to_owned(),
            max_len: Some(max_len),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }
}

impl Fix for AttributeFix {
    fn apply(
        &self,
        page: &mut Page,
        node: &mut Node,
        normalizer: &DateNormalizer,
    ) -> Result<bool, DateFixError> {
        let value = match node.get_attribute(&self.attribute) {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(false),
        };

        let value = match self.max_len {
            Some(max_len) => value.chars().take(max_len).collect(),
            None => value,
        };

        let fixed = normalizer.date_fmt(&value);
        if node.get_content() == fixed {
            return Ok(false);
        }

        page.set_text_content(node, &fixed)?;
        Ok(true)
    }

    fn describe(&self) -> String {
        match self.max_len {
            Some(max_len) => format!("attribute({}, {})", self.attribute, max_len),
            None => format!("attribute({})", self.attribute),
        }
    }
}
