use std::fs::DirEntry;

use libxml::tree::{Node, NodeType};
use libxml::xpath::Context;

use crate::error::DateFixError;

pub struct Util;

impl Util {
    pub fn check_extension(path: &DirEntry, extension: &str) -> bool {
        if let Some(ext) = path.path().extension() {
            ext.to_str() == Some(extension)
        } else {
            false
        }
    }

    pub fn str_extract_value<'a>(identifier: &str, line: &'a str) -> &'a str {
        let value = &line[identifier.len()..];
        let value = value.trim();
        match value.find('#') {
            Some(pos) => value[..pos].trim(),
            None => value,
        }
    }

    pub fn evaluate_xpath(xpath_ctx: &Context, xpath: &str) -> Result<Vec<Node>, DateFixError> {
        let res = xpath_ctx.evaluate(xpath).map_err(|()| {
            log::debug!("Evaluation of xpath '{}' failed", xpath);
            DateFixError::Xml
        })?;

        let node_vec = res.get_nodes_as_vec();

        if node_vec.is_empty() {
            log::debug!("Evaluation of xpath '{}' yielded no results", xpath);
        }

        Ok(node_vec)
    }

    pub fn text_children(node: &Node) -> Vec<Node> {
        node.get_child_nodes()
            .into_iter()
            .filter(|child| child.get_type() == Some(NodeType::TextNode))
            .collect()
    }
}
