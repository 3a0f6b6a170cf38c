use libxml::parser::Parser;
use libxml::tree::{node, Document, Node, NodeType, SaveOptions};
use libxml::xpath::Context;
use log::{debug, error};
use once_cell::sync::OnceCell;

use crate::constants;
use crate::error::DateFixError;
use crate::observer::{
    MutationKind, MutationRecord, ObserveOptions, ObserverId, ObserverRegistry, PausedObserver,
};
use crate::util::Util;

/// An HTML document together with the url it was loaded from.
///
/// Every write that should be visible to observers has to go through the
/// methods of `Page`.
pub struct Page {
    context: Context,
    document: Document,
    url: url::Url,
    host: String,
    observers: ObserverRegistry,
}

impl Page {
    pub fn parse(url: &url::Url, html: &str) -> Result<Self, DateFixError> {
        // watchers keep handles to their roots next to the ones of the caller
        static RC_GUARD: OnceCell<()> = OnceCell::new();
        RC_GUARD.get_or_init(|| node::set_node_rc_guard(constants::NODE_RC_GUARD));

        let parser = Parser::default_html();
        let document = parser.parse_string(html).map_err(|err| {
            error!("Parsing HTML failed for '{}': {:?}", url.as_str(), err);
            DateFixError::Xml
        })?;

        let context = Context::new(&document).map_err(|()| {
            error!("Creating xpath context failed for '{}'", url.as_str());
            DateFixError::Xml
        })?;

        Ok(Self {
            context,
            document,
            url: url.clone(),
            host: url.host_str().unwrap_or_default().to_owned(),
            observers: ObserverRegistry::default(),
        })
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All nodes matching `xpath`. An expression libxml can't evaluate
    /// selects nothing.
    pub fn select(&self, xpath: &str) -> Vec<Node> {
        Util::evaluate_xpath(&self.context, xpath).unwrap_or_default()
    }

    pub fn exists(&self, xpath: &str) -> bool {
        !self.select(xpath).is_empty()
    }

    /// Replaces all children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: &mut Node, text: &str) -> Result<(), DateFixError> {
        // libxml resolves entity references when setting element content
        node.set_content(&text.replace('&', "&amp;")).map_err(|err| {
            error!("Failed to set text of <{}>: {}", node.get_name(), err);
            DateFixError::Xml
        })?;
        self.record(MutationKind::ChildList, node);
        Ok(())
    }

    /// Changes the value of a text node.
    pub fn set_node_value(&mut self, node: &mut Node, text: &str) -> Result<(), DateFixError> {
        if node.get_type() != Some(NodeType::TextNode) {
            error!("Can't set node value of <{}>", node.get_name());
            return Err(DateFixError::Xml);
        }

        node.set_content(text).map_err(|err| {
            error!("Failed to set text node value: {}", err);
            DateFixError::Xml
        })?;
        self.record(MutationKind::CharacterData, node);
        Ok(())
    }

    /// Appends a new element with the given attributes and text to `parent`.
    pub fn append_element(
        &mut self,
        parent: &mut Node,
        name: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> Result<Node, DateFixError> {
        let mut child = parent.new_child(None, name).map_err(|err| {
            error!("Failed to add <{}> to <{}>: {}", name, parent.get_name(), err);
            DateFixError::Xml
        })?;

        for (attribute, value) in attributes {
            child.set_attribute(attribute, value).map_err(|err| {
                error!("Failed to set attribute '{}' on <{}>: {}", attribute, name, err);
                DateFixError::Xml
            })?;
        }

        if !text.is_empty() {
            child
                .set_content(&text.replace('&', "&amp;"))
                .map_err(|err| {
                    error!("Failed to set text of <{}>: {}", name, err);
                    DateFixError::Xml
                })?;
        }

        self.record(MutationKind::ChildList, parent);
        Ok(child)
    }

    /// Appends a `<style>` element holding `css` to the document head.
    pub fn inject_stylesheet(&mut self, css: &str) -> Result<Node, DateFixError> {
        let mut head = match self.select("//head").into_iter().next() {
            Some(head) => head,
            None => {
                debug!("Document has no <head>, creating one");
                let mut root = self.document.get_root_element().ok_or_else(|| {
                    error!("Document has no root element");
                    DateFixError::Xml
                })?;
                let head = root.new_child(None, "head").map_err(|err| {
                    error!("Failed to create <head>: {}", err);
                    DateFixError::Xml
                })?;
                self.record(MutationKind::ChildList, &root);
                head
            }
        };

        self.append_element(&mut head, "style", &[("type", "text/css")], css)
    }

    pub fn to_html(&self) -> String {
        let options = SaveOptions {
            format: false,
            no_declaration: false,
            no_empty_tags: true,
            no_xhtml: false,
            xhtml: false,
            as_xml: false,
            as_html: true,
            non_significant_whitespace: false,
        };
        self.document.to_string_with_options(options)
    }

    pub fn create_observer(&mut self) -> ObserverId {
        self.observers.create()
    }

    pub fn observe(
        &mut self,
        id: ObserverId,
        root: &Node,
        options: ObserveOptions,
    ) -> Result<(), DateFixError> {
        if self.observers.observe(id, root, options) {
            Ok(())
        } else {
            Err(DateFixError::Observer)
        }
    }

    pub fn disconnect(&mut self, id: ObserverId) {
        self.observers.disconnect(id);
    }

    /// Disconnects `id` for good. Its slot is reused by `create_observer`.
    pub fn release_observer(&mut self, id: ObserverId) {
        self.observers.release(id);
    }

    /// Disconnects `id` until the returned guard is dropped, then observes
    /// `roots` again with `options`.
    pub fn pause_observer<'a>(
        &'a mut self,
        id: ObserverId,
        roots: &'a [Node],
        options: ObserveOptions,
    ) -> PausedObserver<'a> {
        PausedObserver::new(self, id, roots, options)
    }

    pub fn has_pending_mutations(&self) -> bool {
        self.observers.has_pending()
    }

    pub fn has_pending_mutations_for(&self, id: ObserverId) -> bool {
        self.observers.has_pending_for(id)
    }

    pub fn take_pending_mutations(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
        self.observers.take_pending()
    }

    pub fn take_pending_mutations_for(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_pending_for(id)
    }

    pub(crate) fn observers_mut(&mut self) -> &mut ObserverRegistry {
        &mut self.observers
    }

    fn record(&mut self, kind: MutationKind, target: &Node) {
        self.observers.notify(kind, target);
    }
}
