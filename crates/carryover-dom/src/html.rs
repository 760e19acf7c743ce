//! HTML import (via `scraper`) and serialization.

use std::borrow::Cow;
use std::cell::Ref;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NextParserState, NodeOrText, QuirksMode, TreeSink};
use html5ever::{driver, Attribute, LocalName, Namespace, QualName};
use scraper::{ElementRef, Html, HtmlTreeSink};
use tracing::debug;

use crate::document::Document;
use crate::error::DomError;
use crate::node::{NodeId, NodeKind};

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Attributes marking a `<template>` as a declarative shadow root.
const SHADOW_ROOT_ATTRS: &[&str] = &["shadowrootmode", "shadowroot"];

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type Handle = <HtmlTreeSink as TreeSink>::Handle;

/// Tree sink that keeps declarative shadow templates as plain `<template>`
/// elements.
///
/// scraper's sink leaves shadow attachment unimplemented, so html5ever drops
/// the template and parses its content straight into the host. Refusing
/// declarative shadow roots keeps the template in the tree, and the import
/// turns it into a shadow fragment.
struct TemplateSink(HtmlTreeSink);

impl TreeSink for TemplateSink {
    type Handle = Handle;
    type Output = Html;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Html {
        self.0.finish()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.0.parse_error(msg)
    }

    fn get_document(&self) -> Handle {
        self.0.get_document()
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> Ref<'a, QualName> {
        self.0.elem_name(target)
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> Handle {
        self.0.create_element(name, attrs, flags)
    }

    fn create_comment(&self, text: StrTendril) -> Handle {
        self.0.create_comment(text)
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Handle {
        self.0.create_pi(target, data)
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        self.0.append(parent, child)
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        self.0.append_based_on_parent_node(element, prev_element, child)
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        self.0.append_doctype_to_document(name, public_id, system_id)
    }

    fn mark_script_already_started(&self, node: &Handle) {
        self.0.mark_script_already_started(node)
    }

    fn pop(&self, node: &Handle) {
        self.0.pop(node)
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        self.0.get_template_contents(target)
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        self.0.same_node(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.0.set_quirks_mode(mode)
    }

    fn append_before_sibling(&self, sibling: &Handle, new_node: NodeOrText<Handle>) {
        self.0.append_before_sibling(sibling, new_node)
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Attribute>) {
        self.0.add_attrs_if_missing(target, attrs)
    }

    fn associate_with_form(&self, target: &Handle, form: &Handle, nodes: (&Handle, Option<&Handle>)) {
        self.0.associate_with_form(target, form, nodes)
    }

    fn remove_from_parent(&self, target: &Handle) {
        self.0.remove_from_parent(target)
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        self.0.reparent_children(node, new_parent)
    }

    fn is_mathml_annotation_xml_integration_point(&self, handle: &Handle) -> bool {
        self.0.is_mathml_annotation_xml_integration_point(handle)
    }

    fn set_current_line(&self, line_number: u64) {
        self.0.set_current_line(line_number)
    }

    fn complete_script(&self, node: &Handle) -> NextParserState {
        self.0.complete_script(node)
    }

    fn allow_declarative_shadow_roots(&self, _intended_parent: &Handle) -> bool {
        false
    }
}

fn parse_document(html: &str) -> Html {
    driver::parse_document(TemplateSink(HtmlTreeSink::new(Html::new_document())), Default::default())
        .one(html)
}

fn parse_fragment(html: &str) -> Html {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    driver::parse_fragment(
        TemplateSink(HtmlTreeSink::new(Html::new_fragment())),
        Default::default(),
        context,
        Vec::new(),
    )
    .one(html)
}

impl Document {
    /// Parse a full HTML page.
    pub fn parse_html(html: &str) -> Self {
        let parsed = parse_document(html);
        let mut doc = Document::bare();
        let root = doc.root();

        if let Err(e) = doc.import_element(parsed.root_element(), root) {
            debug!("HTML import stopped early: {}", e);
        }

        let body = doc.query_selector("body").ok().flatten();
        match body {
            Some(body) => doc.set_body(body),
            None => {
                if let Ok(body) = doc.append_element(root, "body") {
                    doc.set_body(body);
                }
            }
        }
        doc
    }

    /// Replace the children of `id` with parsed HTML markup.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), DomError> {
        if self.node(id)?.element().is_none() {
            return Err(DomError::NotAnElement(id));
        }
        self.clear_children(id)?;
        let fragment = parse_fragment(html);
        self.import_children(fragment.root_element(), id)
    }

    fn import_element(&mut self, element: ElementRef<'_>, parent: NodeId) -> Result<(), DomError> {
        let data = element.value();

        if data.name() == "template" && SHADOW_ROOT_ATTRS.iter().any(|a| data.attr(a).is_some()) {
            let shadow = self.attach_shadow(parent)?;
            return self.import_children(element, shadow);
        }

        let id = self.append_element(parent, data.name())?;
        for (name, value) in data.attrs() {
            self.set_attribute(id, name, value)?;
        }
        self.import_children(element, id)?;

        if data.name() == "textarea" {
            let initial = self.text_content(id)?;
            self.set_value(id, &initial)?;
        }
        Ok(())
    }

    fn import_children(&mut self, element: ElementRef<'_>, target: NodeId) -> Result<(), DomError> {
        // Template content sits under a fragment child of the template.
        let nodes = element.children().flat_map(|child| {
            if child.value().is_fragment() {
                child.children().collect::<Vec<_>>()
            } else {
                vec![child]
            }
        });
        for child in nodes {
            match child.value() {
                scraper::Node::Text(text) => {
                    let content: &str = text;
                    self.append_text(target, content)?;
                }
                scraper::Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.import_element(child, target)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Serialize a node and its subtree, shadow fragments included as
    /// declarative shadow roots. Form fields serialize their live value.
    pub fn outer_html(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        self.write_html(id, &mut out)?;
        Ok(out)
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        for child in self.children(id)? {
            self.write_html(*child, &mut out)?;
        }
        Ok(out)
    }

    /// Serialize the whole page.
    pub fn to_html(&self) -> Result<String, DomError> {
        let mut out = String::from("<!DOCTYPE html>");
        out.push_str(&self.inner_html(self.root())?);
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> Result<(), DomError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Fragment => {
                for child in node.children() {
                    self.write_html(*child, out)?;
                }
            }
            NodeKind::Element(data) => {
                out.push('<');
                out.push_str(&data.tag);
                for (name, value) in &data.attributes {
                    if data.tag == "input" && name == "value" {
                        continue;
                    }
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
                }
                if data.tag == "input" {
                    if let Some(value) = self.value(id).filter(|v| !v.is_empty()) {
                        out.push_str(&format!(" value=\"{}\"", escape_attribute(value)));
                    }
                }
                out.push('>');

                if VOID_TAGS.contains(&data.tag.as_str()) {
                    return Ok(());
                }

                if let Some(shadow) = node.shadow_root() {
                    out.push_str("<template shadowrootmode=\"open\">");
                    self.write_html(shadow, out)?;
                    out.push_str("</template>");
                }

                if data.tag == "textarea" {
                    out.push_str(&escape_text(self.value(id).unwrap_or_default()));
                } else {
                    for child in node.children() {
                        self.write_html(*child, out)?;
                    }
                }

                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
        }
        Ok(())
    }
}

/// Escape `&`, `<` and `>` so text is never reinterpreted as markup.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
