use crate::error::ExtractError;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

static TRAILING_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-|]+$").expect("trailing separator regex must compile"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy)]
pub struct NoiseMarker {
    pub tag: &'static str,
    pub attribute: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SanitizationPolicy {
    pub allowed_tags: &'static [&'static str],
    pub allowed_attributes: &'static [(&'static str, &'static [&'static str])],
    pub allowed_empty: &'static [&'static str],
    pub drop_with_content: &'static [&'static str],
    pub noise: NoiseMarker,
}

pub static DEFAULT_POLICY: SanitizationPolicy = SanitizationPolicy {
    allowed_tags: &["div", "span", "a", "strong", "br"],
    allowed_attributes: &[
        ("div", &["id", "class", "style"]),
        ("span", &["id", "class", "style"]),
        ("a", &["class", "href", "name", "target"]),
    ],
    allowed_empty: &["div", "br", "hr"],
    drop_with_content: &["script", "style"],
    noise: NoiseMarker {
        tag: "span",
        attribute: "class",
        value: "statusRightContent",
    },
};

impl SanitizationPolicy {
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(&tag)
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.allowed_attributes
            .iter()
            .find(|(name, _)| *name == tag)
            .is_some_and(|(_, attrs)| attrs.contains(&attribute))
    }

    pub fn allows_empty(&self, tag: &str) -> bool {
        self.allowed_empty.contains(&tag)
    }

    pub fn drops_with_content(&self, tag: &str) -> bool {
        self.drop_with_content.contains(&tag)
    }

    fn is_noise(&self, element: &MarkupElement) -> bool {
        element.name == self.noise.tag
            && element
                .attrs
                .get(self.noise.attribute)
                .is_some_and(|v| v == self.noise.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<MarkupNode>,
}

enum Rewrite {
    Keep(MarkupElement),
    Unwrap(Vec<MarkupNode>),
    Drop,
}

impl MarkupElement {
    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let attrs = value
            .attrs()
            .map(|(name, v)| (name.to_ascii_lowercase(), v.to_string()))
            .collect();
        let children = element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(MarkupNode::Text(String::from(&**text))),
                Node::Element(_) => ElementRef::wrap(child)
                    .map(|el| MarkupNode::Element(MarkupElement::from_element(el))),
                _ => None,
            })
            .collect();

        Self {
            name: value.name().to_ascii_lowercase(),
            attrs,
            children,
        }
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        let raw = RAW_TEXT_ELEMENTS.contains(&self.name.as_str());
        for child in &self.children {
            write_node(&mut out, child, raw);
        }
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&mut out, &self.children);
        out
    }

    fn is_blank(&self) -> bool {
        self.inner_html().trim().is_empty()
    }
}

pub fn sanitize(raw: &str) -> String {
    sanitize_with(raw, &DEFAULT_POLICY)
}

pub fn sanitize_with(raw: &str, policy: &SanitizationPolicy) -> String {
    match try_sanitize(raw, policy) {
        Ok(cleaned) => cleaned,
        Err(err) => {
            // The unsanitized fragment is passed on so the field is not lost.
            warn!(error = %err, "status markup could not be sanitized; keeping raw markup");
            raw.to_string()
        }
    }
}

pub fn try_sanitize(raw: &str, policy: &SanitizationPolicy) -> Result<String, ExtractError> {
    let mut root = parse_root(raw)?;

    let children = std::mem::take(&mut root.children);
    root.children = clean_children(children, policy, root.name == "a");
    // The root is the container being displayed: its attributes are filtered,
    // but it is never unwrapped or dropped.
    if root.name == "a" && !root.attrs.contains_key("target") {
        root.attrs.insert("target".to_string(), "_blank".to_string());
    }
    let name = root.name.clone();
    root.attrs
        .retain(|attr, _| policy.allows_attribute(&name, attr));

    Ok(root.outer_html())
}

pub fn plain_text(markup: &str) -> String {
    let text = match parse_root(markup) {
        Ok(root) => root.text_content(),
        Err(_) => Html::parse_fragment(markup)
            .root_element()
            .text()
            .collect::<String>(),
    };
    let collapsed = crate::parser::collapse_whitespace(&text);
    TRAILING_SEPARATORS.replace(&collapsed, "").into_owned()
}

fn parse_root(raw: &str) -> Result<MarkupElement, ExtractError> {
    let flattened = raw.replace(['\r', '\n', '\t'], "");
    let fragment = Html::parse_fragment(&flattened);
    let root = fragment
        .root_element()
        .children()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ExtractError::Sanitize("markup contains no element".to_string()))?;
    Ok(MarkupElement::from_element(root))
}

fn clean_children(
    children: Vec<MarkupNode>,
    policy: &SanitizationPolicy,
    in_anchor: bool,
) -> Vec<MarkupNode> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            MarkupNode::Text(text) => out.push(MarkupNode::Text(text)),
            MarkupNode::Element(element) => match clean_element(element, policy, in_anchor) {
                Rewrite::Keep(element) => out.push(MarkupNode::Element(element)),
                Rewrite::Unwrap(inner) => out.extend(inner),
                Rewrite::Drop => {}
            },
        }
    }
    out
}

fn clean_element(mut element: MarkupElement, policy: &SanitizationPolicy, in_anchor: bool) -> Rewrite {
    let is_anchor = element.name == "a";
    let children = std::mem::take(&mut element.children);
    element.children = clean_children(children, policy, in_anchor || is_anchor);

    // Nested anchors are split apart when the output is parsed again.
    if is_anchor && in_anchor {
        return Rewrite::Unwrap(element.children);
    }

    if is_anchor && !element.attrs.contains_key("target") {
        element
            .attrs
            .insert("target".to_string(), "_blank".to_string());
    }

    if !policy.allows_tag(&element.name) {
        if policy.drops_with_content(&element.name) {
            return Rewrite::Drop;
        }
        return Rewrite::Unwrap(element.children);
    }

    if element.is_blank() && !policy.allows_empty(&element.name) {
        return Rewrite::Drop;
    }
    if policy.is_noise(&element) {
        return Rewrite::Drop;
    }

    let name = element.name.clone();
    element
        .attrs
        .retain(|attr, _| policy.allows_attribute(&name, attr));
    Rewrite::Keep(element)
}

fn write_node(out: &mut String, node: &MarkupNode, raw_text: bool) {
    match node {
        MarkupNode::Text(text) if raw_text => out.push_str(text),
        MarkupNode::Text(text) => escape_into(out, text, false),
        MarkupNode::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &MarkupElement) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.name.as_str()) {
        return;
    }

    out.push_str(&element.inner_html());
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn collect_text(out: &mut String, nodes: &[MarkupNode]) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element(element) => collect_text(out, &element.children),
        }
    }
}
