//! Structural markup for navigation lists.
//!
//! Output is assembled as a tree of [`Markup`] nodes and serialized in one
//! place, so every text node and attribute value goes through the same
//! escaping.

use std::borrow::Cow;
use std::fmt;

use generational_arena::Index;

use crate::domain::arena::NavTree;
use crate::domain::ItemId;

/// A node of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Markup>,
    /// Emit a newline after the closing tag
    pub line_break: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
            line_break: false,
        }
    }

    /// Add an attribute. Empty values are not emitted.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.attributes.push((name, value));
        }
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }

    pub fn line_break(mut self) -> Self {
        self.line_break = true;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

impl Markup {
    /// All elements with the given tag, pre-order.
    pub fn elements<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_elements(tag, &mut found);
        found
    }

    fn collect_elements<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if let Markup::Element(element) = self {
            if element.tag == tag {
                found.push(element);
            }
            for child in &element.children {
                child.collect_elements(tag, found);
            }
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Markup::Text(text) => f.write_str(&escape_text(text)),
            Markup::Element(element) => fmt::Display::fmt(element, f),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape_attribute(value))?;
        }
        f.write_str(">")?;
        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.tag)?;
        if self.line_break {
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Escape text content (`&`, `<`, `>`).
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}

/// Escape an attribute value (text escapes plus both quote kinds).
pub fn escape_attribute(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        escape_text(s)
            .replace('"', "&quot;")
            .replace('\'', "&#39;"),
    )
}

/// Build the nested list for `tree`.
///
/// `url_for` resolves the link target of each item; its first failure aborts
/// the build. The current item's link carries `class="<marker>"`.
pub fn navigation_list<E, F>(
    tree: &NavTree,
    current: ItemId,
    marker: &str,
    mut url_for: F,
) -> Result<Markup, E>
where
    F: FnMut(ItemId) -> Result<String, E>,
{
    let mut list = Element::new("ul");
    if let Some(root) = tree.root() {
        list = list.child(list_item(tree, root, current, marker, &mut url_for)?);
    }
    Ok(list.into())
}

fn list_item<E, F>(
    tree: &NavTree,
    idx: Index,
    current: ItemId,
    marker: &str,
    url_for: &mut F,
) -> Result<Element, E>
where
    F: FnMut(ItemId) -> Result<String, E>,
{
    let mut li = Element::new("li").line_break();
    let Some(node) = tree.get_node(idx) else {
        return Ok(li);
    };

    let class = if node.item.id == current { marker } else { "" };
    let link = Element::new("a")
        .attr("href", url_for(node.item.id)?)
        .attr("class", class)
        .text(node.item.title.as_str());
    li = li.child(link);

    if !node.is_leaf() {
        let mut nested = Element::new("ul");
        for &child in &node.children {
            nested = nested.child(list_item(tree, child, current, marker, url_for)?);
        }
        li = li.child(nested);
    }
    Ok(li)
}
