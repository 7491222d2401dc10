//! The backing element tree.
//!
//! This is the structure rows and cells are materialized into. It is deliberately small: an
//! arena of elements with parent/child relationships, a style map, a column span attribute and
//! some text content. Hosts that render to a real surface mirror this tree; the engine itself
//! only ever talks to the [`Document`].

use crate::error::{Error, Result};
use slotmap::{new_key_type, SlotMap};
use std::collections::BTreeMap;
use std::fmt;

new_key_type! {
    /// Identifies an element in a [`Document`].
    ///
    /// Ids are generational: once an element is destroyed its id never resolves again, even if
    /// the slot is reused.
    pub struct ElementId;
}

/// Kinds of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A section root (header, body or footer).
    Section,
    /// A row of cells.
    Row,
    /// A header cell.
    HeaderCell,
    /// A body or footer cell.
    Cell,
    /// The root element of a spacer.
    Spacer,
    /// A spacer decoration.
    Deco,
    /// Anything else, usually content put into cells by an updater.
    Other,
}

pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const DISPLAY: &str = "display";
pub const DISPLAY_NONE: &str = "none";

/// An element.
#[derive(Clone)]
pub struct Element {
    tag: Tag,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    style: BTreeMap<String, String>,
    col_span: usize,
    class_names: Vec<String>,
    text: String,
}

impl Element {
    fn new(tag: Tag) -> Element {
        Element {
            tag,
            parent: None,
            children: Vec::new(),
            style: BTreeMap::new(),
            col_span: 1,
            class_names: Vec::new(),
            text: String::new(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn col_span(&self) -> usize {
        self.col_span
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the element is hidden with `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.style(DISPLAY) == Some(DISPLAY_NONE)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("children", &self.children.len())
            .field("style", &self.style)
            .field("col_span", &self.col_span)
            .field("text", &self.text)
            .finish()
    }
}

/// An arena of elements.
#[derive(Debug, Default)]
pub struct Document {
    elements: SlotMap<ElementId, Element>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: Tag) -> ElementId {
        self.elements.insert(Element::new(tag))
    }

    /// Returns true if the element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Returns the element.
    ///
    /// # Panics
    /// If the element does not exist.
    pub fn element(&self, id: ElementId) -> &Element {
        match self.elements.get(id) {
            Some(element) => element,
            None => panic!("element {:?} does not exist", id),
        }
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        match self.elements.get_mut(id) {
            Some(element) => element,
            None => panic!("element {:?} does not exist", id),
        }
    }

    fn try_element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements.get_mut(id).ok_or(Error::NoSuchElement(id))
    }

    /// Inserts `child` into `parent` at `index`, moving it from its current parent if it has
    /// one. An index past the end appends.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<()> {
        if !self.contains(parent) {
            return Err(Error::NoSuchElement(parent));
        }
        if !self.contains(child) {
            return Err(Error::NoSuchElement(child));
        }
        if self.is_or_has_child(child, parent) {
            return Err(Error::Cycle(child));
        }

        let mut index = index;
        if let Some(old_parent) = self.elements[child].parent {
            let siblings = &mut self.element_mut(old_parent).children;
            if let Some(pos) = siblings.iter().position(|i| *i == child) {
                siblings.remove(pos);
                // moving forward within the same parent shifts the target
                if old_parent == parent && pos < index {
                    index -= 1;
                }
            }
        }

        let children = &mut self.element_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.element_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Appends `child` to `parent`.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        let len = self.try_element_mut(parent)?.children.len();
        self.insert_child(parent, len, child)
    }

    /// Detaches an element from its parent. The element itself stays alive.
    pub fn remove_from_parent(&mut self, id: ElementId) -> Result<()> {
        let parent = self.try_element_mut(id)?.parent.take();
        if let Some(parent) = parent {
            let siblings = &mut self.element_mut(parent).children;
            if let Some(pos) = siblings.iter().position(|i| *i == id) {
                siblings.remove(pos);
            }
        }
        Ok(())
    }

    /// Detaches and destroys an element and all of its descendants.
    pub fn destroy(&mut self, id: ElementId) -> Result<()> {
        self.remove_from_parent(id)?;
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: ElementId) {
        if let Some(element) = self.elements.remove(id) {
            for child in element.children {
                self.destroy_subtree(child);
            }
        }
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.parent)
    }

    pub fn child(&self, id: ElementId, index: usize) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.children.get(index).copied())
    }

    pub fn child_count(&self, id: ElementId) -> usize {
        self.elements.get(id).map_or(0, |e| e.children.len())
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements.get(id).map_or(&[][..], |e| e.children.as_slice())
    }

    /// Position of an element among its siblings.
    pub fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|i| *i == id)
    }

    /// Returns true if `descendant` is `ancestor` or somewhere below it.
    pub fn is_or_has_child(&self, ancestor: ElementId, descendant: ElementId) -> bool {
        let mut cursor = Some(descendant);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        self.element_mut(id)
            .style
            .insert(property.to_string(), value.into());
    }

    pub fn clear_style(&mut self, id: ElementId, property: &str) {
        self.element_mut(id).style.remove(property);
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).style(property)
    }

    /// Sets a pixel-valued style property.
    pub fn set_px(&mut self, id: ElementId, property: &str, px: f64) {
        self.set_style(id, property, format!("{}px", px));
    }

    /// Reads back a pixel-valued style property.
    pub fn px(&self, id: ElementId, property: &str) -> Option<f64> {
        self.style(id, property)
            .and_then(|v| v.strip_suffix("px"))
            .and_then(|v| v.parse().ok())
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if hidden {
            self.set_style(id, DISPLAY, DISPLAY_NONE);
        } else {
            self.clear_style(id, DISPLAY);
        }
    }

    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.element(id).is_hidden()
    }

    pub fn set_col_span(&mut self, id: ElementId, col_span: usize) {
        self.element_mut(id).col_span = col_span;
    }

    pub fn col_span(&self, id: ElementId) -> usize {
        self.element(id).col_span
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.element_mut(id).text = text.into();
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.element(id).text()
    }

    pub fn add_class_name(&mut self, id: ElementId, class_name: &str) {
        let element = self.element_mut(id);
        if !element.class_names.iter().any(|c| c == class_name) {
            element.class_names.push(class_name.to_string());
        }
    }

    pub fn has_class_name(&self, id: ElementId, class_name: &str) -> bool {
        self.element(id).class_names.iter().any(|c| c == class_name)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[test]
fn test_document_structure() {
    let mut doc = Document::new();
    let section = doc.create_element(Tag::Section);
    let a = doc.create_element(Tag::Row);
    let b = doc.create_element(Tag::Row);
    let c = doc.create_element(Tag::Row);

    doc.append_child(section, a).unwrap();
    doc.append_child(section, c).unwrap();
    doc.insert_child(section, 1, b).unwrap();
    assert_eq!(doc.children(section), &[a, b, c]);
    assert_eq!(doc.index_in_parent(c), Some(2));

    // moving forward within the same parent
    doc.insert_child(section, 3, a).unwrap();
    assert_eq!(doc.children(section), &[b, c, a]);

    assert_eq!(doc.insert_child(a, 0, section), Err(Error::Cycle(section)));

    let cell = doc.create_element(Tag::Cell);
    doc.append_child(b, cell).unwrap();
    assert!(doc.is_or_has_child(section, cell));

    doc.destroy(b).unwrap();
    assert!(!doc.contains(b));
    assert!(!doc.contains(cell), "descendants should be destroyed as well");
    assert_eq!(doc.children(section), &[c, a]);
    assert_eq!(doc.remove_from_parent(b), Err(Error::NoSuchElement(b)));
}

#[test]
fn test_document_style() {
    let mut doc = Document::new();
    let cell = doc.create_element(Tag::Cell);
    doc.set_px(cell, WIDTH, 42.5);
    assert_eq!(doc.px(cell, WIDTH), Some(42.5));
    assert_eq!(doc.style(cell, WIDTH), Some("42.5px"));

    doc.set_hidden(cell, true);
    assert!(doc.is_hidden(cell));
    doc.set_hidden(cell, false);
    assert_eq!(doc.style(cell, DISPLAY), None);

    assert_eq!(doc.col_span(cell), 1);
    doc.add_class_name(cell, "v-escalator-cell");
    doc.add_class_name(cell, "v-escalator-cell");
    assert!(doc.has_class_name(cell, "v-escalator-cell"));
}
