//! Abstraction over the rendering substrate.
//!
//! The widget only ever needs four capabilities from whatever draws it:
//! measuring an element, positioning/sizing it, mutating its text, and
//! mutating an attribute. Anything offering those — a browser DOM bridge,
//! a terminal canvas, a test double — can host a widget instance, and
//! several independent instances can coexist on separate surfaces.

use std::collections::HashMap;

/// Measured size of an element, in the surface's pixel unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

pub trait Surface {
    /// Current size of the element with the given id. Unknown elements
    /// measure as zero-size, which the layout math accepts.
    fn measure(&self, id: &str) -> Size;

    /// Font size of the element's text, in the same unit as [`measure`].
    ///
    /// [`measure`]: Surface::measure
    fn font_size(&self, id: &str) -> f64;

    fn set_width(&mut self, id: &str, px: f64);
    fn set_bottom(&mut self, id: &str, px: f64);
    fn set_left(&mut self, id: &str, px: f64);
    fn set_margin_top(&mut self, id: &str, px: f64);

    fn set_text(&mut self, id: &str, text: &str);
    fn set_attr(&mut self, id: &str, name: &str, value: &str);

    /// Appends one tick label to the container element, separated from the
    /// next label by `margin_after`. The container's measured height must
    /// grow accordingly, since the label column is positioned from its
    /// final content height.
    fn append_label(&mut self, container_id: &str, text: &str, margin_after: f64);

    /// Removes every label previously appended to the container.
    fn clear_labels(&mut self, container_id: &str);
}

/// An element held by [`MemorySurface`].
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    pub width: f64,
    pub height: f64,
    pub bottom: f64,
    pub left: f64,
    pub margin_top: f64,
    pub font_size: f64,
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub labels: Vec<(String, f64)>,
}

/// In-memory surface: a plain id → element map. Backs the CLI renderer
/// and the test-suite.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: HashMap<String, MemoryElement>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an element with an initial size.
    pub fn insert(&mut self, id: &str, width: f64, height: f64) -> &mut MemoryElement {
        let element = self.elements.entry(id.to_string()).or_default();
        element.width = width;
        element.height = height;
        element
    }

    /// Registers a text element with a font size.
    pub fn insert_text(&mut self, id: &str, font_size: f64) -> &mut MemoryElement {
        let element = self.elements.entry(id.to_string()).or_default();
        element.font_size = font_size;
        element
    }

    pub fn element(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> &str {
        self.elements.get(id).map_or("", |e| e.text.as_str())
    }

    pub fn attr(&self, id: &str, name: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    pub fn labels(&self, id: &str) -> &[(String, f64)] {
        self.elements.get(id).map_or(&[], |e| e.labels.as_slice())
    }

    fn entry(&mut self, id: &str) -> &mut MemoryElement {
        self.elements.entry(id.to_string()).or_default()
    }
}

impl Surface for MemorySurface {
    fn measure(&self, id: &str) -> Size {
        self.elements.get(id).map_or(Size::default(), |e| Size {
            width: e.width,
            height: e.height,
        })
    }

    fn font_size(&self, id: &str) -> f64 {
        self.elements.get(id).map_or(0.0, |e| e.font_size)
    }

    fn set_width(&mut self, id: &str, px: f64) {
        self.entry(id).width = px;
    }

    fn set_bottom(&mut self, id: &str, px: f64) {
        self.entry(id).bottom = px;
    }

    fn set_left(&mut self, id: &str, px: f64) {
        self.entry(id).left = px;
    }

    fn set_margin_top(&mut self, id: &str, px: f64) {
        self.entry(id).margin_top = px;
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.entry(id).text = text.to_string();
    }

    fn set_attr(&mut self, id: &str, name: &str, value: &str) {
        self.entry(id).attrs.insert(name.to_string(), value.to_string());
    }

    fn append_label(&mut self, container_id: &str, text: &str, margin_after: f64) {
        let font_size = self.font_size(container_id);
        let element = self.entry(container_id);
        element.labels.push((text.to_string(), margin_after));
        element.height += font_size + margin_after;
    }

    fn clear_labels(&mut self, container_id: &str) {
        let element = self.entry(container_id);
        element.labels.clear();
        element.height = 0.0;
    }
}
