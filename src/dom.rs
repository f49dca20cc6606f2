//! DOM-backed shape elements
//!
//! Each recycled element is an absolutely positioned `<div class="shape ...">`
//! inside the `#app` surface. Pooled elements stay attached but invisible, so
//! reuse never touches the DOM tree.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::recycler::Element;
use crate::shape::{Shape, ShapeKind, ShapeStyle};

/// Inline properties a shape may set; all cleared on reset
const STYLE_PROPS: [&str; 10] = [
    "left",
    "top",
    "width",
    "height",
    "background",
    "border-left",
    "border-right",
    "border-bottom",
    "transform",
    "opacity",
];

pub struct DomShape {
    /// `None` if the div could not be created; the shape is then a no-op
    el: Option<HtmlElement>,
}

impl DomShape {
    /// Create a hidden shape div under `parent`
    pub fn create(document: &Document, parent: &web_sys::Element) -> Self {
        let el = document
            .create_element("div")
            .ok()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());

        match &el {
            Some(el) => {
                if parent.append_child(el).is_err() {
                    log::warn!("Failed to attach shape element");
                }
            }
            None => log::warn!("Failed to create shape element"),
        }

        let mut shape = Self { el };
        shape.reset();
        shape
    }

    fn set(&self, prop: &str, value: &str) {
        if let Some(el) = &self.el {
            let _ = el.style().set_property(prop, value);
        }
    }
}

impl Element for DomShape {
    fn reset(&mut self) {
        let Some(el) = &self.el else { return };
        el.set_class_name("shape");
        let style = el.style();
        for prop in STYLE_PROPS {
            let _ = style.remove_property(prop);
        }
        let _ = style.set_property("opacity", "0");
    }

    fn release(self) {
        if let Some(el) = self.el {
            el.remove();
        }
    }
}

impl Shape for DomShape {
    fn show(&mut self, style: &ShapeStyle) {
        let Some(el) = &self.el else { return };
        el.set_class_name(&format!("shape {}", style.kind.as_str()));

        let layout = style.layout();
        let color = style.color.css();
        self.set("left", &format!("{}px", layout.left));
        self.set("top", &format!("{}px", layout.top));
        self.set("width", &format!("{}px", layout.width));
        self.set("height", &format!("{}px", layout.height));

        match (style.kind, layout.borders) {
            (ShapeKind::Triangle, Some(b)) => {
                let _ = el.style().remove_property("background");
                self.set("border-left", &format!("{}px solid transparent", b.side));
                self.set("border-right", &format!("{}px solid transparent", b.side));
                self.set("border-bottom", &format!("{}px solid {}", b.bottom, color));
            }
            _ => {
                for prop in ["border-left", "border-right", "border-bottom"] {
                    let _ = el.style().remove_property(prop);
                }
                self.set("background", &color);
            }
        }

        self.set("transform", &format!("rotate({}deg)", style.rotation_deg));
        self.set("opacity", &style.opacity.to_string());
    }
}
