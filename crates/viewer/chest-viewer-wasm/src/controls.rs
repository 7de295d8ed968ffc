//! DOM rendering of [`ControlsView`].

use chest_viewer_core::{Control, ControlsView};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::listener::EventListener;

const ACTIVE_CLASS: &str = "active";

struct ButtonSlot {
    control: Control,
    element: Element,
    _click: EventListener,
}

/// Controls row, loading message and status line mounted under a container.
pub struct ControlsDom {
    root: Element,
    loading: Element,
    row: Element,
    status: Element,
    buttons: Vec<ButtonSlot>,
}

impl ControlsDom {
    /// Build the markup under `container`. `on_click` receives the control
    /// behind each button.
    pub fn mount(
        document: &Document,
        container: &Element,
        on_click: impl Fn(Control) + Clone + 'static,
    ) -> Result<Self, JsValue> {
        let root = document.create_element("div")?;
        root.set_class_name("chest-viewer-controls");

        let loading = document.create_element("p")?;
        loading.set_class_name("chest-viewer-loading");
        let row = document.create_element("div")?;
        row.set_class_name("chest-viewer-buttons");
        let status = document.create_element("p")?;
        status.set_class_name("chest-viewer-status");

        let mut buttons = Vec::new();
        for control in Control::all() {
            let element = document.create_element("button")?;
            element.set_attribute("type", "button")?;
            let on_click = on_click.clone();
            let click = EventListener::new(&element, "click", move |_| on_click(control))?;
            row.append_child(&element)?;
            buttons.push(ButtonSlot {
                control,
                element,
                _click: click,
            });
        }

        root.append_child(&loading)?;
        root.append_child(&row)?;
        root.append_child(&status)?;
        container.append_child(&root)?;

        Ok(Self {
            root,
            loading,
            row,
            status,
            buttons,
        })
    }

    pub fn render(&self, view: &ControlsView) {
        set_visible(&self.loading, view.loading_message.is_some());
        self.loading.set_text_content(view.loading_message);

        set_visible(&self.row, !view.buttons.is_empty());
        for slot in &self.buttons {
            match view.button(slot.control) {
                Some(button) => {
                    set_visible(&slot.element, true);
                    slot.element.set_text_content(Some(button.label));
                    let _ = slot
                        .element
                        .class_list()
                        .toggle_with_force(ACTIVE_CLASS, button.active);
                }
                None => set_visible(&slot.element, false),
            }
        }

        set_visible(&self.status, view.status_line.is_some());
        self.status.set_text_content(view.status_line.as_deref());
    }

    pub fn unmount(self) {
        self.root.remove();
    }
}

fn set_visible(element: &Element, visible: bool) {
    let _ = if visible {
        element.remove_attribute("hidden")
    } else {
        element.set_attribute("hidden", "")
    };
}
