//! Drawing callbacks for ROI creation.
//!
//! Handles: pointer_down, pointer_up

use crate::AppWindow;
use crate::callbacks::refresh_canvas;
use roi_configurator::PageController;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;

/// Sets up all drawing-related callbacks on the UI.
pub fn setup_drawing_callbacks(ui: &AppWindow, controller: Rc<RefCell<PageController>>) {
    setup_pointer_down(ui, controller.clone());
    setup_pointer_up(ui, controller);
}

fn setup_pointer_down(ui: &AppWindow, controller: Rc<RefCell<PageController>>) {
    ui.on_pointer_down(move |x, y| {
        controller.borrow_mut().pointer_down(x, y);
    });
}

fn setup_pointer_up(ui: &AppWindow, controller: Rc<RefCell<PageController>>) {
    let ui_weak = ui.as_weak();
    ui.on_pointer_up(move |x, y| {
        let mut controller = controller.borrow_mut();
        let Some(roi) = controller.pointer_up(x, y) else { return };

        if let Some(ui) = ui_weak.upgrade() {
            refresh_canvas(&ui, &controller);
            ui.set_status_text(format!("ROI {roi}").into());
        }
    });
}
