//! Callback handlers for the configurator window.
//!
//! - `sensors` - sensor list loading and selection
//! - `snapshot` - snapshot loading onto the canvas
//! - `drawing` - pointer down/up ROI drawing
//! - `submit` - ROI type selection and saving

pub mod drawing;
pub mod sensors;
pub mod snapshot;
pub mod submit;

use crate::AppWindow;
use roi_configurator::PageController;
use slint::{Rgba8Pixel, SharedPixelBuffer};

/// Push the controller's canvas raster to the window.
pub fn refresh_canvas(ui: &AppWindow, controller: &PageController) {
    let pixels = controller.canvas().pixels();
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        pixels.as_raw(),
        pixels.width(),
        pixels.height(),
    );
    ui.set_canvas_image(slint::Image::from_rgba8(buffer));
    ui.set_canvas_width(pixels.width() as i32);
    ui.set_canvas_height(pixels.height() as i32);
}

/// Show the modal notification with `text`.
pub fn show_alert(ui: &AppWindow, text: &str) {
    ui.set_alert_text(text.into());
    ui.set_alert_visible(true);
}

/// Spawn `future` on the UI event loop, logging if the loop is unavailable.
pub fn spawn_ui_task(future: impl std::future::Future<Output = ()> + 'static) {
    if let Err(e) = slint::spawn_local(future) {
        log::error!("Failed to schedule UI task: {e}");
    }
}
