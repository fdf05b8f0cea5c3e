//! ROI type and save callbacks.
//!
//! Handles: roi_type_selected, save_roi

use crate::AppWindow;
use crate::callbacks::{show_alert, spawn_ui_task};
use crate::worker::run_blocking;
use roi_configurator::{HttpSensorApi, PageController, submit_roi};
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup_submit_callbacks(
    ui: &AppWindow,
    controller: Rc<RefCell<PageController>>,
    api: HttpSensorApi,
) {
    populate_roi_types(ui, &controller.borrow());
    setup_roi_type_selected(ui, controller.clone());
    setup_save_roi(ui, controller, api);
}

fn populate_roi_types(ui: &AppWindow, controller: &PageController) {
    let types: Vec<SharedString> = controller
        .roi_types()
        .iter()
        .map(|t| SharedString::from(t.as_str()))
        .collect();
    ui.set_roi_types(ModelRc::new(VecModel::from(types)));
    if let Some(selected) = controller.selected_roi_type() {
        ui.set_selected_roi_type(selected.as_str().into());
    }
}

fn setup_roi_type_selected(ui: &AppWindow, controller: Rc<RefCell<PageController>>) {
    ui.on_roi_type_selected(move |value| {
        if !controller.borrow_mut().select_roi_type(value.as_str()) {
            log::warn!("ROI type {value:?} is not offered");
        }
    });
}

fn setup_save_roi(ui: &AppWindow, controller: Rc<RefCell<PageController>>, api: HttpSensorApi) {
    let ui_weak = ui.as_weak();
    ui.on_save_roi(move || {
        let Some(ui) = ui_weak.upgrade() else { return };

        let request = match controller.borrow().prepare_save() {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Save refused: {e}");
                show_alert(&ui, &e.to_string());
                return;
            }
        };
        let sensor_id = request.sensor_id.clone();
        let api = api.clone();
        let ui_weak = ui.as_weak();
        spawn_ui_task(async move {
            let result = run_blocking("save", move || submit_roi(&api, &request)).await;
            let Some(ui) = ui_weak.upgrade() else { return };

            match result {
                Ok(Ok(message)) => {
                    ui.set_status_text(message.as_str().into());
                    show_alert(&ui, &message);
                }
                Ok(Err(e)) => {
                    log::error!("Saving ROI for {sensor_id} failed: {e}");
                    show_alert(&ui, &format!("Save failed: {e}"));
                }
                Err(e) => {
                    log::error!("{e:#}");
                    show_alert(&ui, &format!("Save failed: {e}"));
                }
            }
        });
    });
}
