//! Sensor list callbacks.
//!
//! Handles: startup sensor fetch, sensor_selected

use crate::AppWindow;
use crate::callbacks::spawn_ui_task;
use crate::worker::run_blocking;
use roi_configurator::{HttpSensorApi, PageController, SensorApi};
use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

/// Sets up sensor selection and kicks off the initial sensor fetch.
pub fn setup_sensor_callbacks(
    ui: &AppWindow,
    controller: Rc<RefCell<PageController>>,
    api: HttpSensorApi,
) {
    setup_sensor_selected(ui, controller.clone());
    load_sensor_list(ui, controller, api);
}

fn setup_sensor_selected(ui: &AppWindow, controller: Rc<RefCell<PageController>>) {
    ui.on_sensor_selected(move |value| {
        if !controller.borrow_mut().select_sensor(value.as_str()) {
            log::warn!("Selected sensor {value:?} is not in the list");
        }
    });
}

fn load_sensor_list(ui: &AppWindow, controller: Rc<RefCell<PageController>>, api: HttpSensorApi) {
    let ui_weak = ui.as_weak();
    ui.set_status_text("Loading sensors...".into());
    spawn_ui_task(async move {
        let result = run_blocking("sensors", move || api.list_sensors()).await;
        let Some(ui) = ui_weak.upgrade() else { return };

        let sensors = match result {
            Ok(Ok(sensors)) => sensors,
            Ok(Err(e)) => {
                log::error!("Failed to load sensors: {e}");
                ui.set_status_text(format!("Failed to load sensors: {e}").into());
                return;
            }
            Err(e) => {
                log::error!("{e:#}");
                ui.set_status_text(format!("Failed to load sensors: {e}").into());
                return;
            }
        };

        let mut controller = controller.borrow_mut();
        let count = controller.apply_sensors(sensors);
        let options: Vec<SharedString> = controller
            .sensor_options()
            .into_iter()
            .map(SharedString::from)
            .collect();
        ui.set_sensor_options(ModelRc::new(VecModel::from(options)));
        ui.set_selected_sensor(controller.selected_sensor().unwrap_or_default().into());
        ui.set_status_text(format!("{count} sensors available").into());
    });
}
