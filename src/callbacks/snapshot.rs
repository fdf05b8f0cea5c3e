//! Snapshot loading callback.
//!
//! Handles: load_image

use crate::AppWindow;
use crate::callbacks::{refresh_canvas, spawn_ui_task};
use crate::worker::run_blocking;
use roi_configurator::utils::now_millis;
use roi_configurator::{HttpSensorApi, PageController, SensorApi};
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup_snapshot_callbacks(
    ui: &AppWindow,
    controller: Rc<RefCell<PageController>>,
    api: HttpSensorApi,
) {
    let ui_weak = ui.as_weak();
    ui.on_load_image(move || {
        let Some(ui) = ui_weak.upgrade() else { return };

        let request = match controller.borrow_mut().begin_image_load(now_millis()) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Load refused: {e}");
                ui.set_status_text(e.to_string().into());
                return;
            }
        };
        ui.set_status_text(format!("Loading {}...", request.sensor_id).into());

        let api = api.clone();
        let controller = controller.clone();
        let ui_weak = ui.as_weak();
        spawn_ui_task(async move {
            let job_request = request.clone();
            let fetched = run_blocking("snapshot", move || api.fetch_snapshot(&job_request)).await;
            let Some(ui) = ui_weak.upgrade() else { return };
            let mut controller = controller.borrow_mut();

            let bytes = match fetched {
                Ok(Ok(bytes)) => bytes,
                Ok(Err(e)) => {
                    log::error!("Snapshot fetch failed for {}: {e}", request.sensor_id);
                    controller.abandon_snapshot(&request);
                    ui.set_status_text(format!("Snapshot failed: {e}").into());
                    return;
                }
                Err(e) => {
                    log::error!("{e:#}");
                    controller.abandon_snapshot(&request);
                    ui.set_status_text(format!("Snapshot failed: {e}").into());
                    return;
                }
            };

            match controller.apply_snapshot(&request, &bytes) {
                Ok(Some((width, height))) => {
                    refresh_canvas(&ui, &controller);
                    let saved = controller
                        .current_sensor_info()
                        .and_then(|s| s.roi_display)
                        .map(|roi| format!(", saved ROI {roi}"))
                        .unwrap_or_default();
                    ui.set_status_text(
                        format!("{} {width}x{height}{saved}", request.sensor_id).into(),
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Snapshot for {} not drawn: {e}", request.sensor_id);
                    ui.set_status_text(e.to_string().into());
                }
            }
        });
    });
}
