//! Page controller: sensor list, snapshot canvas, ROI drawing and submission.
//!
//! The controller owns all page state and is driven from a single thread.
//! Network access goes through [`SensorApi`]. Each operation comes in two
//! forms: a one-shot method that performs the request itself (`load_sensors`,
//! `load_image`, `save_roi`), and split steps that let the UI run the blocking
//! request elsewhere and feed the result back in (`apply_sensors`,
//! `begin_image_load`/`apply_snapshot`, `prepare_save`/[`submit_roi`]). The
//! one-shot forms are built from the split steps.

use crate::api::{SaveRoiRequest, Sensor, SensorApi, SnapshotRequest};
use crate::canvas::Canvas;
use crate::config::RoiConfig;
use crate::error::ControllerError;
use crate::roi::{DragState, Roi, RoiDrawer, RoiType};
use crate::utils::{now_millis, parse_color};
use image::Rgba;

pub const DEFAULT_STROKE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const DEFAULT_LINE_WIDTH: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: Rgba<u8>,
    pub line_width: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl StrokeStyle {
    pub fn from_config(config: &RoiConfig) -> Self {
        let color = parse_color(&config.stroke_color).unwrap_or_else(|| {
            log::warn!(
                "Invalid stroke color {:?}, falling back to red",
                config.stroke_color
            );
            DEFAULT_STROKE_COLOR
        });
        Self {
            color,
            line_width: config.line_width.max(1),
        }
    }
}

/// Text shown to the user after a successful save.
pub fn saved_message(roi: Roi) -> String {
    format!("Saved: {roi}")
}

/// Post a prepared save request and return the message to show the user.
///
/// Takes no controller state, so the UI can run it on a worker thread.
pub fn submit_roi(
    api: &impl SensorApi,
    request: &SaveRoiRequest,
) -> Result<String, ControllerError> {
    log::info!(
        "Saving ROI {} ({}) for {}",
        request.roi,
        request.roi_type,
        request.sensor_id
    );
    let reply = api.save_roi(request)?;
    log::debug!("save_roi replied {reply}");
    Ok(saved_message(request.roi))
}

#[derive(Debug, Default)]
pub struct PageController {
    sensors: Vec<Sensor>,
    selected_sensor: Option<String>,
    /// Sensor whose snapshot was last requested; read by the submitter.
    current_sensor: Option<String>,
    pending_snapshot: Option<SnapshotRequest>,
    roi_types: Vec<RoiType>,
    selected_roi_type: Option<RoiType>,
    drawer: RoiDrawer,
    roi: Option<Roi>,
    canvas: Canvas,
    stroke: StrokeStyle,
}

impl PageController {
    pub fn new(roi_types: Vec<RoiType>, stroke: StrokeStyle) -> Self {
        let selected_roi_type = roi_types.first().cloned();
        Self {
            roi_types,
            selected_roi_type,
            stroke,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RoiConfig) -> Self {
        let types = config
            .types
            .iter()
            .map(|t| RoiType::from(t.as_str()))
            .collect();
        Self::new(types, StrokeStyle::from_config(config))
    }

    // ---- sensor list ----

    /// Fetch the sensor list and populate the selection.
    /// On failure the selection is left untouched.
    pub fn load_sensors(&mut self, api: &impl SensorApi) -> Result<usize, ControllerError> {
        let sensors = api.list_sensors()?;
        Ok(self.apply_sensors(sensors))
    }

    /// Append sensors as options, in the order given. The first option becomes
    /// the selection if nothing is selected yet.
    pub fn apply_sensors(&mut self, sensors: Vec<Sensor>) -> usize {
        let count = sensors.len();
        self.sensors.extend(sensors);
        if self.selected_sensor.is_none() {
            self.selected_sensor = self.sensors.first().map(|s| s.id.clone());
        }
        log::info!("Loaded {count} sensors");
        count
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Option values of the sensor selection, in display order.
    pub fn sensor_options(&self) -> Vec<&str> {
        self.sensors.iter().map(|s| s.id.as_str()).collect()
    }

    /// Select a sensor by id. Returns false if no option has that id.
    pub fn select_sensor(&mut self, id: &str) -> bool {
        if self.sensors.iter().any(|s| s.id == id) {
            self.selected_sensor = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected_sensor(&self) -> Option<&str> {
        self.selected_sensor.as_deref()
    }

    pub fn current_sensor(&self) -> Option<&str> {
        self.current_sensor.as_deref()
    }

    pub fn current_sensor_info(&self) -> Option<&Sensor> {
        let id = self.current_sensor.as_deref()?;
        self.sensors.iter().find(|s| s.id == id)
    }

    // ---- snapshot ----

    /// Fetch and draw a fresh snapshot of the selected sensor.
    pub fn load_image(&mut self, api: &impl SensorApi) -> Result<(u32, u32), ControllerError> {
        let request = self.begin_image_load(now_millis())?;
        let bytes = api.fetch_snapshot(&request)?;
        let dims = self.apply_snapshot(&request, &bytes)?;
        // The request was just issued, so it cannot have been superseded.
        Ok(dims.unwrap_or_else(|| self.canvas.dimensions()))
    }

    /// Record the selected sensor as current and build its snapshot request.
    /// Any earlier request still in flight is superseded.
    pub fn begin_image_load(
        &mut self,
        timestamp_ms: i64,
    ) -> Result<SnapshotRequest, ControllerError> {
        let sensor_id = self
            .selected_sensor
            .clone()
            .ok_or(ControllerError::NoSensorSelected)?;
        let request = SnapshotRequest::new(sensor_id.clone(), timestamp_ms);
        log::info!("Requesting snapshot {}", request.path());
        self.current_sensor = Some(sensor_id);
        self.pending_snapshot = Some(request.clone());
        Ok(request)
    }

    /// Decode snapshot bytes, resize the canvas to the image and draw it.
    ///
    /// Returns `Ok(None)` if `request` has been superseded by a later load.
    /// A decode failure leaves the canvas unchanged.
    pub fn apply_snapshot(
        &mut self,
        request: &SnapshotRequest,
        bytes: &[u8],
    ) -> Result<Option<(u32, u32)>, ControllerError> {
        if self.pending_snapshot.as_ref() != Some(request) {
            log::debug!("Ignoring superseded snapshot {}", request.path());
            return Ok(None);
        }
        self.pending_snapshot = None;

        let image = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = image.dimensions();
        self.canvas.resize(width, height);
        self.canvas.draw_image(&image);
        log::info!("Drew snapshot for {} ({width}x{height})", request.sensor_id);
        Ok(Some((width, height)))
    }

    /// Drop the in-flight snapshot request after a failed fetch.
    pub fn abandon_snapshot(&mut self, request: &SnapshotRequest) {
        if self.pending_snapshot.as_ref() == Some(request) {
            self.pending_snapshot = None;
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    // ---- drawing ----

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.drawer.pointer_down(x, y);
    }

    /// Complete a drag. Releases while idle, or outside the canvas, are ignored.
    /// On completion the outline is stroked and the ROI replaces the stored one.
    pub fn pointer_up(&mut self, x: i32, y: i32) -> Option<Roi> {
        if !self.drawer.is_dragging() {
            return None;
        }
        if !self.canvas.contains(x, y) {
            log::debug!("Release at ({x}, {y}) is off-canvas, drag stays open");
            return None;
        }
        let roi = self.drawer.pointer_up(x, y)?;
        self.canvas
            .stroke_rect(roi, self.stroke.color, self.stroke.line_width);
        self.roi = Some(roi);
        log::info!("ROI set to {roi}");
        Some(roi)
    }

    pub fn drag_state(&self) -> DragState {
        self.drawer.state()
    }

    pub fn roi(&self) -> Option<Roi> {
        self.roi
    }

    // ---- ROI type ----

    pub fn roi_types(&self) -> &[RoiType] {
        &self.roi_types
    }

    /// Select a ROI type by value. Returns false if it is not offered.
    pub fn select_roi_type(&mut self, value: &str) -> bool {
        match self.roi_types.iter().find(|t| t.as_str() == value) {
            Some(t) => {
                self.selected_roi_type = Some(t.clone());
                true
            }
            None => false,
        }
    }

    pub fn selected_roi_type(&self) -> Option<&RoiType> {
        self.selected_roi_type.as_ref()
    }

    // ---- submit ----

    /// Submit the stored ROI and return the message to show the user.
    pub fn save_roi(&self, api: &impl SensorApi) -> Result<String, ControllerError> {
        submit_roi(api, &self.prepare_save()?)
    }

    /// Assemble the save payload. Fails if no drag has completed, no image has
    /// been loaded, or no ROI type is selected.
    pub fn prepare_save(&self) -> Result<SaveRoiRequest, ControllerError> {
        let roi = self.roi.ok_or(ControllerError::NoRoi)?;
        let sensor_id = self
            .current_sensor
            .clone()
            .ok_or(ControllerError::NoSensorLoaded)?;
        let roi_type = self
            .selected_roi_type
            .clone()
            .ok_or(ControllerError::NoRoiType)?;
        Ok(SaveRoiRequest {
            sensor_id,
            roi_type,
            roi,
        })
    }
}
