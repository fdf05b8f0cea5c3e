// Test helpers: an in-memory sensor server and image fixtures.
#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use roi_configurator::{
    ApiError, PageController, RoiType, SaveRoiRequest, Sensor, SensorApi, SnapshotRequest,
    StrokeStyle,
};
use std::cell::RefCell;
use std::io::Cursor;

pub const GRAY: Rgba<u8> = Rgba([90, 90, 90, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Sensor server stand-in that records every request it receives.
pub struct FakeApi {
    pub sensors: Vec<Sensor>,
    pub snapshot: Vec<u8>,
    pub fail_sensors: bool,
    pub fail_save: bool,
    pub requests: RefCell<Vec<String>>,
    pub saved: RefCell<Vec<SaveRoiRequest>>,
}

impl FakeApi {
    pub fn new(sensor_ids: &[&str]) -> Self {
        Self {
            sensors: sensor_ids.iter().map(|id| Sensor::new(*id)).collect(),
            snapshot: png_bytes(200, 100),
            fail_sensors: false,
            fail_save: false,
            requests: RefCell::new(Vec::new()),
            saved: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn posts(&self) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.starts_with("POST "))
            .count()
    }
}

impl SensorApi for FakeApi {
    fn list_sensors(&self) -> Result<Vec<Sensor>, ApiError> {
        self.requests.borrow_mut().push("GET /sensors".into());
        if self.fail_sensors {
            return Err(ApiError::Status {
                status: 500,
                url: "/sensors".into(),
            });
        }
        Ok(self.sensors.clone())
    }

    fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<Vec<u8>, ApiError> {
        self.requests
            .borrow_mut()
            .push(format!("GET {}", request.path()));
        Ok(self.snapshot.clone())
    }

    fn save_roi(&self, request: &SaveRoiRequest) -> Result<serde_json::Value, ApiError> {
        self.requests.borrow_mut().push("POST /save_roi".into());
        if self.fail_save {
            return Err(ApiError::Decode("expected value at line 1 column 1".into()));
        }
        self.saved.borrow_mut().push(request.clone());
        Ok(serde_json::json!({"ok": true, "roi": request.roi}))
    }
}

/// Encode a solid gray PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, GRAY));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

/// Controller offering the given ROI types, with default red 2px strokes.
pub fn controller_with_types(types: &[&str]) -> PageController {
    PageController::new(
        types.iter().map(|t| RoiType::from(*t)).collect(),
        StrokeStyle::default(),
    )
}

/// Controller with sensors loaded and a snapshot of the first one drawn.
pub fn loaded_controller(api: &FakeApi, types: &[&str]) -> PageController {
    let mut controller = controller_with_types(types);
    controller.load_sensors(api).expect("load sensors");
    controller.load_image(api).expect("load image");
    controller
}
