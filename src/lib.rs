//! ROI Configurator core.
//!
//! Everything the desktop client needs except the window itself: the sensor
//! server client, the ROI drag state machine, the canvas raster and the page
//! controller tying them together.

pub mod api;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod roi;
pub mod utils;

pub use api::{HttpSensorApi, SaveRoiRequest, Sensor, SensorApi, SnapshotRequest};
pub use canvas::Canvas;
pub use controller::{PageController, StrokeStyle, saved_message, submit_roi};
pub use error::{ApiError, ControllerError};
pub use roi::{DragState, Roi, RoiDrawer, RoiType};
