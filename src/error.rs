//! Error types shared by the API client and the page controller.

use thiserror::Error;

/// Failure talking to the sensor server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Failure of a page-controller operation.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to decode snapshot: {0}")]
    Image(#[from] image::ImageError),
    #[error("No sensor selected.")]
    NoSensorSelected,
    #[error("Load a sensor image first.")]
    NoSensorLoaded,
    #[error("Draw ROI first.")]
    NoRoi,
    #[error("No ROI type selected.")]
    NoRoiType,
}
