//! HTTP surface of the sensor server.
//!
//! Three endpoints are used:
//! - `GET /sensors` lists the configured sensors
//! - `GET /snapshot/{sensor_id}?t={timestamp}` returns a fresh image
//! - `POST /save_roi` stores a rectangle for a sensor
//!
//! `SensorApi` is the seam the controller talks through, so it can be driven
//! by an in-memory fake in tests. `HttpSensorApi` is the blocking reqwest
//! implementation used by the application.

use crate::error::ApiError;
use crate::roi::{Roi, RoiType};
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

const SNAPSHOT_SEGMENT: &str = "snapshot";

/// Entry of the `/sensors` listing. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_url: Option<String>,
    /// Last saved ROI. A value that is not four numbers is dropped rather
    /// than failing the whole listing.
    #[serde(
        default,
        deserialize_with = "lenient_roi",
        skip_serializing_if = "Option::is_none"
    )]
    pub roi_display: Option<Roi>,
}

fn lenient_roi<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Roi>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let roi = roi_from_value(&v);
        if roi.is_none() {
            log::warn!("Ignoring malformed roi_display {v}");
        }
        roi
    }))
}

/// Accepts integers, floats (truncated) and numeric strings, like `int()` would.
fn roi_from_value(value: &Value) -> Option<Roi> {
    let items = value.as_array()?;
    if items.len() != 4 {
        return None;
    }
    let mut out = [0i32; 4];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = match item {
            Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).ok()?,
                None => {
                    let f = n.as_f64().filter(|f| f.is_finite())?;
                    f.trunc() as i32
                }
            },
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
    }
    Some(Roi::from(out))
}

impl Sensor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            snapshot_url: None,
            roi_display: None,
        }
    }
}

/// Cache-busting snapshot fetch for one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub sensor_id: String,
    pub timestamp_ms: i64,
}

impl SnapshotRequest {
    pub fn new(sensor_id: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            timestamp_ms,
        }
    }

    /// Request path relative to the server root, encoded exactly as sent.
    pub fn path(&self) -> String {
        let Ok(mut url) = Url::parse("http://localhost/") else {
            return format!("/{SNAPSHOT_SEGMENT}/{}?t={}", self.sensor_id, self.timestamp_ms);
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([SNAPSHOT_SEGMENT, &self.sensor_id]);
        }
        self.append_query(&mut url);
        format!("{}?{}", url.path(), url.query().unwrap_or_default())
    }

    fn append_query(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair("t", &self.timestamp_ms.to_string());
    }
}

/// Body of `POST /save_roi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRoiRequest {
    pub sensor_id: String,
    pub roi_type: RoiType,
    pub roi: Roi,
}

pub trait SensorApi {
    fn list_sensors(&self) -> Result<Vec<Sensor>, ApiError>;

    fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<Vec<u8>, ApiError>;

    /// Returns the server's reply as opaque JSON.
    fn save_roi(&self, request: &SaveRoiRequest) -> Result<serde_json::Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpSensorApi {
    client: Client,
    base_url: Url,
}

impl HttpSensorApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Full URL `fetch_snapshot` requests for `request`.
    pub fn snapshot_url(&self, request: &SnapshotRequest) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&[SNAPSHOT_SEGMENT, &request.sensor_id])?;
        request.append_query(&mut url);
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SensorApi for HttpSensorApi {
    fn list_sensors(&self) -> Result<Vec<Sensor>, ApiError> {
        let url = self.endpoint(&["sensors"])?;
        log::debug!("GET {url}");
        let response = Self::check_status(self.client.get(url).send()?)?;
        Self::read_json(response)
    }

    fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<Vec<u8>, ApiError> {
        let url = self.snapshot_url(request)?;
        log::debug!("GET {url}");
        let response = Self::check_status(self.client.get(url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }

    fn save_roi(&self, request: &SaveRoiRequest) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(&["save_roi"])?;
        log::debug!("POST {url}");
        let response = Self::check_status(self.client.post(url).json(request).send()?)?;
        Self::read_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Answers exactly one HTTP request on a local port. Yields the base URL
    /// and a receiver for `(request_line, request_body)`.
    fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: &'static [u8],
    ) -> (String, mpsc::Receiver<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
            stream.flush().unwrap();
            tx.send((
                request_line.trim_end().to_string(),
                String::from_utf8_lossy(&request_body).into_owned(),
            ))
            .unwrap();
        });
        (base, rx)
    }

    fn local_api(base: &str) -> HttpSensorApi {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpSensorApi::with_client(base, client).unwrap()
    }

    fn zone_request() -> SaveRoiRequest {
        SaveRoiRequest {
            sensor_id: "s1".into(),
            roi_type: RoiType::from("zone"),
            roi: Roi::new(10, 20, 100, 50),
        }
    }

    #[test]
    fn sensor_listing_ignores_unknown_fields() {
        let body = r#"[
            {"id": "s1", "snapshot_url": "http://cam/1.jpg", "roi_display": [1, 2, 3, 4], "extra": true},
            {"id": "s2"}
        ]"#;
        let sensors: Vec<Sensor> = serde_json::from_str(body).unwrap();
        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].roi_display, Some(Roi::new(1, 2, 3, 4)));
        assert_eq!(sensors[1], Sensor::new("s2"));
    }

    #[test]
    fn snapshot_path_carries_timestamp() {
        let req = SnapshotRequest::new("s1", 1_700_000_000_123);
        assert_eq!(req.path(), "/snapshot/s1?t=1700000000123");
    }

    #[test]
    fn save_body_matches_wire_format() {
        let req = SaveRoiRequest {
            sensor_id: "s1".into(),
            roi_type: RoiType::from("zone"),
            roi: Roi::new(10, 20, 100, 50),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"sensor_id": "s1", "roi_type": "zone", "roi": [10, 20, 100, 50]})
        );
    }

    #[test]
    fn endpoints_join_under_base_path() {
        let api = HttpSensorApi::new("http://127.0.0.1:8088/roi/", Duration::from_secs(1)).unwrap();
        let url = api.endpoint(&["snapshot", "cam 1"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8088/roi/snapshot/cam%201");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpSensorApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn malformed_roi_display_becomes_none() {
        let body = r#"[
            {"id": "a", "roi_display": [10.0, 20, "30", 40.9]},
            {"id": "b", "roi_display": [1, 2, 3]},
            {"id": "c", "roi_display": "abc"},
            {"id": "d", "roi_display": null},
            {"id": "e", "roi_display": [1, 2, 3, 99999999999]}
        ]"#;
        let sensors: Vec<Sensor> = serde_json::from_str(body).unwrap();
        let rois: Vec<_> = sensors.iter().map(|s| s.roi_display).collect();
        assert_eq!(rois, [Some(Roi::new(10, 20, 30, 40)), None, None, None, None]);
    }

    #[test]
    fn snapshot_url_encodes_sensor_id() {
        let api = HttpSensorApi::new("http://127.0.0.1:8088/roi/", Duration::from_secs(1)).unwrap();
        let req = SnapshotRequest::new("cam 1", 5);
        let url = api.snapshot_url(&req).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8088/roi/snapshot/cam%201?t=5");
    }

    #[test]
    fn snapshot_path_matches_wire_url() {
        let api = HttpSensorApi::new("http://127.0.0.1:8088", Duration::from_secs(1)).unwrap();
        let req = SnapshotRequest::new("cam 1", 1_700_000_000_123);
        let url = api.snapshot_url(&req).unwrap();
        let wire = format!("{}?{}", url.path(), url.query().unwrap());
        assert_eq!(req.path(), wire);
        assert_eq!(req.path(), "/snapshot/cam%201?t=1700000000123");
    }

    #[test]
    fn list_sensors_reports_server_error_status() {
        let (base, rx) = serve_once("500 Internal Server Error", "text/plain", b"boom");
        let err = local_api(&base).list_sensors().unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }), "{err:?}");
        let (request_line, _) = rx.recv().unwrap();
        assert_eq!(request_line, "GET /sensors HTTP/1.1");
    }

    #[test]
    fn list_sensors_tolerates_bad_roi_display() {
        let (base, _rx) = serve_once(
            "200 OK",
            "application/json",
            br#"[{"id":"s1","roi_display":[10.0,20,30,40]},{"id":"s2","roi_display":"x"}]"#,
        );
        let sensors = local_api(&base).list_sensors().unwrap();
        let ids: Vec<_> = sensors.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s1", "s2"]);
        assert_eq!(sensors[0].roi_display, Some(Roi::new(10, 20, 30, 40)));
        assert_eq!(sensors[1].roi_display, None);
    }

    #[test]
    fn fetch_snapshot_requests_cache_busted_path() {
        let (base, rx) = serve_once("200 OK", "image/png", b"\x89PNG-bytes");
        let req = SnapshotRequest::new("s1", 1_700_000_000_123);
        let bytes = local_api(&base).fetch_snapshot(&req).unwrap();
        assert_eq!(bytes, b"\x89PNG-bytes");
        let (request_line, _) = rx.recv().unwrap();
        let target = request_line
            .strip_prefix("GET /snapshot/s1?t=")
            .and_then(|rest| rest.strip_suffix(" HTTP/1.1"))
            .unwrap();
        assert!(!target.is_empty() && target.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn save_roi_rejects_non_json_reply() {
        let (base, rx) = serve_once("200 OK", "text/html", b"<html>ok</html>");
        let err = local_api(&base).save_roi(&zone_request()).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
        let (request_line, body) = rx.recv().unwrap();
        assert_eq!(request_line, "POST /save_roi HTTP/1.1");
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"sensor_id": "s1", "roi_type": "zone", "roi": [10, 20, 100, 50]})
        );
    }

    #[test]
    fn save_roi_returns_reply_json() {
        let (base, _rx) = serve_once("200 OK", "application/json", br#"{"ok": true}"#);
        let reply = local_api(&base).save_roi(&zone_request()).unwrap();
        assert_eq!(reply, serde_json::json!({"ok": true}));
    }
}
