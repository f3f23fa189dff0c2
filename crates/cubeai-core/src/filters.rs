//! Typed chat filter context.
//!
//! The remote chat endpoint receives a flattened `filters` object
//! describing the oceanographic view the user is looking at. This struct
//! enumerates every recognized field with its default defined exactly
//! once, replacing the loosely typed context maps the endpoint grew up
//! with.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default forecast model. `NGOFS2` is the NOAA Northern Gulf of Mexico
/// Operational Forecast System; the `NGOSF2` spelling seen in some old
/// payloads is accepted nowhere and not emitted.
pub const DEFAULT_MODEL: &str = "NGOFS2";

/// Default oceanographic parameter to discuss.
pub const DEFAULT_PARAMETER: &str = "salinity";

/// Default system prompt sent alongside the filters.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the CubeAI oceanographic assistant. \
Answer questions about the currently displayed ocean conditions using the \
provided view filters (area, dates, depth, model, parameter) and the latest \
current-data readings. Be concise and cite the model run when relevant.";

/// The flattened view context sent to the remote chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFilters {
    /// Named viewing area
    pub area: String,
    /// Start of the displayed date range
    pub start_date: NaiveDate,
    /// End of the displayed date range
    pub end_date: NaiveDate,
    /// Depth in meters (0 = surface)
    pub depth: f64,
    /// Forecast model name
    pub model: String,
    /// Displayed parameter (salinity, temperature, ...)
    pub parameter: String,
    /// Data source selector (model output vs. sensor observations)
    pub data_source: String,
    /// Current animation frame
    pub frame: usize,
    /// Total frames in the loaded dataset
    pub total_frames: usize,
    /// Point-of-view latitude
    pub pov_lat: f64,
    /// Point-of-view longitude
    pub pov_lon: f64,
    /// Camera heading in degrees
    pub heading: f64,
    /// Latest current-speed reading (m/s), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_speed: Option<f64>,
    /// Latest current-direction reading (degrees), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_direction: Option<f64>,
    /// System prompt for the assistant
    pub system_prompt: String,
}

impl Default for ChatFilters {
    fn default() -> Self {
        let end_date = Utc::now().date_naive();
        let start_date = end_date - Days::new(7);
        Self {
            area: "Mississippi Sound".to_string(),
            start_date,
            end_date,
            depth: 0.0,
            model: DEFAULT_MODEL.to_string(),
            parameter: DEFAULT_PARAMETER.to_string(),
            data_source: "model".to_string(),
            frame: 0,
            total_frames: 0,
            pov_lat: 30.3,
            pov_lon: -88.6,
            heading: 0.0,
            current_speed: None,
            current_direction: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ChatFilters {
    /// Create filters with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewing area
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    /// Set the forecast model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the displayed parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = parameter.into();
        self
    }

    /// Set the date range
    #[must_use]
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Set the animation position
    #[must_use]
    pub fn with_frame(mut self, frame: usize, total_frames: usize) -> Self {
        self.frame = frame;
        self.total_frames = total_frames;
        self
    }

    /// Set the point of view
    #[must_use]
    pub fn with_pov(mut self, lat: f64, lon: f64, heading: f64) -> Self {
        self.pov_lat = lat;
        self.pov_lon = lon;
        self.heading = heading;
        self
    }

    /// Attach the latest current-data readings
    #[must_use]
    pub fn with_currents(mut self, speed: f64, direction: f64) -> Self {
        self.current_speed = Some(speed);
        self.current_direction = Some(direction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_canonical_model_spelling() {
        let filters = ChatFilters::default();
        assert_eq!(filters.model, "NGOFS2");
        assert_eq!(filters.parameter, "salinity");
        assert_eq!(filters.frame, 0);
        assert!(filters.current_speed.is_none());
    }

    #[test]
    fn serializes_camel_case_wire_names() {
        let filters = ChatFilters::default().with_frame(3, 24).with_currents(0.4, 110.0);
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json["totalFrames"], 24);
        assert_eq!(json["dataSource"], "model");
        assert_eq!(json["currentSpeed"], 0.4);
        assert!(json.get("current_speed").is_none());
    }

    #[test]
    fn optional_currents_omitted_when_absent() {
        let json = serde_json::to_value(ChatFilters::default()).unwrap();
        assert!(json.get("currentSpeed").is_none());
        assert!(json.get("currentDirection").is_none());
    }

    #[test]
    fn builder_overrides_only_named_fields() {
        let filters = ChatFilters::new().with_area("Gulf of Mexico").with_pov(29.0, -90.0, 45.0);
        assert_eq!(filters.area, "Gulf of Mexico");
        assert_eq!(filters.pov_lat, 29.0);
        assert_eq!(filters.model, DEFAULT_MODEL);
    }
}
