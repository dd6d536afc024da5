//! The widget controller: one `Thermometer` per mounted widget, owning its
//! display state and its handle to the rendering surface. Nothing here
//! reads ambient globals, so several instances can share a page as long
//! as each gets its own surface and element ids.

use crate::{
    error::WidgetError,
    layout,
    model::{DisplayState, GeometryFrame, LocationQuery, Range, WeatherReading, degrees},
    provider::{PlaceResolver, ReverseGeocoder, WeatherSource},
    surface::Surface,
};

/// Warning shown when the geocoder matches more than one place; the first
/// match is used anyway.
pub const AMBIGUOUS_PLACE_WARNING: &str = "More than one place found so the best guess has been \
     shown. Please, be more specific (eg. including the state or nation like: Frattamaggiore, \
     Campania, Italy)";

/// Ids of the elements the widget drives on its surface.
#[derive(Debug, Clone)]
pub struct ElementIds {
    /// The meter element acting as the thermometer.
    pub gauge: String,
    /// The gauge's container; also the parent the label column centers in.
    pub wrapper: String,
    /// The element holding the tick labels.
    pub labels: String,
    pub error: String,
    pub city: String,
    pub temperature: String,
    /// Text field the geolocation variant writes the resolved name into.
    pub location_input: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            gauge: "thermometer".to_string(),
            wrapper: "thermometer-wrapper".to_string(),
            labels: "thermometer-labels".to_string(),
            error: "error".to_string(),
            city: "city".to_string(),
            temperature: "temperature".to_string(),
            location_input: "location".to_string(),
        }
    }
}

/// Identifies one submission. A response is applied only while its token
/// is still the latest issued, so a stale late arrival can never overwrite
/// a newer submission's display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubmissionToken(u64);

pub struct Thermometer<S> {
    surface: S,
    ids: ElementIds,
    range: Range,
    state: DisplayState,
    seq: u64,
}

impl<S: Surface> Thermometer<S> {
    pub fn new(surface: S, ids: ElementIds, range: Range) -> Self {
        Self {
            surface,
            ids,
            range,
            state: DisplayState::default(),
            seq: 0,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    /// Measures the container and the gauge. Always read fresh: the
    /// surface is the source of truth for geometry.
    fn frame(&self) -> GeometryFrame {
        let wrapper = self.surface.measure(&self.ids.wrapper);
        let gauge = self.surface.measure(&self.ids.gauge);
        GeometryFrame {
            container_width: wrapper.width,
            container_height: wrapper.height,
            element_width: gauge.width,
            element_height: gauge.height,
        }
    }

    /// Positions the gauge, renders the tick labels, then centers the
    /// label column. Safe to call again after a resize; labels are
    /// rebuilt from scratch each time.
    pub fn mount(&mut self) {
        let frame = self.frame();

        let placement = layout::gauge_placement(&frame);
        self.surface.set_width(&self.ids.gauge, placement.width);
        self.surface.set_bottom(&self.ids.gauge, placement.bottom);
        self.surface.set_left(&self.ids.gauge, placement.left);
        self.surface
            .set_attr(&self.ids.gauge, "max", &gauge_value(self.range.max));
        self.surface
            .set_attr(&self.ids.gauge, "min", &gauge_value(self.range.min));

        let font_size = self.surface.font_size(&self.ids.labels);
        let margin = layout::label_margin(placement.width, font_size, &self.range);

        self.surface.clear_labels(&self.ids.labels);
        for label in layout::tick_labels(&self.range, margin) {
            self.surface
                .append_label(&self.ids.labels, &label.text, label.margin_after);
        }

        // Column placement depends on the final content height, so it has
        // to happen after every label is attached.
        let labels_height = self.surface.measure(&self.ids.labels).height;
        let column = layout::label_column_placement(
            frame.container_width,
            frame.element_height,
            frame.container_height,
            labels_height,
        );
        self.surface.set_width(&self.ids.labels, column.width);
        self.surface.set_margin_top(&self.ids.labels, column.margin_top);
    }

    /// Clears the three display slots back to their empty defaults,
    /// regardless of prior state.
    pub fn reset(&mut self) {
        self.state = DisplayState::default();
        self.surface.set_text(&self.ids.error, &self.state.error);
        self.surface.set_text(&self.ids.city, &self.state.city);
        self.surface
            .set_text(&self.ids.temperature, &self.state.temperature);
    }

    /// Issues a fresh token, invalidating every outstanding submission.
    pub fn begin_submission(&mut self) -> SubmissionToken {
        self.seq += 1;
        SubmissionToken(self.seq)
    }

    fn is_current(&self, token: SubmissionToken) -> bool {
        token.0 == self.seq
    }

    /// Writes the city slot; dropped (returning false) when stale.
    pub fn apply_city(&mut self, token: SubmissionToken, name: &str) -> bool {
        if !self.is_current(token) {
            tracing::debug!(name, "dropping stale city update");
            return false;
        }
        self.state.city = name.to_string();
        self.surface.set_text(&self.ids.city, name);
        true
    }

    /// Writes the error slot; dropped (returning false) when stale.
    pub fn apply_error(&mut self, token: SubmissionToken, message: &str) -> bool {
        if !self.is_current(token) {
            tracing::debug!(message, "dropping stale error");
            return false;
        }
        self.state.error = message.to_string();
        self.surface.set_text(&self.ids.error, message);
        true
    }

    /// Projects a reading into the temperature slot and the gauge's value
    /// attribute; dropped (returning false) when stale.
    pub fn apply_reading(&mut self, token: SubmissionToken, reading: &WeatherReading) -> bool {
        if !self.is_current(token) {
            tracing::debug!(
                temperature = reading.temperature_c,
                "dropping stale weather reading"
            );
            return false;
        }
        self.state.temperature = degrees(reading.temperature_c);
        self.surface
            .set_text(&self.ids.temperature, &self.state.temperature);
        self.surface
            .set_attr(&self.ids.gauge, "value", &gauge_value(reading.temperature_c));
        true
    }

    /// The submission pipeline: optimistic city text, then resolve, then
    /// fetch, strictly in sequence. A failed resolve short-circuits the
    /// fetch; every outcome is token-guarded on application.
    pub async fn submit(
        &mut self,
        resolver: &dyn PlaceResolver,
        source: &dyn WeatherSource,
        location: &str,
    ) -> Result<WeatherReading, WidgetError> {
        let token = self.begin_submission();
        self.apply_city(token, location);

        let place = match resolver.resolve(location).await {
            Ok(place) => place,
            Err(err) => {
                self.apply_error(token, &err.to_string());
                return Err(err);
            }
        };

        if place.is_ambiguous() {
            // Best guess proceeds; the user just gets told about it.
            self.apply_error(token, AMBIGUOUS_PLACE_WARNING);
        }

        match source.current(&place.woeid).await {
            Ok(reading) => {
                self.apply_reading(token, &reading);
                Ok(reading)
            }
            Err(err) => {
                self.apply_error(token, &err.to_string());
                Err(err)
            }
        }
    }

    /// Geolocation variant: reverse geocode the coordinates and populate
    /// the location text field with the resolved name.
    pub async fn locate(
        &mut self,
        reverse: &dyn ReverseGeocoder,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, WidgetError> {
        let token = self.begin_submission();

        match reverse.reverse(latitude, longitude).await {
            Ok(name) => {
                if self.is_current(token) {
                    self.surface.set_text(&self.ids.location_input, &name);
                }
                Ok(name)
            }
            Err(err) => {
                self.apply_error(token, &err.to_string());
                Err(err)
            }
        }
    }

    /// Runs a whole query: coordinates are reverse geocoded into a name
    /// first, then the name goes through the submission pipeline.
    pub async fn submit_query(
        &mut self,
        resolver: &dyn PlaceResolver,
        source: &dyn WeatherSource,
        reverse: &dyn ReverseGeocoder,
        query: &LocationQuery,
    ) -> Result<WeatherReading, WidgetError> {
        match query {
            LocationQuery::Name(name) => self.submit(resolver, source, name).await,
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => {
                let name = self.locate(reverse, *latitude, *longitude).await?;
                self.submit(resolver, source, &name).await
            }
        }
    }
}

/// Attribute rendition of a gauge value: the bare number, no degree sign.
fn gauge_value(value: f64) -> String {
    if value.fract() == 0.0 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResolvedPlace;
    use crate::surface::MemorySurface;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct StubResolver {
        match_count: u32,
        woeid: &'static str,
    }

    #[async_trait]
    impl PlaceResolver for StubResolver {
        async fn resolve(&self, location: &str) -> Result<ResolvedPlace, WidgetError> {
            if self.match_count == 0 {
                return Err(WidgetError::NoMatch);
            }
            Ok(ResolvedPlace {
                woeid: self.woeid.to_string(),
                name: location.to_string(),
                match_count: self.match_count,
            })
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSource {
        temperature: Option<f64>,
        missing_title: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WeatherSource for RecordingSource {
        async fn current(&self, woeid: &str) -> Result<WeatherReading, WidgetError> {
            self.calls.lock().expect("lock").push(woeid.to_string());
            match self.temperature {
                Some(t) => Ok(WeatherReading::new(t)),
                None => Err(WidgetError::MissingCondition(
                    self.missing_title.unwrap_or_default().to_string(),
                )),
            }
        }
    }

    #[derive(Debug)]
    struct StubReverse {
        name: Option<&'static str>,
    }

    #[async_trait]
    impl ReverseGeocoder for StubReverse {
        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<String, WidgetError> {
            self.name
                .map(str::to_string)
                .ok_or(WidgetError::LocationUnavailable)
        }
    }

    fn demo_widget() -> Thermometer<MemorySurface> {
        let mut surface = MemorySurface::new();
        surface.insert("thermometer-wrapper", 200.0, 400.0);
        surface.insert("thermometer", 360.0, 40.0);
        surface.insert_text("thermometer-labels", 16.0);
        let range = Range::new(40.0, -10.0, 10.0).expect("range must be valid");
        Thermometer::new(surface, ElementIds::default(), range)
    }

    #[test]
    fn mount_positions_gauge_and_renders_labels() {
        let mut widget = demo_widget();
        widget.mount();

        let gauge = widget.surface().element("thermometer").expect("gauge exists");
        assert_eq!(gauge.width, 360.0);
        assert_eq!(gauge.bottom, 180.0);
        assert_eq!(gauge.left, -80.0);
        assert_eq!(widget.surface().attr("thermometer", "max"), Some("40"));
        assert_eq!(widget.surface().attr("thermometer", "min"), Some("-10"));

        let labels: Vec<&str> = widget
            .surface()
            .labels("thermometer-labels")
            .iter()
            .map(|(text, _)| text.as_str())
            .collect();
        assert_eq!(labels, ["40°", "30°", "20°", "10°", "0°", "-10°"]);
    }

    #[test]
    fn mount_centers_label_column_after_appending() {
        let mut widget = demo_widget();
        widget.mount();

        let column = widget
            .surface()
            .element("thermometer-labels")
            .expect("labels exist");
        // (200 - 40) / 2
        assert_eq!(column.width, 80.0);
        // 6 labels of (16 + 57.6) make 441.6; (400 - 441.6) / 2
        assert!((column.margin_top - -20.8).abs() < 1e-9);
    }

    #[test]
    fn remounting_rebuilds_labels_instead_of_duplicating() {
        let mut widget = demo_widget();
        widget.mount();
        widget.mount();
        assert_eq!(widget.surface().labels("thermometer-labels").len(), 6);
    }

    #[test]
    fn reset_restores_empty_defaults_regardless_of_prior_state() {
        let mut widget = demo_widget();
        let token = widget.begin_submission();
        widget.apply_city(token, "Naples");
        widget.apply_error(token, "boom");

        widget.reset();

        assert_eq!(widget.state().city, "-");
        assert_eq!(widget.state().temperature, "-");
        assert_eq!(widget.state().error, "");
        assert_eq!(widget.surface().text("city"), "-");
        assert_eq!(widget.surface().text("temperature"), "-");
        assert_eq!(widget.surface().text("error"), "");
    }

    #[tokio::test]
    async fn zero_match_halts_before_the_weather_call() {
        let mut widget = demo_widget();
        let resolver = StubResolver {
            match_count: 0,
            woeid: "",
        };
        let source = RecordingSource::default();

        let err = widget
            .submit(&resolver, &source, "Atlantis")
            .await
            .unwrap_err();

        assert!(matches!(err, WidgetError::NoMatch));
        assert_eq!(widget.state().error, "Unable to retrieve data");
        assert!(source.calls.lock().expect("lock").is_empty());
        // City was still set optimistically.
        assert_eq!(widget.state().city, "Atlantis");
    }

    #[tokio::test]
    async fn ambiguous_match_warns_and_proceeds_with_first_place() {
        let mut widget = demo_widget();
        let resolver = StubResolver {
            match_count: 3,
            woeid: "711465",
        };
        let source = RecordingSource {
            temperature: Some(18.0),
            ..Default::default()
        };

        widget
            .submit(&resolver, &source, "Naples")
            .await
            .expect("submission must succeed");

        assert!(widget.state().error.contains("More than one place found"));
        assert_eq!(*source.calls.lock().expect("lock"), ["711465"]);
        assert_eq!(widget.state().temperature, "18°");
    }

    #[tokio::test]
    async fn successful_fetch_sets_temperature_text_and_gauge_value() {
        let mut widget = demo_widget();
        let resolver = StubResolver {
            match_count: 1,
            woeid: "711465",
        };
        let source = RecordingSource {
            temperature: Some(21.0),
            ..Default::default()
        };

        widget
            .submit(&resolver, &source, "Naples")
            .await
            .expect("submission must succeed");

        assert_eq!(widget.state().temperature, "21°");
        assert_eq!(widget.surface().text("temperature"), "21°");
        assert_eq!(widget.surface().attr("thermometer", "value"), Some("21"));
        assert_eq!(widget.state().error, "");
    }

    #[tokio::test]
    async fn missing_condition_surfaces_the_feed_title() {
        let mut widget = demo_widget();
        let resolver = StubResolver {
            match_count: 1,
            woeid: "711465",
        };
        let source = RecordingSource {
            temperature: None,
            missing_title: Some("Service unavailable"),
            ..Default::default()
        };

        let err = widget.submit(&resolver, &source, "Naples").await.unwrap_err();

        assert!(matches!(err, WidgetError::MissingCondition(_)));
        assert_eq!(widget.state().error, "Service unavailable");
        assert_eq!(widget.state().temperature, "-");
    }

    #[tokio::test]
    async fn locate_fills_the_location_input() {
        let mut widget = demo_widget();
        let reverse = StubReverse {
            name: Some("Naples, Campania"),
        };

        let name = widget
            .locate(&reverse, 40.85, 14.27)
            .await
            .expect("reverse geocode must succeed");

        assert_eq!(name, "Naples, Campania");
        assert_eq!(widget.surface().text("location"), "Naples, Campania");
    }

    #[tokio::test]
    async fn failed_locate_reports_the_fixed_message() {
        let mut widget = demo_widget();
        let reverse = StubReverse { name: None };

        let err = widget.locate(&reverse, 0.0, 0.0).await.unwrap_err();

        assert!(matches!(err, WidgetError::LocationUnavailable));
        assert_eq!(widget.state().error, "Unable to retrieve location");
    }

    #[tokio::test]
    async fn coordinate_query_chains_reverse_geocode_into_submission() {
        let mut widget = demo_widget();
        let resolver = StubResolver {
            match_count: 1,
            woeid: "711465",
        };
        let source = RecordingSource {
            temperature: Some(12.0),
            ..Default::default()
        };
        let reverse = StubReverse {
            name: Some("Naples"),
        };
        let query = LocationQuery::Coordinates {
            latitude: 40.85,
            longitude: 14.27,
        };

        widget
            .submit_query(&resolver, &source, &reverse, &query)
            .await
            .expect("query must succeed");

        assert_eq!(widget.state().city, "Naples");
        assert_eq!(widget.state().temperature, "12°");
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let mut widget = demo_widget();
        let stale = widget.begin_submission();
        let fresh = widget.begin_submission();

        let reading = WeatherReading::new(5.0);
        assert!(!widget.apply_reading(stale, &reading));
        assert_eq!(widget.state().temperature, "-");
        assert!(!widget.apply_error(stale, "late failure"));
        assert_eq!(widget.state().error, "");

        assert!(widget.apply_reading(fresh, &reading));
        assert_eq!(widget.state().temperature, "5°");
    }

    #[test]
    fn gauge_value_keeps_fractions_only_when_present() {
        assert_eq!(gauge_value(21.0), "21");
        assert_eq!(gauge_value(-10.0), "-10");
        assert_eq!(gauge_value(3.5), "3.5");
    }
}
