/// Everything that can go wrong between a submission and a displayed
/// temperature. The `Display` strings of the first three variants are the
/// exact texts shown to the user in the widget's error slot.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The geocoding service matched no place at all.
    #[error("Unable to retrieve data")]
    NoMatch,

    /// The weather feed answered without a condition block; the feed's own
    /// title text is all we have to show.
    #[error("{0}")]
    MissingCondition(String),

    /// Reverse geocoding of device coordinates failed.
    #[error("Unable to retrieve location")]
    LocationUnavailable,

    #[error("invalid gauge range: max {max}, min {min}, step {step}")]
    InvalidRange { max: f64, min: f64, step: f64 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered, but with an error status or a payload shape
    /// we cannot decode.
    #[error("Malformed service response: {0}")]
    Malformed(String),
}

impl WidgetError {
    /// True for network and decode faults, as opposed to well-formed
    /// "no result" answers from the services.
    pub fn is_transport(&self) -> bool {
        matches!(self, WidgetError::Transport(_) | WidgetError::Malformed(_))
    }
}
