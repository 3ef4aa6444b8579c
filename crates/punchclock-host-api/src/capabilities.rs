//! Location capabilities model

/// Describes what a location provider can do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCapabilities {
    /// The host can report a position at all
    pub can_locate: bool,

    /// The host can honour a high-accuracy request (GPS rather than network)
    pub can_high_accuracy: bool,

    /// The host may return a cached fix when asked for one
    pub can_use_cached_fix: bool,
}

impl LocationCapabilities {
    /// A host with no location support at all
    pub fn none() -> Self {
        Self {
            can_locate: false,
            can_high_accuracy: false,
            can_use_cached_fix: false,
        }
    }

    /// A host with a full geolocation stack
    pub fn full() -> Self {
        Self {
            can_locate: true,
            can_high_accuracy: true,
            can_use_cached_fix: true,
        }
    }
}

impl Default for LocationCapabilities {
    fn default() -> Self {
        Self::none()
    }
}
