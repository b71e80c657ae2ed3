/// Address recorded alongside device-captured coordinates. The device read
/// only yields a lat/lng pair; the display string is fixed.
pub const GPS_PLACEHOLDER_ADDRESS: &str = "Detectado por GPS";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("device location unavailable: {0}")]
    Unavailable(String),
    #[error("location permission denied")]
    PermissionDenied,
}

/// One-shot device position read. Failure is surfaced to the user but never
/// blocks wizard progression.
pub trait LocationProvider {
    fn current_position(&self) -> Result<Coordinates, LocationError>;
}
