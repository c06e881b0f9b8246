//! Volume formatting shared by the command surface and the CLI.
//!
//! Volume is stored as a 0.0 - 1.0 fraction but users type and read whole
//! percentages.

/// Convert a whole percentage (0-100) into a volume fraction.
///
/// # Examples
/// ```
/// use erfx_types::formatting::percent_to_volume;
/// assert_eq!(percent_to_volume(42), 0.42);
/// assert_eq!(percent_to_volume(100), 1.0);
/// ```
pub fn percent_to_volume(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// Convert a volume fraction into a rounded whole percentage.
///
/// # Examples
/// ```
/// use erfx_types::formatting::volume_to_percent;
/// assert_eq!(volume_to_percent(0.42), 42);
/// assert_eq!(volume_to_percent(1.5), 100);
/// ```
pub fn volume_to_percent(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Format a volume fraction as `N%`.
///
/// # Examples
/// ```
/// use erfx_types::formatting::format_volume;
/// assert_eq!(format_volume(0.05), "5%");
/// ```
pub fn format_volume(volume: f32) -> String {
    format!("{}%", volume_to_percent(volume))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_round_trip_bounds() {
        assert_eq!(percent_to_volume(0), 0.0);
        assert_eq!(volume_to_percent(0.0), 0);
        assert_eq!(volume_to_percent(-1.0), 0);
        assert_eq!(percent_to_volume(200), 1.0);
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(1.0), "100%");
        assert_eq!(format_volume(0.333), "33%");
    }
}
