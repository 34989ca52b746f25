//! Timeline arithmetic
//!
//! A duration that is not strictly positive and finite means the media has
//! not buffered yet; every helper then degrades to a zero state instead of
//! dividing by it.

fn known(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Position a seek to `fraction` of the track should resume at.
///
/// Clamped to `[0, duration - margin]` so a seek never lands on the end of
/// the track. `None` when the duration is unknown.
pub fn seek_target(fraction: f64, duration: f64, margin: f64) -> Option<f64> {
    let duration = known(duration)?;
    let fraction = if fraction.is_finite() { fraction } else { 0.0 };
    let upper = (duration - margin).max(0.0);
    Some((fraction * duration).clamp(0.0, upper))
}

/// Progress through the track in [0, 1]
pub fn progress(current: f64, duration: f64) -> f64 {
    match known(duration) {
        Some(duration) if current.is_finite() => (current / duration).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Format seconds as `m:ss`; non-finite or non-positive values read `0:00`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
