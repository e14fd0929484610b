//! Ghost playtime heuristic.
//!
//! Rest-mode and background execution can rack up hundreds of apparent hours
//! on a title the user never touched. A high duration alone isn't proof;
//! tested-but-abandoned games legitimately sit at a few hours with zero
//! trophies. A record is only treated as telemetry when the duration is
//! large AND not a single trophy was earned.

/// 15 hours in seconds. Above this with zero trophies, playtime is zeroed.
pub const DEFAULT_GHOST_THRESHOLD_SECONDS: f64 = 54_000.0;

/// Return the duration unchanged unless it exceeds `threshold_seconds`
/// (exclusive) while `earned_total` is zero, in which case return zero.
///
/// Applied per merged entry, never to the registry's stored value or to the
/// lifetime total.
pub fn filter_ghost_playtime(seconds: f64, earned_total: u32, threshold_seconds: f64) -> f64 {
    if seconds > threshold_seconds && earned_total == 0 {
        0.0
    } else {
        seconds
    }
}
