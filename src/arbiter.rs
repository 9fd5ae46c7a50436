//! Best-last-fix arbitration across providers.
//!
//! Given every provider's cached fix, pick the single most useful one:
//! the most accurate fix that passes the freshness test, or failing that,
//! the newest fix regardless of accuracy.

use crate::Fix;

/// Select the best last-known fix among `fixes`.
///
/// Candidates are scanned in iteration order (platform-defined and not
/// guaranteed stable between calls):
///
/// 1. A fix whose `timestamp_ms` exceeds `min_interval_ms` and whose
///    accuracy is strictly better than the best accuracy seen so far wins
///    outright.
/// 2. Until some fix has won on accuracy, a fix whose `timestamp_ms` is
///    below `min_interval_ms` holds the fallback slot if it is strictly
///    newer than the current fallback fix; its accuracy is never consulted.
///
/// A fix whose timestamp equals the threshold matches neither branch.
/// Accuracy ties keep the earlier candidate. Returns `None` when no
/// provider reported a fix.
///
/// TODO: the freshness test compares an epoch timestamp against a duration
/// threshold. Kept as-is for compatibility with the behaviour this
/// replaces, but comparing fix age (now minus timestamp) against the
/// interval is almost certainly what was meant; revisit together with the
/// callers that pass wall-clock intervals.
///
/// # Example
/// ```
/// use location_updater::{select_best_fix, Fix, Position};
///
/// let fixes = vec![
///     Fix::new("network", 50.0, 120_000, Position::new(51.5, -0.13)),
///     Fix::new("gps", 5.0, 120_000, Position::new(51.5, -0.13)),
/// ];
///
/// let best = select_best_fix(fixes, 60_000).unwrap();
/// assert_eq!(best.provider_id, "gps");
/// ```
pub fn select_best_fix<I>(fixes: I, min_interval_ms: i64) -> Option<Fix>
where
    I: IntoIterator<Item = Fix>,
{
    let mut best: Option<Fix> = None;
    let mut best_accuracy = f32::MAX;
    let mut best_time = i64::MIN;
    let mut has_accurate = false;

    for fix in fixes {
        if fix.timestamp_ms > min_interval_ms && fix.accuracy_m < best_accuracy {
            best_accuracy = fix.accuracy_m;
            best_time = fix.timestamp_ms;
            best = Some(fix);
            has_accurate = true;
        } else if fix.timestamp_ms < min_interval_ms
            && !has_accurate
            && fix.timestamp_ms > best_time
        {
            best_time = fix.timestamp_ms;
            best = Some(fix);
        }
    }

    best
}
