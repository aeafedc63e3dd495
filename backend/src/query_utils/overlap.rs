//! Spatial and temporal overlap tests used by every catalog adapter.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use common::{bbox::BBox, datetime_interval::DatetimeInterval};

use crate::error::DiscoveryError;

/// Inclusive on all four edges, so touching boxes overlap. No antimeridian wraparound.
pub fn bboxes_overlap(a: &BBox, b: &BBox) -> bool {
    a.xmin <= b.xmax && b.xmin <= a.xmax && a.ymin <= b.ymax && b.ymin <= a.ymax
}

/// Smallest box covering every box in `bboxes`.
pub fn full_bounding_box(bboxes: &[BBox]) -> Result<BBox, DiscoveryError> {
    let Some(first) = bboxes.first() else {
        return Err(DiscoveryError::invalid_input("cannot compute the bounding box of an empty extent"));
    };
    Ok(bboxes.iter().skip(1).fold(*first, |acc, b| BBox {
        xmin: acc.xmin.min(b.xmin),
        ymin: acc.ymin.min(b.ymin),
        xmax: acc.xmax.max(b.xmax),
        ymax: acc.ymax.max(b.ymax),
    }))
}

/// Open starts extend to the earliest representable instant, open ends to the latest.
pub fn datetime_intervals_overlap(a: &DatetimeInterval, b: &DatetimeInterval) -> bool {
    let (a_start, a_end) = closed_bounds(a);
    let (b_start, b_end) = closed_bounds(b);
    a_start <= b_end && b_start <= a_end
}

fn closed_bounds(interval: &DatetimeInterval) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        interval.start.unwrap_or(DateTime::<Utc>::MIN_UTC),
        interval.end.unwrap_or(DateTime::<Utc>::MAX_UTC),
    )
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses a timestamp into UTC. Offsets are converted; naive timestamps and bare dates are
/// taken to be UTC already.
pub fn ensure_utc(text: &str) -> Result<DateTime<Utc>, DiscoveryError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(DiscoveryError::invalid_input(format!("not a valid timestamp: {text}")))
}
