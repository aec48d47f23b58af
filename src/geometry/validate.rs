//! Staleness check for saved geometry.
//!
//! A saved record is only restored if some part of it would be visible on a
//! display attached right now. Unplugging a monitor otherwise leaves the
//! window somewhere nobody can see it.

use super::types::{GeometryRecord, WorkArea};

/// True iff `record` overlaps at least one of `work_areas`.
///
/// Edges that merely touch do not count. No displays means not usable.
pub fn is_usable(record: &GeometryRecord, work_areas: &[WorkArea]) -> bool {
    work_areas.iter().any(|area| intersects(record, area))
}

fn intersects(record: &GeometryRecord, area: &WorkArea) -> bool {
    // Widen to i64 so coordinates near i32::MAX can't wrap.
    let (rx, ry) = (i64::from(record.x), i64::from(record.y));
    let (rw, rh) = (i64::from(record.width), i64::from(record.height));
    let (ax, ay) = (i64::from(area.x), i64::from(area.y));
    let (aw, ah) = (i64::from(area.width), i64::from(area.height));

    rx < ax + aw && rx + rw > ax && ry < ay + ah && ry + rh > ay
}
