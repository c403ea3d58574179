//! Pure occupancy arithmetic. Nothing in here touches the store or the clock.

use chrono::{DateTime, FixedOffset, TimeDelta, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Width of one flow histogram bucket, in hours.
pub const FLOW_BUCKET_HOURS: u32 = 4;

/// Number of buckets covering a day.
pub const FLOW_BUCKETS: usize = (24 / FLOW_BUCKET_HOURS) as usize;

/// Bucket labels, keyed by the bucket's first hour.
pub const FLOW_LABELS: [&str; FLOW_BUCKETS] =
    ["00:00", "04:00", "08:00", "12:00", "16:00", "20:00"];

/// Readings per person in the flow histogram.
///
/// The displayed value of a bucket is its raw reading count divided by this and
/// truncated. A visit usually leaves an entry and an exit reading, so halving
/// gives a rough head count. It is not an occupancy reconstruction.
pub const READINGS_PER_PERSON: u64 = 2;

/// Above this percentage an area is in the warning tier.
pub const WARNING_THRESHOLD: f64 = 60.0;

/// Above this percentage an area is in the critical tier.
pub const CRITICAL_THRESHOLD: f64 = 80.0;

/// Occupancy classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Normal,
    Warning,
    Critical,
}

impl Tier {
    /// `<= 60` normal, `(60, 80]` warning, `> 80` critical.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > CRITICAL_THRESHOLD {
            Self::Critical
        } else if percentage > WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// People currently inside, never negative.
#[must_use]
pub fn occupancy(entries: u64, exits: u64) -> u64 {
    entries.saturating_sub(exits)
}

/// `count / capacity` as a percentage rounded to one decimal. A zero capacity
/// yields zero.
#[must_use]
pub fn capacity_percentage(count: u64, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    round1(count as f64 / f64::from(capacity) * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// UTC instant of the most recent midnight at `offset`.
#[must_use]
pub fn day_start(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = now
        .with_timezone(&offset)
        .date_naive()
        .and_time(chrono::NaiveTime::MIN);
    local_midnight.and_utc() - TimeDelta::seconds(i64::from(offset.local_minus_utc()))
}

/// Readings grouped into fixed 4-hour bins by their hour at the facility offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowHistogram {
    raw: [u64; FLOW_BUCKETS],
}

impl FlowHistogram {
    #[must_use]
    pub fn from_timestamps(times: &[DateTime<Utc>], offset: FixedOffset) -> Self {
        let mut raw = [0_u64; FLOW_BUCKETS];
        for t in times {
            let hour = t.with_timezone(&offset).hour();
            raw[(hour / FLOW_BUCKET_HOURS) as usize] += 1;
        }
        Self { raw }
    }

    /// Raw reading count per bucket.
    #[must_use]
    pub fn raw_counts(&self) -> &[u64; FLOW_BUCKETS] {
        &self.raw
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.raw.iter().sum()
    }

    /// Displayed per-bucket values, see [`READINGS_PER_PERSON`].
    #[must_use]
    pub fn estimated_people(&self) -> Vec<u64> {
        self.raw.iter().map(|c| c / READINGS_PER_PERSON).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 4, h, m, 0).unwrap()
    }

    #[test]
    fn occupancy_is_clamped_at_zero() {
        assert_eq!(occupancy(50, 10), 40);
        assert_eq!(occupancy(10, 50), 0);
        assert_eq!(occupancy(0, 0), 0);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(capacity_percentage(40, 300), 13.3);
        assert_eq!(capacity_percentage(1, 3), 33.3);
        assert_eq!(capacity_percentage(2, 3), 66.7);
        assert_eq!(capacity_percentage(300, 300), 100.0);
    }

    #[test]
    fn zero_capacity_gives_zero_percentage() {
        assert_eq!(capacity_percentage(12, 0), 0.0);
    }

    #[test]
    fn percentage_is_monotonic_in_count() {
        let mut previous = 0.0;
        for count in 0..=400 {
            let pct = capacity_percentage(count, 300);
            assert!(pct >= previous, "{count}: {pct} < {previous}");
            previous = pct;
        }
    }

    #[test]
    fn tier_is_a_step_function() {
        assert_eq!(Tier::from_percentage(0.0), Tier::Normal);
        assert_eq!(Tier::from_percentage(60.0), Tier::Normal);
        assert_eq!(Tier::from_percentage(60.1), Tier::Warning);
        assert_eq!(Tier::from_percentage(80.0), Tier::Warning);
        assert_eq!(Tier::from_percentage(80.1), Tier::Critical);
        assert_eq!(Tier::from_percentage(250.0), Tier::Critical);
    }

    #[test]
    fn day_start_in_utc() {
        assert_eq!(day_start(at(15, 42), Utc.fix()), at(0, 0));
    }

    #[test]
    fn day_start_west_of_utc() {
        // 01:30 UTC is still the previous day at UTC-3; that day began at 03:00 UTC.
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let start = day_start(at(1, 30), offset);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 11, 3, 3, 0, 0).unwrap());

        let start = day_start(at(12, 0), offset);
        assert_eq!(start, at(3, 0));
    }

    #[test]
    fn buckets_partition_the_day() {
        let times: Vec<_> = (0..24).map(|h| at(h, 30)).collect();
        let hist = FlowHistogram::from_timestamps(&times, Utc.fix());
        assert_eq!(hist.raw_counts(), &[4, 4, 4, 4, 4, 4]);
        assert_eq!(hist.total(), times.len() as u64);
    }

    #[test]
    fn bucket_edges_belong_to_the_later_bucket() {
        let times = [at(3, 59), at(4, 0), at(19, 59), at(20, 0), at(23, 59)];
        let hist = FlowHistogram::from_timestamps(&times, Utc.fix());
        assert_eq!(hist.raw_counts(), &[1, 1, 0, 0, 1, 2]);
    }

    #[test]
    fn buckets_follow_the_facility_offset() {
        // 02:00 UTC is 23:00 at UTC-3.
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let hist = FlowHistogram::from_timestamps(&[at(2, 0)], offset);
        assert_eq!(hist.raw_counts(), &[0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn estimated_people_halves_and_truncates() {
        let times = [at(9, 0), at(9, 1), at(9, 2), at(13, 0)];
        let hist = FlowHistogram::from_timestamps(&times, Utc.fix());
        assert_eq!(hist.estimated_people(), vec![0, 0, 1, 0, 0, 0]);
    }
}
