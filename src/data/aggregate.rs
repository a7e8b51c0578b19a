use std::collections::{BTreeMap, BTreeSet};

use super::model::DayRecord;

/// Calendar unit used to group days for trend charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKey {
    Year,
    Month,
}

impl TimeKey {
    pub fn of(self, record: &DayRecord) -> i32 {
        match self {
            TimeKey::Year => record.year,
            TimeKey::Month => record.month as i32,
        }
    }
}

/// A numeric column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Temperature,
    FeelsLike,
    Humidity,
    Windspeed,
    Rentals,
}

impl Metric {
    /// The variables of the correlation heatmap, in display order.
    pub const NUMERIC: [Metric; 5] = [
        Metric::Temperature,
        Metric::FeelsLike,
        Metric::Humidity,
        Metric::Windspeed,
        Metric::Rentals,
    ];

    pub fn value(self, record: &DayRecord) -> f64 {
        let base = &record.base;
        match self {
            Metric::Temperature => base.temperature,
            Metric::FeelsLike => base.feels_like_temperature,
            Metric::Humidity => base.humidity,
            Metric::Windspeed => base.windspeed,
            Metric::Rentals => base.rental_count as f64,
        }
    }

    /// Source column name, as shown on the heatmap axes.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Temperature => "temp",
            Metric::FeelsLike => "atemp",
            Metric::Humidity => "hum",
            Metric::Windspeed => "windspeed",
            Metric::Rentals => "cnt",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::FeelsLike => "Feels-like temperature",
            Metric::Humidity => "Humidity",
            Metric::Windspeed => "Windspeed",
            Metric::Rentals => "Rentals",
        }
    }
}

/// Sum `metric` per `key`, ascending by key. Keys with no days are omitted.
pub fn aggregate_by<'a, I>(records: I, key: TimeKey, metric: Metric) -> Vec<(i32, f64)>
where
    I: IntoIterator<Item = &'a DayRecord>,
{
    let mut groups: BTreeMap<i32, f64> = BTreeMap::new();
    for rec in records {
        *groups.entry(key.of(rec)).or_default() += metric.value(rec);
    }
    groups.into_iter().collect()
}

/// The three headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Wide enough that no set of `u64` day counts can overflow it.
    pub total_rentals: u128,
    /// Mean rentals per record; `0.0` when there are none.
    pub mean_daily: f64,
    pub distinct_days: usize,
}

impl Summary {
    pub fn of<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DayRecord>,
    {
        let mut total_rentals = 0u128;
        let mut rows = 0usize;
        let mut days = BTreeSet::new();
        for rec in records {
            total_rentals += u128::from(rec.rental_count());
            rows += 1;
            days.insert(rec.date());
        }
        let mean_daily = if rows == 0 {
            0.0
        } else {
            total_rentals as f64 / rows as f64
        };

        Summary {
            total_rentals,
            mean_daily,
            distinct_days: days.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::{filter, Constraints};
    use crate::data::model::fixtures::{record, three_days};
    use crate::data::model::{DayType, RentalDataset, Season, Weather};

    #[test]
    fn yearly_totals_over_unfiltered_data() {
        let ds = three_days();
        assert_eq!(
            aggregate_by(&ds.records, TimeKey::Year, Metric::Rentals),
            vec![(2011, 30.0), (2012, 5.0)]
        );
    }

    #[test]
    fn monthly_totals_are_ascending_without_zero_fill() {
        let ds = three_days();
        assert_eq!(
            aggregate_by(&ds.records, TimeKey::Month, Metric::Rentals),
            vec![(1, 15.0), (6, 20.0)]
        );
    }

    #[test]
    fn aggregation_preserves_the_total() {
        let ds = RentalDataset::from_records(
            (0..40u32)
                .map(|i| {
                    let date = (2011 + (i % 2) as i32, i % 12 + 1, i % 28 + 1);
                    record(date, 1, 1, true, u64::from(i) * 7)
                })
                .collect(),
        );
        let total: f64 = ds.records.iter().map(|r| r.rental_count() as f64).sum();
        for key in [TimeKey::Year, TimeKey::Month] {
            let sum: f64 = aggregate_by(&ds.records, key, Metric::Rentals)
                .iter()
                .map(|(_, v)| v)
                .sum();
            assert_eq!(sum, total);
        }
    }

    #[test]
    fn other_metrics_sum_their_own_column() {
        let ds = three_days();
        let temps = aggregate_by(&ds.records, TimeKey::Year, Metric::Temperature);
        assert_eq!(temps.len(), 2);
        assert!((temps[0].1 - (0.3 + 0.4)).abs() < 1e-12);
        assert!((temps[1].1 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn summary_of_filtered_scenario() {
        let ds = three_days();
        let c = Constraints {
            date_range: Some((
                NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2011, 12, 31).unwrap(),
            )),
            seasons: BTreeSet::from([Some(Season::Spring), Some(Season::Summer)]),
            day_types: BTreeSet::from([DayType::WorkingDay, DayType::Holiday]),
            weather: BTreeSet::from([Some(Weather::Clear), Some(Weather::Cloudy)]),
        };
        let subset = filter(&ds.records, &c);
        assert_eq!(
            Summary::of(subset.iter().copied()),
            Summary {
                total_rentals: 30,
                mean_daily: 15.0,
                distinct_days: 2,
            }
        );
    }

    #[test]
    fn empty_subset_reports_zeros() {
        let none: Vec<&DayRecord> = Vec::new();
        assert_eq!(Summary::of(none.iter().copied()), Summary::default());
        assert!(aggregate_by(none.iter().copied(), TimeKey::Year, Metric::Rentals).is_empty());
    }

    #[test]
    fn duplicate_dates_count_once() {
        let ds = RentalDataset::from_records(vec![
            record((2011, 5, 5), 2, 1, true, 4),
            record((2011, 5, 5), 2, 1, true, 6),
        ]);
        let s = Summary::of(&ds.records);
        assert_eq!(s.total_rentals, 10);
        assert_eq!(s.mean_daily, 5.0);
        assert_eq!(s.distinct_days, 1);
    }

    #[test]
    fn huge_counts_do_not_overflow_the_total() {
        let max = i64::MAX as u64;
        let ds = RentalDataset::from_records(vec![
            record((2011, 1, 1), 1, 1, true, max),
            record((2011, 1, 2), 1, 1, true, max),
            record((2011, 1, 3), 1, 1, true, max),
        ]);
        let s = Summary::of(&ds.records);
        assert_eq!(s.total_rentals, 3 * u128::from(max));
        assert_eq!(s.mean_daily, max as f64);
        assert_eq!(s.distinct_days, 3);
    }
}
