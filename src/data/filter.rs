use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{DayRecord, DayType, RentalDataset, Season, Weather};

// ---------------------------------------------------------------------------
// Constraints: the user's current selection, as one immutable value
// ---------------------------------------------------------------------------

/// Which days to keep.
///
/// Categories combine with AND; values inside one category with OR. An empty
/// set keeps nothing for that category, it is not "no filter". `None` inside
/// `seasons` / `weather` stands for days whose code had no label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constraints {
    /// Inclusive `(start, end)`. `None` applies no date constraint.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub seasons: BTreeSet<Option<Season>>,
    pub day_types: BTreeSet<DayType>,
    pub weather: BTreeSet<Option<Weather>>,
}

impl Constraints {
    /// Everything currently present selected: the dashboard's initial state.
    pub fn select_all(dataset: &RentalDataset) -> Self {
        Constraints {
            date_range: dataset.date_bounds,
            seasons: dataset.seasons.clone(),
            day_types: DayType::ALL.into_iter().collect(),
            weather: dataset.weather.clone(),
        }
    }

    /// Whether a single day passes every constraint.
    pub fn matches(&self, record: &DayRecord) -> bool {
        let in_range = match self.date_range {
            Some((start, end)) => start <= record.date() && record.date() <= end,
            None => true,
        };
        in_range
            && self.seasons.contains(&record.season)
            && self.day_types.contains(&record.day_type)
            && self.weather.contains(&record.weather)
    }
}

/// Keep the records that pass `constraints`, in their original order.
pub fn filter<'a, I>(records: I, constraints: &Constraints) -> Vec<&'a DayRecord>
where
    I: IntoIterator<Item = &'a DayRecord>,
{
    records
        .into_iter()
        .filter(|rec| constraints.matches(rec))
        .collect()
}

/// Return indices of records that pass `constraints`, ascending.
pub fn filtered_indices(records: &[DayRecord], constraints: &Constraints) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| constraints.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
