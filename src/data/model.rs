use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::Deserialize;

use super::enrich::enrich;
use super::error::DataError;

/// Placeholder shown for category codes outside the known domain.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Category labels
// ---------------------------------------------------------------------------

/// A category with a fixed human-readable label.
pub trait Label: Copy + Ord {
    fn label(self) -> &'static str;
}

/// Label for an optional category, falling back to [`UNKNOWN_LABEL`].
pub fn label_or_unknown<L: Label>(value: Option<L>) -> &'static str {
    value.map(Label::label).unwrap_or(UNKNOWN_LABEL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Map the dataset's `season` code (1..=4). Other codes have no label.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }
}

impl Label for Season {
    fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear,
    Cloudy,
    LightRain,
    HeavyRain,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Clear,
        Weather::Cloudy,
        Weather::LightRain,
        Weather::HeavyRain,
    ];

    /// Map the dataset's `weathersit` code (1..=4). Other codes have no label.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Cloudy),
            3 => Some(Weather::LightRain),
            4 => Some(Weather::HeavyRain),
            _ => None,
        }
    }
}

impl Label for Weather {
    fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Cloudy => "Cloudy/Overcast",
            Weather::LightRain => "Light Rain",
            Weather::HeavyRain => "Heavy Rain/Storm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayType {
    WorkingDay,
    Holiday,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::WorkingDay, DayType::Holiday];

    pub fn from_working_day(is_working_day: bool) -> Self {
        if is_working_day {
            DayType::WorkingDay
        } else {
            DayType::Holiday
        }
    }
}

impl Label for DayType {
    fn label(self) -> &'static str {
        match self {
            DayType::WorkingDay => "Working Day",
            DayType::Holiday => "Holiday",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Season, Weather, DayType);

// ---------------------------------------------------------------------------
// RawDay – one input row as it appears in the source file
// ---------------------------------------------------------------------------

/// A source row before type coercion. Field names follow the file's headers;
/// any other columns in the file are ignored.
///
/// Category codes are read as numbers of any form (`2`, `2.0`); text that is
/// not a number fails the load.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDay {
    pub dteday: String,
    pub season: f64,
    pub weathersit: f64,
    pub workingday: f64,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub cnt: i64,
}

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "dteday",
    "season",
    "weathersit",
    "workingday",
    "temp",
    "atemp",
    "hum",
    "windspeed",
    "cnt",
];

/// The integer a numeric code stands for, if it has one. Fractional or
/// non-finite values have none.
pub fn integral_code(value: f64) -> Option<i64> {
    // Beyond 2^53 every f64 is integral but no longer an exact code.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT)
        .then_some(value as i64)
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a calendar date in any of the formats the source files use.
pub fn parse_date(text: &str) -> Result<NaiveDate, DataError> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| DataError::InvalidDate(text.to_string()))
}

// ---------------------------------------------------------------------------
// RentalRecord – one day of rentals, base fields only
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RentalRecord {
    pub date: NaiveDate,
    /// `None` when the source value was not a whole number.
    pub season_code: Option<i64>,
    pub weather_code: Option<i64>,
    pub is_working_day: bool,
    pub temperature: f64,
    pub feels_like_temperature: f64,
    pub humidity: f64,
    pub windspeed: f64,
    pub rental_count: u64,
}

impl TryFrom<RawDay> for RentalRecord {
    type Error = DataError;

    fn try_from(raw: RawDay) -> Result<Self, Self::Error> {
        let is_working_day = match integral_code(raw.workingday) {
            Some(1) => true,
            Some(0) => false,
            _ => return Err(DataError::InvalidWorkingDay(raw.workingday)),
        };
        let rental_count =
            u64::try_from(raw.cnt).map_err(|_| DataError::NegativeCount(raw.cnt))?;

        Ok(RentalRecord {
            date: parse_date(&raw.dteday)?,
            season_code: integral_code(raw.season),
            weather_code: integral_code(raw.weathersit),
            is_working_day,
            temperature: raw.temp,
            feels_like_temperature: raw.atemp,
            humidity: raw.hum,
            windspeed: raw.windspeed,
            rental_count,
        })
    }
}

// ---------------------------------------------------------------------------
// DayRecord – a record plus its derived fields
// ---------------------------------------------------------------------------

/// A rental record with labels and calendar fields derived from it.
/// Built only by [`enrich`](super::enrich::enrich).
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub base: RentalRecord,
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    pub day_type: DayType,
    pub year: i32,
    pub month: u32,
    pub day_of_month: u32,
    pub iso_week: u32,
    pub weekday: Weekday,
}

impl DayRecord {
    pub fn date(&self) -> NaiveDate {
        self.base.date
    }

    pub fn rental_count(&self) -> u64 {
        self.base.rental_count
    }

    pub fn season_label(&self) -> &'static str {
        label_or_unknown(self.season)
    }

    pub fn weather_label(&self) -> &'static str {
        label_or_unknown(self.weather)
    }

    pub fn day_type_label(&self) -> &'static str {
        self.day_type.label()
    }

    /// English weekday name, e.g. `"Monday"`.
    pub fn day_of_week_name(&self) -> &'static str {
        match self.weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

// ---------------------------------------------------------------------------
// RentalDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The enriched dataset with pre-computed option lists for the filter widgets.
#[derive(Debug, Clone)]
pub struct RentalDataset {
    /// All days, in source order.
    pub records: Vec<DayRecord>,
    /// Earliest and latest date present.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Season labels present (`None` = an out-of-domain code).
    pub seasons: BTreeSet<Option<Season>>,
    /// Weather labels present (`None` = an out-of-domain code).
    pub weather: BTreeSet<Option<Weather>>,
}

impl RentalDataset {
    /// Enrich the loaded records and index the values present.
    pub fn from_records(records: Vec<RentalRecord>) -> Self {
        let records = enrich(records);

        let mut seen_dates = BTreeSet::new();
        for rec in &records {
            if !seen_dates.insert(rec.date()) {
                log::warn!("duplicate date {} in dataset", rec.date());
            }
        }
        let date_bounds = seen_dates
            .first()
            .copied()
            .zip(seen_dates.last().copied());

        let seasons = records.iter().map(|r| r.season).collect();
        let weather = records.iter().map(|r| r.weather).collect();

        RentalDataset {
            records,
            date_bounds,
            seasons,
            weather,
        }
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(
        date: (i32, u32, u32),
        season: i64,
        weather: i64,
        working: bool,
        cnt: u64,
    ) -> RentalRecord {
        RentalRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            season_code: Some(season),
            weather_code: Some(weather),
            is_working_day: working,
            temperature: 0.2 + cnt as f64 / 100.0,
            feels_like_temperature: 0.25 + cnt as f64 / 120.0,
            humidity: 0.8 - cnt as f64 / 200.0,
            windspeed: 0.1 + (cnt % 7) as f64 / 50.0,
            rental_count: cnt,
        }
    }

    /// The three-day scenario: two days in 2011, one in 2012.
    pub fn three_days() -> RentalDataset {
        RentalDataset::from_records(vec![
            record((2011, 1, 1), 1, 1, true, 10),
            record((2011, 6, 15), 2, 2, false, 20),
            record((2012, 1, 1), 1, 1, true, 5),
        ])
    }
}
