use chrono::Datelike;

use super::model::{DayRecord, DayType, RentalRecord, Season, Weather};

/// Attach labels and calendar fields to every record, preserving order.
pub fn enrich(records: Vec<RentalRecord>) -> Vec<DayRecord> {
    records.into_iter().map(DayRecord::from_record).collect()
}

impl DayRecord {
    /// Derive labels and calendar fields from the base record.
    ///
    /// Out-of-domain season or weather codes leave the label empty instead
    /// of failing, so one odd row never blocks the rest of the dashboard.
    pub fn from_record(base: RentalRecord) -> Self {
        let date = base.date;
        DayRecord {
            season: base.season_code.and_then(Season::from_code),
            weather: base.weather_code.and_then(Weather::from_code),
            day_type: DayType::from_working_day(base.is_working_day),
            year: date.year(),
            month: date.month(),
            day_of_month: date.day(),
            iso_week: date.iso_week().week(),
            weekday: date.weekday(),
            base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::UNKNOWN_LABEL;

    #[test]
    fn derives_labels_and_calendar_fields() {
        let day = DayRecord::from_record(record((2011, 6, 15), 2, 3, false, 20));
        assert_eq!(day.season_label(), "Summer");
        assert_eq!(day.weather_label(), "Light Rain");
        assert_eq!(day.day_type_label(), "Holiday");
        assert_eq!((day.year, day.month, day.day_of_month), (2011, 6, 15));
        assert_eq!(day.iso_week, 24);
        assert_eq!(day.day_of_week_name(), "Wednesday");
    }

    #[test]
    fn iso_week_follows_iso_year_boundaries() {
        // 2011-01-01 is a Saturday in ISO week 52 of 2010.
        let day = DayRecord::from_record(record((2011, 1, 1), 1, 1, false, 1));
        assert_eq!(day.iso_week, 52);
        assert_eq!(day.day_of_week_name(), "Saturday");
    }

    #[test]
    fn unknown_codes_degrade_to_placeholder() {
        let day = DayRecord::from_record(record((2012, 2, 2), 7, 0, true, 3));
        assert_eq!(day.season, None);
        assert_eq!(day.weather, None);
        assert_eq!(day.season_label(), UNKNOWN_LABEL);
        assert_eq!(day.weather_label(), UNKNOWN_LABEL);
        assert_eq!(day.day_type_label(), "Working Day");
    }

    #[test]
    fn enrichment_is_pure_and_order_preserving() {
        let base = vec![
            record((2012, 1, 1), 1, 1, true, 5),
            record((2011, 1, 1), 4, 2, false, 10),
        ];
        let once = enrich(base.clone());
        let again = enrich(base.clone());
        assert_eq!(once, again);
        let dates: Vec<_> = once.iter().map(|d| d.date()).collect();
        assert_eq!(dates, base.iter().map(|r| r.date).collect::<Vec<_>>());
    }
}
