use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::Constraints;
use crate::data::model::RentalDataset;

/// Interactive analytics over daily bike-rental records.
#[derive(Debug, Clone, Parser)]
#[command(name = "bike-dashboard", version, about)]
pub struct Config {
    /// Rental data file (.csv, .tsv, .json or .parquet).
    #[arg(short, long, env = "BIKE_DASHBOARD_DATA", default_value = "dashboard/main_data.csv")]
    pub data: PathBuf,

    /// Number of bins in the daily-rentals histogram.
    #[arg(
        long,
        env = "BIKE_DASHBOARD_BINS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub bins: u16,

    /// First day of the initial date range (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the initial date range (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Print the dashboard figures to stdout instead of opening a window.
    #[arg(long)]
    pub summary: bool,
}

impl Config {
    /// Starting constraints: everything selected, with `--start` / `--end`
    /// overriding the matching end of the dataset's date bounds.
    pub fn initial_constraints(&self, dataset: &RentalDataset) -> Constraints {
        let mut constraints = Constraints::select_all(dataset);
        if let Some((lo, hi)) = dataset.date_bounds {
            constraints.date_range = Some((self.start.unwrap_or(lo), self.end.unwrap_or(hi)));
        }
        constraints
    }

    pub fn histogram_bins(&self) -> usize {
        usize::from(self.bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_days;

    #[test]
    fn defaults_apply_without_arguments() {
        let config = Config::try_parse_from(["bike-dashboard"]).unwrap();
        assert_eq!(config.histogram_bins(), 30);
        assert!(!config.summary);
        assert_eq!(config.start, None);
    }

    #[test]
    fn zero_bins_are_rejected() {
        assert!(Config::try_parse_from(["bike-dashboard", "--bins", "0"]).is_err());
    }

    #[test]
    fn start_overrides_only_the_lower_bound() {
        let config = Config::try_parse_from([
            "bike-dashboard",
            "--data",
            "day.csv",
            "--start",
            "2011-06-01",
            "--summary",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("day.csv"));
        assert!(config.summary);

        let ds = three_days();
        let c = config.initial_constraints(&ds);
        assert_eq!(
            c.date_range,
            Some((
                NaiveDate::from_ymd_opt(2011, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2012, 1, 1).unwrap()
            ))
        );
        assert_eq!(c.seasons, ds.seasons);
    }
}
