use std::fmt::Write as _;

use super::aggregate::{aggregate_by, Metric, Summary, TimeKey};
use super::model::{label_or_unknown, DayRecord, DayType, Label, Season, Weather};
use super::stats::{group_box_stats, kde_curve, BoxStats, CorrelationMatrix, Histogram};

/// Month abbreviations for the fixed Jan..Dec trend axis.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const KDE_POINTS: usize = 200;

/// Everything the charts need for one filtered subset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: Summary,
    pub season_boxes: Vec<(Option<Season>, BoxStats)>,
    pub weather_boxes: Vec<(Option<Weather>, BoxStats)>,
    pub day_type_boxes: Vec<(DayType, BoxStats)>,
    /// `(temperature, rentals)` per day, grouped by season.
    pub temperature_points: Vec<(Option<Season>, Vec<[f64; 2]>)>,
    pub humidity_points: Vec<[f64; 2]>,
    pub windspeed_points: Vec<[f64; 2]>,
    pub yearly: Vec<(i32, f64)>,
    pub monthly: Vec<(i32, f64)>,
    pub correlation: CorrelationMatrix,
    pub histogram: Option<Histogram>,
    pub density: Vec<[f64; 2]>,
}

impl DashboardView {
    /// Build the view for `indices` into `records`.
    pub fn build(records: &[DayRecord], indices: &[usize], bins: usize) -> Self {
        let subset: Vec<&DayRecord> = indices.iter().map(|&i| &records[i]).collect();
        let rows = || subset.iter().copied();

        let scatter = |x: Metric| -> Vec<[f64; 2]> {
            rows()
                .map(|r| [x.value(r), Metric::Rentals.value(r)])
                .collect()
        };

        let mut temperature_points: Vec<(Option<Season>, Vec<[f64; 2]>)> = Vec::new();
        for r in rows() {
            let point = [Metric::Temperature.value(r), Metric::Rentals.value(r)];
            match temperature_points.iter_mut().find(|(s, _)| *s == r.season) {
                Some((_, points)) => points.push(point),
                None => temperature_points.push((r.season, vec![point])),
            }
        }
        temperature_points.sort_by_key(|(s, _)| *s);

        let rentals: Vec<f64> = rows().map(|r| Metric::Rentals.value(r)).collect();
        let histogram = Histogram::new(&rentals, bins);
        let density = histogram
            .as_ref()
            .map(|h| kde_curve(&rentals, KDE_POINTS, h.density_scale()))
            .unwrap_or_default();

        DashboardView {
            summary: Summary::of(rows()),
            season_boxes: group_box_stats(rows(), |r| r.season, Metric::Rentals),
            weather_boxes: group_box_stats(rows(), |r| r.weather, Metric::Rentals),
            day_type_boxes: group_box_stats(rows(), |r| r.day_type, Metric::Rentals),
            temperature_points,
            humidity_points: scatter(Metric::Humidity),
            windspeed_points: scatter(Metric::Windspeed),
            yearly: aggregate_by(rows(), TimeKey::Year, Metric::Rentals),
            monthly: aggregate_by(rows(), TimeKey::Month, Metric::Rentals),
            correlation: CorrelationMatrix::compute(rows(), &Metric::NUMERIC),
            histogram,
            density,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.distinct_days == 0
    }

    /// Plain-text rendering for `--summary`.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Total rentals:       {}", s.total_rentals);
        let _ = writeln!(out, "Mean daily rentals:  {:.1}", s.mean_daily);
        let _ = writeln!(out, "Distinct days:       {}", s.distinct_days);

        let boxes = |out: &mut String, title: &str, rows: Vec<(&str, &BoxStats)>| {
            let _ = writeln!(out, "\n{title}");
            if rows.is_empty() {
                let _ = writeln!(out, "  (no data)");
            }
            for (label, b) in rows {
                let _ = writeln!(
                    out,
                    "  {label:<18} n={:<4} low={:<8.0} q1={:<8.1} median={:<8.1} q3={:<8.1} \
                     high={:<8.0} outliers={}",
                    b.count,
                    b.lower_whisker,
                    b.q1,
                    b.median,
                    b.q3,
                    b.upper_whisker,
                    b.outliers.len()
                );
            }
        };
        boxes(
            &mut out,
            "Rentals by season",
            self.season_boxes.iter().map(|(k, b)| (label_or_unknown(*k), b)).collect(),
        );
        boxes(
            &mut out,
            "Rentals by weather",
            self.weather_boxes.iter().map(|(k, b)| (label_or_unknown(*k), b)).collect(),
        );
        boxes(
            &mut out,
            "Rentals by day type",
            self.day_type_boxes.iter().map(|(k, b)| (k.label(), b)).collect(),
        );

        let _ = writeln!(out, "\nYearly rentals");
        for (year, total) in &self.yearly {
            let _ = writeln!(out, "  {year}  {total:.0}");
        }
        let _ = writeln!(out, "\nMonthly rentals");
        for (month, total) in &self.monthly {
            let label = month_label(*month).unwrap_or("?");
            let _ = writeln!(out, "  {label}  {total:.0}");
        }

        let _ = writeln!(out, "\nCorrelation");
        let m = &self.correlation;
        let _ = write!(out, "  {:<10}", "");
        for v in &m.variables {
            let _ = write!(out, "{:>10}", v.column());
        }
        let _ = writeln!(out);
        for (i, v) in m.variables.iter().enumerate() {
            let _ = write!(out, "  {:<10}", v.column());
            for j in 0..m.size() {
                match m.get(i, j) {
                    Some(r) => {
                        let _ = write!(out, "{r:>10.2}");
                    }
                    None => {
                        let _ = write!(out, "{:>10}", "n/a");
                    }
                }
            }
            let _ = writeln!(out);
        }
        out
    }
}

/// Abbreviation for a 1-based month number.
pub fn month_label(month: i32) -> Option<&'static str> {
    usize::try_from(month - 1)
        .ok()
        .and_then(|i| MONTH_LABELS.get(i).copied())
}
