//! Writes a deterministic two-year synthetic rental dataset in the input
//! schema, as `sample_day.csv` and `sample_day.parquet`.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One row, columns in the order of the public daily bike-sharing file.
#[derive(Debug, Serialize)]
struct DayRow {
    instant: i64,
    dteday: String,
    season: i64,
    yr: i64,
    mnth: i64,
    holiday: i64,
    weekday: i64,
    workingday: i64,
    weathersit: i64,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: i64,
    registered: i64,
    cnt: i64,
}

const HOLIDAYS: [(u32, u32); 4] = [(1, 1), (7, 4), (11, 11), (12, 25)];

/// 1 = spring (Mar-May) .. 4 = winter (Dec-Feb).
fn season_code(month: u32) -> i64 {
    match month {
        3..=5 => 1,
        6..=8 => 2,
        9..=11 => 3,
        _ => 4,
    }
}

fn weather_code(rng: &mut SimpleRng) -> i64 {
    match rng.next_f64() {
        p if p < 0.63 => 1,
        p if p < 0.96 => 2,
        p if p < 0.995 => 3,
        _ => 4,
    }
}

fn generate_day(instant: i64, date: NaiveDate, rng: &mut SimpleRng) -> DayRow {
    let year_index = i64::from(date.year() - 2011);
    let day_of_year = f64::from(date.ordinal0());
    let holiday = HOLIDAYS.contains(&(date.month(), date.day()));
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    let working = !holiday && !weekend;
    let weathersit = weather_code(rng);

    // Warmest around late July (day ~205).
    let seasonal = (2.0 * std::f64::consts::PI * (day_of_year - 205.0) / 365.0).cos();
    let temp = (0.5 + 0.3 * seasonal + rng.gauss(0.0, 0.05)).clamp(0.05, 0.95);
    let atemp = (0.92 * temp + 0.03 + rng.gauss(0.0, 0.02)).clamp(0.05, 0.95);
    let hum = (0.55 + 0.1 * weathersit as f64 + rng.gauss(0.0, 0.08)).clamp(0.15, 0.98);
    let windspeed = (0.18 + rng.gauss(0.0, 0.07)).clamp(0.02, 0.5);

    let weather_factor = [1.0, 0.85, 0.45, 0.2][weathersit as usize - 1];
    let demand = (2200.0 + 1800.0 * year_index as f64) * (0.6 + temp) * weather_factor;
    let registered = (demand * if working { 1.0 } else { 0.7 } + rng.gauss(0.0, 250.0)).max(0.0);
    let casual = (demand * if working { 0.15 } else { 0.45 } + rng.gauss(0.0, 120.0)).max(0.0);

    DayRow {
        instant,
        dteday: date.format("%Y-%m-%d").to_string(),
        season: season_code(date.month()),
        yr: year_index,
        mnth: i64::from(date.month()),
        holiday: i64::from(holiday),
        weekday: i64::from(date.weekday().num_days_from_sunday()),
        workingday: i64::from(working),
        weathersit,
        temp,
        atemp,
        hum,
        windspeed,
        casual: casual.round() as i64,
        registered: registered.round() as i64,
        cnt: casual.round() as i64 + registered.round() as i64,
    }
}

fn write_parquet(rows: &[DayRow], path: &str) {
    let ints = |f: fn(&DayRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: fn(&DayRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let dates: ArrayRef = Arc::new(StringArray::from(
        rows.iter().map(|r| r.dteday.as_str()).collect::<Vec<_>>(),
    ));

    let schema = Arc::new(Schema::new(vec![
        Field::new("instant", DataType::Int64, false),
        Field::new("dteday", DataType::Utf8, false),
        Field::new("season", DataType::Int64, false),
        Field::new("workingday", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("atemp", DataType::Float64, false),
        Field::new("hum", DataType::Float64, false),
        Field::new("windspeed", DataType::Float64, false),
        Field::new("cnt", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            ints(|r| r.instant),
            dates,
            ints(|r| r.season),
            ints(|r| r.workingday),
            ints(|r| r.weathersit),
            floats(|r| r.temp),
            floats(|r| r.atemp),
            floats(|r| r.hum),
            floats(|r| r.windspeed),
            ints(|r| r.cnt),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let first = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid start date");
    let last = NaiveDate::from_ymd_opt(2012, 12, 31).expect("valid end date");

    let mut rows = Vec::new();
    let mut date = first;
    while date <= last {
        rows.push(generate_day(rows.len() as i64 + 1, date, &mut rng));
        date = date + Days::new(1);
    }

    let csv_path = "sample_day.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    let parquet_path = "sample_day.parquet";
    write_parquet(&rows, parquet_path);

    println!(
        "Wrote {} days ({} to {}) to {csv_path} and {parquet_path}",
        rows.len(),
        first,
        last
    );
}
