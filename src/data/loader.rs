use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataError;
use super::model::{RawDay, RentalDataset, RentalRecord, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the rental dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row with at least the required columns
/// * `.json`         – `[{ "dteday": "2011-01-01", "season": 1, ... }, ...]`
/// * `.parquet`      – flat columns, cast to the expected types
pub fn load_file(path: &Path) -> Result<RentalDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    Ok(RentalDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<RentalRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(|name| headers.iter().any(|h| h == name))?;

    reader
        .deserialize::<RawDay>()
        .enumerate()
        .map(|(row_no, row)| {
            // Header is line 1.
            let line = row_no + 2;
            let raw = row.with_context(|| format!("CSV line {line}"))?;
            RentalRecord::try_from(raw).with_context(|| format!("CSV line {line}"))
        })
        .collect()
}

fn check_columns(has: impl Fn(&str) -> bool) -> Result<(), DataError> {
    match REQUIRED_COLUMNS.into_iter().find(|&name| !has(name)) {
        Some(missing) => Err(DataError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the layout of `df.to_json(orient='records')` with
/// dates written as strings.
fn load_json(path: &Path) -> Result<Vec<RentalRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawDay> = serde_json::from_str(&text).context("parsing JSON")?;

    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| RentalRecord::try_from(raw).with_context(|| format!("JSON row {i}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

const FLOAT_COLUMNS: [&str; 7] = [
    "season",
    "weathersit",
    "workingday",
    "temp",
    "atemp",
    "hum",
    "windspeed",
];

/// Columns of one record batch, cast to the types [`RawDay`] expects.
struct BatchColumns {
    dteday: ArrayRef,
    cnt: ArrayRef,
    /// One per entry of [`FLOAT_COLUMNS`], in the same order.
    floats: Vec<ArrayRef>,
}

impl BatchColumns {
    fn from_batch(batch: &arrow::record_batch::RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let column = |name: &str| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| DataError::MissingColumn(name.to_string()))?;
            Ok(batch.column(idx).clone())
        };
        let cast_to = |name: &str, ty: &DataType| -> Result<ArrayRef> {
            cast(column(name)?.as_ref(), ty).with_context(|| format!("casting '{name}' to {ty}"))
        };

        let dteday = column("dteday")?;
        let dteday = match dteday.data_type() {
            DataType::Utf8 => dteday,
            DataType::LargeUtf8 | DataType::Utf8View => cast_to("dteday", &DataType::Utf8)?,
            _ => cast_to("dteday", &DataType::Date32)?,
        };

        // Codes go through Float64 so a fractional code is seen, not truncated.
        let floats = FLOAT_COLUMNS
            .iter()
            .map(|name| cast_to(name, &DataType::Float64))
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchColumns {
            dteday,
            cnt: cast_to("cnt", &DataType::Int64)?,
            floats,
        })
    }

    fn row(&self, row: usize) -> Result<RawDay, DataError> {
        if self.cnt.is_null(row) {
            return Err(DataError::NullCell { column: "cnt" });
        }
        let float = |i: usize| -> Result<f64, DataError> {
            let col = &self.floats[i];
            if col.is_null(row) {
                return Err(DataError::NullCell { column: FLOAT_COLUMNS[i] });
            }
            Ok(col.as_primitive::<Float64Type>().value(row))
        };

        Ok(RawDay {
            dteday: self.date_text(row)?,
            season: float(0)?,
            weathersit: float(1)?,
            workingday: float(2)?,
            temp: float(3)?,
            atemp: float(4)?,
            hum: float(5)?,
            windspeed: float(6)?,
            cnt: self.cnt.as_primitive::<Int64Type>().value(row),
        })
    }

    /// Dates are carried as text so every format goes through the same parser.
    fn date_text(&self, row: usize) -> Result<String, DataError> {
        if self.dteday.is_null(row) {
            return Err(DataError::NullCell { column: "dteday" });
        }
        match self.dteday.data_type() {
            DataType::Utf8 => Ok(self.dteday.as_string::<i32>().value(row).to_string()),
            _ => self
                .dteday
                .as_primitive::<Date32Type>()
                .value_as_date(row)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .ok_or_else(|| DataError::InvalidDate(format!("date32 row {row}"))),
        }
    }
}

fn load_parquet(path: &Path) -> Result<Vec<RentalRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = BatchColumns::from_batch(&batch)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let record = columns
                .row(row)
                .and_then(RentalRecord::try_from)
                .with_context(|| format!("parquet row {row_no}"))?;
            records.push(record);
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use chrono::NaiveDate;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::{Season, Weather};

    const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,\
                          weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn write_parquet(batch: &RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer =
            ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn loads_csv_with_extra_columns() {
        let file = write_file(
            ".csv",
            &format!(
                "{HEADER}\n\
                 1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985\n\
                 2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801\n\
                 3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349\n"
            ),
        );

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.records[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(first.season, Some(Season::Spring));
        assert_eq!(first.weather, Some(Weather::Cloudy));
        assert!(!first.base.is_working_day);
        assert_eq!(first.rental_count(), 985);
        assert!(ds.records[2].base.is_working_day);
    }

    #[test]
    fn loads_tab_separated_text() {
        let file = write_file(
            ".tsv",
            "dteday\tseason\tweathersit\tworkingday\ttemp\tatemp\thum\twindspeed\tcnt\n\
             2012-07-04\t3\t1\t0\t0.8\t0.75\t0.6\t0.1\t7000\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].season, Some(Season::Fall));
        assert_eq!(ds.records[0].rental_count(), 7000);
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = write_file(".csv", "dteday,season,weathersit,workingday,temp,atemp,hum,cnt\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("windspeed".to_string()))
        );
    }

    #[test]
    fn malformed_value_names_the_line() {
        let file = write_file(
            ".csv",
            "dteday,season,weathersit,workingday,temp,atemp,hum,windspeed,cnt\n\
             2011-01-01,1,1,1,0.3,0.3,0.5,0.2,10\n\
             2011-01-02,spring,1,1,0.3,0.3,0.5,0.2,10\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV line 3"), "{err:#}");
    }

    #[test]
    fn decimal_codes_map_when_whole_and_are_unknown_otherwise() {
        let file = write_file(
            ".csv",
            "dteday,season,weathersit,workingday,temp,atemp,hum,windspeed,cnt\n\
             2011-01-01,1.0,2.0,1.0,0.3,0.3,0.5,0.2,10\n\
             2011-01-02,2.5,1,0,0.3,0.3,0.5,0.2,12\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].season, Some(Season::Spring));
        assert_eq!(ds.records[0].weather, Some(Weather::Cloudy));
        assert!(ds.records[0].base.is_working_day);
        assert_eq!(ds.records[1].season, None);
        assert_eq!(ds.records[1].season_label(), "Unknown");
    }

    #[test]
    fn fractional_working_day_flag_is_fatal() {
        let file = write_file(
            ".csv",
            "dteday,season,weathersit,workingday,temp,atemp,hum,windspeed,cnt\n\
             2011-01-01,1,1,0.5,0.3,0.3,0.5,0.2,10\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::InvalidWorkingDay(0.5))
        );
    }

    #[test]
    fn bad_date_is_fatal() {
        let file = write_file(
            ".csv",
            "dteday,season,weathersit,workingday,temp,atemp,hum,windspeed,cnt\n\
             not-a-date,1,1,1,0.3,0.3,0.5,0.2,10\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::InvalidDate("not-a-date".to_string()))
        );
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = write_file(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::UnsupportedExtension("xlsx".to_string()))
        );
    }

    #[test]
    fn loads_records_json() {
        let file = write_file(
            ".json",
            r#"[
                {"dteday": "2011-06-15", "season": 2, "weathersit": 5, "workingday": 1,
                 "temp": 0.7, "atemp": 0.65, "hum": 0.4, "windspeed": 0.1, "cnt": 20, "extra": "x"}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].season, Some(Season::Summer));
        // Unknown weather codes load fine and just lack a label.
        assert_eq!(ds.records[0].weather, None);
    }

    #[test]
    fn loads_parquet_with_date_and_narrow_int_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Date32, false),
            Field::new("season", DataType::Int32, false),
            Field::new("weathersit", DataType::Int32, false),
            Field::new("workingday", DataType::Int64, false),
            Field::new("temp", DataType::Float64, false),
            Field::new("atemp", DataType::Float64, false),
            Field::new("hum", DataType::Float64, false),
            Field::new("windspeed", DataType::Float64, false),
            Field::new("cnt", DataType::Int64, false),
            Field::new("note", DataType::Utf8, false),
        ]));
        // 2011-01-01 is day 14975 since the epoch.
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(vec![14975, 14976])),
                Arc::new(Int32Array::from(vec![1, 4])),
                Arc::new(Int32Array::from(vec![1, 3])),
                Arc::new(Int64Array::from(vec![0, 1])),
                Arc::new(Float64Array::from(vec![0.3, 0.2])),
                Arc::new(Float64Array::from(vec![0.3, 0.2])),
                Arc::new(Float64Array::from(vec![0.8, 0.7])),
                Arc::new(Float64Array::from(vec![0.1, 0.3])),
                Arc::new(Int64Array::from(vec![985, 801])),
                Arc::new(StringArray::from(vec!["a", "b"])),
            ],
        )
        .unwrap();

        let file = write_parquet(&batch);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].date(), NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(ds.records[1].season, Some(Season::Winter));
        assert_eq!(ds.records[1].weather, Some(Weather::LightRain));
        assert_eq!(ds.records[1].rental_count(), 801);
    }

    #[test]
    fn parquet_float_codes_are_not_truncated() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Utf8, false),
            Field::new("season", DataType::Float64, false),
            Field::new("weathersit", DataType::Float64, false),
            Field::new("workingday", DataType::Float64, false),
            Field::new("temp", DataType::Float64, false),
            Field::new("atemp", DataType::Float64, false),
            Field::new("hum", DataType::Float64, false),
            Field::new("windspeed", DataType::Float64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["2011-01-01", "2011-01-02"])),
            Arc::new(Float64Array::from(vec![1.0, 2.5])),
            Arc::new(Float64Array::from(vec![2.0, 1.0])),
            Arc::new(Float64Array::from(vec![1.0, 0.0])),
            Arc::new(Float64Array::from(vec![0.3, 0.2])),
            Arc::new(Float64Array::from(vec![0.3, 0.2])),
            Arc::new(Float64Array::from(vec![0.8, 0.7])),
            Arc::new(Float64Array::from(vec![0.1, 0.3])),
            Arc::new(Int64Array::from(vec![985, 801])),
        ];
        let batch = RecordBatch::try_new(schema, columns).unwrap();

        let file = write_parquet(&batch);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].season, Some(Season::Spring));
        assert_eq!(ds.records[0].weather, Some(Weather::Cloudy));
        assert!(ds.records[0].base.is_working_day);
        assert_eq!(ds.records[1].season, None);
        assert!(!ds.records[1].base.is_working_day);
    }
}
