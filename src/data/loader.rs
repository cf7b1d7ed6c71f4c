use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma-separated (the Pulse extract)
/// * `.tsv`     – header row, tab-separated
/// * `.json`    – `[{ "gender": "...", "age": 34, ... }, ...]`
/// * `.parquet` – flat columns of strings, ints, floats, bools
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    log::debug!(
        "Parsed {} rows x {} columns from {}",
        table.len(),
        table.column_names.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, one respondent per line. Cell types are
/// guessed per cell; an empty cell is null.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let headers = strip_index_column(headers);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }

        let cells: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();
        rows.push(cells);
    }

    Ok(Table::from_rows(headers, rows))
}

/// `df.to_csv()` writes the index as an unnamed first column; give it a name
/// so it stays addressable.
fn strip_index_column(mut headers: Vec<String>) -> Vec<String> {
    if let Some(first) = headers.first_mut() {
        if first.is_empty() {
            *first = "index".to_string();
        }
    }
    headers
}

/// Tokens `pandas.read_csv` reads as missing by default.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if MISSING_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return float_cell(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "gender": "Female", "age": 34, "received_vaccine": true, "why_no_vaccine_cost": null },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance; keys missing from a record read as null.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        rows.push(cells);
    }

    Ok(Table::from_rows(column_names, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rejected.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, col_name) in column_names.iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}, column '{col_name}'"))?;
                cells.insert(col_name.clone(), value);
            }
            rows.push(cells);
        }
    }

    Ok(Table::from_rows(column_names, rows))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => {
            CellValue::String(downcast::<LargeStringArray>(col)?.value(row).to_string())
        }
        DataType::Utf8View => CellValue::String(col.as_string_view().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => float_cell(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => float_cell(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

/// NaN is missing, like any other null.
fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}

fn downcast<T: 'static>(col: &Arc<dyn Array>) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("column data does not match {:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_types_and_order() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "pulse.csv",
            "gender,age,received_vaccine,vaccine_intention,why_no_vaccine_cost\n\
             Female,34,True,,1\n\
             Male,51,False,4.0,\n",
        );
        let t = load_file(&path).unwrap();
        assert_eq!(
            t.column_names,
            vec!["gender", "age", "received_vaccine", "vaccine_intention", "why_no_vaccine_cost"]
        );
        assert_eq!(t.len(), 2);
        let r0 = &t.records[0];
        assert_eq!(r0.get("gender"), &CellValue::from("Female"));
        assert_eq!(r0.get("age"), &CellValue::Integer(34));
        assert_eq!(r0.get("received_vaccine"), &CellValue::Bool(true));
        assert!(r0.get("vaccine_intention").is_null());
        let r1 = &t.records[1];
        assert_eq!(r1.id, 1);
        assert_eq!(r1.get("vaccine_intention"), &CellValue::Float(4.0));
        assert!(r1.get("why_no_vaccine_cost").is_null());
    }

    #[test]
    fn test_csv_pandas_index_column() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "pulse.csv", ",gender\n0,F\n1,M\n");
        let t = load_file(&path).unwrap();
        assert_eq!(t.column_names, vec!["index", "gender"]);
    }

    #[test]
    fn test_csv_ragged_row_is_error() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "pulse.csv", "a,b\n1,2\n3\n");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn test_tsv() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "pulse.tsv", "race\teducation\nWhite\tSome college\n");
        let t = load_file(&path).unwrap();
        assert_eq!(t.records[0].get("education"), &CellValue::from("Some college"));
    }

    #[test]
    fn test_json_records() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "pulse.json",
            r#"[{"gender":"F","age":30,"why_no_vaccine_cost":null},
                {"gender":"M","age":41.5}]"#,
        );
        let t = load_file(&path).unwrap();
        assert_eq!(t.len(), 2);
        assert!(t.has_column("why_no_vaccine_cost"));
        assert_eq!(t.records[1].get("age"), &CellValue::Float(41.5));
        assert!(t.records[1].get("why_no_vaccine_cost").is_null());
    }

    #[test]
    fn test_json_not_array() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "pulse.json", r#"{"gender":"F"}"#);
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("top-level JSON array"));
    }

    #[test]
    fn test_parquet_roundtrip_with_nulls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pulse.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("gender", DataType::Utf8, false),
            Field::new("age", DataType::Int64, false),
            Field::new("received_vaccine", DataType::Boolean, false),
            Field::new("why_no_vaccine_cost", DataType::Float64, true),
            Field::new("why_no_vaccine_fear", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["F", "M"])),
                Arc::new(Int64Array::from(vec![30, 65])),
                Arc::new(BooleanArray::from(vec![true, false])),
                Arc::new(Float64Array::from(vec![Some(1.0), None])),
                Arc::new(Float64Array::from(vec![f64::NAN, 2.0])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let t = load_file(&path).unwrap();
        assert_eq!(t.column_names.len(), 5);
        assert_eq!(t.records[1].get("age"), &CellValue::Integer(65));
        assert_eq!(t.records[0].get("why_no_vaccine_cost"), &CellValue::Float(1.0));
        assert!(t.records[1].get("why_no_vaccine_cost").is_null());
        assert_eq!(t.records[0].get("why_no_vaccine_fear"), &CellValue::Null);
        assert_eq!(t.records[1].get("why_no_vaccine_fear"), &CellValue::Float(2.0));
    }

    #[test]
    fn test_csv_missing_tokens_are_null() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "pulse.csv",
            "why_no_vaccine_cost,why_no_vaccine_fear\n\
             NULL,-nan\n\
             N/A,None\n\
             1,\n\
             <NA>,NAN\n",
        );
        let t = load_file(&path).unwrap();
        let cells: Vec<&CellValue> = t
            .records
            .iter()
            .flat_map(|r| [r.get("why_no_vaccine_cost"), r.get("why_no_vaccine_fear")])
            .collect();
        assert_eq!(cells.iter().filter(|v| !v.is_null()).count(), 1);
        assert_eq!(t.records[2].get("why_no_vaccine_cost"), &CellValue::Integer(1));
        assert!(cells.iter().all(|v| !matches!(v, CellValue::Float(f) if f.is_nan())));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.csv"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("pulse.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn test_guess_cell_type() {
        assert_eq!(guess_cell_type("NA"), CellValue::Null);
        assert_eq!(guess_cell_type("#N/A"), CellValue::Null);
        assert_eq!(guess_cell_type("null"), CellValue::Null);
        assert_eq!(guess_cell_type("-NaN"), CellValue::Null);
        assert_eq!(guess_cell_type("-3"), CellValue::Integer(-3));
        assert_eq!(guess_cell_type("0.5"), CellValue::Float(0.5));
        assert_eq!(guess_cell_type("FALSE"), CellValue::Bool(false));
        assert_eq!(guess_cell_type(" Asian "), CellValue::from("Asian"));
    }
}
