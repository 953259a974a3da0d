use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type,
};
use once_cell::sync::OnceCell;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{normalize_installs, AppRecord, AppType, Dataset, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Owns the dataset path and loads it at most once.
///
/// The first successful [`DatasetCache::load`] reads the file; every later
/// call hands out the same shared table. A failed load leaves the cache empty.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        self.cell
            .get_or_try_init(|| {
                let dataset = load_file(&self.path)?;
                log::info!(
                    "Loaded {} apps in {} categories from {}",
                    dataset.len(),
                    dataset.categories.len(),
                    self.path.display()
                );
                Ok(Arc::new(dataset))
            })
            .map(Arc::clone)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the [`REQUIRED_COLUMNS`], extra columns ignored
/// * `.json`    – `[{ "App": ..., "Category": ..., ... }, ...]`
/// * `.parquet` – same column names; `Installs` as text or integer
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(open(path)?),
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_json(&text)
        }
        "parquet" | "pq" => read_parquet(open(path)?),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row parsing shared by all formats
// ---------------------------------------------------------------------------

/// Build one record from its cells, given in [`REQUIRED_COLUMNS`] order.
fn parse_record(row: usize, cells: [&str; 7]) -> Result<AppRecord, LoadError> {
    let [app, category, rating, reviews, installs, app_type, genres] = cells;
    let malformed = |column: &'static str, value: &str| LoadError::Malformed {
        row,
        column,
        value: value.to_string(),
    };

    let rating = match rating.trim() {
        "" | "NaN" | "nan" => None,
        text => match text.parse::<f64>() {
            Ok(v) if v.is_nan() => None,
            Ok(v) => Some(v),
            Err(_) => return Err(malformed("Rating", text)),
        },
    };
    let reviews = reviews
        .trim()
        .parse::<u64>()
        .map_err(|_| malformed("Reviews", reviews))?;
    let installs = normalize_installs(installs).ok_or_else(|| malformed("Installs", installs))?;

    Ok(AppRecord {
        app: app.to_string(),
        category: category.trim().to_string(),
        rating,
        reviews,
        installs,
        app_type: AppType::parse(app_type),
        genres: genres.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv<R: Read>(source: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut indices = [0usize; 7];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or(LoadError::MissingColumn { column })?;
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = indices.map(|i| record.get(i).unwrap_or(""));
        records.push(parse_record(row_no, cells)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn read_json(text: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Layout("expected a top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Layout(format!("row {row_no} is not a JSON object")))?;

        let mut cells: [String; 7] = Default::default();
        for (cell, column) in cells.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = obj.get(column).ok_or(LoadError::MissingColumn { column })?;
            *cell = json_cell_text(value);
        }
        records.push(parse_record(row_no, cells.each_ref().map(String::as_str))?);
    }

    Ok(Dataset::from_records(records))
}

fn json_cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(file: File) -> Result<Dataset, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut columns: Vec<&ArrayRef> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for column in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(column)
                .map_err(|_| LoadError::MissingColumn { column })?;
            columns.push(batch.column(idx));
        }

        for row in 0..batch.num_rows() {
            let cells: Vec<String> = columns.iter().map(|col| arrow_cell_text(col, row)).collect();
            let row_no = records.len();
            let cells: [&str; 7] = std::array::from_fn(|i| cells[i].as_str());
            records.push(parse_record(row_no, cells)?);
        }
    }

    Ok(Dataset::from_records(records))
}

/// Render one Arrow cell as text so it goes through the same parsing as CSV.
fn arrow_cell_text(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::UInt32 => col.as_primitive::<UInt32Type>().value(row).to_string(),
        DataType::UInt64 => col.as_primitive::<UInt64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        _ => arrow::util::display::array_value_to_string(col, row).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilteredView;
    use crate::data::report::percent_free_by_category;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const SAMPLE_CSV: &str = "\
App,Category,Rating,Reviews,Size,Installs,Type,Price,Genres
Photo Editor,ART_AND_DESIGN,4.1,159,19M,\"10,000+\",Free,0,Art & Design
Coloring book,ART_AND_DESIGN,,967,14M,\"500,000+\",Free,0,Art & Design;Pretend Play
Chess Pro,GAME,4.7,1200,5M,\"1,000,000+\",Paid,$2.99,Board
";

    #[test]
    fn reads_csv_and_normalizes_installs() {
        let ds = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].installs, 10_000);
        assert_eq!(ds.records[2].installs, 1_000_000);
        assert_eq!(ds.records[1].rating, None);
        assert_eq!(ds.records[2].app_type, Some(AppType::Paid));
        assert_eq!(ds.categories, vec!["ART_AND_DESIGN", "GAME"]);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let text = "App,Category,Rating,Reviews,Installs,Type\nA,GAME,4.0,1,1+,Free\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { column: "Genres" }));
    }

    #[test]
    fn csv_bad_installs_is_malformed() {
        let text = "App,Category,Rating,Reviews,Installs,Type,Genres\nA,GAME,4.0,1,Free,Free,Board\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Malformed { row: 0, column: "Installs", .. }
        ));
    }

    #[test]
    fn unknown_type_loads_as_absent_and_counts_as_not_free() {
        let text = "App,Category,Rating,Reviews,Installs,Type,Genres\n\
                    A,GAME,4.0,1,1+,NaN,Board\n\
                    B,GAME,4.2,3,10+,Free,Board\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.records[0].app_type, None);
        assert_eq!(ds.records[1].app_type, Some(AppType::Free));

        let free = percent_free_by_category(&FilteredView::all(&ds));
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].value, 50.0);
    }

    #[test]
    fn reads_json_records() {
        let text = r#"[
            {"App": "A", "Category": "GAME", "Rating": 4.5, "Reviews": 10,
             "Installs": "1,000+", "Type": "Free", "Genres": "Arcade"},
            {"App": "B", "Category": "TOOLS", "Rating": null, "Reviews": 0,
             "Installs": 50, "Type": "Paid", "Genres": "Tools"}
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].rating, Some(4.5));
        assert_eq!(ds.records[0].installs, 1_000);
        assert_eq!(ds.records[1].rating, None);
        assert_eq!(ds.records[1].installs, 50);
    }

    #[test]
    fn json_requires_array_of_objects() {
        assert!(matches!(read_json("{}"), Err(LoadError::Layout(_))));
        assert!(matches!(read_json("[1]"), Err(LoadError::Layout(_))));
    }

    #[test]
    fn reads_parquet_with_text_installs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("App", DataType::Utf8, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Rating", DataType::Float64, true),
            Field::new("Reviews", DataType::Int64, false),
            Field::new("Installs", DataType::Utf8, false),
            Field::new("Type", DataType::Utf8, false),
            Field::new("Genres", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec!["GAME", "TOOLS"])),
                Arc::new(Float64Array::from(vec![Some(3.5), None])),
                Arc::new(Int64Array::from(vec![12, 0])),
                Arc::new(StringArray::from(vec!["5,000+", "0+"])),
                Arc::new(StringArray::from(vec!["Free", "Paid"])),
                Arc::new(StringArray::from(vec!["Arcade;Action", "Tools"])),
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].rating, Some(3.5));
        assert_eq!(ds.records[0].installs, 5_000);
        assert_eq!(ds.records[1].rating, None);
        assert_eq!(ds.records[1].reviews, 0);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("apps.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.csv");
        let cache = DatasetCache::new(&path);
        assert!(matches!(cache.load(), Err(LoadError::Io { .. })));

        std::fs::write(&path, SAMPLE_CSV).unwrap();
        assert_eq!(cache.load().unwrap().len(), 3);
    }

    #[test]
    fn cache_reads_the_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let cache = DatasetCache::new(&path);
        let first = cache.load().unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = cache.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }
}
