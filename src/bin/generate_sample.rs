use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use app_catalog_explorer::data::model::REQUIRED_COLUMNS;
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

const DEFAULT_PATH: &str = "sample_apps.csv";
const DEFAULT_ROWS: usize = 600;

/// Install buckets exactly as the store prints them.
const INSTALL_LABELS: [&str; 9] = [
    "0+",
    "10+",
    "100+",
    "1,000+",
    "10,000+",
    "100,000+",
    "1,000,000+",
    "10,000,000+",
    "100,000,000+",
];

/// Category → genre tags it draws from.
const CATALOG: [(&str, &[&str]); 12] = [
    ("ART_AND_DESIGN", &["Art & Design", "Creativity", "Pretend Play"]),
    ("BOOKS_AND_REFERENCE", &["Books & Reference", "Education"]),
    ("BUSINESS", &["Business"]),
    ("COMMUNICATION", &["Communication"]),
    ("EDUCATION", &["Education", "Brain Games", "Music & Video"]),
    ("FAMILY", &["Casual", "Pretend Play", "Education", "Action & Adventure"]),
    ("FINANCE", &["Finance"]),
    ("GAME", &["Action", "Arcade", "Puzzle", "Racing", "Board", "Casual"]),
    ("HEALTH_AND_FITNESS", &["Health & Fitness"]),
    ("PHOTOGRAPHY", &["Photography"]),
    ("TOOLS", &["Tools", "Education"]),
    ("TRAVEL_AND_LOCAL", &["Travel & Local"]),
];

const NAME_PARTS: [&str; 12] = [
    "Pixel", "Quick", "Smart", "Daily", "Super", "Happy", "Pocket", "Magic", "Bright", "Zen",
    "Turbo", "Tiny",
];

struct Row {
    app: String,
    category: &'static str,
    rating: Option<f64>,
    reviews: i64,
    installs: &'static str,
    app_type: &'static str,
    genres: String,
}

fn generate_row(i: usize, rng: &mut StdRng) -> Row {
    let (category, genre_pool) = CATALOG.choose(rng).copied().unwrap_or(CATALOG[0]);

    let bucket = rng.random_range(0..INSTALL_LABELS.len());
    // More installs, more reviews; roughly a few percent of installers review.
    let reach = 10f64.powi(bucket as i32);
    let reviews = (reach * rng.random_range(0.001..0.05)).round() as i64;

    let rating = if reviews == 0 || rng.random_bool(0.08) {
        None
    } else {
        let r: f64 = 3.0 + rng.random::<f64>() * 2.0 - rng.random::<f64>() * 1.5;
        Some((r.clamp(1.0, 5.0) * 10.0).round() / 10.0)
    };

    let tag_count = rng.random_range(1..=genre_pool.len().min(2));
    let genres = genre_pool
        .choose_multiple(rng, tag_count)
        .copied()
        .collect::<Vec<_>>()
        .join(";");

    let name = format!(
        "{} {} {i}",
        NAME_PARTS.choose(rng).copied().unwrap_or("App"),
        genre_pool[0]
    );

    Row {
        app: name,
        category,
        rating,
        reviews,
        installs: INSTALL_LABELS[bucket],
        app_type: if rng.random_bool(0.92) { "Free" } else { "Paid" },
        genres,
    }
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for row in rows {
        let rating = row.rating.map(|r| r.to_string()).unwrap_or_default();
        let reviews = row.reviews.to_string();
        writer.write_record([
            row.app.as_str(),
            row.category,
            rating.as_str(),
            reviews.as_str(),
            row.installs,
            row.app_type,
            row.genres.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
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
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.app.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.rating))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.reviews))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.installs))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.app_type))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.genres.as_str()))),
        ],
    )
    .context("building record batch")?;

    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// `generate_sample [path] [rows]`. The Parquet copy is written next to the
/// CSV with a `.parquet` extension.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(PathBuf, usize)> {
    let path = args.next().map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
    let rows = match args.next() {
        Some(text) => text
            .parse::<usize>()
            .with_context(|| format!("row count must be a non-negative integer, got '{text}'"))?,
        None => DEFAULT_ROWS,
    };
    Ok((path, rows))
}

fn main() -> Result<()> {
    let (csv_path, count) = parse_args(std::env::args().skip(1))?;
    let parquet_path = csv_path.with_extension("parquet");

    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<Row> = (0..count).map(|i| generate_row(i, &mut rng)).collect();

    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} apps to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
