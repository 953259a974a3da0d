use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::filter::FilteredView;
use super::model::{AppType, REQUIRED_COLUMNS};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output row: normalized values under the source column names.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "App")]
    app: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Rating")]
    rating: Option<f64>,
    #[serde(rename = "Reviews")]
    reviews: u64,
    #[serde(rename = "Installs")]
    installs: u64,
    #[serde(rename = "Type")]
    app_type: Option<AppType>,
    #[serde(rename = "Genres")]
    genres: &'a str,
}

/// Write the view as CSV. Returns the number of rows written.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, sink: W) -> Result<usize, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(REQUIRED_COLUMNS)?;

    let mut written = 0;
    for row in view.rows() {
        writer.serialize(ExportRow {
            app: &row.app,
            category: &row.category,
            rating: row.rating,
            reviews: row.reviews,
            installs: row.installs,
            app_type: row.app_type,
            genres: &row.genres,
        })?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

pub fn export_csv(view: &FilteredView<'_>, path: &Path) -> Result<usize, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let written = write_csv(view, file)?;
    log::info!("Exported {written} rows to {}", path.display());
    Ok(written)
}
