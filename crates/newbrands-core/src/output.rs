//! Writers for the static report directory: `data.json`, `data.csv` and a
//! placeholder `index.html`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::{OutputError, ReportPayload};

pub const JSON_FILE: &str = "data.json";
pub const CSV_FILE: &str = "data.csv";
pub const INDEX_FILE: &str = "index.html";

const PLACEHOLDER_INDEX: &str = "<!doctype html>
<html lang='en'><head><meta charset='utf-8'><title>New brands</title></head>
<body><p>Report data generated. Add docs/index.html for a proper page; see data.json and data.csv.</p></body></html>
";

/// Where one run wrote its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub index: PathBuf,
    /// `true` if the placeholder index page was created by this run.
    pub index_created: bool,
}

/// Write the complete report into `out_dir`, creating the directory if needed.
///
/// `data.json` and `data.csv` are always overwritten; `index.html` is only
/// written when absent.
///
/// # Errors
///
/// Returns [`OutputError`] on the first file that cannot be written.
pub fn write_report(out_dir: &Path, payload: &ReportPayload) -> Result<ReportPaths, OutputError> {
    fs::create_dir_all(out_dir).map_err(|source| OutputError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let json = out_dir.join(JSON_FILE);
    let csv = out_dir.join(CSV_FILE);
    let index = out_dir.join(INDEX_FILE);

    write_json(&json, payload)?;
    write_csv(&csv, payload)?;
    let index_created = ensure_index_page(&index)?;

    Ok(ReportPaths {
        json,
        csv,
        index,
        index_created,
    })
}

/// Write the payload as pretty-printed UTF-8 JSON.
///
/// # Errors
///
/// Returns [`OutputError::Json`] or [`OutputError::Io`].
pub fn write_json(path: &Path, payload: &ReportPayload) -> Result<(), OutputError> {
    let mut body = serde_json::to_string_pretty(payload).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    body.push('\n');
    fs::write(path, body).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), items = payload.items.len(), "wrote JSON report");
    Ok(())
}

/// Write the report items as CSV, one row per brand in payload order.
///
/// The header depends on the payload's policy: the active-count column is
/// only present when the policy reports it.
///
/// # Errors
///
/// Returns [`OutputError::Csv`] if a record cannot be written.
pub fn write_csv(path: &Path, payload: &ReportPayload) -> Result<(), OutputError> {
    let csv_err = |source: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let policy = payload.meta.policy;
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
    wtr.write_record(policy.csv_header()).map_err(csv_err)?;

    for item in &payload.items {
        let total = item.total_products.to_string();
        if policy.reports_active_count() {
            let active = item.active_products.unwrap_or(0).to_string();
            wtr.write_record([
                item.brand.as_str(),
                item.first_product_live.as_str(),
                total.as_str(),
                active.as_str(),
            ])
            .map_err(csv_err)?;
        } else {
            wtr.write_record([
                item.brand.as_str(),
                item.first_product_live.as_str(),
                total.as_str(),
            ])
            .map_err(csv_err)?;
        }
    }

    wtr.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), items = payload.items.len(), "wrote CSV report");
    Ok(())
}

/// Create the placeholder index page unless a page already exists.
///
/// Returns `true` if the page was created. An existing file is never touched.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the file cannot be created or written.
pub fn ensure_index_page(path: &Path) -> Result<bool, OutputError> {
    let io_err = |source: std::io::Error| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(path = %path.display(), "index page exists; leaving it untouched");
            return Ok(false);
        }
        Err(e) => return Err(io_err(e)),
    };
    file.write_all(PLACEHOLDER_INDEX.as_bytes()).map_err(io_err)?;
    tracing::info!(path = %path.display(), "created placeholder index page");
    Ok(true)
}
