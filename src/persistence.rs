//! Loading and saving the product list.
//!
//! Two interchangeable files are supported: a CSV file (one row per product)
//! and a JSON file (one array of product objects). Loading prefers CSV and
//! falls back to JSON; it never fails. Saving replaces the whole target file
//! with a snapshot of the current list.

use crate::error::PersistenceError;
use crate::models::Product;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Column order of the CSV file
pub const CSV_HEADER: [&str; 6] = [
    "masp",
    "ten_sp",
    "gia_ban",
    "so_luong",
    "gia_tri_ton",
    "trang_thai",
];

pub const DEFAULT_CSV_PATH: &str = "data.csv";
pub const DEFAULT_JSON_PATH: &str = "data.json";

/// Locations of the two storage files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            json_path: PathBuf::from(DEFAULT_JSON_PATH),
        }
    }
}

impl DataFiles {
    pub fn new(csv_path: impl Into<PathBuf>, json_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            json_path: json_path.into(),
        }
    }

    pub fn path_for(&self, format: StorageFormat) -> &Path {
        match format {
            StorageFormat::Csv => &self.csv_path,
            StorageFormat::Json => &self.json_path,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StorageFormat {
    Csv,
    Json,
}

impl StorageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageFormat::Csv => "CSV",
            StorageFormat::Json => "JSON",
        }
    }
}

/// Where the loaded products came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Csv(PathBuf),
    Json(PathBuf),
    Empty,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub products: Vec<Product>,
    pub source: LoadSource,
}

/// Reads every product from a CSV file. Values are taken as stored, derived
/// fields included. Whitespace around fields is ignored.
pub fn read_csv(path: &Path) -> Result<Vec<Product>, PersistenceError> {
    let csv_err = |source: csv::Error| PersistenceError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut products = Vec::new();
    for result in rdr.deserialize() {
        let product: Product = result.map_err(csv_err)?;
        products.push(product);
    }

    Ok(products)
}

/// Reads every product from a JSON array file. Values are taken as stored,
/// derived fields included.
pub fn read_json(path: &Path) -> Result<Vec<Product>, PersistenceError> {
    let file = File::open(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the product list, preferring the CSV file over the JSON file.
///
/// Any read or parse failure is logged and the next source is tried. If no
/// source yields data the result is an empty list.
pub fn load(files: &DataFiles) -> LoadOutcome {
    if files.csv_path.exists() {
        match read_csv(&files.csv_path) {
            Ok(products) => {
                info!(
                    "Loaded {} products from {}",
                    products.len(),
                    files.csv_path.display()
                );
                return LoadOutcome {
                    products,
                    source: LoadSource::Csv(files.csv_path.clone()),
                };
            }
            Err(e) => warn!("Failed to load CSV data: {e}"),
        }
    } else {
        debug!("No CSV data at {}", files.csv_path.display());
    }

    if files.json_path.exists() {
        match read_json(&files.json_path) {
            Ok(products) => {
                info!(
                    "Loaded {} products from {}",
                    products.len(),
                    files.json_path.display()
                );
                return LoadOutcome {
                    products,
                    source: LoadSource::Json(files.json_path.clone()),
                };
            }
            Err(e) => warn!("Failed to load JSON data: {e}"),
        }
    } else {
        debug!("No JSON data at {}", files.json_path.display());
    }

    info!("No usable data file found, starting with an empty product list");
    LoadOutcome {
        products: Vec::new(),
        source: LoadSource::Empty,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes through a temporary file in the target directory and renames it over
/// `path`, so a failed write never clobbers the previous file.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&mut File) -> Result<(), PersistenceError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(path, e))?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(|e| io_error(path, e))?;
    // The temp file is created private; keep the mode of the file being replaced
    if let Some(metadata) = fs::metadata(path).ok().filter(|m| m.is_file()) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| io_error(path, e))?;
    }
    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

fn write_csv(file: &mut File, path: &Path, records: &[Product]) -> Result<(), PersistenceError> {
    let csv_err = |source: csv::Error| PersistenceError::Csv {
        path: path.to_path_buf(),
        source,
    };
    // Header is written by hand so an empty list still produces one
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    wtr.write_record(CSV_HEADER).map_err(csv_err)?;
    for product in records {
        wtr.serialize(product).map_err(csv_err)?;
    }
    wtr.flush().map_err(|e| io_error(path, e))
}

fn write_json(file: &mut File, path: &Path, records: &[Product]) -> Result<(), PersistenceError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
        PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.write_all(b"\n").map_err(|e| io_error(path, e))?;
    writer.flush().map_err(|e| io_error(path, e))
}

/// Replaces the file for `format` with the given records and returns its path.
pub fn save(
    records: &[Product],
    format: StorageFormat,
    files: &DataFiles,
) -> Result<PathBuf, PersistenceError> {
    let path = files.path_for(format);
    debug!("Saving {} products as {}", records.len(), format.as_str());

    match format {
        StorageFormat::Csv => write_atomically(path, |file| write_csv(file, path, records))?,
        StorageFormat::Json => write_atomically(path, |file| write_json(file, path, records))?,
    }

    info!("Saved {} products to {}", records.len(), path.display());
    Ok(path.to_path_buf())
}

/// Shutdown save: CSV if a CSV file already exists, otherwise JSON.
///
/// Does nothing for an empty list and returns the format written otherwise.
pub fn save_on_exit(
    records: &[Product],
    files: &DataFiles,
) -> Result<Option<StorageFormat>, PersistenceError> {
    if records.is_empty() {
        debug!("Nothing to save on exit");
        return Ok(None);
    }
    let format = if files.csv_path.exists() {
        StorageFormat::Csv
    } else {
        StorageFormat::Json
    };
    save(records, format, files)?;
    Ok(Some(format))
}
