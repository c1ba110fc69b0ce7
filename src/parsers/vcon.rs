use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::models::Vcon;
use crate::utils::validate_file_size;

/// Maximum number of files read from one directory (prevent resource exhaustion)
const MAX_FILES: usize = 10_000;

const JSON_EXTENSION: &str = "json";

/// A record together with the file it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedVcon {
    pub path: PathBuf,
    pub record: Vcon,
}

/// Parse a single vCon JSON document from disk
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is larger than 10MB, or does
/// not contain a vCon-shaped JSON object.
pub fn parse_vcon_file(path: &Path) -> Result<Vcon> {
    // Validate size on the open handle to avoid a TOCTOU race
    let mut file =
        File::open(path).with_context(|| format!("Failed to open vCon file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut text = String::new();
    file.read_to_string(&mut text)
        .with_context(|| format!("Failed to read vCon file: {}", path.display()))?;

    Vcon::from_json(&text).with_context(|| format!("Failed to parse vCon file: {}", path.display()))
}

/// Load every `*.json` vCon below a directory, in path order
///
/// Files that fail to parse are logged and skipped. Returns an error if more
/// than half of the candidate files fail, or if the directory holds more than
/// [`MAX_FILES`] candidates.
pub fn load_vcon_dir(dir: &Path) -> Result<Vec<LoadedVcon>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some(JSON_EXTENSION);
        if !entry.file_type().is_file() || !is_json {
            continue;
        }

        candidates.push(path.to_path_buf());
        if candidates.len() > MAX_FILES {
            bail!("Too many vCon files under {} (max {})", dir.display(), MAX_FILES);
        }
    }

    let mut records = Vec::with_capacity(candidates.len());
    let mut failed = 0;

    for path in candidates {
        match parse_vcon_file(&path) {
            Ok(record) => records.push(LoadedVcon { path, record }),
            Err(e) => {
                failed += 1;
                warn!("Skipping {}: {:#}", path.display(), e);
            }
        }
    }

    let total = records.len() + failed;
    if total > 0 {
        let failure_rate = failed as f64 / total as f64;
        if failure_rate > 0.5 {
            bail!(
                "Too many vCon files failed to parse in {}: {} of {} ({:.1}%)",
                dir.display(),
                failed,
                total,
                failure_rate * 100.0
            );
        }
    }

    info!("Loaded {} vCon files from {} ({} skipped)", records.len(), dir.display(), failed);

    Ok(records)
}

/// Load a single file or every vCon in a directory
pub fn load_vcons(path: &Path) -> Result<Vec<LoadedVcon>> {
    if path.is_dir() {
        load_vcon_dir(path)
    } else {
        let record = parse_vcon_file(path)?;
        Ok(vec![LoadedVcon { path: path.to_path_buf(), record }])
    }
}
