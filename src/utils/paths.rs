use std::borrow::Cow;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use uuid::Uuid;

use crate::models::Vcon;

// Maximum file size for vCon documents: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

// Characters that are unsafe in file names on at least one platform
const FILE_NAME_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'*')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'|')
    .add(b'/')
    .add(b':');

/// Validates that a file's size is within acceptable limits (10MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and the read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 10MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// File name under which a record is offered for download
///
/// Well-formed UUIDs are used as-is. Other identifiers are percent-encoded so
/// they cannot escape the download directory. Records without an identifier
/// fall back to their position in the result list.
///
/// # Examples
///
/// ```
/// use vcon_search::utils::paths::download_file_name;
///
/// assert_eq!(download_file_name(Some("a/b"), 0), "a%2Fb.json");
/// assert_eq!(download_file_name(None, 3), "vcon-3.json");
/// ```
pub fn download_file_name(uuid: Option<&str>, index: usize) -> String {
    match uuid.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) if Uuid::parse_str(id).is_ok() => format!("{}.json", id),
        Some(id) if id.chars().all(|c| c == '.') => format!("vcon-{}.json", index),
        Some(id) => format!("{}.json", utf8_percent_encode(id, FILE_NAME_ENCODE_SET)),
        None => format!("vcon-{}.json", index),
    }
}

/// Write a record as pretty JSON into `dir`, returning the written path
///
/// The file is written to a temporary name first and renamed into place.
pub fn write_download(dir: &Path, record: &Vcon, index: usize) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download directory: {}", dir.display()))?;

    let file_name = download_file_name(record.uuid.as_deref(), index);
    let path = dir.join(&file_name);
    let temp_path = dir.join(format!("{}.tmp", file_name));

    fs::write(&temp_path, record.to_json_pretty())
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, &path)
        .with_context(|| format!("Failed to move download into place: {}", path.display()))?;

    Ok(path)
}

/// Platform download directory, falling back to the working directory
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, dirs::home_dir().as_deref())
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        return Path::new("~").join(rest).to_string_lossy().into_owned();
    }

    match path.to_string_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn test_download_file_name_uuid() {
        let id = "550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(download_file_name(Some(id), 0), format!("{}.json", id));
    }

    #[test]
    fn test_download_file_name_encodes_separators() {
        assert_eq!(download_file_name(Some("../etc/passwd"), 0), "..%2Fetc%2Fpasswd.json");
        assert_eq!(download_file_name(Some("a\\b:c"), 0), "a%5Cb%3Ac.json");
    }

    #[test]
    fn test_download_file_name_fallbacks() {
        assert_eq!(download_file_name(None, 2), "vcon-2.json");
        assert_eq!(download_file_name(Some("   "), 5), "vcon-5.json");
        assert_eq!(download_file_name(Some(".."), 1), "vcon-1.json");
    }

    #[test]
    fn test_write_download_creates_pretty_json() {
        let dir = TempDir::new().unwrap();
        let record = Vcon::from_json(r#"{"uuid":"rec-1","parties":[{"name":"A"}]}"#).unwrap();

        let path = write_download(&dir.path().join("out"), &record, 0).unwrap();
        assert_eq!(path.file_name().unwrap(), "rec-1.json");

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains('\n'));
        assert_eq!(Vcon::from_json(&written).unwrap(), record);
        assert!(!dir.path().join("out").join("rec-1.json.tmp").exists());
    }

    #[test]
    fn test_validate_file_size_small_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        let handle = File::open(file.path()).unwrap();
        assert!(validate_file_size(&handle, file.path()).is_ok());
    }

    #[test]
    fn test_validate_file_size_too_large() {
        let file = NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_FILE_SIZE_BYTES + 1).unwrap();
        let handle = File::open(file.path()).unwrap();
        let err = validate_file_size(&handle, file.path()).unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_format_path_with_tilde() {
        let home = Path::new("/home/tester");
        let formatted =
            format_path_with_tilde_internal(Path::new("/home/tester/Downloads/a.json"), Some(home));
        assert_eq!(formatted, "~/Downloads/a.json");

        let formatted = format_path_with_tilde_internal(Path::new("/opt/data"), Some(home));
        assert_eq!(formatted, "/opt/data");

        let formatted = format_path_with_tilde_internal(Path::new("/opt/data"), None);
        assert_eq!(formatted, "/opt/data");
    }
}
