use anyhow::Result;
use std::{fs::File, io::Write, path::Path};

pub fn validate_table_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("csv") | Some("tsv") | Some("txt") => {}
        _ => anyhow::bail!(
            "File must have a .csv, .tsv or .txt extension: {}",
            path.display()
        ),
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

/// Delimiter implied by the file extension, if any. Only `.tsv` implies one.
pub fn delimiter_for_path(path: &Path) -> Option<char> {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some('\t'),
        _ => None,
    }
}

pub fn write_bytes_to_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    Ok(())
}
