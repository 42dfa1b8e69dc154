use anyhow::{Context, Result};
use brotli::enc::BrotliEncoderParams;
use brotli::{CompressorWriter, Decompressor};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Default file name offered for a full backup.
pub const DEFAULT_BACKUP_FILE_NAME: &str = "flipper-map-all-backup.json";

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "br")
}

/// Writes a backup document to `path`.
///
/// Brotli compression is used when the path ends with `.br`
/// (e.g. `backup.json.br`).
pub fn write_backup_file(path: impl AsRef<Path>, json: &str) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    let mut writer: Box<dyn Write> = if is_compressed(path) {
        let params = BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        };
        Box::new(CompressorWriter::with_params(BufWriter::new(file), 4096, &params))
    } else {
        Box::new(BufWriter::new(file))
    };

    writer
        .write_all(json.as_bytes())
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;
    writer.flush().context("Failed to flush backup")?;
    // Dropping the compressor finishes the brotli stream
    drop(writer);

    log::info!("Wrote backup to {}", path.display());
    Ok(())
}

/// Reads a backup document from `path`, decompressing `.br` files.
pub fn read_backup_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut reader: Box<dyn Read> = if is_compressed(path) {
        Box::new(Decompressor::new(file, 4096))
    } else {
        Box::new(file)
    };

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .with_context(|| format!("Failed to read backup: {}", path.display()))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressed_file_reads_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let json = r#"{"subAreas": [], "locations": []}"#.repeat(50);

        let plain = dir.path().join("backup.json");
        let packed = dir.path().join("backup.json.br");
        write_backup_file(&plain, &json)?;
        write_backup_file(&packed, &json)?;

        assert_eq!(read_backup_file(&plain)?, json);
        assert_eq!(read_backup_file(&packed)?, json);
        assert!(std::fs::metadata(&packed)?.len() < std::fs::metadata(&plain)?.len());
        Ok(())
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_backup_file("/nonexistent/backup.json").unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
