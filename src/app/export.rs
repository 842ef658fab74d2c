//! Writing exported features to disk

use crate::host::{GeoFormat, HostError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes export files named `<prefix>-<UTC timestamp>.<suffix>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    dir: PathBuf,
    prefix: String,
}

impl Exporter {
    /// Export into `dir` with file names starting with `prefix`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Target directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for an export of `format` made at `at`
    #[must_use]
    pub fn file_name(&self, format: GeoFormat, at: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            self.prefix,
            at.format("%Y-%m-%dT%H-%M-%S%.3fZ"),
            format.suffix()
        )
    }

    /// Write `contents` to a new file and return its path
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file written
    pub fn write(&self, format: GeoFormat, contents: &str) -> Result<PathBuf, HostError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(self.file_name(format, Utc::now()));
        fs::write(&path, contents)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_file_name() -> Result<(), Box<dyn std::error::Error>> {
        let exporter = Exporter::new("/tmp", "TheKarte");
        let at = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .ok_or("invalid timestamp")?;
        assert_eq!(
            exporter.file_name(GeoFormat::GeoJson, at),
            "TheKarte-2024-03-09T14-05-07.000Z.geojson"
        );
        assert_eq!(
            exporter.file_name(GeoFormat::Kml, at),
            "TheKarte-2024-03-09T14-05-07.000Z.kml"
        );
        Ok(())
    }

    #[test]
    fn test_write_creates_directory() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let exporter = Exporter::new(temp_dir.path().join("exports"), "survey");

        let path = exporter.write(GeoFormat::Wkt, "POINT(1 1)")?;

        assert!(path.starts_with(temp_dir.path().join("exports")));
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("wkt"));
        assert_eq!(fs::read_to_string(&path)?, "POINT(1 1)");
        Ok(())
    }
}
