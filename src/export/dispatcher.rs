use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{CompareError, CompareResult};
use crate::render::RasterImage;

pub const FILENAME_PREFIX: &str = "credit-card-comparison";

/// Rasterized export ready for saving. Created per request and consumed by
/// `dispatch_artifact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub image: RasterImage,
    pub filename: String,
}

/// Host file-save primitive.
pub trait ArtifactSink {
    fn save(&mut self, image: &RasterImage, filename: &str) -> CompareResult<()>;
}

/// Builds `credit-card-comparison-{name}-{yyyy-mm-dd}.png`.
///
/// Characters that are unsafe in file names become `-`; a blank name falls
/// back to `user`.
#[must_use]
pub fn artifact_filename(user_display_name: &str, date: NaiveDate) -> String {
    let sanitized: String = user_display_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() || c.is_whitespace() => '-',
            c => c,
        })
        .collect();
    let name = if sanitized.is_empty() {
        "user"
    } else {
        sanitized.as_str()
    };
    format!("{FILENAME_PREFIX}-{name}-{}.png", date.format("%Y-%m-%d"))
}

/// Hands `artifact` to `sink`. No retries; any failure is a `Dispatch` error.
pub fn dispatch_artifact<S: ArtifactSink + ?Sized>(
    artifact: ExportArtifact,
    sink: &mut S,
) -> CompareResult<String> {
    sink.save(&artifact.image, &artifact.filename)
        .map_err(|err| match err {
            CompareError::Dispatch(_) => err,
            other => CompareError::Dispatch(other.to_string()),
        })?;
    info!(
        filename = %artifact.filename,
        bytes = artifact.image.png.len(),
        "dispatched comparison export"
    );
    Ok(artifact.filename)
}

/// Writes artifacts into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&mut self, image: &RasterImage, filename: &str) -> CompareResult<()> {
        fs::create_dir_all(&self.root).map_err(|err| {
            CompareError::Dispatch(format!(
                "failed to create output dir `{}`: {err}",
                self.root.display()
            ))
        })?;
        let path = self.root.join(filename);
        fs::write(&path, &image.png).map_err(|err| {
            CompareError::Dispatch(format!("failed to write `{}`: {err}", path.display()))
        })
    }
}

/// Keeps saved artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<(String, RasterImage)>,
}

impl ArtifactSink for MemorySink {
    fn save(&mut self, image: &RasterImage, filename: &str) -> CompareResult<()> {
        self.saved.push((filename.to_owned(), image.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        ArtifactSink, DirectorySink, ExportArtifact, MemorySink, artifact_filename,
        dispatch_artifact,
    };
    use crate::error::{CompareError, CompareResult};
    use crate::render::RasterImage;

    fn artifact() -> ExportArtifact {
        ExportArtifact {
            image: RasterImage {
                width: 1,
                height: 1,
                png: RasterImage::PNG_SIGNATURE.to_vec(),
            },
            filename: "credit-card-comparison-Asha-2026-10-19.png".to_owned(),
        }
    }

    #[test]
    fn filename_follows_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            artifact_filename("Asha", date),
            "credit-card-comparison-Asha-2026-10-19.png"
        );
        assert_eq!(
            artifact_filename(" Asha R/K ", date),
            "credit-card-comparison-Asha-R-K-2026-10-19.png"
        );
        assert_eq!(
            artifact_filename("", date),
            "credit-card-comparison-user-2026-10-19.png"
        );
    }

    #[test]
    fn directory_sink_writes_png_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DirectorySink::new(dir.path().join("exports"));
        let filename = dispatch_artifact(artifact(), &mut sink).expect("dispatch");

        let written = std::fs::read(dir.path().join("exports").join(&filename)).expect("file");
        assert_eq!(written, RasterImage::PNG_SIGNATURE.to_vec());
    }

    #[test]
    fn sink_failures_surface_as_dispatch_errors() {
        struct Rejecting;
        impl ArtifactSink for Rejecting {
            fn save(&mut self, _: &RasterImage, _: &str) -> CompareResult<()> {
                Err(CompareError::InvalidData("quota exceeded".to_owned()))
            }
        }

        let err = dispatch_artifact(artifact(), &mut Rejecting).expect_err("must fail");
        assert!(matches!(err, CompareError::Dispatch(_)));

        let mut memory = MemorySink::default();
        dispatch_artifact(artifact(), &mut memory).expect("memory dispatch");
        assert_eq!(memory.saved.len(), 1);
    }
}
