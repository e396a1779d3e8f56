//! Fixed-width, branded PNG export of a comparison matrix.
//!
//! The export is laid out from the canonical `ComparisonMatrix` into a
//! backend-agnostic `RenderFrame`, rasterized by any `Renderer`, and handed to
//! an `ArtifactSink` under a generated filename.

mod branding;
mod config;
mod controller;
mod dispatcher;
mod layout;
mod name_shortener;
mod scene;
mod style;

pub use branding::Branding;
pub use config::{ExportConfig, ExportPalette};
pub use controller::{BUSY_LABEL, ExportControl, ExportController, ExportGuard, IDLE_LABEL};
pub use dispatcher::{
    ArtifactSink, DirectorySink, ExportArtifact, FILENAME_PREFIX, MemorySink, artifact_filename,
    dispatch_artifact,
};
pub use layout::{ColumnLayout, TextMetrics, WrappedLines};
pub use name_shortener::NameShortener;
pub use scene::{ExportScene, SceneRow, background_at, build_export_scene};
pub use style::{CellStyle, ColumnRole, RowStyle, resolve_cell_style};

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::core::ComparisonMatrix;
use crate::error::{CompareError, CompareResult};
use crate::render::Renderer;

/// Who the export is for and when it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub user_display_name: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportRequest {
    #[must_use]
    pub fn new(user_display_name: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            user_display_name: user_display_name.into(),
            generated_at,
        }
    }
}

/// Lays out and rasterizes `matrix` into a named PNG artifact.
///
/// `matrix` is only read. Backend failures surface as `Render` errors.
pub fn render_export<R, G>(
    renderer: &mut R,
    matrix: &ComparisonMatrix,
    config: &ExportConfig,
    request: &ExportRequest,
    rng: &mut G,
) -> CompareResult<ExportArtifact>
where
    R: Renderer + ?Sized,
    G: Rng + ?Sized,
{
    let branding = Branding::compose(
        config,
        &request.user_display_name,
        request.generated_at,
        rng,
    );
    let scene = build_export_scene(matrix, config, &branding)?;

    renderer.render(&scene.frame).map_err(into_render_failure)?;
    let image = renderer.encode_png().map_err(into_render_failure)?;
    debug!(
        width = image.width,
        height = image.height,
        bytes = image.png.len(),
        "rasterized comparison export"
    );

    Ok(ExportArtifact {
        image,
        filename: artifact_filename(&request.user_display_name, request.generated_at.date_naive()),
    })
}

fn into_render_failure(err: CompareError) -> CompareError {
    match err {
        CompareError::Render(_) => err,
        other => CompareError::Render(other.to_string()),
    }
}
