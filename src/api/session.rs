use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::core::{
    CardColumn, ComparisonMatrix, ComparisonRecord, FilterOptions, FilterState,
    MatrixBuildOptions, apply_view, build_comparison_matrix, normalize_batch, visible_columns,
};
use crate::error::{CompareError, CompareResult};
use crate::export::{
    ArtifactSink, ExportConfig, ExportControl, ExportController, ExportRequest, dispatch_artifact,
    render_export,
};
use crate::render::Renderer;

use super::ComparisonSource;

/// Outcome of one `load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub user_cards_only: bool,
}

/// Page-level facade: fetch, normalize, build, filter and export.
///
/// Holds one fully loaded snapshot at a time. Every view or export request
/// derives a fresh matrix from that snapshot.
pub struct ComparisonSession<S: ComparisonSource> {
    source: S,
    build_options: MatrixBuildOptions,
    export_config: ExportConfig,
    records: Vec<ComparisonRecord>,
    matrix: Option<ComparisonMatrix>,
    loaded_user_cards_only: Option<bool>,
    filter: FilterState,
    export: ExportController,
}

impl<S: ComparisonSource> ComparisonSession<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            build_options: MatrixBuildOptions::default(),
            export_config: ExportConfig::default(),
            records: Vec::new(),
            matrix: None,
            loaded_user_cards_only: None,
            filter: FilterState::default(),
            export: ExportController::new(),
        }
    }

    pub fn with_export_config(mut self, config: ExportConfig) -> CompareResult<Self> {
        config.validate()?;
        self.export_config = config;
        Ok(self)
    }

    #[must_use]
    pub fn with_build_options(mut self, options: MatrixBuildOptions) -> Self {
        self.build_options = options;
        self
    }

    /// Fetches with the current `user_cards_only` flag and rebuilds the matrix.
    ///
    /// On fetch failure the previous snapshot is discarded, so no stale or
    /// partial matrix stays visible.
    pub fn load(&mut self) -> CompareResult<LoadSummary> {
        let user_cards_only = self.filter.user_cards_only;
        let raw = match self.source.fetch_comparison(user_cards_only) {
            Ok(raw) => raw,
            Err(err) => {
                self.records.clear();
                self.matrix = None;
                self.loaded_user_cards_only = None;
                warn!(error = %err, user_cards_only, "comparison fetch failed");
                return Err(match err {
                    CompareError::Fetch(_) => err,
                    other => CompareError::Fetch(other.to_string()),
                });
            }
        };

        let batch = normalize_batch(&raw);
        let summary = LoadSummary {
            accepted: batch.records.len(),
            rejected: batch.rejected.len(),
            user_cards_only,
        };
        self.matrix = Some(build_comparison_matrix(&batch.records, &self.build_options));
        self.records = batch.records;
        self.loaded_user_cards_only = Some(user_cards_only);
        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            user_cards_only,
            "loaded comparison snapshot"
        );
        Ok(summary)
    }

    /// Replaces the filter state. Returns `true` when the new state needs a
    /// fresh `load`, which happens when the "my cards only" flag changed.
    pub fn set_filter(&mut self, filter: FilterState) -> bool {
        self.filter = filter;
        let stale = self.needs_reload();
        debug!(stale, "comparison filter updated");
        stale
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn needs_reload(&self) -> bool {
        self.loaded_user_cards_only != Some(self.filter.user_cards_only)
    }

    #[must_use]
    pub fn records(&self) -> &[ComparisonRecord] {
        &self.records
    }

    #[must_use]
    pub fn full_matrix(&self) -> Option<&ComparisonMatrix> {
        self.matrix.as_ref()
    }

    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        self.matrix
            .as_ref()
            .map(FilterOptions::from_matrix)
            .unwrap_or_default()
    }

    /// Matrix for the current filter/sort state.
    ///
    /// Fails while a reload is pending, so a stale card set is never shown.
    pub fn visible_matrix(&self) -> CompareResult<ComparisonMatrix> {
        Ok(apply_view(self.loaded_matrix()?, &self.filter))
    }

    pub fn visible_cards(&self) -> CompareResult<Vec<&CardColumn>> {
        Ok(visible_columns(self.loaded_matrix()?, &self.filter))
    }

    #[must_use]
    pub fn export_control(&self) -> ExportControl {
        self.export.control()
    }

    /// Renders the visible matrix and saves it through `sink`.
    ///
    /// Only one export may be in flight; the export control is restored on
    /// every exit path. Refuses to run while a reload is pending. Returns the
    /// saved filename.
    pub fn export<R, K, G>(
        &self,
        renderer: &mut R,
        sink: &mut K,
        user_display_name: &str,
        generated_at: DateTime<Utc>,
        rng: &mut G,
    ) -> CompareResult<String>
    where
        R: Renderer + ?Sized,
        K: ArtifactSink + ?Sized,
        G: Rng + ?Sized,
    {
        let _guard = self.export.begin()?;
        let snapshot = self.visible_matrix()?;
        let request = ExportRequest::new(user_display_name, generated_at);

        let outcome = render_export(renderer, &snapshot, &self.export_config, &request, rng)
            .and_then(|artifact| dispatch_artifact(artifact, sink));
        if let Err(err) = &outcome {
            warn!(error = %err, alert = err.user_message(), "comparison export failed");
        }
        outcome
    }

    /// The loaded matrix, provided it was fetched for the current
    /// "my cards only" setting.
    fn loaded_matrix(&self) -> CompareResult<&ComparisonMatrix> {
        let matrix = self.matrix.as_ref().ok_or_else(|| {
            CompareError::InvalidData("comparison data has not been loaded".to_owned())
        })?;
        if self.needs_reload() {
            return Err(CompareError::InvalidData(
                "comparison data is stale; reload required".to_owned(),
            ));
        }
        Ok(matrix)
    }
}
