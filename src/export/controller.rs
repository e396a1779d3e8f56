use std::cell::Cell;

use tracing::trace;

use crate::error::{CompareError, CompareResult};

pub const IDLE_LABEL: &str = "Download as Image";
pub const BUSY_LABEL: &str = "Generating image...";

/// Observable state of the export button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportControl {
    pub label: &'static str,
    pub disabled: bool,
}

/// Allows at most one export in flight.
///
/// `begin` disables the control and hands out a guard; dropping the guard
/// re-enables it, whether the export succeeded, failed or panicked.
#[derive(Debug, Default)]
pub struct ExportController {
    in_flight: Cell<bool>,
}

impl ExportController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> CompareResult<ExportGuard<'_>> {
        if self.in_flight.replace(true) {
            return Err(CompareError::ExportInFlight);
        }
        trace!("export control disabled");
        Ok(ExportGuard { controller: self })
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    #[must_use]
    pub fn control(&self) -> ExportControl {
        if self.in_flight.get() {
            ExportControl {
                label: BUSY_LABEL,
                disabled: true,
            }
        } else {
            ExportControl {
                label: IDLE_LABEL,
                disabled: false,
            }
        }
    }
}

#[derive(Debug)]
pub struct ExportGuard<'a> {
    controller: &'a ExportController,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.controller.in_flight.set(false);
        trace!("export control restored");
    }
}
