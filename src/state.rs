use std::path::PathBuf;

use crate::data::filter::{filtered_indices, Constraints};
use crate::data::model::RentalDataset;
use crate::data::view::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which page the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Charts,
    Records,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, never modified after startup.
    pub dataset: RentalDataset,

    /// File the dataset came from, shown in the top bar.
    pub source: PathBuf,

    /// Current filter selection.
    pub constraints: Constraints,

    /// Selection restored by the reset button.
    pub initial_constraints: Constraints,

    /// Indices of records passing the current constraints (cached).
    pub visible_indices: Vec<usize>,

    /// Chart data for `visible_indices` (cached).
    pub view: DashboardView,

    /// Histogram bin count.
    pub bins: usize,

    pub tab: Tab,
}

impl AppState {
    /// Build the state for a freshly loaded dataset.
    pub fn new(
        dataset: RentalDataset,
        source: PathBuf,
        constraints: Constraints,
        bins: usize,
    ) -> Self {
        let visible_indices = filtered_indices(&dataset.records, &constraints);
        let view = DashboardView::build(&dataset.records, &visible_indices, bins);
        Self {
            dataset,
            source,
            initial_constraints: constraints.clone(),
            constraints,
            visible_indices,
            view,
            bins,
            tab: Tab::default(),
        }
    }

    /// Replace the constraints and recompute everything downstream of them.
    /// An unchanged selection keeps the cached view.
    pub fn set_constraints(&mut self, constraints: Constraints) {
        if constraints == self.constraints {
            return;
        }
        self.constraints = constraints;
        self.refilter();
    }

    /// Restore the startup selection.
    pub fn reset(&mut self) {
        self.set_constraints(self.initial_constraints.clone());
    }

    /// Recompute `visible_indices` and `view` after a constraint change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset.records, &self.constraints);
        self.view = DashboardView::build(&self.dataset.records, &self.visible_indices, self.bins);
        log::debug!(
            "filter matched {} of {} days",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }
}
