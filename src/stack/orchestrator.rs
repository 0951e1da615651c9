use super::loader::ContourLayer;
use super::progress::ProgressSink;
use crate::domain::Point2;
use crate::error::{Error, Result};
use crate::hierarchy::{resolve, select_solid_profiles};
use crate::kernel::{GeometryKernel, JoinMode};
use crate::report::{LayerSummary, RunReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Default layer thickness in model units
pub const DEFAULT_THICKNESS: f64 = 0.033;

/// Default import scale mapping contour file units to model units
pub const DEFAULT_SCALE: f64 = 4.0 * 50.0 * 0.1 / 52.917;

/// Default name of the operation group created at the end of a run
pub const DEFAULT_GROUP_NAME: &str = "Layers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What happens to already extruded layers when a later layer fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Leave committed layers in the model for inspection
    #[default]
    Keep,
    /// Undo every operation performed during the run
    RollBack,
}

/// Fixed parameters of one run
#[derive(Debug, Clone)]
pub struct StackSettings {
    pub thickness: f64,
    pub scale: f64,
    pub origin: Point2,
    pub join_mode: JoinMode,
    pub group_name: String,
    pub failure_policy: FailurePolicy,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
            scale: DEFAULT_SCALE,
            origin: Point2::ORIGIN,
            join_mode: JoinMode::Join,
            group_name: DEFAULT_GROUP_NAME.to_string(),
            failure_policy: FailurePolicy::Keep,
        }
    }
}

/// Bottom of layer `index`, computed directly so no error accumulates over the stack
pub fn layer_offset(thickness: f64, index: usize) -> f64 {
    thickness * index as f64
}

/// Mutable bookkeeping of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStackState {
    pub current_index: usize,
    pub cumulative_offset: f64,
    pub cancelled: bool,
    pub completed_count: usize,
    pub status: RunStatus,
}

enum LayerStep {
    Done,
    Cancelled,
}

/// Drives the per-layer pipeline: import, classify, extrude
///
/// Layers are processed strictly in index order, one at a time. Cancellation
/// is polled before and after each import and never interrupts a kernel call.
#[derive(Debug)]
pub struct Orchestrator {
    settings: StackSettings,
    state: LayerStackState,
    report: RunReport,
}

impl Orchestrator {
    pub fn new(settings: StackSettings) -> Self {
        let report = RunReport::new(0, settings.thickness);
        Self {
            settings,
            state: LayerStackState::default(),
            report,
        }
    }

    pub fn settings(&self) -> &StackSettings {
        &self.settings
    }

    pub fn state(&self) -> &LayerStackState {
        &self.state
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    /// Run the whole stack
    ///
    /// Returns the final status for completed and cancelled runs. A failure is
    /// shown once through `progress`, the failure policy is applied, and the
    /// error is returned; layers before the failing one stay in the model
    /// unless the policy rolls them back.
    pub fn run<K, P>(
        &mut self,
        layers: &[ContourLayer],
        kernel: &mut K,
        progress: &mut P,
    ) -> Result<RunStatus>
    where
        K: GeometryKernel,
        P: ProgressSink,
    {
        let total = layers.len();
        let first_operation = kernel.operation_count();

        self.state = LayerStackState {
            status: RunStatus::Running,
            ..Default::default()
        };
        self.report = RunReport::new(total, self.settings.thickness);
        self.report.status = RunStatus::Running;
        info!(
            layers = total,
            thickness = self.settings.thickness,
            "starting layer stack"
        );
        progress.start(total);

        for layer in layers {
            match self.process_layer(layer, total, kernel, progress) {
                Ok(LayerStep::Done) => {}
                Ok(LayerStep::Cancelled) => {
                    info!(layer = layer.index, "run cancelled");
                    self.group_run(kernel, first_operation);
                    return Ok(self.finish(RunStatus::Cancelled, progress));
                }
                Err(err) => {
                    let message = err.report();
                    debug!(layer = ?err.layer(), "run failed: {message}");
                    progress.show_failure(&message);
                    if self.settings.failure_policy == FailurePolicy::RollBack {
                        kernel.roll_back(first_operation);
                        self.report.layers.clear();
                    }
                    self.report.failure = Some(message);
                    self.finish(RunStatus::Failed, progress);
                    return Err(err);
                }
            }
        }

        self.group_run(kernel, first_operation);
        info!(layers = self.state.completed_count, "run completed");
        Ok(self.finish(RunStatus::Completed, progress))
    }

    fn finish<P: ProgressSink>(&mut self, status: RunStatus, progress: &mut P) -> RunStatus {
        self.state.status = status;
        self.report.status = status;
        progress.finish(status);
        status
    }

    fn group_run<K: GeometryKernel>(&self, kernel: &mut K, first_operation: usize) {
        let last = kernel.operation_count();
        if last > first_operation {
            kernel.group_operations(first_operation..last, &self.settings.group_name);
        }
    }

    fn process_layer<K, P>(
        &mut self,
        layer: &ContourLayer,
        total: usize,
        kernel: &mut K,
        progress: &mut P,
    ) -> Result<LayerStep>
    where
        K: GeometryKernel,
        P: ProgressSink,
    {
        let index = layer.index;
        let thickness = self.settings.thickness;
        let offset = layer_offset(thickness, index);
        self.state.current_index = index;
        self.state.cumulative_offset = offset;

        if progress.is_cancelled() {
            self.state.cancelled = true;
            return Ok(LayerStep::Cancelled);
        }

        let sketch = kernel
            .import_contour(layer, self.settings.origin, self.settings.scale)
            .map_err(|source| Error::ImportFailed {
                layer: index,
                path: layer.path.clone(),
                source,
            })?;

        if progress.is_cancelled() {
            self.state.cancelled = true;
            return Ok(LayerStep::Cancelled);
        }

        let profiles = kernel.extract_profiles(&sketch);
        let hierarchy = resolve(&profiles).map_err(|source| Error::Hierarchy {
            layer: index,
            source,
        })?;
        let selected = select_solid_profiles(&hierarchy);
        debug!(
            layer = index,
            profiles = profiles.len(),
            selected = selected.len(),
            holes = hierarchy.forest().len(),
            max_depth = hierarchy.max_depth(),
            "classified layer"
        );

        let extruded = !selected.is_empty();
        if extruded {
            kernel
                .extrude(&selected, offset, thickness, self.settings.join_mode)
                .map_err(|source| Error::ExtrudeFailed {
                    layer: index,
                    source,
                })?;
        } else {
            warn!(layer = index, "no solid profiles, nothing to extrude");
        }

        self.report.layers.push(LayerSummary {
            index,
            offset,
            profiles: profiles.len(),
            selected: selected.len(),
            max_depth: hierarchy.max_depth(),
            extruded,
        });
        self.state.completed_count += 1;
        progress.report_progress(self.state.completed_count, total);
        Ok(LayerStep::Done)
    }
}
