//! Layer stack: file discovery and the sequential per-layer pipeline

pub mod loader;
pub mod orchestrator;
pub mod progress;

pub use loader::{ContourLayer, layer_file_name, load_stack};
pub use orchestrator::{
    FailurePolicy, LayerStackState, Orchestrator, RunStatus, StackSettings, layer_offset,
};
pub use progress::{CancelToken, ConsoleProgress, ProgressSink};
