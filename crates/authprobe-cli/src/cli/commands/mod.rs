//! CLI command handlers, one file per command.

mod completions;
mod get;
mod interactive;

pub use completions::run_completions;
pub use get::{run_get, GetArgs};
pub use interactive::run_interactive;

use authprobe_core::surface::{FileSurface, StdoutSurface, Surface};
use std::path::PathBuf;
use std::sync::Arc;

/// Output region for `--output`: a file if given, stdout otherwise.
pub(crate) fn surface_for(output: Option<PathBuf>) -> Arc<dyn Surface> {
    match output {
        Some(path) => Arc::new(FileSurface::new(path)),
        None => Arc::new(StdoutSurface),
    }
}
