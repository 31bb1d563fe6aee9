//! Tabular export sink port trait.

use crate::domain::error::TickergridError;
use crate::domain::scan::AnnotatedFrame;
use std::path::Path;

/// Port for writing an annotated frame as a flat table. The core only
/// emits values and labels; any rendering (color scales and the like) is
/// the sink's business.
pub trait ExportPort {
    fn write(&self, frame: &AnnotatedFrame, output_path: &Path) -> Result<(), TickergridError>;
}
