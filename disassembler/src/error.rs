use crate::xml;
use thiserror::Error;

/// Errors raised while disassembling an assembly.
///
/// "No solution exists" is not represented here: it is a normal, successful
/// outcome and is reported as `Ok(None)` from [`crate::disassembler::disassemble`].
#[derive(Error, Debug)]
pub enum DisassemblerError {
    #[error("disassembly was cancelled")]
    Cancelled,

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Geometry(#[from] geometry::GeometryError),

    #[error(transparent)]
    Xml(#[from] xml::LoadError),
}
