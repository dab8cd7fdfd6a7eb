//! Report-and-terminate path for invariant violations.
//!
//! An invalid instruction set reaching a profile accessor means a build or
//! configuration defect. The `const fn` accessors panic directly; non-const
//! callers such as [`InstructionSet::profile`] come through here so the
//! report is logged first. Release builds run with `panic = "abort"`, so the
//! panic ends the process.

use crate::isa::InstructionSet;

/// Log `message` at error level and terminate.
#[cold]
#[track_caller]
pub fn fatal_report(message: &str) -> ! {
    log::error!("{message}");
    panic!("{message}");
}

/// Fatal report for an instruction set no profile accessor accepts.
#[cold]
#[track_caller]
pub fn instruction_set_abort(isa: InstructionSet) -> ! {
    fatal_report(&format!("Unsupported instruction set {isa:?}"))
}
