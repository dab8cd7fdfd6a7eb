//! Architecture descriptions for a managed runtime.
//!
//! Answers the questions a code generator, calling-convention layer, or
//! stack-overflow check asks about a target instruction set:
//! - **Tags:** the closed set of supported instruction sets and their names
//! - **Profiles:** pointer size, alignments, spill slots, entry-point
//!   adjustment, stack guard size
//! - **Resolution:** which instruction sets a device actually runs
//! - **Two-word returns:** register-pair results for entry trampolines

pub mod error;
pub mod fatal;
pub mod isa;
pub mod profile;
pub mod properties;
pub mod stack;
pub mod supported;
pub mod two_word;

pub use error::{IsaError, Result};
pub use isa::{InstructionSet, RUNTIME_ISA, RUNTIME_POINTER_SIZE};
pub use profile::{ArchitectureProfile, PointerSize};
pub use properties::{PropertyMap, PropertySource, SystemProperties, ZYGOTE_PROPERTY};
pub use supported::{supported_instruction_sets, supported_instruction_sets_for, ZygoteKinds};
pub use two_word::{two_word_failure, two_word_success, TwoWord, TwoWordReturn};
