//! `archdesc list`, `archdesc describe`, `archdesc runtime`.

use std::fmt::Write as _;

use anyhow::{bail, Result};
use archdesc_isa::{ArchitectureProfile, InstructionSet, RUNTIME_ISA, RUNTIME_POINTER_SIZE};
use serde::Serialize;

use super::OutputFormat;

/// Resolve a command-line instruction set name to a valid tag.
///
/// Accepts the canonical names plus `thumb2`, which has no string form of its own.
pub fn parse_isa(name: &str) -> Result<InstructionSet> {
    let isa = match name {
        "thumb2" => InstructionSet::Thumb2,
        other => other.parse::<InstructionSet>()?,
    };
    if !isa.is_valid() {
        bail!("'{name}' has no profile. Use 'archdesc list' to see instruction sets.");
    }
    Ok(isa)
}

pub fn render_list() -> Result<String> {
    let mut out = String::from("Instruction sets:\n\n");
    for isa in InstructionSet::VALID {
        let bits = isa.pointer_size().bits();
        let debug_name = format!("{isa:?}");
        writeln!(out, "  {:<10} {debug_name:<12} {bits}-bit", isa.variant_name())?;
    }
    out.push_str("\nUse 'archdesc describe <name>' for details.\n");
    Ok(out)
}

/// List all instruction sets with a profile.
pub fn list() -> Result<()> {
    print!("{}", render_list()?);
    Ok(())
}

pub fn render_profile(profile: &ArchitectureProfile, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(profile)? + "\n");
    }

    let mut out = String::new();
    writeln!(out, "=== Instruction set: {} ({:?}) ===", profile.variant, profile.isa)?;
    writeln!(out, "  Pointer size:          {} bytes", profile.pointer_size.bytes())?;
    writeln!(out, "  64-bit:                {}", profile.is_64_bit)?;
    writeln!(out, "  Code alignment:        {} bytes", profile.code_alignment)?;
    writeln!(out, "  Instruction alignment: {} bytes", profile.instruction_alignment)?;
    writeln!(out, "  GPR spill slot:        {} bytes", profile.gpr_spill_bytes)?;
    writeln!(out, "  FPR spill slot:        {} bytes", profile.fpr_spill_bytes)?;
    writeln!(out, "  Entry-point adjust:    +{}", profile.entry_point_adjustment)?;
    writeln!(
        out,
        "  Stack overflow guard:  {} bytes",
        profile.stack_overflow_reserved_bytes
    )?;
    Ok(out)
}

/// Describe one instruction set's profile.
pub fn describe(name: &str, format: OutputFormat) -> Result<()> {
    let isa = parse_isa(name)?;
    print!("{}", render_profile(&isa.profile(), format)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct RuntimeReport {
    isa: InstructionSet,
    pointer_size_bytes: usize,
    profile: Option<ArchitectureProfile>,
}

pub fn render_runtime(format: OutputFormat) -> Result<String> {
    let profile = RUNTIME_ISA.is_valid().then(|| RUNTIME_ISA.profile());
    if format == OutputFormat::Json {
        let report = RuntimeReport {
            isa: RUNTIME_ISA,
            pointer_size_bytes: RUNTIME_POINTER_SIZE.bytes(),
            profile,
        };
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
    }

    let mut out = format!(
        "Runtime instruction set: {} ({} bytes per pointer)\n",
        RUNTIME_ISA,
        RUNTIME_POINTER_SIZE.bytes()
    );
    match profile {
        Some(profile) => out.push_str(&render_profile(&profile, OutputFormat::Text)?),
        None => out.push_str("  (no profile: unsupported build target)\n"),
    }
    Ok(out)
}

/// Describe the instruction set this binary was compiled for.
pub fn runtime(format: OutputFormat) -> Result<()> {
    print!("{}", render_runtime(format)?);
    Ok(())
}
