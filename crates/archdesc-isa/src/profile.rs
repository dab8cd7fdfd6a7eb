//! Architecture profile.
//!
//! Collects every per-architecture fact the accessors on
//! [`InstructionSet`] expose into one record, for reporting and for callers
//! that want the whole picture at once.

use serde::{Deserialize, Serialize};

use crate::fatal::instruction_set_abort;
use crate::isa::InstructionSet;

/// Width of a native pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(usize)]
pub enum PointerSize {
    /// 32-bit pointers.
    K32 = 4,
    /// 64-bit pointers.
    K64 = 8,
}

impl PointerSize {
    /// Pointer size implied by an instruction set's bitness.
    pub const fn for_bitness(is_64_bit: bool) -> Self {
        if is_64_bit {
            PointerSize::K64
        } else {
            PointerSize::K32
        }
    }

    pub const fn bytes(self) -> usize {
        self as usize
    }

    pub const fn bits(self) -> usize {
        self.bytes() * 8
    }
}

/// Every profile field of one valid instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchitectureProfile {
    /// The instruction set described, by canonical name.
    pub isa: InstructionSet,
    /// Same as `isa`, but `thumb2` stays distinct from `arm`.
    pub variant: &'static str,
    /// Native pointer width.
    pub pointer_size: PointerSize,
    /// Alignment of a subroutine's first instruction, in bytes.
    pub code_alignment: usize,
    /// Alignment of every instruction, in bytes.
    pub instruction_alignment: usize,
    /// Bytes per general-purpose register spill slot.
    pub gpr_spill_bytes: usize,
    /// Bytes per floating-point register spill slot.
    pub fpr_spill_bytes: usize,
    /// Added to a code address to form a callable address.
    pub entry_point_adjustment: usize,
    pub is_64_bit: bool,
    /// Guard region below the stack limit, in bytes.
    pub stack_overflow_reserved_bytes: usize,
}

impl InstructionSet {
    /// Materialize the full profile. Fatal for `None`, like every accessor.
    pub fn profile(self) -> ArchitectureProfile {
        if !self.is_valid() {
            instruction_set_abort(self);
        }
        ArchitectureProfile {
            isa: self,
            variant: self.variant_name(),
            pointer_size: self.pointer_size(),
            code_alignment: self.code_alignment(),
            instruction_alignment: self.instruction_alignment(),
            gpr_spill_bytes: self.gpr_spill_bytes(),
            fpr_spill_bytes: self.fpr_spill_bytes(),
            entry_point_adjustment: self.entry_point_adjustment(),
            is_64_bit: self.is_64_bit(),
            stack_overflow_reserved_bytes: self.stack_overflow_reserved_bytes(),
        }
    }
}

impl ArchitectureProfile {
    /// Profiles of every valid instruction set, in declaration order.
    pub fn all() -> Vec<ArchitectureProfile> {
        InstructionSet::VALID.into_iter().map(InstructionSet::profile).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::FRAME_SIZE_LIMIT;

    #[test]
    fn pointer_size_for_bitness() {
        assert_eq!(PointerSize::for_bitness(true), PointerSize::K64);
        assert_eq!(PointerSize::for_bitness(false), PointerSize::K32);
        assert_eq!(PointerSize::K32.bytes(), 4);
        assert_eq!(PointerSize::K64.bits(), 64);
    }

    #[test]
    fn thumb2_profile() {
        let p = InstructionSet::Thumb2.profile();
        assert_eq!(p.pointer_size, PointerSize::K32);
        assert_eq!(p.code_alignment, 8);
        assert_eq!(p.instruction_alignment, 2);
        assert_eq!(p.entry_point_adjustment, 1);
        assert!(!p.is_64_bit);
        assert_eq!(p.variant, "thumb2");
    }

    #[test]
    fn arm64_profile() {
        let p = InstructionSet::Arm64.profile();
        assert_eq!(p.pointer_size, PointerSize::K64);
        assert_eq!(p.code_alignment, 16);
        assert_eq!(p.instruction_alignment, 4);
        assert_eq!(p.gpr_spill_bytes, 8);
        assert_eq!(p.variant, "arm64");
    }

    #[test]
    fn all_profiles_cover_valid_set() {
        let profiles = ArchitectureProfile::all();
        assert_eq!(profiles.len(), InstructionSet::VALID.len());
        for p in &profiles {
            assert!(p.instruction_alignment <= p.code_alignment);
            assert!(p.stack_overflow_reserved_bytes > FRAME_SIZE_LIMIT);
            assert_eq!(p.pointer_size, PointerSize::for_bitness(p.is_64_bit));
        }
    }

    #[test]
    fn profile_serializes_with_canonical_name() {
        let json = serde_json::to_value(InstructionSet::LoongArch64.profile()).unwrap();
        assert_eq!(json["isa"], "loong64");
        assert_eq!(json["pointer-size"], "k64");
        assert_eq!(json["is-64-bit"], true);
    }

    #[test]
    fn thumb2_json_keeps_variant() {
        let json = serde_json::to_value(InstructionSet::Thumb2.profile()).unwrap();
        assert_eq!(json["isa"], "arm");
        assert_eq!(json["variant"], "thumb2");
        assert_eq!(json["entry-point-adjustment"], 1);
    }

    #[test]
    #[should_panic(expected = "Unsupported instruction set None")]
    fn profile_rejects_none() {
        InstructionSet::None.profile();
    }
}
