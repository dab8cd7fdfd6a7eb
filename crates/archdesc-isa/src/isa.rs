//! Instruction set tags.
//!
//! Defines the closed set of architectures the runtime can target, the
//! canonical string form of each, and the per-architecture facts a code
//! generator needs before emitting code for one of them.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::IsaError;
use crate::profile::PointerSize;
use crate::stack;

/// An instruction set the runtime knows how to target.
///
/// `None` is a legal value but stands for "unset". Every profile accessor is a
/// `const fn` and panics on it; in constant context that is a build error, and
/// release builds abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum InstructionSet {
    #[default]
    None = 0,
    Arm = 1,
    Arm64 = 2,
    /// ARM executing in Thumb-2 mode. Shares its string form with `Arm`.
    Thumb2 = 3,
    Riscv64 = 4,
    X86 = 5,
    X86_64 = 6,
    LoongArch64 = 7,
    PowerPC = 8,
    S390X = 9,
}

/// The instruction set this crate was compiled for.
#[cfg(target_arch = "arm")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::Arm;
#[cfg(target_arch = "aarch64")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::Arm64;
#[cfg(target_arch = "riscv64")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::Riscv64;
#[cfg(target_arch = "x86")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::X86;
#[cfg(target_arch = "x86_64")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::X86_64;
#[cfg(target_arch = "loongarch64")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::LoongArch64;
#[cfg(target_arch = "powerpc64")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::PowerPC;
#[cfg(target_arch = "s390x")]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::S390X;
#[cfg(not(any(
    target_arch = "arm",
    target_arch = "aarch64",
    target_arch = "riscv64",
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "loongarch64",
    target_arch = "powerpc64",
    target_arch = "s390x",
)))]
pub const RUNTIME_ISA: InstructionSet = InstructionSet::None;

/// Pointer size of the compiled target.
#[cfg(target_pointer_width = "64")]
pub const RUNTIME_POINTER_SIZE: PointerSize = PointerSize::K64;
#[cfg(not(target_pointer_width = "64"))]
pub const RUNTIME_POINTER_SIZE: PointerSize = PointerSize::K32;

/// Default SVE vector length on ARM64, in bits.
pub const ARM64_DEFAULT_SVE_VECTOR_LENGTH: usize = 256;

// Code alignment applies to the first instruction of a subroutine, such as an
// entrypoint. ARM only needs 4, but ARM ELF requires 8.
pub const ARM_CODE_ALIGNMENT: usize = 8;
pub const ARM64_CODE_ALIGNMENT: usize = 16;
pub const RISCV64_CODE_ALIGNMENT: usize = 16;
pub const X86_CODE_ALIGNMENT: usize = 16;
pub const LOONGARCH64_CODE_ALIGNMENT: usize = 16;
pub const POWERPC_CODE_ALIGNMENT: usize = 16;
pub const S390X_CODE_ALIGNMENT: usize = 16;

// Every instruction must sit on this boundary. RISC-V assumes the compressed
// extension, which relaxes all instructions to 2-byte alignment.
pub const THUMB2_INSTRUCTION_ALIGNMENT: usize = 2;
pub const ARM64_INSTRUCTION_ALIGNMENT: usize = 4;
pub const RISCV64_INSTRUCTION_ALIGNMENT: usize = 2;
pub const X86_INSTRUCTION_ALIGNMENT: usize = 1;
pub const X86_64_INSTRUCTION_ALIGNMENT: usize = 1;
pub const LOONGARCH64_INSTRUCTION_ALIGNMENT: usize = 4;
pub const POWERPC_INSTRUCTION_ALIGNMENT: usize = 4;
pub const S390X_INSTRUCTION_ALIGNMENT: usize = 2;

impl InstructionSet {
    /// Every tag, `None` included.
    pub const ALL: [InstructionSet; 10] = [
        InstructionSet::None,
        InstructionSet::Arm,
        InstructionSet::Arm64,
        InstructionSet::Thumb2,
        InstructionSet::Riscv64,
        InstructionSet::X86,
        InstructionSet::X86_64,
        InstructionSet::LoongArch64,
        InstructionSet::PowerPC,
        InstructionSet::S390X,
    ];

    /// Every tag the profile accessors accept.
    pub const VALID: [InstructionSet; 9] = [
        InstructionSet::Arm,
        InstructionSet::Arm64,
        InstructionSet::Thumb2,
        InstructionSet::Riscv64,
        InstructionSet::X86,
        InstructionSet::X86_64,
        InstructionSet::LoongArch64,
        InstructionSet::PowerPC,
        InstructionSet::S390X,
    ];

    /// Canonical name used in properties, file paths, and command lines.
    ///
    /// `Thumb2` and `Arm` both map to `"arm"`.
    pub const fn name(self) -> &'static str {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => "arm",
            InstructionSet::Arm64 => "arm64",
            InstructionSet::Riscv64 => "riscv64",
            InstructionSet::X86 => "x86",
            InstructionSet::X86_64 => "x86_64",
            InstructionSet::LoongArch64 => "loong64",
            InstructionSet::PowerPC => "ppc64le",
            InstructionSet::S390X => "s390x",
            InstructionSet::None => "none",
        }
    }

    /// Name that keeps `Thumb2` apart from `Arm`. Not accepted by
    /// [`from_name`](Self::from_name).
    pub const fn variant_name(self) -> &'static str {
        match self {
            InstructionSet::Thumb2 => "thumb2",
            other => other.name(),
        }
    }

    /// Parse a canonical name. Anything unrecognized, `"none"` included,
    /// yields `None`; this never fails.
    pub fn from_name(name: &str) -> InstructionSet {
        match name {
            "arm" => InstructionSet::Arm,
            "arm64" => InstructionSet::Arm64,
            "riscv64" => InstructionSet::Riscv64,
            "x86" => InstructionSet::X86,
            "x86_64" => InstructionSet::X86_64,
            "loong64" => InstructionSet::LoongArch64,
            "ppc64le" => InstructionSet::PowerPC,
            "s390x" => InstructionSet::S390X,
            _ => InstructionSet::None,
        }
    }

    pub const fn is_valid(self) -> bool {
        match self {
            InstructionSet::Arm
            | InstructionSet::Thumb2
            | InstructionSet::Arm64
            | InstructionSet::Riscv64
            | InstructionSet::X86
            | InstructionSet::X86_64
            | InstructionSet::LoongArch64
            | InstructionSet::PowerPC
            | InstructionSet::S390X => true,
            InstructionSet::None => false,
        }
    }

    /// Size of a native pointer.
    pub const fn pointer_size(self) -> PointerSize {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => PointerSize::K32,
            InstructionSet::Arm64 => PointerSize::K64,
            InstructionSet::Riscv64 => PointerSize::K64,
            InstructionSet::X86 => PointerSize::K32,
            InstructionSet::X86_64 => PointerSize::K64,
            InstructionSet::LoongArch64 => PointerSize::K64,
            InstructionSet::PowerPC => PointerSize::K64,
            InstructionSet::S390X => PointerSize::K64,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    /// Recommended alignment of a subroutine's first instruction, in bytes.
    pub const fn code_alignment(self) -> usize {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => ARM_CODE_ALIGNMENT,
            InstructionSet::Arm64 => ARM64_CODE_ALIGNMENT,
            InstructionSet::Riscv64 => RISCV64_CODE_ALIGNMENT,
            InstructionSet::X86 | InstructionSet::X86_64 => X86_CODE_ALIGNMENT,
            InstructionSet::LoongArch64 => LOONGARCH64_CODE_ALIGNMENT,
            InstructionSet::PowerPC => POWERPC_CODE_ALIGNMENT,
            InstructionSet::S390X => S390X_CODE_ALIGNMENT,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    /// Alignment every instruction must satisfy, in bytes.
    pub const fn instruction_alignment(self) -> usize {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => THUMB2_INSTRUCTION_ALIGNMENT,
            InstructionSet::Arm64 => ARM64_INSTRUCTION_ALIGNMENT,
            InstructionSet::Riscv64 => RISCV64_INSTRUCTION_ALIGNMENT,
            InstructionSet::X86 => X86_INSTRUCTION_ALIGNMENT,
            InstructionSet::X86_64 => X86_64_INSTRUCTION_ALIGNMENT,
            InstructionSet::LoongArch64 => LOONGARCH64_INSTRUCTION_ALIGNMENT,
            InstructionSet::PowerPC => POWERPC_INSTRUCTION_ALIGNMENT,
            InstructionSet::S390X => S390X_INSTRUCTION_ALIGNMENT,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    /// Offset between a code address and a callable address.
    ///
    /// Only `Thumb2` is nonzero: the low bit tells `BLX` to switch to Thumb mode.
    pub const fn entry_point_adjustment(self) -> usize {
        match self {
            InstructionSet::Arm
            | InstructionSet::Arm64
            | InstructionSet::Riscv64
            | InstructionSet::X86
            | InstructionSet::X86_64
            | InstructionSet::LoongArch64
            | InstructionSet::PowerPC
            | InstructionSet::S390X => 0,
            InstructionSet::Thumb2 => 1,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    pub const fn is_64_bit(self) -> bool {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 | InstructionSet::X86 => false,
            InstructionSet::Arm64
            | InstructionSet::Riscv64
            | InstructionSet::X86_64
            | InstructionSet::LoongArch64
            | InstructionSet::PowerPC
            | InstructionSet::S390X => true,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    /// Bytes per general-purpose register spill slot.
    pub const fn gpr_spill_bytes(self) -> usize {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => 4,
            InstructionSet::Arm64 => 8,
            InstructionSet::Riscv64 => 8,
            InstructionSet::X86 => 4,
            InstructionSet::X86_64 => 8,
            InstructionSet::LoongArch64 => 8,
            InstructionSet::PowerPC => 8,
            InstructionSet::S390X => 8,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    /// Bytes per floating-point register spill slot.
    pub const fn fpr_spill_bytes(self) -> usize {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => 4,
            InstructionSet::Arm64 => 8,
            InstructionSet::Riscv64 => 8,
            // x87/SSE doubles are spilled whole even on 32-bit x86.
            InstructionSet::X86 => 8,
            InstructionSet::X86_64 => 8,
            InstructionSet::LoongArch64 => 8,
            InstructionSet::PowerPC => 8,
            InstructionSet::S390X => 8,
            InstructionSet::None => panic!("Unsupported instruction set None"),
        }
    }

    /// Size of the guard region reserved below the stack limit.
    #[inline(always)]
    pub const fn stack_overflow_reserved_bytes(self) -> usize {
        match self {
            InstructionSet::Arm | InstructionSet::Thumb2 => stack::ARM_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::Arm64 => stack::ARM64_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::Riscv64 => stack::RISCV64_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::X86 => stack::X86_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::X86_64 => stack::X86_64_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::LoongArch64 => stack::LOONGARCH64_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::PowerPC => stack::POWERPC_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::S390X => stack::S390X_STACK_OVERFLOW_RESERVED_BYTES,
            InstructionSet::None => panic!("None has no stack overflow size"),
        }
    }

    /// Pointer size implied by bitness alone.
    pub const fn bitness_pointer_size(self) -> PointerSize {
        PointerSize::for_bitness(self.is_64_bit())
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strict parse: unlike [`InstructionSet::from_name`], unknown names are an error.
/// `"none"` parses to `None`.
impl FromStr for InstructionSet {
    type Err = IsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match InstructionSet::from_name(s) {
            InstructionSet::None if s != "none" => Err(IsaError::UnknownName(s.to_string())),
            isa => Ok(isa),
        }
    }
}

impl TryFrom<u8> for InstructionSet {
    type Error = IsaError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        InstructionSet::ALL
            .into_iter()
            .find(|isa| *isa as u8 == raw)
            .ok_or(IsaError::InvalidDiscriminant(raw))
    }
}

impl Serialize for InstructionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
