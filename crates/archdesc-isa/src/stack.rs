//! Stack-overflow guard sizes.
//!
//! Each architecture reserves a guard region below the stack limit. The region
//! must be larger than the biggest frame compiled code may allocate, or a
//! single frame could step over the guard undetected. Both sides are fixed at
//! build time and may be overridden through the environment:
//!
//! - `ARCHDESC_FRAME_SIZE_LIMIT`
//! - `ARCHDESC_STACK_OVERFLOW_GAP_{ARM,ARM64,RISCV64,X86,X86_64,LOONGARCH64,POWERPC,S390X}`
//!
//! A value that is not a decimal integer, or a gap that does not exceed the
//! frame limit, fails compilation.

const DEFAULT_FRAME_SIZE_LIMIT: usize = 1736;
const DEFAULT_STACK_OVERFLOW_GAP: usize = 8192;

/// Largest stack frame compiled code may allocate, in bytes.
pub const FRAME_SIZE_LIMIT: usize =
    configured(option_env!("ARCHDESC_FRAME_SIZE_LIMIT"), DEFAULT_FRAME_SIZE_LIMIT);

pub const ARM_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_ARM"), DEFAULT_STACK_OVERFLOW_GAP);
pub const ARM64_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_ARM64"), DEFAULT_STACK_OVERFLOW_GAP);
pub const RISCV64_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_RISCV64"), DEFAULT_STACK_OVERFLOW_GAP);
pub const X86_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_X86"), DEFAULT_STACK_OVERFLOW_GAP);
pub const X86_64_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_X86_64"), DEFAULT_STACK_OVERFLOW_GAP);
pub const LOONGARCH64_STACK_OVERFLOW_RESERVED_BYTES: usize = configured(
    option_env!("ARCHDESC_STACK_OVERFLOW_GAP_LOONGARCH64"),
    DEFAULT_STACK_OVERFLOW_GAP,
);
pub const POWERPC_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_POWERPC"), DEFAULT_STACK_OVERFLOW_GAP);
pub const S390X_STACK_OVERFLOW_RESERVED_BYTES: usize =
    configured(option_env!("ARCHDESC_STACK_OVERFLOW_GAP_S390X"), DEFAULT_STACK_OVERFLOW_GAP);

macro_rules! assert_guards_exceed_frame_limit {
    ($($gap:ident),+ $(,)?) => {
        $(
            const _: () = assert!(FRAME_SIZE_LIMIT < $gap, "Frame size limit too large");
        )+
    };
}

// TODO: decide whether the guard should also cover one extra page past the
// rounded-up frame limit.
assert_guards_exceed_frame_limit!(
    ARM_STACK_OVERFLOW_RESERVED_BYTES,
    ARM64_STACK_OVERFLOW_RESERVED_BYTES,
    RISCV64_STACK_OVERFLOW_RESERVED_BYTES,
    X86_STACK_OVERFLOW_RESERVED_BYTES,
    X86_64_STACK_OVERFLOW_RESERVED_BYTES,
    LOONGARCH64_STACK_OVERFLOW_RESERVED_BYTES,
    POWERPC_STACK_OVERFLOW_RESERVED_BYTES,
    S390X_STACK_OVERFLOW_RESERVED_BYTES,
);

const fn configured(value: Option<&str>, default: usize) -> usize {
    match value {
        Some(text) => parse_decimal(text),
        None => default,
    }
}

/// Decimal parse usable in constant context. Panics (at compile time) on
/// anything but ASCII digits.
const fn parse_decimal(text: &str) -> usize {
    let bytes = text.as_bytes();
    assert!(!bytes.is_empty(), "empty size value");
    let mut value: usize = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        assert!(b.is_ascii_digit(), "size value must be a decimal integer");
        value = match value.checked_mul(10) {
            Some(v) => v,
            None => panic!("size value overflows usize"),
        };
        value = match value.checked_add((b - b'0') as usize) {
            Some(v) => v,
            None => panic!("size value overflows usize"),
        };
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::InstructionSet;

    #[test]
    fn parse_decimal_values() {
        assert_eq!(parse_decimal("0"), 0);
        assert_eq!(parse_decimal("8192"), 8192);
        assert_eq!(configured(None, 17), 17);
        assert_eq!(configured(Some("16384"), 17), 16384);
    }

    #[test]
    #[should_panic(expected = "decimal integer")]
    fn parse_decimal_rejects_suffix() {
        parse_decimal("8k");
    }

    #[test]
    fn every_guard_exceeds_frame_limit() {
        for isa in InstructionSet::VALID {
            assert!(
                isa.stack_overflow_reserved_bytes() > FRAME_SIZE_LIMIT,
                "{isa:?}"
            );
        }
    }

    #[test]
    fn arm_and_thumb2_share_guard() {
        assert_eq!(
            InstructionSet::Arm.stack_overflow_reserved_bytes(),
            InstructionSet::Thumb2.stack_overflow_reserved_bytes()
        );
    }
}
