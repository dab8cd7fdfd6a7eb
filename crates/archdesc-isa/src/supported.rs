//! Supported instruction set resolution.
//!
//! A device may run 32-bit and 64-bit variants of the runtime side by side.
//! The `ro.zygote` property records which variants are installed and which
//! one is primary; this module turns it into an ordered list of tags.

use crate::error::{IsaError, Result};
use crate::isa::{InstructionSet, RUNTIME_ISA};
use crate::properties::{PropertySource, ZYGOTE_PROPERTY};

/// Installed runtime variants, as recorded in the zygote property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZygoteKinds {
    /// `zygote64_32`: 64-bit primary, 32-bit secondary.
    Primary64Secondary32,
    /// `zygote32_64`: 32-bit primary, 64-bit secondary.
    Primary32Secondary64,
    /// `zygote64`
    Only64,
    /// `zygote32`
    Only32,
}

impl ZygoteKinds {
    /// Parse a property value. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zygote64_32" => Some(ZygoteKinds::Primary64Secondary32),
            "zygote32_64" => Some(ZygoteKinds::Primary32Secondary64),
            "zygote64" => Some(ZygoteKinds::Only64),
            "zygote32" => Some(ZygoteKinds::Only32),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZygoteKinds::Primary64Secondary32 => "zygote64_32",
            ZygoteKinds::Primary32Secondary64 => "zygote32_64",
            ZygoteKinds::Only64 => "zygote64",
            ZygoteKinds::Only32 => "zygote32",
        }
    }

    /// Order a 64-bit/32-bit pair of one family, primary first.
    fn order(self, wide: InstructionSet, narrow: InstructionSet) -> Vec<InstructionSet> {
        match self {
            ZygoteKinds::Primary64Secondary32 => vec![wide, narrow],
            ZygoteKinds::Primary32Secondary64 => vec![narrow, wide],
            ZygoteKinds::Only64 => vec![wide],
            ZygoteKinds::Only32 => vec![narrow],
        }
    }
}

/// Instruction sets the current device supports, primary first, for the
/// instruction set this crate was compiled for.
pub fn supported_instruction_sets(props: &impl PropertySource) -> Result<Vec<InstructionSet>> {
    supported_instruction_sets_for(RUNTIME_ISA, props)
}

/// Instruction sets supported by a device running `runtime`, primary first.
///
/// Reads [`ZYGOTE_PROPERTY`] once. Single-width families ignore its value as
/// long as it is set.
pub fn supported_instruction_sets_for(
    runtime: InstructionSet,
    props: &impl PropertySource,
) -> Result<Vec<InstructionSet>> {
    let zygote_kinds = props.get_property(ZYGOTE_PROPERTY);
    log::debug!("{ZYGOTE_PROPERTY}='{zygote_kinds}' for runtime {runtime:?}");
    if zygote_kinds.is_empty() {
        log::warn!("{ZYGOTE_PROPERTY} is unset");
        return Err(IsaError::PropertyUnset {
            key: ZYGOTE_PROPERTY.to_string(),
        });
    }

    let dual = |wide: InstructionSet, narrow: InstructionSet| {
        match ZygoteKinds::parse(&zygote_kinds) {
            Some(kinds) => Ok(kinds.order(wide, narrow)),
            None => {
                log::warn!("unrecognized {ZYGOTE_PROPERTY} value '{zygote_kinds}'");
                Err(IsaError::UnknownZygoteKinds {
                    value: zygote_kinds.clone(),
                })
            }
        }
    };

    match runtime {
        InstructionSet::Arm | InstructionSet::Thumb2 | InstructionSet::Arm64 => {
            dual(InstructionSet::Arm64, InstructionSet::Arm)
        }
        InstructionSet::X86 | InstructionSet::X86_64 => {
            dual(InstructionSet::X86_64, InstructionSet::X86)
        }
        InstructionSet::Riscv64 => Ok(vec![InstructionSet::Riscv64]),
        InstructionSet::LoongArch64 => Ok(vec![InstructionSet::LoongArch64]),
        InstructionSet::PowerPC => Ok(vec![InstructionSet::PowerPC]),
        InstructionSet::S390X => Ok(vec![InstructionSet::S390X]),
        InstructionSet::None => {
            log::warn!("runtime instruction set is unknown");
            Err(IsaError::UnknownRuntimeIsa {
                name: runtime.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyMap;

    fn zygote(value: &str) -> PropertyMap {
        PropertyMap::new().with(ZYGOTE_PROPERTY, value)
    }

    #[test]
    fn arm64_dual_64_primary() {
        let _ = env_logger::builder().is_test(true).try_init();
        let isas = supported_instruction_sets_for(InstructionSet::Arm64, &zygote("zygote64_32"))
            .unwrap();
        assert_eq!(isas, vec![InstructionSet::Arm64, InstructionSet::Arm]);
    }

    #[test]
    fn arm_dual_32_primary() {
        let isas =
            supported_instruction_sets_for(InstructionSet::Arm, &zygote("zygote32_64")).unwrap();
        assert_eq!(isas, vec![InstructionSet::Arm, InstructionSet::Arm64]);
    }

    #[test]
    fn arm_single_width_configs() {
        assert_eq!(
            supported_instruction_sets_for(InstructionSet::Arm64, &zygote("zygote64")).unwrap(),
            vec![InstructionSet::Arm64]
        );
        assert_eq!(
            supported_instruction_sets_for(InstructionSet::Thumb2, &zygote("zygote32")).unwrap(),
            vec![InstructionSet::Arm]
        );
    }

    #[test]
    fn x86_32_only() {
        let isas =
            supported_instruction_sets_for(InstructionSet::X86, &zygote("zygote32")).unwrap();
        assert_eq!(isas, vec![InstructionSet::X86]);
    }

    #[test]
    fn x86_64_dual() {
        let isas = supported_instruction_sets_for(InstructionSet::X86_64, &zygote("zygote64_32"))
            .unwrap();
        assert_eq!(isas, vec![InstructionSet::X86_64, InstructionSet::X86]);
    }

    #[test]
    fn single_width_families_ignore_value() {
        for isa in [
            InstructionSet::Riscv64,
            InstructionSet::LoongArch64,
            InstructionSet::PowerPC,
            InstructionSet::S390X,
        ] {
            let isas = supported_instruction_sets_for(isa, &zygote("anything")).unwrap();
            assert_eq!(isas, vec![isa]);
        }
    }

    #[test]
    fn empty_property_fails() {
        let err = supported_instruction_sets_for(InstructionSet::Riscv64, &zygote(""))
            .unwrap_err();
        assert!(matches!(err, IsaError::PropertyUnset { .. }));
        assert!(!err.to_string().is_empty());

        let err = supported_instruction_sets_for(InstructionSet::Arm64, &PropertyMap::new())
            .unwrap_err();
        assert!(err.to_string().contains(ZYGOTE_PROPERTY));
    }

    #[test]
    fn unknown_token_is_named() {
        let err = supported_instruction_sets_for(InstructionSet::Arm, &zygote("unknown_token"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown_token"));
    }

    #[test]
    fn tokens_match_exactly() {
        let err = supported_instruction_sets_for(InstructionSet::X86, &zygote("Zygote64"))
            .unwrap_err();
        assert!(matches!(err, IsaError::UnknownZygoteKinds { value } if value == "Zygote64"));
    }

    #[test]
    fn unknown_runtime_is_named() {
        let err = supported_instruction_sets_for(InstructionSet::None, &zygote("zygote64"))
            .unwrap_err();
        assert!(err.to_string().contains("'none'"));
    }

    #[test]
    fn zygote_kinds_round_trip() {
        for kinds in [
            ZygoteKinds::Primary64Secondary32,
            ZygoteKinds::Primary32Secondary64,
            ZygoteKinds::Only64,
            ZygoteKinds::Only32,
        ] {
            assert_eq!(ZygoteKinds::parse(kinds.as_str()), Some(kinds));
        }
        assert_eq!(ZygoteKinds::parse("zygote"), None);
    }

    #[test]
    fn runtime_resolution_uses_compiled_target() {
        let result = supported_instruction_sets(&zygote("zygote64_32"));
        if RUNTIME_ISA.is_valid() {
            let isas = result.unwrap();
            assert!(isas.contains(&RUNTIME_ISA));
        } else {
            assert!(result.is_err());
        }
    }
}
