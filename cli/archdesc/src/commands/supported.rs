//! `archdesc supported` — resolve a device's instruction sets.

use std::path::Path;

use anyhow::{bail, Context, Result};
use archdesc_isa::{
    supported_instruction_sets_for, InstructionSet, PropertyMap, PropertySource, SystemProperties,
    RUNTIME_ISA,
};

use super::isa::parse_isa;
use super::OutputFormat;

/// Parse a `KEY=VALUE` override.
pub fn parse_override(text: &str) -> Result<(String, String)> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("invalid property override '{text}': expected KEY=VALUE"),
    }
}

/// Assemble the property map: file contents first, overrides on top.
pub fn build_properties(file: Option<&Path>, overrides: &[String]) -> Result<PropertyMap> {
    let mut props = match file {
        Some(path) => PropertyMap::load(path)
            .with_context(|| format!("failed to load properties from {}", path.display()))?,
        None => PropertyMap::new(),
    };
    for text in overrides {
        let (key, value) = parse_override(text)?;
        props.set(key, value);
    }
    Ok(props)
}

pub fn render(isas: &[InstructionSet], format: OutputFormat) -> Result<String> {
    let names: Vec<&str> = isas.iter().map(|isa| isa.name()).collect();
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&names)? + "\n",
        OutputFormat::Text => names.join("\n") + "\n",
    })
}

/// Resolve against `props` for `runtime` and render the result.
pub fn resolve(
    props: &impl PropertySource,
    runtime: InstructionSet,
    format: OutputFormat,
) -> Result<String> {
    let isas = supported_instruction_sets_for(runtime, props)?;
    log::info!("{} supports {} instruction set(s)", runtime.name(), isas.len());
    render(&isas, format)
}

pub fn run(
    file: Option<&Path>,
    overrides: &[String],
    runtime: Option<&str>,
    system: bool,
    format: OutputFormat,
) -> Result<()> {
    let runtime = match runtime {
        Some(name) => parse_isa(name)?,
        None => RUNTIME_ISA,
    };

    let out = if system && overrides.is_empty() {
        resolve(&SystemProperties, runtime, format)?
    } else if system {
        bail!("--set cannot be combined with --system");
    } else {
        let props = build_properties(file, overrides)?;
        resolve(&props, runtime, format)?
    };
    print!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_parsing() {
        assert_eq!(
            parse_override("ro.zygote=zygote64_32").unwrap(),
            ("ro.zygote".to_string(), "zygote64_32".to_string())
        );
        assert!(parse_override("ro.zygote").is_err());
        assert!(parse_override("=zygote64").is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.prop");
        std::fs::write(&path, "ro.zygote=zygote32\n").unwrap();

        let props = build_properties(Some(&path), &["ro.zygote=zygote64".to_string()]).unwrap();
        assert_eq!(props.get_property("ro.zygote"), "zygote64");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = build_properties(Some(Path::new("/nonexistent/device.toml")), &[]).unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn resolve_text() {
        let props = PropertyMap::new().with("ro.zygote", "zygote64_32");
        let out = resolve(&props, InstructionSet::Arm64, OutputFormat::Text).unwrap();
        assert_eq!(out, "arm64\narm\n");
    }

    #[test]
    fn resolve_json() {
        let props = PropertyMap::new().with("ro.zygote", "zygote32");
        let out = resolve(&props, InstructionSet::X86, OutputFormat::Json).unwrap();
        let names: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(names, vec!["x86"]);
    }

    #[test]
    fn resolve_failure_names_value() {
        let props = PropertyMap::new().with("ro.zygote", "unknown_token");
        let err = resolve(&props, InstructionSet::Arm, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("unknown_token"));
    }

    #[test]
    fn run_with_overrides() {
        assert!(run(
            None,
            &["ro.zygote=zygote64".to_string()],
            Some("riscv64"),
            false,
            OutputFormat::Text
        )
        .is_ok());
        assert!(run(None, &[], Some("riscv64"), false, OutputFormat::Text).is_err());
    }
}
