//! Service manifest loading.

use std::path::Path;

use anyhow::Context;
use stratus_core::spec::Manifest;

/// Reads and parses a YAML service manifest.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid manifest,
/// or names no service.
pub fn load(path: &Path) -> anyhow::Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read manifest {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid manifest {}", path.display()))
}

fn parse(content: &str) -> anyhow::Result<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(content)?;
    anyhow::ensure!(!manifest.service.trim().is_empty(), "\"service\" must not be empty");
    tracing::debug!(
        service = %manifest.service,
        framework = %manifest.compliance_framework,
        components = manifest.components.len(),
        "manifest loaded"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_manifest_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stratus.yml");
        std::fs::write(
            &path,
            "service: orders\ncomponents:\n  - name: jobs\n    type: sqs-queue\n",
        )
        .expect("write");
        let manifest = load(&path).expect("load");
        assert_eq!(manifest.service, "orders");
        assert_eq!(manifest.components[0].component_type, "sqs-queue");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/nonexistent/stratus.yml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/stratus.yml"));
    }

    #[test]
    fn blank_service_is_rejected() {
        let err = parse("service: \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("service"));
    }
}
