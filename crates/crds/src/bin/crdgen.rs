//! CRD YAML Generator
//!
//! Writes the CustomResourceDefinitions for every Cloudflare provider kind
//! to `package/crds/`, one file per CRD.
//!
//! Usage:
//!   cargo run -p crds --bin crdgen [OUTPUT_DIR]

use anyhow::Context;
use crds::{Account, ProviderConfig, ProviderConfigUsage, Zone};
use kube::CustomResourceExt;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "# This file is AUTO-GENERATED from crates/crds\n\
# DO NOT EDIT MANUALLY - run `cargo run -p crds --bin crdgen` to regenerate\n";

fn main() -> anyhow::Result<()> {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("package/crds"));

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    generate_crd::<Account>(&output_dir)?;
    generate_crd::<Zone>(&output_dir)?;
    generate_crd::<ProviderConfig>(&output_dir)?;
    generate_crd::<ProviderConfigUsage>(&output_dir)?;

    println!("Generated CRDs in {}", output_dir.display());
    Ok(())
}

fn generate_crd<T: CustomResourceExt>(output_dir: &Path) -> anyhow::Result<()> {
    let crd = T::crd();
    let filename = format!("{}.yaml", T::crd_name());
    let yaml = serde_yaml::to_string(&crd)?;

    let path = output_dir.join(&filename);
    fs::write(&path, format!("{}---\n{}", HEADER, yaml))
        .with_context(|| format!("writing {}", path.display()))?;
    println!("  wrote {}", path.display());
    Ok(())
}
