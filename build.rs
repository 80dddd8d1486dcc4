//! Build script for spotcli.
//!
//! Copies the configuration template next to the place where the binary
//! expects its configuration file, so a fresh install only has to rename
//! `config.example` to `config` and fill in the client credentials.

use std::{env, fs, path::PathBuf};

/// Copies `config.example` from the crate root into the user's config directory.
///
/// # Destination Location
///
/// - Linux: `~/.config/spotcli/config.example`
/// - macOS: `~/Library/Application Support/spotcli/config.example`
/// - Windows: `%APPDATA%/spotcli/config.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or write the file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=config.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template_path = manifest_dir.join("config.example");

    let mut out_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotcli");
    fs::create_dir_all(&out_dir)?;

    if template_path.is_file() {
        let contents = fs::read_to_string(&template_path)?;
        fs::write(out_dir.join("config.example"), contents)?;
    } else {
        println!(
            "cargo:warning=config.example not found at {}",
            template_path.display()
        );
    }

    Ok(())
}
