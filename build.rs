//! Build script to embed commit hash and build date in `vault-sim --version`.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    // CI sets VAULT_SIM_COMMIT; local builds ask git
    let commit = env::var("VAULT_SIM_COMMIT").unwrap_or_else(|_| {
        Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    });

    let date = env::var("VAULT_SIM_BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    fs::write(
        &dest_path,
        format!(
            r#"pub const BUILD_COMMIT: &str = "{commit}";
pub const BUILD_DATE: &str = "{date}";
pub const LONG_VERSION: &str = "{version} ({commit} {date})";"#,
            version = env!("CARGO_PKG_VERSION"),
        ),
    )
    .expect("failed to write build_info.rs");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=VAULT_SIM_COMMIT");
    println!("cargo:rerun-if-env-changed=VAULT_SIM_BUILD_DATE");
}
