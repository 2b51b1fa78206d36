// Captures the compiler version for `stool version`. Release pipelines may
// also set STOOL_BUILD_DATE and STOOL_BUILD_COMMIT; those are read directly
// with `option_env!` and only need a rerun hint here.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=STOOL_BUILD_DATE");
    println!("cargo:rerun-if-env-changed=STOOL_BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=RUSTC");

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=STOOL_RUSTC_VERSION={version}");
}
