use std::env;
use std::process::Command;

fn main() {
    for path in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let hash = run("git", &["rev-parse", "--short", "HEAD"]).filter(|hash| !hash.is_empty());
    let status = run("git", &["status", "--porcelain"]).map(|changes| {
        if changes.is_empty() {
            "clean".to_string()
        } else {
            "dirty".to_string()
        }
    });
    // Cargo names the compiler it is using; fall back to whatever is on PATH.
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    emit("HASH", hash);
    emit("STATUS", status);
    emit(
        "TIMESTAMP",
        Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
    );
    emit("TARGET", env::var("TARGET").ok());
    emit("PROFILE", env::var("PROFILE").ok());
    emit("RUSTC", run(&rustc, &["--version"]));
}

/// Exposes `value` to the crate as `WISEWALLET_BUILD_<key>`.
fn emit(key: &str, value: Option<String>) {
    let value = value.unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=WISEWALLET_BUILD_{key}={value}");
}

/// Trimmed stdout of a successful run, or `None`.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|stdout| stdout.trim().to_string())
}
