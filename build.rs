// Version string for the user agent and startup log: the crate version,
// with a `+<build id>` suffix when TRONITY_BUILD_ID is set (CI run, git sha).
fn main() {
    let base = env!("CARGO_PKG_VERSION");
    let version = match std::env::var("TRONITY_BUILD_ID") {
        Ok(id) if !id.trim().is_empty() => format!("{}+{}", base, id.trim()),
        _ => base.to_string(),
    };

    println!("cargo:rustc-env=APP_VERSION={}", version);
    println!("cargo:rerun-if-env-changed=TRONITY_BUILD_ID");
}
