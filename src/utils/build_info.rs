//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `walkquest <date> (<commit>)`, as printed by `--version`.
pub fn version_string() -> String {
    format!("walkquest {} ({})", BUILD_DATE, BUILD_COMMIT)
}
