use std::path::{Path, PathBuf};

use crate::foundation::platform::{HostPlatform, OsFamily};

/// Canonical executable name of the bundled compiler.
pub const BINARY_BASE_NAME: &str = "sassc";

/// Directory holding the bundled compiler builds, relative to the crate root.
pub const BUNDLED_DIR_NAME: &str = "dist";

/// Default base directory: the bundled binaries shipped next to this crate.
pub fn bundled_bin_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(BUNDLED_DIR_NAME)
}

/// Platform-specific executable file name.
///
/// | family  | 32-bit        | 64-bit         |
/// |---------|---------------|----------------|
/// | Windows | `sassc.exe`   | `sassc.exe`    |
/// | Darwin  | `sassc.macosx`| `sassc.macosx` |
/// | Unix    | `sassc.x86`   | `sassc`        |
pub fn binary_name(platform: &HostPlatform) -> String {
    let suffix = match platform.os_family {
        OsFamily::Windows => ".exe",
        OsFamily::Darwin => ".macosx",
        OsFamily::Unix if platform.is_32bit() => ".x86",
        OsFamily::Unix => "",
    };
    format!("{BINARY_BASE_NAME}{suffix}")
}

/// Resolve the compiler path for `platform`.
///
/// `explicit_dir` replaces the bundled directory when given. The result is not checked for
/// existence; a missing binary surfaces when the process is launched.
pub fn resolve_binary(explicit_dir: Option<&Path>, platform: &HostPlatform) -> PathBuf {
    let base = explicit_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(bundled_bin_dir);
    base.join(binary_name(platform))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/binary.rs"]
mod tests;
