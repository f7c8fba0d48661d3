/// Operating system family as far as compiler binary selection is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Windows and Cygwin hosts.
    Windows,
    /// macOS / Darwin hosts.
    Darwin,
    /// Everything else, treated as Unix-like.
    Unix,
}

impl OsFamily {
    /// Classify an OS identifier (`"Linux"`, `"WINNT"`, `"CYGWIN_NT-5.1"`, `"macos"`, ...).
    ///
    /// Only the first three characters are inspected, case-insensitively.
    pub fn from_os_name(name: &str) -> Self {
        let prefix: String = name.chars().take(3).collect::<String>().to_ascii_uppercase();
        match prefix.as_str() {
            "CYG" | "WIN" => Self::Windows,
            "DAR" | "MAC" => Self::Darwin,
            _ => Self::Unix,
        }
    }

    /// `true` for the Windows family.
    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

/// Host facts consumed by binary resolution and input strategy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostPlatform {
    /// OS family.
    pub os_family: OsFamily,
    /// Pointer width in bytes (4 on 32-bit processes, 8 on 64-bit).
    pub pointer_bytes: usize,
}

impl HostPlatform {
    /// Build a platform description from an OS identifier and a pointer width in bytes.
    pub fn new(os_name: &str, pointer_bytes: usize) -> Self {
        Self {
            os_family: OsFamily::from_os_name(os_name),
            pointer_bytes,
        }
    }

    /// Describe the running process.
    pub fn detect() -> Self {
        Self::new(std::env::consts::OS, std::mem::size_of::<usize>())
    }

    /// `true` when the process is 32-bit or narrower.
    pub fn is_32bit(&self) -> bool {
        self.pointer_bytes <= 4
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/platform.rs"]
mod tests;
