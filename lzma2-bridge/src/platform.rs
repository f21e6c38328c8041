//! Platform-specific naming of the native codec artifact

/// Operating system families with distinct shared-library naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other Unix-like target (`.so` naming)
    Other,
}

impl Platform {
    /// Platform this crate was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// File name of the codec library, both in the runtime directory and in
    /// cargo's release output.
    pub fn library_file_name(self) -> &'static str {
        match self {
            Platform::Windows => "lzma2.dll",
            Platform::MacOs => "liblzma2.dylib",
            Platform::Other => "liblzma2.so",
        }
    }
}
