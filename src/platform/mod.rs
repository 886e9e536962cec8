//! Platform detection and installed-binary resolution.
//!
//! Host identifiers are mapped onto the vocabulary used in release asset
//! names (`windows`/`darwin`/`linux`, `amd64`/`arm64`). The installer and the
//! launcher share these rules so download-time and run-time names agree.

use anyhow::Result;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InstallerError;
use crate::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformName {
    Windows,
    Darwin,
    Linux,
}

impl PlatformName {
    /// Maps an operating system identifier as reported by
    /// `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Result<Self, InstallerError> {
        match os {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            other => Err(InstallerError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Darwin => "darwin",
            Self::Linux => "linux",
        }
    }

    /// Suffix appended to every installed binary name.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for PlatformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchName {
    Amd64,
    Arm64,
}

impl ArchName {
    /// Maps a CPU identifier as reported by `std::env::consts::ARCH`.
    pub fn from_arch(arch: &str) -> Result<Self, InstallerError> {
        match arch {
            "x86_64" => Ok(Self::Amd64),
            "aarch64" => Ok(Self::Arm64),
            other => Err(InstallerError::UnsupportedArch(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for ArchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical platform name of the running host.
pub fn platform_name<R: Runtime>(runtime: &R) -> Result<PlatformName> {
    Ok(PlatformName::from_os(&runtime.host_os())?)
}

/// Canonical architecture name of the running host.
pub fn arch_name<R: Runtime>(runtime: &R) -> Result<ArchName> {
    Ok(ArchName::from_arch(&runtime.host_arch())?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    pub platform: PlatformName,
    pub arch: ArchName,
}

impl Host {
    pub fn new(platform: PlatformName, arch: ArchName) -> Self {
        Self { platform, arch }
    }

    /// Detect the running host, failing on anything outside the supported set.
    pub fn detect<R: Runtime>(runtime: &R) -> Result<Self> {
        let host = Self::new(platform_name(runtime)?, arch_name(runtime)?);
        debug!("Detected host {}", host);
        Ok(host)
    }

    pub fn is_windows(&self) -> bool {
        self.platform == PlatformName::Windows
    }

    /// File name of an installed binary, e.g. `mcp` or `mcp.exe`.
    pub fn binary_file_name(&self, name: &str) -> String {
        format!("{}{}", name, self.platform.exe_suffix())
    }

    pub fn binary_path(&self, bin_dir: &Path, name: &str) -> PathBuf {
        bin_dir.join(self.binary_file_name(name))
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.arch)
    }
}

/// Locate an installed binary. The file is stat'ed on every call.
#[tracing::instrument(skip(runtime))]
pub fn resolve_binary<R: Runtime>(
    runtime: &R,
    host: &Host,
    bin_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let path = host.binary_path(bin_dir, name);
    if !runtime.exists(&path) {
        debug!("Binary {:?} does not exist", path);
        return Err(InstallerError::MissingBinary {
            platform: host.platform.to_string(),
            arch: host.arch.to_string(),
        }
        .into());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    fn mock_host(os: &'static str, arch: &'static str) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_host_os().returning(move || os.to_string());
        runtime.expect_host_arch().returning(move || arch.to_string());
        runtime
    }

    #[test]
    fn test_supported_pairs_map_to_canonical_names() {
        let cases = [
            ("windows", "x86_64", PlatformName::Windows, ArchName::Amd64),
            ("windows", "aarch64", PlatformName::Windows, ArchName::Arm64),
            ("macos", "x86_64", PlatformName::Darwin, ArchName::Amd64),
            ("macos", "aarch64", PlatformName::Darwin, ArchName::Arm64),
            ("linux", "x86_64", PlatformName::Linux, ArchName::Amd64),
            ("linux", "aarch64", PlatformName::Linux, ArchName::Arm64),
        ];
        for (os, arch, platform, expected_arch) in cases {
            let host = Host::detect(&mock_host(os, arch)).unwrap();
            assert_eq!(host.platform, platform, "os {}", os);
            assert_eq!(host.arch, expected_arch, "arch {}", arch);
        }
    }

    #[test]
    fn test_unsupported_platform_fails() {
        for os in ["freebsd", "android", "ios", "netbsd", ""] {
            let err = PlatformName::from_os(os).unwrap_err();
            assert!(matches!(err, InstallerError::UnsupportedPlatform(_)));
            assert_eq!(err.to_string(), format!("unsupported platform: {}", os));
        }
    }

    #[test]
    fn test_unsupported_arch_fails() {
        for arch in ["x86", "arm", "riscv64", "powerpc64", "s390x"] {
            let err = ArchName::from_arch(arch).unwrap_err();
            assert!(matches!(err, InstallerError::UnsupportedArch(_)));
            assert!(err.to_string().contains(arch));
        }
    }

    #[test]
    fn test_detect_fails_on_unsupported_host() {
        let result = Host::detect(&mock_host("freebsd", "x86_64"));
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::UnsupportedPlatform(_))
        ));

        let result = Host::detect(&mock_host("linux", "riscv64"));
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::UnsupportedArch(_))
        ));
    }

    #[test]
    fn test_canonical_names_display() {
        assert_eq!(PlatformName::Darwin.to_string(), "darwin");
        assert_eq!(ArchName::Amd64.to_string(), "amd64");
        let host = Host::new(PlatformName::Linux, ArchName::Arm64);
        assert_eq!(host.to_string(), "linux/arm64");
    }

    #[test]
    fn test_resolve_binary_windows_has_exe_suffix() {
        let bin_dir = PathBuf::from("pkg").join("bin").join("native");
        let expected = bin_dir.join("mcp.exe");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(mockall::predicate::eq(expected.clone()))
            .returning(|_| true);

        let host = Host::new(PlatformName::Windows, ArchName::Amd64);
        let path = resolve_binary(&runtime, &host, &bin_dir, "mcp").unwrap();
        assert_eq!(path, expected);
        assert!(path.to_string_lossy().ends_with(".exe"));
    }

    #[test]
    fn test_resolve_binary_unix_has_no_suffix() {
        let bin_dir = PathBuf::from("pkg").join("bin").join("native");
        let expected = bin_dir.join("skill");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(mockall::predicate::eq(expected.clone()))
            .returning(|_| true);

        for platform in [PlatformName::Linux, PlatformName::Darwin] {
            let host = Host::new(platform, ArchName::Arm64);
            let path = resolve_binary(&runtime, &host, &bin_dir, "skill").unwrap();
            assert_eq!(path, expected);
        }
    }

    #[test]
    fn test_resolve_binary_missing_fails_with_hint() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let host = Host::new(PlatformName::Darwin, ArchName::Arm64);
        let err = resolve_binary(&runtime, &host, Path::new("bin/native"), "mcp").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallerError>(),
            Some(InstallerError::MissingBinary { .. })
        ));
        assert_eq!(
            err.to_string(),
            "binary not found (darwin/arm64); re-run the installer"
        );
    }

    #[test]
    fn test_resolve_binary_checks_every_call() {
        let mut runtime = MockRuntime::new();
        let mut seq = mockall::Sequence::new();
        runtime
            .expect_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| true);
        runtime
            .expect_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| false);

        let host = Host::new(PlatformName::Linux, ArchName::Amd64);
        let bin_dir = Path::new("bin/native");
        assert!(resolve_binary(&runtime, &host, bin_dir, "mcp").is_ok());
        assert!(resolve_binary(&runtime, &host, bin_dir, "mcp").is_err());
    }
}
