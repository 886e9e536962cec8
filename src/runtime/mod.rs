//! Runtime abstraction for system operations.
//!
//! Everything the installer and launcher need from the host goes through the
//! [`Runtime`] trait so the logic can be exercised against a mock.
//!
//! # Structure
//!
//! - `env` - Environment variables and host identification
//! - `fs` - File system operations (stat, create, permissions)

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Operating system identifier of the running host (`std::env::consts::OS`).
    fn host_os(&self) -> String;

    /// CPU identifier of the running host (`std::env::consts::ARCH`).
    fn host_arch(&self) -> String;

    fn current_exe(&self) -> Result<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Create (or truncate) a file, requesting mode `0o755` on Unix.
    fn create_executable_file(&self, path: &Path) -> Result<Box<dyn Write + Send>>;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn host_os(&self) -> String {
        self.host_os_impl()
    }

    fn host_arch(&self) -> String {
        self.host_arch_impl()
    }

    fn current_exe(&self) -> Result<PathBuf> {
        self.current_exe_impl()
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn create_executable_file(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        self.create_executable_file_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }
}
