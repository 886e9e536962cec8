pub mod download;
pub mod error;
pub mod http;
pub mod install;
pub mod launch;
pub mod platform;
pub mod release_notes;
pub mod runtime;

pub use error::InstallerError;
