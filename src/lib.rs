//! Locate the C/C++ sources of a repository while honoring the directories it
//! excludes through `.gitignore` files and `.gitmodules` submodule
//! declarations.

pub mod config;
pub mod error;
pub mod sieve;

pub use error::{Result, SieveError};
pub use sieve::{sieve_c_cxx_files, BannedDirs, FileSource, FsSource, MemorySource, Sieve};
