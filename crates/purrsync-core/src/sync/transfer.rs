//! Transfer backend seam

use std::path::Path;

use crate::Result;

/// One partition handed to the transfer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest<'a> {
    /// `main`, `orphan` or the package name
    pub partition: &'a str,
    /// Directory the listed paths are relative to
    pub source: &'a Path,
    /// Path list file, one path per line
    pub files_from: &'a Path,
    /// Destination sub-root
    pub destination: &'a Path,
}

/// Copies the files named in a path list from source to destination.
pub trait Transfer {
    fn transfer(&self, request: &TransferRequest<'_>) -> Result<()>;
}

impl<T: Transfer + ?Sized> Transfer for &T {
    fn transfer(&self, request: &TransferRequest<'_>) -> Result<()> {
        (**self).transfer(request)
    }
}
