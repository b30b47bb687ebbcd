//! ZIP extraction into a workspace and repacking out of it.

mod extract;
mod repack;

pub use extract::Extraction;
pub use extract::extract_zip;
pub use repack::repack_zip;

/// Unix file type mask of the mode stored in a ZIP entry.
const S_IFMT: u32 = 0o170_000;

/// Unix file type bits of a symbolic link.
const S_IFLNK: u32 = 0o120_000;

/// Returns `true` if the stored unix mode marks a symbolic link.
pub(crate) const fn is_symlink_mode(mode: u32) -> bool {
    mode & S_IFMT == S_IFLNK
}
