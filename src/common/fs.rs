//! Common file system operations

use std::fs;
use std::io;
use std::path::Path;

/// Copy the directory tree at `src` into a new directory `dst`
///
/// `dst` must not exist yet. Symbolic links are recreated as links on Unix and
/// copied as their target elsewhere. `src` is only ever read.
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2) -> io::Result<u64>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    fs::create_dir(dst_ref)?;

    let mut copied = 0;
    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let dst_path = dst_ref.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            copied += copy_dir_recursive(&entry_path, &dst_path)?;
        } else if file_type.is_symlink() {
            copy_symlink(&entry_path, &dst_path)?;
            copied += 1;
        } else {
            fs::copy(&entry_path, &dst_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Whether anything (file, directory or dangling link) occupies `path`
pub fn path_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
