//! Process lock so only one instance talks to the keyboard at a time

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Guard that holds the lock file open. Lock is released when dropped.
pub struct Lock {
    _file: File,
    path: PathBuf,
}

impl Lock {
    /// Try to acquire an exclusive lock in `dir`.
    /// Returns an error if another instance holds the keyboard.
    pub fn acquire(dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join("xmg-kb.lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        // non-blocking
        if file.try_lock().is_err() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "another instance of xmg-kb is already using the keyboard",
            ));
        }

        // pid for debugging
        use std::io::Write;
        let mut file = file;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self { _file: file, path })
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_is_rejected() {
        let dir = std::env::temp_dir().join(format!("xmg-kb-lock-{}", std::process::id()));
        let first = Lock::acquire(&dir).unwrap();
        let err = Lock::acquire(&dir).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        drop(first);
        assert!(!dir.join("xmg-kb.lock").exists());
        let _again = Lock::acquire(&dir).unwrap();
    }
}
