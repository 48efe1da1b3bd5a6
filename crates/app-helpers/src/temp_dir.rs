use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

/// A directory under the system temp dir that is removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}
impl TempDir {
    pub fn with_prefix(prefix: &str) -> io::Result<Self> {
        let mut id = ulid::Ulid::new().to_string();
        id.make_ascii_lowercase();

        let path = env::temp_dir().join(format!("{prefix}{id}"));
        fs::create_dir_all(&path)?;

        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_file<C: AsRef<[u8]>>(&self, name: &str, contents: C) -> io::Result<PathBuf> {
        let path = self.path.join(name);
        fs::write(&path, contents)?;

        Ok(path)
    }

    /// Write a script and mark it executable.
    #[cfg(unix)]
    pub fn write_executable(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write_file(name, contents)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

        Ok(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn removed_on_drop() {
        let dir = TempDir::with_prefix("app-helpers-test-").expect("create temp dir");
        let file = dir.write_file("a.txt", "hello").expect("write file");
        let path = dir.path().to_path_buf();

        assert!(file.exists());
        drop(dir);
        assert!(!path.exists());
    }
}
