use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

pub(crate) const KEY_DOB: &str = "user_dob";
pub(crate) const KEY_THEME: &str = "user_theme";

/// Key-value preference storage. The app only ever keeps two keys in here
/// (`user_dob`, `user_theme`); changes are buffered until `flush`.
pub(crate) trait Preferences {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    fn flush(&mut self) -> Result<()>;
}

pub(crate) fn prefs_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "planetage", "Planetage")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(dir.join("prefs.json"))
}

/// JSON string map on disk, replaced atomically on flush.
pub(crate) struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    pub(crate) fn open(path: PathBuf) -> Self {
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str::<BTreeMap<String, String>>(&s).ok())
            .unwrap_or_default();
        Self { path, values }
    }
}

impl Preferences for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&tmp, data)?;
        atomic_rename(&tmp, &self.path)?;
        Ok(())
    }
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Best-effort atomic replace on same filesystem.
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

/// In-memory stand-in for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl Preferences for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_prefs_round_trip() {
        let mut p = MemoryPrefs::default();
        assert_eq!(p.get(KEY_DOB), None);
        p.set(KEY_DOB, "1990-06-15");
        p.set(KEY_THEME, "light");
        assert_eq!(p.get(KEY_DOB).as_deref(), Some("1990-06-15"));
        p.remove(KEY_DOB);
        assert_eq!(p.get(KEY_DOB), None);
        assert_eq!(p.get(KEY_THEME).as_deref(), Some("light"));
    }

    #[test]
    fn file_prefs_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut p = FilePrefs::open(path.clone());
        p.set(KEY_DOB, "2001-12-24");
        p.set(KEY_THEME, "dark");
        p.flush().unwrap();

        let q = FilePrefs::open(path.clone());
        assert_eq!(q.get(KEY_DOB).as_deref(), Some("2001-12-24"));
        assert_eq!(q.get(KEY_THEME).as_deref(), Some("dark"));

        let mut r = FilePrefs::open(path.clone());
        r.remove(KEY_DOB);
        r.flush().unwrap();
        let s = FilePrefs::open(path);
        assert_eq!(s.get(KEY_DOB), None);
        assert_eq!(s.get(KEY_THEME).as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, b"{ not json").unwrap();
        let p = FilePrefs::open(path);
        assert_eq!(p.get(KEY_DOB), None);
    }
}
