use crate::core::error::CarltonError;
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    AwaitingInstruction,
    AwaitingApplyConfirmation,
}

/// Per-run state shared by the commands.
#[derive(Debug)]
pub struct Session {
    working_directory: PathBuf,
    pub last_response: Option<String>,
    pub edit_phase: EditPhase,
}

impl Session {
    pub fn new(working_directory: PathBuf) -> Self {
        Self {
            working_directory,
            last_response: None,
            edit_phase: EditPhase::Idle,
        }
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// `<cwd>/<path>`. Absolute paths and `..` components are rejected so
    /// nothing resolves outside the working directory.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, CarltonError> {
        let requested = Path::new(path);
        let escapes = requested
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(CarltonError::invalid_target(
                requested,
                "path must stay inside the working directory",
            ));
        }
        Ok(self.working_directory.join(requested))
    }

    /// Whole-file replace of `<cwd>/<name>`, creating parent directories.
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf, CarltonError> {
        let path = self.resolve(name)?;
        write_whole_file(&path, contents)?;
        Ok(path)
    }
}

pub fn write_whole_file(path: &Path, contents: &str) -> Result<(), CarltonError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| CarltonError::file_write(path, e))?;
        }
    }
    fs::write(path, contents).map_err(|e| CarltonError::file_write(path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn starts_idle_without_response() {
        let session = Session::new(PathBuf::from("/work"));
        assert_eq!(session.edit_phase, EditPhase::Idle);
        assert!(session.last_response.is_none());
        assert_eq!(
            session.resolve("src/a.rs").unwrap(),
            PathBuf::from("/work/src/a.rs")
        );
        assert_eq!(
            session.resolve("./b.rs").unwrap(),
            PathBuf::from("/work/./b.rs")
        );
    }

    #[test]
    fn write_file_creates_parents_and_truncates() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path().to_path_buf());

        let path = session.write_file("nested/deeper/out.py", "a long first version").unwrap();
        session.write_file("nested/deeper/out.py", "short").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "short");
    }

    #[test]
    fn paths_outside_the_working_directory_are_rejected() {
        let session = Session::new(PathBuf::from("/work"));
        for path in ["/etc/passwd", "../up.txt", "src/../../up.txt", ".."] {
            let err = session.resolve(path).unwrap_err();
            assert!(
                matches!(err, CarltonError::InvalidEditTarget { .. }),
                "{path}"
            );
        }
    }

    #[test]
    fn write_failure_is_a_file_write_error() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        fs::create_dir(dir.path().join("taken")).unwrap();

        let err = session.write_file("taken", "data").unwrap_err();
        assert!(matches!(err, CarltonError::FileWrite { .. }));
    }
}
