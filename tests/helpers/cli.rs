use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Runs the `grantsync` binary inside a scratch project directory.
pub struct CliTestHelper {
    pub temp_dir: TempDir,
    pub project_root: PathBuf,
}

impl CliTestHelper {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project_root = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            project_root,
        }
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.project_root.join("grantsync.yaml"), contents)
            .expect("Failed to write grantsync.yaml");
    }

    /// A command that never picks up the caller's database settings.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("grantsync").expect("Failed to find grantsync binary");
        cmd.current_dir(&self.project_root)
            .env_remove("DATABASE_URL")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for CliTestHelper {
    fn default() -> Self {
        Self::new()
    }
}
