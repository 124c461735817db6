//! On-disk layout of the application's data.
//!
//! Everything lives below `<data root>/<studio>/<project>`:
//!
//! ```text
//! <app>.settings.json
//! logs/<app>.<timestamp>.log
//! ```
//!
//! The data root is the crate directory when running from cargo and the
//! platform's local data directory for installed binaries. `AR_PLACEMENT_DATA_DIR`
//! overrides both.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "AR_PLACEMENT_DATA_DIR";

const INSTALLED_DIR_NAME: &str = "AR_Placement";
const LOG_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Built and started by cargo
    Development,
    /// Installed binary
    Production,
}

impl RuntimeEnvironment {
    pub fn detect() -> Self {
        let cargo_env = std::env::var_os("CARGO").is_some()
            || std::env::var_os("CARGO_MANIFEST_DIR").is_some();
        match std::env::current_exe() {
            Ok(exe) => Self::classify(&exe, cargo_env),
            Err(_) if cargo_env => Self::Development,
            Err(_) => Self::Production,
        }
    }

    /// Binaries below a `target` directory are cargo builds.
    fn classify(exe: &Path, cargo_env: bool) -> Self {
        if cargo_env || exe.components().any(|c| c.as_os_str() == "target") {
            Self::Development
        } else {
            Self::Production
        }
    }
}

/// Resolves the data root: explicit override first, then the environment default.
fn resolve_data_root(overridden: Option<OsString>, environment: RuntimeEnvironment) -> PathBuf {
    if let Some(dir) = overridden.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }

    match environment {
        RuntimeEnvironment::Development => std::env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from(".")),
        // XDG_DATA_HOME, Application Support or LocalAppData
        RuntimeEnvironment::Production => dirs::data_local_dir()
            .map(|dir| dir.join(INSTALLED_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Paths of one application inside a studio/project tree.
#[derive(Debug, Clone)]
pub struct PathContext {
    environment: RuntimeEnvironment,
    data_root: PathBuf,
    studio: String,
    project_id: String,
    app_id: &'static str,
}

impl PathContext {
    /// Detects the environment and picks the data root from it.
    pub fn new(
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let environment = RuntimeEnvironment::detect();
        let data_root = resolve_data_root(std::env::var_os(DATA_DIR_ENV), environment);
        Self::with_base_path(data_root, studio, project_id, app_id)
    }

    /// Uses `data_root` as is. Debug builds and tests pass their own root here.
    pub fn with_base_path(
        data_root: PathBuf,
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        Self {
            environment: RuntimeEnvironment::detect(),
            data_root,
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn base_path(&self) -> &Path {
        &self.data_root
    }

    pub fn studio(&self) -> &str {
        &self.studio
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    pub fn project_root(&self) -> PathBuf {
        self.data_root.join(&self.studio).join(&self.project_id)
    }

    /// Settings of `app_id`, or of this application when `None`.
    pub fn settings_file(&self, app_id: Option<&str>) -> PathBuf {
        let app_id = app_id.unwrap_or(self.app_id);
        self.project_root().join(format!("{app_id}.settings.json"))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.project_root().join("logs")
    }

    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{timestamp}.log", self.app_id))
    }

    /// Log file for a run starting now (local time).
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format(LOG_TIMESTAMP_FORMAT).to_string();
        self.log_file(&timestamp)
    }

    /// Creates the project root and the logs directory.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.logs_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(root: &str) -> PathContext {
        PathContext::with_base_path(PathBuf::from(root), "ar_lab", "ar_placement", "ar_demo")
    }

    #[test]
    fn test_project_layout() {
        let ctx = ctx("/data");

        assert_eq!(ctx.studio(), "ar_lab");
        assert_eq!(ctx.project_id(), "ar_placement");
        assert_eq!(ctx.app_id(), "ar_demo");
        assert_eq!(ctx.project_root(), PathBuf::from("/data/ar_lab/ar_placement"));
    }

    #[test]
    fn test_settings_file() {
        let ctx = ctx("/data");

        assert_eq!(
            ctx.settings_file(None),
            PathBuf::from("/data/ar_lab/ar_placement/ar_demo.settings.json")
        );
        assert_eq!(
            ctx.settings_file(Some("viewer")),
            PathBuf::from("/data/ar_lab/ar_placement/viewer.settings.json")
        );
    }

    #[test]
    fn test_log_file() {
        let ctx = ctx("/data");

        assert_eq!(
            ctx.log_file("20261015-093000"),
            PathBuf::from("/data/ar_lab/ar_placement/logs/ar_demo.20261015-093000.log")
        );
        let now = ctx.log_file_now();
        assert_eq!(now.parent(), Some(ctx.logs_dir().as_path()));
        assert!(now.to_string_lossy().ends_with(".log"));
    }

    #[test]
    fn test_classify_environment() {
        let cargo_build = Path::new("/src/ar/target/debug/ar_demo");
        let installed = Path::new("/usr/local/bin/ar_demo");

        assert_eq!(
            RuntimeEnvironment::classify(cargo_build, false),
            RuntimeEnvironment::Development
        );
        assert_eq!(
            RuntimeEnvironment::classify(installed, false),
            RuntimeEnvironment::Production
        );
        assert_eq!(
            RuntimeEnvironment::classify(installed, true),
            RuntimeEnvironment::Development
        );
    }

    #[test]
    fn test_data_root_override() {
        let root = resolve_data_root(
            Some(OsString::from("/tmp/ar")),
            RuntimeEnvironment::Production,
        );
        assert_eq!(root, PathBuf::from("/tmp/ar"));

        // An empty override is ignored
        let root = resolve_data_root(Some(OsString::new()), RuntimeEnvironment::Production);
        assert_ne!(root, PathBuf::new());
    }

    #[test]
    fn test_ensure_directories_creates_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = PathContext::with_base_path(tmp.path().to_path_buf(), "studio", "project", "app");

        ctx.ensure_directories().unwrap();
        assert!(ctx.project_root().is_dir());
        assert!(ctx.logs_dir().is_dir());

        // Idempotent on an existing layout
        ctx.ensure_directories().unwrap();
    }
}
