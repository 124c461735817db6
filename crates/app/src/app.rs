//! Application bootstrap: data paths, tracing and the Bevy app wrapper.

use paths::PathContext;
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Log targets, one per area of the application.
pub const LOG_MAIN: &str = "main";
pub const LOG_SCENE: &str = "scene";
pub const LOG_CURSOR: &str = "scene/cursor";
pub const LOG_PLACEMENT: &str = "scene/placement";

/// Identity of an application inside the studio/project tree.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "ar_lab";
    const PROJECT_ID: &'static str = "ar_placement";
}

/// Paths, version and the log writer of a running application.
pub struct AppContext {
    path_context: PathContext,
    version: &'static str,
    // Dropping the guard stops the file writer; it lives as long as the app
    _log_guard: WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// INFO for debug builds, WARN for release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Debug builds write into `<workspace>/.out` so nothing leaks into user directories.
fn path_context_for<A: Application>() -> PathContext {
    #[cfg(debug_assertions)]
    {
        let out = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../.out");
        PathContext::with_base_path(out, A::STUDIO, A::PROJECT_ID, A::APP_ID)
    }
    #[cfg(not(debug_assertions))]
    {
        PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID)
    }
}

/// Installs the global subscriber: one non-blocking layer into this run's log
/// file and one console layer, both capped at `level`.
fn init_tracing(paths: &PathContext, level: LevelFilter) -> Result<WorkerGuard, BoxError> {
    let log_file = paths.log_file_now();
    let log_dir = log_file
        .parent()
        .ok_or("log file path has no parent directory")?;
    let log_name = log_file
        .file_name()
        .ok_or("log file path has no file name")?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_name));

    let file_layer = fmt::Layer::default()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));
    let console_layer = fmt::Layer::default()
        .with_target(true)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()?;
    Ok(guard)
}

/// Prepares directories and logging, then hands out the Bevy app.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        Self::with_level(version, default_level())
    }

    /// Fails when the directories cannot be created or a global subscriber
    /// is already installed.
    pub fn with_level(version: &'static str, level: LevelFilter) -> Result<Self, BoxError> {
        let path_context = path_context_for::<A>();
        path_context.ensure_directories()?;
        let log_guard = init_tracing(&path_context, level)?;

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: log_guard,
            },
            _marker: PhantomData,
        })
    }

    /// Hands a fresh Bevy `App` to `configure`.
    ///
    /// Tracing is already set up, so `configure` must disable Bevy's `LogPlugin`:
    ///
    /// ```ignore
    /// let app = AppBuilder::<MyApp>::new("1.0.0")?.build_with_bevy(|mut app, _ctx| {
    ///     app.add_plugins(DefaultPlugins.build().disable::<LogPlugin>());
    ///     app
    /// });
    /// ```
    #[cfg(feature = "bevy")]
    pub fn build_with_bevy(
        self,
        configure: impl FnOnce(bevy::prelude::App, &AppContext) -> bevy::prelude::App,
    ) -> BevyApp<A> {
        let app = configure(bevy::prelude::App::new(), &self.context);
        BevyApp {
            context: self.context,
            app,
            _marker: PhantomData,
        }
    }
}

/// Bevy app plus the context that keeps logging alive.
#[cfg(feature = "bevy")]
pub struct BevyApp<A: Application> {
    context: AppContext,
    app: bevy::prelude::App,
    _marker: PhantomData<A>,
}

#[cfg(feature = "bevy")]
impl<A: Application> BevyApp<A> {
    pub fn run(&mut self) -> bevy::app::AppExit {
        self.app.run()
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn app_mut(&mut self) -> &mut bevy::prelude::App {
        &mut self.app
    }
}
