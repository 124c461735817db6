use crate::scene::SceneMode;
use app::default_level;
use clap::Parser;
use tracing::level_filters::LevelFilter;

/// Command line for the AR placement demo.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "ar_demo", version, about = "Place a 3D model on a surface picked at the screen center")]
pub struct Cli {
    /// Run without AR: visible grid ground, orbit camera, black background
    #[arg(long)]
    pub disable_ar: bool,

    /// Log at DEBUG level
    #[arg(long)]
    pub debug: bool,

    /// glTF model to place, relative to the asset folder (overrides the settings file for this run)
    #[arg(long, value_name = "PATH")]
    pub model: Option<String>,
}

impl Cli {
    pub fn mode(&self) -> SceneMode {
        if self.disable_ar {
            SceneMode::NonAr
        } else {
            SceneMode::Ar
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else {
            default_level()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ar_demo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_ar() {
        let cli = parse(&[]);
        assert_eq!(cli.mode(), SceneMode::Ar);
        assert_eq!(cli.model, None);
        assert_eq!(cli.log_level(), default_level());
    }

    #[test]
    fn disable_ar_and_debug() {
        let cli = parse(&["--disable-ar", "--debug"]);
        assert_eq!(cli.mode(), SceneMode::NonAr);
        assert_eq!(cli.log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn model_override() {
        let cli = parse(&["--model", "models/Duck.glb"]);
        assert_eq!(cli.model.as_deref(), Some("models/Duck.glb"));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["ar_demo", "--disableAR=1"]).is_err());
    }
}
