use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Surface applied to models loaded with `--model`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Finish {
    /// Plain grey plastic
    Diffuse,
    /// Blue-tinted mirror, reflectivity 0.8
    Mirror,
    /// Green-tinted glass, transparency 0.7
    Glass,
}

#[derive(Debug, Parser)]
#[command(name = "cbox")]
#[command(about = "Render a Cornell box with a Whitted-style ray tracer")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Output image path; the format follows the extension
    #[arg(short, long, default_value = "cornell.png")]
    pub output: PathBuf,

    /// JSON render config (max_depth, bucket_size)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the config's recursion limit
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Draw an edge preview instead of ray tracing
    #[arg(long)]
    pub wireframe: bool,

    /// OBJ models to add to the room, at the origin
    #[arg(short, long = "model")]
    pub models: Vec<PathBuf>,

    /// Surface for every loaded model
    #[arg(long, value_enum, default_value = "diffuse")]
    pub finish: Finish,

    /// Uniform scale for every loaded model
    #[arg(long, default_value_t = 1.0)]
    pub model_scale: f32,

    /// Turn the back wall into a mirror with this reflectivity
    #[arg(long)]
    pub mirror_wall: Option<f32>,

    /// Logging level; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["cbox"]);
        assert_eq!((args.width, args.height), (800, 600));
        assert_eq!(args.output, PathBuf::from("cornell.png"));
        assert!(args.models.is_empty());
        assert!(!args.wireframe);
        assert_eq!(args.finish, Finish::Diffuse);
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn test_repeated_models_and_enums() {
        let args = Args::parse_from([
            "cbox",
            "-m",
            "a.obj",
            "--model",
            "b.obj",
            "--finish",
            "glass",
            "--log-level",
            "debug",
            "--max-depth",
            "3",
        ]);
        assert_eq!(args.models.len(), 2);
        assert_eq!(args.finish, Finish::Glass);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
        assert_eq!(args.max_depth, Some(3));
    }
}
