//! Command line front end for ply2web
//!
//! Loads an optional PLY file into a [`Plotter`], writes a screenshot or an
//! orbit animation when asked, then either opens the desktop window or
//! serves the web page.

use anyhow::{Context, Result};
use clap::Parser;
use ply2web_visualization::{
    DesktopViewer, OrbitAnimation, Plotter, RenderConfig, MAX_WINDOW_DIMENSION,
};
use ply2web_web::{ServeConfig, WebServer};
use std::path::{Path, PathBuf};

/// Exit code when no mode was requested
pub const EXIT_USAGE: i32 = 1;

#[derive(Debug, Clone, Parser)]
#[command(name = "ply2web", version, about = "View PLY point clouds on the desktop or in a browser")]
pub struct Args {
    /// PLY file to load
    #[arg(long)]
    pub ply_file: Option<PathBuf>,

    /// Open the desktop window and exit when it closes
    #[arg(long)]
    pub spawn_host: bool,

    #[arg(long, default_value_t = 38080)]
    pub port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Open a browser on the served page
    #[arg(long)]
    pub spawn_web: bool,

    /// Serve the web page
    #[arg(long, overrides_with = "no_web_serve")]
    pub web_serve: bool,

    #[arg(long, overrides_with = "web_serve")]
    pub no_web_serve: bool,

    /// Write an orbit animation (GIF) instead of a still image
    #[arg(long)]
    pub animation: bool,

    /// Flip the camera up vector
    #[arg(long)]
    pub upside_down: bool,

    /// Screenshot or animation output path
    #[arg(short, long)]
    pub output_filepath: Option<PathBuf>,

    /// Keyframes in the orbit animation
    #[arg(long)]
    pub frames: Option<usize>,

    /// Off-screen render size, e.g. 1024x768
    #[arg(long, value_parser = parse_window_size)]
    pub window_size: Option<[u32; 2]>,

    /// TOML file with render settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// What the process does after loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Desktop,
    Serve,
    /// Only write the output file
    Output,
    Usage,
}

impl Args {
    pub fn serve(&self) -> bool {
        !self.no_web_serve && (self.web_serve || self.spawn_web)
    }

    /// Where the screenshot or animation goes, if anywhere
    ///
    /// `--animation` without `-o` writes next to the working directory,
    /// named after the PLY file.
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.output_filepath {
            return Some(path.clone());
        }
        if !self.animation {
            return None;
        }
        let stem = self
            .ply_file
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .unwrap_or("animation");
        Some(PathBuf::from(format!("{}.gif", stem)))
    }

    pub fn mode(&self) -> Mode {
        if self.spawn_host {
            Mode::Desktop
        } else if self.serve() {
            Mode::Serve
        } else if self.output_path().is_some() {
            Mode::Output
        } else {
            Mode::Usage
        }
    }

    /// Config file settings with command line overrides applied
    pub fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load_from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };
        if let Some(frames) = self.frames {
            config.animation.frames = frames;
        }
        if let Some(size) = self.window_size {
            config.window_size = size;
        }
        Ok(config)
    }

    pub fn serve_config(&self) -> ServeConfig {
        ServeConfig {
            bind: self.bind.clone(),
            port: self.port,
            open_browser: self.spawn_web,
        }
    }
}

/// Parse `WIDTHxHEIGHT`, each side in `1..=MAX_WINDOW_DIMENSION`
pub fn parse_window_size(s: &str) -> std::result::Result<[u32; 2], String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_WINDOW_DIMENSION).contains(n))
            .ok_or_else(|| {
                format!("invalid dimension '{}', expected 1..={}", v, MAX_WINDOW_DIMENSION)
            })
    };
    Ok([parse(width)?, parse(height)?])
}

/// Load `path` into the plotter under its file name
pub fn load_ply(plotter: &mut Plotter, path: &Path) -> Result<()> {
    let mesh = ply2web_io::read_mesh(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);

    let actor = plotter.add_mesh_with_fallback(mesh, name.as_deref());
    match ply2web_core::MeshStats::from_mesh(&actor.mesh) {
        Some(stats) => log::info!("{}: {}", actor.name, stats),
        None => log::warn!("{} contains no points", actor.name),
    }
    plotter.reset_camera();
    Ok(())
}

/// Write the screenshot or animation, returning the path written
pub fn write_output(args: &Args, plotter: &Plotter) -> Result<Option<PathBuf>> {
    let Some(path) = args.output_path() else {
        return Ok(None);
    };
    if args.animation {
        OrbitAnimation::from(&plotter.config().animation)
            .write_gif(plotter, &path)
            .with_context(|| format!("failed to write animation {}", path.display()))?;
    } else {
        plotter
            .screenshot(&path)
            .with_context(|| format!("failed to write screenshot {}", path.display()))?;
    }
    Ok(Some(path))
}

/// Run the program, returning the process exit code
pub fn run(args: Args) -> Result<i32> {
    let mut plotter = Plotter::new(args.render_config()?);
    if let Some(path) = &args.ply_file {
        load_ply(&mut plotter, path)?;
    }
    plotter.set_upside_down(args.upside_down);

    write_output(&args, &plotter)?;

    match args.mode() {
        Mode::Desktop => {
            if args.serve() {
                log::warn!("--spawn-host takes precedence, not serving the web page");
            }
            let title = args
                .ply_file
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| format!("ply2web - {}", n.to_string_lossy()))
                .unwrap_or_else(|| "ply2web".to_string());
            DesktopViewer::new(plotter)
                .with_title(title)
                .run()
                .context("desktop viewer failed")?;
            Ok(0)
        }
        Mode::Serve => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime
                .block_on(WebServer::new(plotter, args.serve_config()).serve())
                .context("web server failed")?;
            Ok(0)
        }
        Mode::Output => Ok(0),
        Mode::Usage => {
            log::error!(
                "nothing to do: pass --web-serve, --spawn-web, --spawn-host or --output-filepath"
            );
            Ok(EXIT_USAGE)
        }
    }
}
