use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "soniscope",
    about = "Audio-reactive radial visualizer parameter pipeline"
)]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Analysis ticks per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Number of display elements around the circle
    #[arg(long, default_value_t = 64)]
    pub amt_visual: usize,

    /// Fraction of low-frequency spectrum bins kept for display (0-1)
    #[arg(long, default_value_t = 0.5)]
    pub keep_percentage: f32,

    /// Write per-tick visual output as JSON lines to this file
    #[arg(short, long)]
    pub dump: Option<PathBuf>,

    /// Config file path (default: auto-detect soniscope.toml / global config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the startup circle layout as JSON and exit
    #[arg(long)]
    pub print_layout: bool,
}
