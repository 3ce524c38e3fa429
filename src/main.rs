mod audio;
mod cli;
mod config;
mod visual;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

use audio::analysis::SoundAnalyzer;
use audio::source::{FftFrameSource, SpectralFrameSource};
use cli::Cli;
use visual::bucket::SpectrumBucketizer;
use visual::mapper::{circle_layout, VisualMapper};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect soniscope.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("soniscope.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("soniscope").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("soniscope").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    let mut cfg = config::Config::default();
    if let Some(ref path) = config_path {
        if let Some(loaded) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            cfg = loaded;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    // CLI flags win over the config file when set away from their defaults
    if cli.amt_visual != 64 {
        cfg.visual.amt_visual = cli.amt_visual;
    }
    if (cli.keep_percentage - 0.5).abs() > f32::EPSILON {
        cfg.visual.keep_percentage = cli.keep_percentage;
    }

    cfg.validate().context("Invalid configuration")?;

    if cli.print_layout {
        let layout = circle_layout(cfg.visual.amt_visual);
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("soniscope - audio-reactive visual parameter pipeline");
    log::info!("Input: {}", input.display());
    log::info!(
        "Elements: {}, keep: {:.0}%, frame size: {}",
        cfg.visual.amt_visual,
        cfg.visual.keep_percentage * 100.0,
        cfg.audio.frame_size
    );

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_audio(input)?;

    // 2. Build the per-tick pipeline
    let analyzer = SoundAnalyzer::new(cfg.audio.frame_size, cfg.audio.reference_amplitude);
    let bucketizer = SpectrumBucketizer::new(
        cfg.audio.frame_size,
        cfg.visual.amt_visual,
        cfg.visual.keep_percentage,
    )?;
    let mut mapper = VisualMapper::new(cfg.visual.clone(), bucketizer.bucket_width());
    let mut source = FftFrameSource::new(
        audio_data.samples,
        audio_data.sample_rate,
        cfg.audio.frame_size,
        cli.fps,
    );

    log::info!(
        "Bucket width: {} bins, {} ticks at {} fps, {} Hz",
        bucketizer.bucket_width(),
        source.total_ticks(),
        cli.fps,
        source.sample_rate()
    );

    let mut dump = match cli.dump {
        Some(ref path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create dump file: {}", path.display()))?;
            Some(std::io::BufWriter::new(file))
        }
        None => None,
    };

    // 3. Tick loop: source -> analyzer -> bucketizer -> mapper
    let pb = ProgressBar::new(source.total_ticks() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ticks ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let dt = 1.0 / cli.fps as f32;
    let mut ticks = 0usize;
    let mut peak_rms = 0.0f32;
    let mut peak_db = f32::MIN;
    let mut pitch_at_peak = 0.0f32;

    while let Some(frame) = source.next_frame() {
        let result = analyzer.analyze(&frame);
        let sums = bucketizer.sums(&frame.spectrum);
        let visual_frame = mapper.tick(&result, &sums, dt);

        if result.rms > peak_rms {
            peak_rms = result.rms;
            pitch_at_peak = result.pitch_hz;
        }
        peak_db = peak_db.max(result.db_level);

        if let Some(ref mut writer) = dump {
            serde_json::to_writer(&mut *writer, &visual_frame)?;
            writeln!(writer)?;
        }

        ticks += 1;
        pb.set_position(ticks as u64);
    }
    pb.finish_with_message("Analysis complete");

    if let Some(mut writer) = dump {
        writer.flush()?;
    }

    log::info!(
        "Processed {} ticks: peak rms {:.4}, peak level {:.1} dB, pitch at peak {:.1} Hz",
        ticks,
        peak_rms,
        peak_db,
        pitch_at_peak
    );
    log::info!(
        "Final background intensity: {:.3}",
        mapper.background_intensity()
    );

    Ok(())
}
