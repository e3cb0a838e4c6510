// Copyright (c) 2026 rezky_nightky

use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::light_mask::{DEFAULT_RADIUS, MAX_RADIUS, MIN_RADIUS};
use crate::runtime::{ColorMode, EffectKind};
use crate::starfield::DEFAULT_STARS;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  vfxbox --mode fire --fps 60 --width 960 --height 540 --radius 120 --stars 180";

pub const MAX_STARS: u32 = 5000;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_usage(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(rest) = line.strip_prefix("  vfxbox") {
            out.push_str("  \x1b[1;34mvfxbox\x1b[0m");
            out.push_str(rest);
        } else if line.ends_with(':') && line == line.to_ascii_uppercase() {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_usage(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "vfxbox", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'm',
        long = "mode",
        default_value_t = EffectKind::Fire,
        value_enum,
        help_heading = "GENERAL",
        help = "Initial effect (see --list-effects)"
    )]
    pub mode: EffectKind,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for the scene RNG (default: random, logged at startup)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter with RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "width",
        default_value_t = 960,
        help_heading = "CANVAS",
        help = "Logical canvas width in effect units (min 64 max 3840)"
    )]
    pub width: u32,

    #[arg(
        long = "height",
        default_value_t = 540,
        help_heading = "CANVAS",
        help = "Logical canvas height in effect units (min 64 max 2160)"
    )]
    pub height: u32,

    #[arg(
        short = 'r',
        long = "radius",
        default_value_t = DEFAULT_RADIUS,
        help_heading = "CANVAS",
        help = "Flashlight radius (min 8 max 1000)"
    )]
    pub radius: u32,

    #[arg(
        long = "stars",
        default_value_t = DEFAULT_STARS,
        help_heading = "CANVAS",
        help = "Background star count (min 0 max 5000)"
    )]
    pub stars: u32,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,8,16,24). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "list-effects",
        help_heading = "HELP",
        help = "List available effects and exit"
    )]
    pub list_effects: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Validated run configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    pub mode: EffectKind,
    pub seed: Option<u64>,
    pub fps: f64,
    pub duration: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    pub stars: u32,
    pub color_mode: ColorMode,
    pub log_file: Option<PathBuf>,
    pub perf_stats: bool,
}

fn require_range<T>(flag: &'static str, v: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if v < min || v > max {
        return Err(Error::OutOfRange {
            flag,
            value: v.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(v)
}

fn require_finite(flag: &'static str, v: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(Error::NotFinite { flag, value: v });
    }
    Ok(v)
}

pub fn detect_color_mode_from(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = term.to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

pub fn detect_color_mode_auto() -> ColorMode {
    detect_color_mode_from(
        &std::env::var("COLORTERM").unwrap_or_default(),
        &std::env::var("TERM").unwrap_or_default(),
    )
}

pub fn color_mode_from_flag(m: u16) -> Result<ColorMode> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 => Ok(ColorMode::Color256),
        24 => Ok(ColorMode::TrueColor),
        _ => Err(Error::InvalidColorMode(m)),
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let fps = require_range("--fps", require_finite("--fps", args.fps)?, 1.0, 240.0)?;
        let duration = match args.duration {
            Some(s) => {
                let s = require_finite("--duration", s)?;
                if s > 0.0 {
                    Some(require_range("--duration", s, 0.1, 86400.0)?)
                } else {
                    None
                }
            }
            None => None,
        };
        let color_mode = match args.colormode {
            Some(m) => color_mode_from_flag(m)?,
            None => detect_color_mode_auto(),
        };

        Ok(Self {
            mode: args.mode,
            seed: args.seed,
            fps,
            duration,
            width: require_range("--width", args.width, 64, 3840)?,
            height: require_range("--height", args.height, 64, 2160)?,
            radius: require_range("--radius", args.radius, MIN_RADIUS, MAX_RADIUS)?,
            stars: require_range("--stars", args.stars, 0, MAX_STARS)?,
            color_mode,
            log_file: args.log_file.clone(),
            perf_stats: args.perf_stats,
        })
    }
}

pub fn print_list_effects() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE EFFECTS:\x1b[0m");
        println!("\x1b[2mNOTE: Use the VALUE with --mode, or press KEY while running.\x1b[0m");
    } else {
        println!("AVAILABLE EFFECTS:");
        println!("NOTE: Use the VALUE with --mode, or press KEY while running.");
    }
    println!();
    println!("KEY  VALUE      DESCRIPTION");
    println!("1    fluid      Layered waves with rising bubbles (alias: water)");
    println!("2    fire       Ember particles with an additive glow (follows the pointer)");
    println!("3    discharge  Jagged lightning bolt; drag to move its end (alias: lightning)");
    println!("4    fog        Drifting smoke under a breathing fog layer (alias: smoke)");
    println!("5    light      Darkness with a flashlight hole at the pointer (alias: flashlight)");
}
