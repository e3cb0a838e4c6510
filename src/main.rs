// Copyright (c) 2026 rezky_nightky

mod canvas;
mod color;
mod config;
mod discharge;
mod effect;
mod error;
mod fire;
mod fluid;
mod fog;
mod frame;
mod light_mask;
mod particle;
mod plume;
mod present;
mod runtime;
mod scene;
mod starfield;
mod terminal;

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::LevelFilter;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::canvas::Canvas;
use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_list_effects, Args, Settings,
};
use crate::effect::Point;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::present::{cell_to_canvas, Presenter};
use crate::runtime::EffectKind;
use crate::scene::{Scene, SceneSettings};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const RADIUS_STEP: i32 = 10;

fn build_info() -> &'static str {
    env!("VFXBOX_BUILD")
}

fn git_sha() -> &'static str {
    env!("VFXBOX_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Logs go to `--log-file` only; stderr is hidden behind the alternate
/// screen while the scene runs.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Off)
            .init();
        return Ok(());
    };
    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn install_signal_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    drawn_frames: u64,
    work_sum_s: f64,
    work_max_s: f64,
    peak_population: usize,
}

impl PerfStats {
    fn record(&mut self, work_s: f64, drawn: bool, population: usize) {
        self.frames = self.frames.saturating_add(1);
        if drawn {
            self.drawn_frames = self.drawn_frames.saturating_add(1);
        }
        self.work_sum_s += work_s;
        self.work_max_s = self.work_max_s.max(work_s);
        self.peak_population = self.peak_population.max(population);
    }

    fn print(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;
        let avg_work_ms = self.work_sum_s / frames * 1000.0;
        let avg_fps = self.frames as f64 / elapsed_s;

        log::info!(
            "perf: frames={} avg_fps={:.2} avg_work_ms={:.3} max_work_ms={:.3} peak_particles={}",
            self.frames,
            avg_fps,
            avg_work_ms,
            self.work_max_s * 1000.0,
            self.peak_population
        );

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", avg_fps);
        println!("  frames: {}", self.frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            self.drawn_frames,
            self.drawn_frames as f64 / frames * 100.0
        );
        println!("  avg_work_ms: {:.3}", avg_work_ms);
        println!("  max_work_ms: {:.3}", self.work_max_s * 1000.0);
        println!("  peak_particles: {}", self.peak_population);
    }
}

enum Input {
    Quit,
    Resize(u16, u16),
    Handled,
}

fn handle_key(scene: &mut Scene, code: KeyCode, modifiers: KeyModifiers) -> Input {
    match (code, modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => return Input::Quit,
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => return Input::Quit,
        (KeyCode::Char(' '), _) => scene.regenerate(),
        (KeyCode::Char('p'), _) => scene.toggle_pause(),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => {
            scene.adjust_light_radius(RADIUS_STEP)
        }
        (KeyCode::Char('-'), _) => scene.adjust_light_radius(-RADIUS_STEP),
        (KeyCode::Char(c), _) => {
            if let Some(kind) = EffectKind::from_hotkey(c) {
                scene.set_mode(kind);
            }
        }
        _ => {}
    }
    Input::Handled
}

fn handle_mouse(scene: &mut Scene, pointer: &mut Point, at: Point, kind: MouseEventKind) {
    *pointer = at;
    match kind {
        MouseEventKind::Down(MouseButton::Left) => scene.begin_drag(at),
        MouseEventKind::Drag(MouseButton::Left) => scene.drag_to(at),
        MouseEventKind::Up(MouseButton::Left) => scene.end_drag(),
        _ => {}
    }
}

fn run(settings: Settings) -> Result<()> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "starting: mode={:?} canvas={}x{} fps={} radius={} stars={} color={} seed={}",
        settings.mode,
        settings.width,
        settings.height,
        settings.fps,
        settings.radius,
        settings.stars,
        settings.color_mode.label(),
        seed
    );

    let mut scene = Scene::new(SceneSettings {
        width: settings.width,
        height: settings.height,
        seed,
        light_radius: settings.radius,
        stars: settings.stars,
        initial: settings.mode,
    });
    let mut canvas = Canvas::new(settings.width, settings.height);
    let presenter = Presenter::new(settings.color_mode);
    let mut pointer = Point::new(settings.width as f32 / 2.0, settings.height as f32 / 2.0);

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut frame = Frame::new(w, h);
    log::info!("terminal {}x{}", w, h);

    let start_time = Instant::now();
    let end_time = settings
        .duration
        .map(|s| start_time + Duration::from_secs_f64(s));
    let target_period = Duration::from_secs_f64(1.0 / settings.fps);
    let population_every = settings.fps.round().max(1.0) as u64;
    let mut next_frame = Instant::now();
    let mut ticks: u64 = 0;
    let mut perf = PerfStats::default();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                let input = match Terminal::read_event()? {
                    Event::Resize(nw, nh) => Input::Resize(nw, nh),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        handle_key(&mut scene, k.code, k.modifiers)
                    }
                    Event::Mouse(MouseEvent {
                        kind, column, row, ..
                    }) => {
                        let at = cell_to_canvas(column, row, &frame, &canvas);
                        handle_mouse(&mut scene, &mut pointer, at, kind);
                        Input::Handled
                    }
                    _ => Input::Handled,
                };
                match input {
                    Input::Quit => {
                        running = false;
                        break;
                    }
                    Input::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Input::Handled => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            log::info!("terminal resized to {}x{}", nw, nh);
            frame = Frame::new(nw, nh);
        }

        let work_start = Instant::now();
        scene.update(pointer);
        scene.draw(&mut canvas, pointer);
        presenter.render(&canvas, &mut frame);
        presenter.draw_hud(&mut frame, &scene.hud());
        let drawn = frame.has_changes();
        if drawn {
            term.draw(&mut frame)?;
        }
        let work_s = work_start.elapsed().as_secs_f64();

        ticks = ticks.wrapping_add(1);
        let population = scene.population();
        if ticks % population_every == 0 {
            log::trace!(
                "tick {}: {:?} live particles {}{}",
                ticks,
                scene.mode(),
                population,
                if scene.is_paused() { " (paused)" } else { "" }
            );
        }
        if settings.perf_stats {
            perf.record(work_s, drawn, population);
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    drop(term);
    if settings.perf_stats {
        perf.print(start_time.elapsed(), settings.fps);
    }
    log::info!("stopped after {} ticks", ticks);
    Ok(())
}

fn main() {
    install_signal_handlers();

    let args = parse_args();

    if args.list_effects {
        print_list_effects();
        return;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {} ({})", build_info(), git_sha());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return;
    }

    let result = Settings::from_args(&args).and_then(|settings| {
        init_logging(settings.log_file.as_deref())?;
        run(settings)
    });
    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
