//! Top-level application loop.
//!
//! `App` owns the [`Stage`] and the status line. The run loop drains tracker
//! events into it, advances physics on a fixed-rate clock and hands each
//! frame to the visualizer.

use std::sync::mpsc::{self, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};

use glyph_field::{GestureSymbol, HandLandmarkSet, Stage, Tunables};

use crate::tracker::{spawn_landmark_source, TrackerEvent};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub tunables:     Tunables,
    /// Physics ticks per second.
    pub tick_hz:      u32,
    /// Most ticks run in one frame after a stall; older backlog is dropped.
    pub max_catch_up: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tunables:     Tunables::default(),
            tick_hz:      60,
            max_catch_up: 4,
        }
    }
}

impl AppConfig {
    /// Parse command-line flags (without the program name).
    pub fn from_args<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cfg = AppConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let flag = arg.as_ref();
            let value = args.next()
                .ok_or_else(|| anyhow!("{} needs a value", flag))?;
            let value = value.as_ref();

            match flag {
                "--seed"      => cfg.tunables.seed = Some(parse_num(flag, value)?),
                "--particles" => cfg.tunables.field.particle_count = parse_num(flag, value)?,
                "--balloons"  => cfg.tunables.decor.balloon_count = parse_num(flag, value)?,
                "--flowers"   => cfg.tunables.decor.flower_count = parse_num(flag, value)?,
                "--hz"        => {
                    cfg.tick_hz = parse_num(flag, value)?;
                    if cfg.tick_hz == 0 {
                        bail!("--hz must be at least 1");
                    }
                }
                _ => bail!("unknown option {}", flag),
            }
        }
        Ok(cfg)
    }
}

fn parse_num<T>(flag: &str, value: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().with_context(|| format!("{} expects a number, got {:?}", flag, value))
}

// ════════════════════════════════════════════════════════════════════════════
// TickClock
// ════════════════════════════════════════════════════════════════════════════

/// Turns wall-clock time into a whole number of fixed-length physics ticks.
#[derive(Clone, Debug)]
pub struct TickClock {
    period:    Duration,
    max_steps: u32,
    pending:   Duration,
}

impl TickClock {
    pub fn new(hz: u32, max_steps: u32) -> Self {
        TickClock {
            period:    Duration::from_secs(1) / hz.max(1),
            max_steps: max_steps.max(1),
            pending:   Duration::ZERO,
        }
    }

    /// Account for `elapsed` and return how many ticks to run now.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed;
        let due = (self.pending.as_nanos() / self.period.as_nanos()) as u32;
        if due > self.max_steps {
            log::debug!("physics {} ticks behind, skipping", due - self.max_steps);
            self.pending = Duration::ZERO;
            return self.max_steps;
        }
        self.pending -= self.period * due;
        due
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    stage:      Stage,
    hand_seen:  bool,
    pub status: String,
}

impl App {
    pub fn new(tunables: Tunables) -> Self {
        let mut app = App {
            stage:     Stage::new(tunables),
            hand_seen: false,
            status:    String::new(),
        };
        app.refresh_status();
        app
    }

    // ── process one tracker frame ─────────────────────────────────────────

    pub fn handle_landmarks(&mut self, hand: Option<&HandLandmarkSet>) -> Option<GestureSymbol> {
        if hand.is_some() != self.hand_seen {
            self.hand_seen = hand.is_some();
            log::debug!("hand {}", if self.hand_seen { "found" } else { "lost" });
        }
        let symbol = self.stage.on_hand_landmarks(hand);
        self.refresh_status();
        symbol
    }

    pub fn tick(&mut self) {
        self.stage.tick();
    }

    fn refresh_status(&mut self) {
        let state = match self.stage.current() {
            Some(s) => s.to_string(),
            None    => "-".to_string(),
        };
        let field = self.stage.field();
        self.status = format!(
            "state: {}   glyph: {}/{}   hand: {}",
            state,
            field.active_count(),
            field.len(),
            if self.hand_seen { "yes" } else { "no" },
        );
    }

    pub fn stage(&self) -> &Stage { &self.stage }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer, the landmark source (simulation by default,
/// hardware with `--features leap`), and drives the event/render loop.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // ── Sim key channel ───────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();

    #[cfg(not(feature = "leap"))]
    let tracker_rx = spawn_landmark_source(
        crate::tracker::SimLandmarkSource::new(sim_rx, cfg.tunables.seed),
    );
    #[cfg(feature = "leap")]
    let tracker_rx = {
        drop(sim_rx);
        spawn_landmark_source(crate::tracker::LeapLandmarkSource)
    };

    // ── Visualizer (owns the window and the sim key sender) ──────────────
    let mut vis = Visualizer::new(sim_tx).context("starting visualizer")?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app   = App::new(cfg.tunables);
    let mut clock = TickClock::new(cfg.tick_hz, cfg.max_catch_up);
    let mut last  = Instant::now();

    log::info!("running at {} Hz physics", cfg.tick_hz);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Poll window input → sim keys
        if !vis.poll_input() { break; }

        // 2. Drain tracker events
        loop {
            match tracker_rx.try_recv() {
                Ok(TrackerEvent::Landmarks(hand)) => { app.handle_landmarks(hand.as_ref()); }
                Ok(TrackerEvent::Quit)            => return Ok(()),
                Ok(TrackerEvent::Failed(msg))     => bail!("hand tracker stopped: {}", msg),
                Err(TryRecvError::Empty)          => break,
                Err(TryRecvError::Disconnected)   => return Ok(()),
            }
        }

        // 3. Fixed-rate physics
        let now = Instant::now();
        for _ in 0..clock.advance(now - last) {
            app.tick();
        }
        last = now;

        // 4. Render
        let stage = app.stage();
        vis.render(&stage.frame(), stage.field().config(), stage.palette(), &app.status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
