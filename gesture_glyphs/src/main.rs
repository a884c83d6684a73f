//! gesture_glyphs: interactive entry point.

use gesture_glyphs::app::{run, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Gesture Glyphs — Hand-Driven Particle Text          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    let cfg = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Usage: gesture_glyphs [--seed N] [--particles N] [--balloons N] [--flowers N] [--hz N]");
            std::process::exit(1);
        }
    };

    println!("  {} particles, {} balloons, {} flowers",
        cfg.tunables.field.particle_count,
        cfg.tunables.decor.balloon_count,
        cfg.tunables.decor.flower_count);
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
