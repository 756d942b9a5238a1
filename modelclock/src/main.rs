use anyhow::Result;
use colored::Colorize;
use modelclock::prelude::*;
use modelclock::ENGINE_NAME;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const FRAME_DT: f64 = 1.0 / 30.0;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    // 2. Build the clock: one model second per real second, bouncing
    //    inside a two-second window.
    let config = TimebaseConfig {
        t0: 0.0,
        rate: 1.0,
        wrap: WrapMode::PingPong,
        window: TimeWindow::new(0.0, 2.0),
        ..TimebaseConfig::default()
    };
    let mut clock = Timebase::new(config)?;

    // 3. Register cues against the shared clock.
    let impacts = Arc::new(AtomicU32::new(0));
    let impact_count = impacts.clone();
    clock.on(1.0, move |t| {
        let n = impact_count.fetch_add(1, Ordering::Relaxed) + 1;
        info!("[CUE] impact #{} at t = {:.2} s", n, t);
    });
    clock.on_range(
        0.5,
        1.5,
        |t| info!("[RANGE] entered mid-flight at t = {:.3} s", t),
        |t| info!("[RANGE] left mid-flight at t = {:.3} s", t),
    );

    // 4. A projectile positioned by model time, mapped into scene units.
    let coords = SceneCoords::new(1.0, (0.0, 3.0), 1.0, -1.0)?;
    let mut ball = coords.scene_position_fn(|t| (0.4 * t, 4.9 * t * t));

    // 5. Drive the clock at ~30 fps until Ctrl+C.
    info!(
        "{} running in ping-pong over [0, 2]. Press Ctrl+C to stop.",
        ENGINE_NAME.cyan()
    );
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(FRAME_DT));
    let mut frame: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                clock.advance(FRAME_DT);
                frame += 1;
                if frame % 30 == 0 {
                    let t = clock.model_time();
                    let (x, y) = ball(t);
                    info!("t = {:.3} s  ball at scene ({:.2}, {:.2})", t, x, y);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!(
        "Stopped after {} frames and {} impacts.",
        frame,
        impacts.load(Ordering::Relaxed)
    );
    Ok(())
}
