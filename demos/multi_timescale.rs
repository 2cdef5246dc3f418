//! # Multi-Timescale Metering
//!
//! RMS levels over 50 ms, 400 ms and 3 s from one shared history, with the
//! loudest of the three as a "max" reading.
//!
//! **Concepts:** `MeterBuilder`, `MovingAverageSet`, `add_input_get_max`,
//! reconfiguring a running meter
//!
//! ```bash
//! RUST_LOG=debug cargo run --example multi_timescale
//! ```

use ballast::prelude::*;

const SAMPLE_RATE: f64 = 48_000.0;

fn ms(ms: f64) -> usize {
    (SAMPLE_RATE * ms / 1000.0) as usize
}

fn db(power: f64) -> f64 {
    10.0 * power.max(1e-12).log10()
}

fn main() -> ballast::Result<()> {
    tracing_subscriber::fmt::init();

    let mut meter = MeterBuilder::new()
        .max_window_samples(ms(3000.0))
        .emd_samples(10 * ms(3000.0))
        .max_windows(3)
        .window(ms(50.0), 1.0)
        .window(ms(400.0), 1.0)
        .window(ms(3000.0), 1.0)
        .build_set()?;

    // 1 s of a quiet tone, 200 ms burst, 2 s of silence
    let segments = [(1000.0, 0.1), (200.0, 0.9), (2000.0, 0.0)];
    let mut t = 0usize;
    for (duration, amplitude) in segments {
        for _ in 0..ms(duration) {
            let x = amplitude * (2.0 * std::f64::consts::PI * 440.0 * t as f64 / SAMPLE_RATE).sin();
            let loudest = meter.add_input_get_max(x * x, 1e-12);
            t += 1;

            if t % ms(250.0) == 0 {
                println!(
                    "[{:5.2} s] 50 ms: {:6.1} dB | 400 ms: {:6.1} dB | 3 s: {:6.1} dB | max: {:6.1} dB",
                    t as f64 / SAMPLE_RATE,
                    db(meter.average(0)?),
                    db(meter.average(1)?),
                    db(meter.average(2)?),
                    db(loudest)
                );
            }
        }
    }

    // Drop to the short window only; the history shrinks with it
    meter.set_used_windows(1)?;
    println!(
        "Short window only: history live length {} of {} samples",
        meter.history().max_window_samples(),
        meter.max_window_samples()
    );

    Ok(())
}
