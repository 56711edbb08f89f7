#![doc = include_str!("../README.md")]

mod config;
mod output;
mod telemetry;

use std::{
    io::{self, BufWriter, Write},
    thread::scope,
    time::Instant,
};

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Config, Mode};
use shortid::ShortId;
use telemetry::init_telemetry;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;
    let config = Config::try_from(args)?;

    debug!(generator = %config.generator, "configured");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &config.mode {
        Mode::Decode { id } => output::write_decoded(&mut out, &config.generator, id, config.json)?,
        Mode::Generate { count, threads } => {
            let start = Instant::now();
            let ids = generate(&config.generator, *count, *threads)?;
            info!(
                count = ids.len(),
                threads,
                worker = config.generator.worker(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "generated ids"
            );
            output::write_ids(&mut out, &config.generator, &ids, config.json)?;
        }
    }

    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Generates `count` IDs from `threads` threads sharing one generator.
fn generate(generator: &ShortId, count: usize, threads: usize) -> anyhow::Result<Vec<String>> {
    let per_thread = count.div_ceil(threads);

    let batches = scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|index| {
                let take = per_thread.min(count.saturating_sub(index * per_thread));
                s.spawn(move || {
                    (0..take)
                        .map(|_| generator.generate())
                        .collect::<shortid::Result<Vec<_>>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("generator thread panicked"))
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let mut ids = Vec::with_capacity(count);
    for batch in batches {
        ids.extend(batch.context("id generation failed")?);
    }
    Ok(ids)
}
