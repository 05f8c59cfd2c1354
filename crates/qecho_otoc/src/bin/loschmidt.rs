//! Build the diagonal-rectangle Loschmidt echo batch
//!
//! Usage:
//! ```bash
//! # Small sweep (sides 1..=3), written to loschmidt-small-v1.json.gz
//! RUST_LOG=info qecho-loschmidt
//!
//! # Sweep described by a JSON config
//! qecho-loschmidt config.json
//! ```

use anyhow::Context;
use log::info;
use qecho_exec::{render_tree, to_json_gzip};
use qecho_otoc::{
    all_diagonal_rect_executables, estimate_group_runtime_seconds, fit_summaries, summarize,
    LoschmidtConfig,
};
use qecho_runtime::{MockSampler, QuantumRuntime};
use std::path::Path;

fn load_config(path: &Path) -> anyhow::Result<LoschmidtConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => LoschmidtConfig::small(),
    };
    config.validate().context("invalid configuration")?;
    info!("{}", config);

    let program = all_diagonal_rect_executables(&config).context("building batch")?;
    to_json_gzip(&program, &config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;
    info!("wrote {}", config.output.display());

    for line in render_tree(&program).lines() {
        info!("{}", line);
    }

    let seconds = estimate_group_runtime_seconds(&program, &config.sampling)?;
    info!("Number {}", program.num_executables());
    info!("Minutes {:.2}", seconds / 60.0);

    if let Some(runtime_config) = config.runtime.clone() {
        let sampler = MockSampler::with_readout_error(config.readout_error)?.with_seed(config.seed);
        let mut runtime = QuantumRuntime::new(runtime_config, sampler)?;
        let results = runtime.execute(&program).context("mock run")?;

        let summaries = summarize(&results)?;
        for summary in &summaries {
            info!("{}", summary);
        }
        for (topology, fit) in fit_summaries(&summaries) {
            match fit {
                Ok(fit) => info!(
                    "{}: error/cycle {:.2}%",
                    topology,
                    fit.error_per_cycle() * 100.0
                ),
                Err(e) => info!("{}: no fit ({})", topology, e),
            }
        }
    }

    Ok(())
}
