#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Thin replay harness around `pinch_core::Detector`.
//!
//! No persistence, no transport, no charts: this exists only to give the
//! detection core a runnable entry point for manual and scripted testing.

mod cli;
mod frames;
mod tracing_setup;

use std::fs;
use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use pinch_core::{Detector, PinchConfig, PinchEvent};
use pinch_traits::FrameSource;
use serde_json::json;

use cli::{Cli, Commands};
use frames::CsvFrameSource;
use tracing_setup::init_tracing;

fn main() -> eyre::Result<()> {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    init_tracing(cli.json, &cli.log_level);

    match cli.cmd {
        Commands::Replay {
            config,
            templates,
            frames,
        } => run_replay(config.as_deref(), &templates, &frames),
        Commands::InspectTemplates { templates } => run_inspect_templates(&templates),
    }
}

fn load_config(path: Option<&Path>) -> eyre::Result<PinchConfig> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p).wrap_err_with(|| format!("read config {p:?}"))?;
            pinch_config::TomlConfig::load(&text).wrap_err("invalid configuration")
        }
        None => Ok(PinchConfig::default()),
    }
}

fn load_templates(path: &Path) -> eyre::Result<Vec<pinch_core::PinchTemplate>> {
    let text =
        fs::read_to_string(path).wrap_err_with(|| format!("read template bundle {path:?}"))?;
    pinch_config::load_template_bundle(&text).wrap_err("invalid template bundle")
}

fn run_replay(config: Option<&Path>, templates: &Path, frames_path: &Path) -> eyre::Result<()> {
    let cfg = load_config(config)?;
    let templates = load_templates(templates)?;
    let mut detector = Detector::new(cfg, templates)
        .map_err(|e| eyre::eyre!("{e}"))
        .wrap_err("construct detector")?;

    let mut source = CsvFrameSource::load(frames_path)?;
    let mut last_t = None;
    while let Some(frame) = source.next().map_err(|e| eyre::eyre!("{e}"))? {
        last_t = Some(frame.t);
        match detector.process(frame) {
            Ok(Some(event)) => emit_event(&event),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "frame rejected"),
        }
    }
    if let Some(t) = last_t {
        if let Some(event) = detector.finalize(t) {
            emit_event(&event);
        }
    }
    Ok(())
}

fn emit_event(event: &PinchEvent) {
    println!(
        "{}",
        json!({
            "t_peak": event.t_peak,
            "t_start": event.t_start,
            "t_end": event.t_end,
            "confidence": event.confidence,
            "raw_gate_score": event.raw_gate_score,
            "ncc_score": event.ncc_score,
        })
    );
}

fn run_inspect_templates(path: &Path) -> eyre::Result<()> {
    let templates = load_templates(path)?;
    let l = templates.first().map(|t| t.data.len()).unwrap_or(0);
    println!(
        "{}",
        json!({
            "template_count": templates.len(),
            "vector_length": l,
            "expanded_bank_size": templates.len() * pinch_core::TEMPLATE_SCALES.len(),
        })
    );
    Ok(())
}
