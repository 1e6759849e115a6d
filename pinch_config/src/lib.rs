#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! TOML config loading and JSON template-bundle loading for the detector.
//!
//! - `TomlConfig` mirrors `pinch_core::PinchConfig` field-for-field and
//!   deserializes from TOML with `#[serde(default)]`, the same pattern
//!   `doser_config::Config` uses for the dosing engine's settings.
//! - `TemplateBundle` deserializes the JSON array described by the
//!   template-bundle wire format and converts into `Vec<pinch_core::PinchTemplate>`.

use pinch_core::PinchConfig;
use serde::Deserialize;

fn default_fs() -> f32 {
    50.0
}
fn default_low_hz() -> f32 {
    3.0
}
fn default_high_hz() -> f32 {
    20.0
}
fn default_w_a() -> f32 {
    1.0
}
fn default_w_g() -> f32 {
    1.5
}
fn default_mad_win_s() -> f32 {
    3.0
}
fn default_k_gate() -> f32 {
    3.5
}
fn default_refractory_ms() -> u32 {
    150
}
fn default_ncc_thresh() -> f32 {
    0.60
}
fn default_ignore_start_ms() -> u32 {
    200
}
fn default_ignore_end_ms() -> u32 {
    200
}
fn default_gyro_veto_rad_s() -> f32 {
    3.0
}
fn default_gyro_hold_ms() -> u32 {
    50
}
fn default_min_width_ms() -> u32 {
    70
}
fn default_max_width_ms() -> u32 {
    350
}
fn default_template_validation() -> bool {
    true
}

/// TOML-deserializable mirror of [`pinch_core::PinchConfig`], the
/// "configuration provider" collaborator at the detector's boundary.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    #[serde(default = "default_fs")]
    pub fs: f32,
    #[serde(default = "default_low_hz")]
    pub low_hz: f32,
    #[serde(default = "default_high_hz")]
    pub high_hz: f32,
    #[serde(default = "default_w_a")]
    pub w_a: f32,
    #[serde(default = "default_w_g")]
    pub w_g: f32,
    #[serde(default = "default_mad_win_s")]
    pub mad_win_s: f32,
    #[serde(default = "default_k_gate")]
    pub k_gate: f32,
    #[serde(alias = "refractory", default = "default_refractory_ms")]
    pub refractory_ms: u32,
    #[serde(default = "default_ncc_thresh")]
    pub ncc_thresh: f32,
    #[serde(default = "default_ignore_start_ms")]
    pub ignore_start_ms: u32,
    #[serde(default = "default_ignore_end_ms")]
    pub ignore_end_ms: u32,
    #[serde(default = "default_gyro_veto_rad_s")]
    pub gyro_veto_rad_s: f32,
    #[serde(default = "default_gyro_hold_ms")]
    pub gyro_hold_ms: u32,
    #[serde(default)]
    pub amp_surplus_sigma: f32,
    #[serde(default)]
    pub isi_ms: u32,
    #[serde(default = "default_template_validation")]
    pub template_validation: bool,
    #[serde(default = "default_min_width_ms")]
    pub min_width_ms: u32,
    #[serde(default = "default_max_width_ms")]
    pub max_width_ms: u32,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self::from(&PinchConfig::default())
    }
}

impl From<&PinchConfig> for TomlConfig {
    fn from(c: &PinchConfig) -> Self {
        Self {
            fs: c.fs,
            low_hz: c.low_hz,
            high_hz: c.high_hz,
            w_a: c.w_a,
            w_g: c.w_g,
            mad_win_s: c.mad_win_s,
            k_gate: c.k_gate,
            refractory_ms: c.refractory_ms,
            ncc_thresh: c.ncc_thresh,
            ignore_start_ms: c.ignore_start_ms,
            ignore_end_ms: c.ignore_end_ms,
            gyro_veto_rad_s: c.gyro_veto_rad_s,
            gyro_hold_ms: c.gyro_hold_ms,
            amp_surplus_sigma: c.amp_surplus_sigma,
            isi_ms: c.isi_ms,
            template_validation: c.template_validation,
            min_width_ms: c.min_width_ms,
            max_width_ms: c.max_width_ms,
        }
    }
}

impl From<&TomlConfig> for PinchConfig {
    fn from(c: &TomlConfig) -> Self {
        Self {
            fs: c.fs,
            low_hz: c.low_hz,
            high_hz: c.high_hz,
            w_a: c.w_a,
            w_g: c.w_g,
            mad_win_s: c.mad_win_s,
            k_gate: c.k_gate,
            refractory_ms: c.refractory_ms,
            ncc_thresh: c.ncc_thresh,
            ignore_start_ms: c.ignore_start_ms,
            ignore_end_ms: c.ignore_end_ms,
            gyro_veto_rad_s: c.gyro_veto_rad_s,
            gyro_hold_ms: c.gyro_hold_ms,
            amp_surplus_sigma: c.amp_surplus_sigma,
            isi_ms: c.isi_ms,
            template_validation: c.template_validation,
            min_width_ms: c.min_width_ms,
            max_width_ms: c.max_width_ms,
        }
    }
}

impl TomlConfig {
    /// Parses and range-checks in one step, mirroring `doser_config::load_toml`
    /// plus `Config::validate()`.
    pub fn load(s: &str) -> eyre::Result<PinchConfig> {
        let toml_cfg: TomlConfig = toml::from_str(s)
            .map_err(|e| eyre::eyre!("parse pinch config TOML: {e}"))?;
        let cfg = PinchConfig::from(&toml_cfg);
        cfg.validate()
            .map_err(|e| eyre::eyre!("invalid pinch config: {e}"))?;
        Ok(cfg)
    }
}

pub fn load_toml(s: &str) -> eyre::Result<PinchConfig> {
    TomlConfig::load(s)
}

/// One entry of the JSON template bundle, matching the wire schema:
/// `fs, preMs, postMs, vectorLength, data, channelsMeta, version`.
#[derive(Debug, Deserialize)]
struct TemplateDto {
    fs: f32,
    #[serde(rename = "preMs")]
    pre_ms: u32,
    #[serde(rename = "postMs")]
    post_ms: u32,
    #[serde(rename = "vectorLength")]
    vector_length: usize,
    data: Vec<f32>,
    #[serde(rename = "channelsMeta")]
    channels_meta: String,
    version: String,
}

impl TryFrom<TemplateDto> for pinch_core::PinchTemplate {
    type Error = eyre::Report;

    fn try_from(dto: TemplateDto) -> Result<Self, Self::Error> {
        if dto.data.len() != dto.vector_length {
            eyre::bail!(
                "template vectorLength {} does not match data length {}",
                dto.vector_length,
                dto.data.len()
            );
        }
        Ok(pinch_core::PinchTemplate {
            fs: dto.fs,
            pre_ms: dto.pre_ms,
            post_ms: dto.post_ms,
            data: dto.data,
            channel: dto.channels_meta,
            version: dto.version,
        })
    }
}

/// Loads an ordered template bundle from a JSON array.
pub fn load_template_bundle(s: &str) -> eyre::Result<Vec<pinch_core::PinchTemplate>> {
    let dtos: Vec<TemplateDto> =
        serde_json::from_str(s).map_err(|e| eyre::eyre!("parse template bundle JSON: {e}"))?;
    dtos.into_iter()
        .map(pinch_core::PinchTemplate::try_from)
        .collect()
}
