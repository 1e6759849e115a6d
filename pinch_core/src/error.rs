//! Error types for template bank construction and frame processing.

use thiserror::Error;

/// Errors raised while building a [`crate::template_bank::TemplateBank`] or
/// validating a [`crate::config::PinchConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("template bundle is empty")]
    EmptyTemplateBundle,

    #[error(
        "template {template_index} has length {actual}, expected {expected} (all templates must share one length)"
    )]
    TemplateLengthMismatch {
        template_index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Errors raised while feeding frames to [`crate::detector::Detector`].
#[derive(Debug, Error, PartialEq)]
pub enum DetectorError {
    #[error("frame rejected: {0}")]
    InvalidFrame(&'static str),
}
