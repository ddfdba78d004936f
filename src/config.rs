//! Engine configuration.
//!
//! Loaded from JSON (camelCase keys, every field optional) or built in code.

use crate::constants::{
    DEFAULT_CAPTURE_MARGIN, DEFAULT_DRAG_THRESHOLD, HOVER_DURATION_MS, PICKUP_DURATION_MS,
    SETTLE_DURATION_MS,
};
use crate::types::PreviewStrategy;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Modifier key that turns a drag into a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyModifier {
    #[default]
    Alt,
    Ctrl,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Preview strategy for items that do not pick their own
    pub preview_strategy: PreviewStrategy,
    /// Capture margin for zones that do not pick their own
    pub capture_margin: f32,
    /// Minimum spacing between tracking frames; `None` follows the host cadence
    pub debounce_frame_ms: Option<f64>,
    /// Pointer travel required before an armed item starts dragging
    pub drag_threshold: f32,
    pub pickup_duration_ms: f64,
    pub hover_duration_ms: f64,
    pub settle_duration_ms: f64,
    /// When false, transitions settle synchronously without the animator
    pub animate: bool,
    pub copy_modifier: CopyModifier,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_strategy: PreviewStrategy::Move,
            capture_margin: DEFAULT_CAPTURE_MARGIN,
            debounce_frame_ms: None,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            pickup_duration_ms: PICKUP_DURATION_MS,
            hover_duration_ms: HOVER_DURATION_MS,
            settle_duration_ms: SETTLE_DURATION_MS,
            animate: true,
            copy_modifier: CopyModifier::Alt,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid engine config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.capture_margin >= 0.0) {
            bail!("captureMargin must be >= 0, got {}", self.capture_margin);
        }
        if !(self.drag_threshold >= 0.0) {
            bail!("dragThreshold must be >= 0, got {}", self.drag_threshold);
        }
        if let Some(ms) = self.debounce_frame_ms {
            if !(ms >= 0.0) {
                bail!("debounceFrameMs must be >= 0, got {}", ms);
            }
        }
        for (name, ms) in [
            ("pickupDurationMs", self.pickup_duration_ms),
            ("hoverDurationMs", self.hover_duration_ms),
            ("settleDurationMs", self.settle_duration_ms),
        ] {
            if !(ms >= 0.0) {
                bail!("{} must be >= 0, got {}", name, ms);
            }
        }
        Ok(())
    }

    pub fn with_preview_strategy(mut self, strategy: PreviewStrategy) -> Self {
        self.preview_strategy = strategy;
        self
    }

    pub fn with_capture_margin(mut self, margin: f32) -> Self {
        self.capture_margin = margin;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_debounce_frame_ms(mut self, ms: f64) -> Self {
        self.debounce_frame_ms = Some(ms);
        self
    }

    pub fn without_animation(mut self) -> Self {
        self.animate = false;
        self
    }
}
