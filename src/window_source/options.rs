use serde::Deserialize;

/// Options controlling the multiscale negative scan.
#[derive(Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Fraction of the window size the scan position advances by per step.
    pub step_factor: f32,
    /// Multiplicative scale increment applied once a scale level is exhausted.
    pub scale_factor: f32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            step_factor: 0.5,
            scale_factor: std::f32::consts::SQRT_2,
        }
    }
}

impl ScanOptions {
    pub fn with_step_factor(mut self, step_factor: f32) -> Self {
        self.step_factor = step_factor;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

impl std::fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOptions")
            .field("step_factor", &self.step_factor)
            .field("scale_factor", &self.scale_factor)
            .finish()
    }
}
