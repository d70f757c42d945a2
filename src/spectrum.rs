use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::buffer::SampleRing;

/// Byte mapping range: -100 dB and below is 0, -30 dB and above is 255.
pub const MIN_DB: f32 = -100.0;
pub const MAX_DB: f32 = -30.0;
/// Exponential smoothing factor applied to bin magnitudes across frames.
pub const SMOOTHING: f32 = 0.8;

pub fn hann(n: usize) -> Vec<f32> {
    // degenerate sizes get a finite window instead of 0/0
    let denom = n.saturating_sub(1).max(1) as f32;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
        .collect()
}

/// Linear dB-to-byte mapping, truncated and clamped to 0..=255.
#[inline]
pub fn byte_from_db(db: f32) -> u8 {
    let scaled = (db - MIN_DB) / (MAX_DB - MIN_DB) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}

/// Turns the most recent capture window into byte magnitudes, one per
/// frequency bin: Hann window, forward FFT, per-bin smoothing, then the
/// dB-to-byte mapping above. Refreshed in place once per frame; the bins
/// keep their last value while the ring is underfilled.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    tail: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smooth: Vec<f32>,
    bins: Vec<u8>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let half = fft_size / 2;

        Self {
            fft,
            fft_size,
            window: hann(fft_size),
            tail: Vec::with_capacity(fft_size),
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smooth: vec![0.0; half],
            bins: vec![0; half],
        }
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Drops smoothing state, so a restarted capture session does not
    /// inherit the tail of the previous one.
    pub fn reset(&mut self) {
        self.smooth.fill(0.0);
        self.bins.fill(0);
    }

    /// Recomputes the bins from the latest `fft_size` samples. Returns
    /// false without touching the bins when the ring has not yet filled
    /// one analysis window.
    pub fn refresh(&mut self, ring: &SampleRing) -> bool {
        if !ring.copy_last_n_into(self.fft_size, &mut self.tail) {
            return false;
        }

        for (i, (&x, &w)) in self.tail.iter().zip(&self.window).enumerate() {
            self.scratch[i] = Complex::new(x * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 1.0 / self.fft_size as f32;
        for i in 0..self.bins.len() {
            let mag = self.scratch[i].norm() * norm;
            self.smooth[i] = SMOOTHING * self.smooth[i] + (1.0 - SMOOTHING) * mag;
            let db = 20.0 * self.smooth[i].max(1e-12).log10();
            self.bins[i] = byte_from_db(db);
        }

        true
    }
}
