//! Byte-Frequency Sampling
//!
//! Turns the most recent transform window into one byte per frequency bin:
//! exponential smoothing over the normalized magnitudes, decibel conversion
//! and a linear scale from the decibel floor/ceiling into `0..=255`.
use crate::analyzer;

/// Builder for ByteFrequencySampler
#[derive(Debug, Default)]
pub struct ByteFrequencyBuilder {
    /// Transform size, bin count is half of this
    ///
    /// Can also be set from config as `"audio.fourier.length"`.
    pub fft_size: Option<usize>,

    /// Smoothing factor blending successive frames, `0.0 <= tau < 1.0`
    ///
    /// `0.0` disables smoothing.  Can also be set from config as
    /// `"audio.smoothing"`.
    pub smoothing: Option<f32>,

    /// Decibel floor, maps to byte value 0
    ///
    /// Can also be set from config as `"audio.min_db"`.
    pub min_db: Option<f32>,

    /// Decibel ceiling, maps to byte value 255
    ///
    /// Can also be set from config as `"audio.max_db"`.
    pub max_db: Option<f32>,

    /// Rate of the played data
    ///
    /// Can also be set from config as `"audio.rate"`.
    pub rate: Option<usize>,

    /// Window function for the transform
    ///
    /// Can also be set from config as `"audio.fourier.window"`.
    pub window: Option<fn(usize) -> Vec<f32>>,
}

impl ByteFrequencyBuilder {
    /// Create a new ByteFrequencyBuilder
    pub fn new() -> ByteFrequencyBuilder {
        Default::default()
    }

    /// Set the transform size
    pub fn fft_size(&mut self, fft_size: usize) -> &mut ByteFrequencyBuilder {
        self.fft_size = Some(fft_size);
        self
    }

    /// Set the smoothing factor
    pub fn smoothing(&mut self, smoothing: f32) -> &mut ByteFrequencyBuilder {
        self.smoothing = Some(smoothing);
        self
    }

    /// Set the decibel floor
    pub fn min_db(&mut self, min_db: f32) -> &mut ByteFrequencyBuilder {
        self.min_db = Some(min_db);
        self
    }

    /// Set the decibel ceiling
    pub fn max_db(&mut self, max_db: f32) -> &mut ByteFrequencyBuilder {
        self.max_db = Some(max_db);
        self
    }

    /// Set the sample rate of the `SampleBuffer`
    pub fn rate(&mut self, rate: usize) -> &mut ByteFrequencyBuilder {
        self.rate = Some(rate);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut ByteFrequencyBuilder {
        self.window = Some(f);
        self
    }

    /// Plan the transform and prepare buffers
    pub fn plan(&mut self) -> ByteFrequencySampler {
        let smoothing = self
            .smoothing
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.smoothing", 0.5));
        let min_db = self
            .min_db
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.min_db", -140.0));
        let max_db = self
            .max_db
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.max_db", 0.0));

        assert!(
            smoothing >= 0.0 && smoothing < 1.0,
            "Smoothing factor out of range!"
        );
        assert!(min_db < max_db, "Decibel floor above ceiling!");

        let mut fourier = analyzer::FourierBuilder::new();
        if let Some(fft_size) = self.fft_size {
            fourier.length(fft_size);
        }
        if let Some(window) = self.window {
            fourier.window(window);
        }
        if let Some(rate) = self.rate {
            fourier.rate(rate);
        }
        let fourier = fourier.plan();

        let sampler = ByteFrequencySampler {
            smoothed: vec![0.0; fourier.buckets()],
            fourier,
            smoothing,
            min_db,
            max_db,
        };

        log::debug!("ByteFrequencySampler({:p}):", &sampler);
        log::debug!("    Bin Count           = {:8}", sampler.bin_count());
        log::debug!("    Smoothing           = {:8.3}", smoothing);
        log::debug!("    Decibel Range       = {:6.1} .. {:4.1} dB", min_db, max_db);

        sampler
    }
}

/// Byte-Frequency Sampler
///
/// # Example
/// ```
/// # use bars_core::analyzer;
/// let mut sampler = analyzer::ByteFrequencyBuilder::new()
///     .fft_size(2048)
///     .smoothing(0.5)
///     .min_db(-140.0)
///     .max_db(0.0)
///     .rate(44100)
///     .window(analyzer::window::blackman)
///     .plan();
///
/// let buf = analyzer::SampleBuffer::new(4096, 44100);
/// let mut freqs = vec![0u8; sampler.bin_count()];
///
/// assert!(sampler.sample_into(&buf, &mut freqs));
/// ```
#[derive(Debug)]
pub struct ByteFrequencySampler {
    fourier: analyzer::FourierAnalyzer,
    smoothed: Vec<analyzer::SignalStrength>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl ByteFrequencySampler {
    /// Number of frequency bins, half the transform size
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.fourier.buckets()
    }

    /// Refresh `out` with the current byte-scaled magnitude per bin
    ///
    /// Returns `false` without touching `out` or the smoothing state when the
    /// ring does not hold a full transform window yet.  The caller skips the
    /// tick in that case.
    ///
    /// Panics if `out` is not exactly `bin_count()` long.
    pub fn sample_into(&mut self, buf: &analyzer::SampleBuffer, out: &mut [u8]) -> bool {
        if buf.len() < self.fourier.length() {
            return false;
        }

        assert_eq!(
            out.len(),
            self.bin_count(),
            "Output buffer does not match bin count!"
        );

        let spectrum = self.fourier.analyze(buf);

        for (s, m) in self.smoothed.iter_mut().zip(spectrum.iter()) {
            *s = self.smoothing * *s + (1.0 - self.smoothing) * *m;
        }

        let span = self.max_db - self.min_db;
        for (o, s) in out.iter_mut().zip(self.smoothed.iter()) {
            // Zero magnitude maps far below any sensible floor
            let db = 20.0 * s.max(1e-20).log10();
            let scaled = 255.0 * (db - self.min_db) / span;
            *o = scaled.max(0.0).min(255.0) as u8;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::window;

    fn sampler(fft_size: usize, smoothing: f32, rate: usize) -> ByteFrequencySampler {
        ByteFrequencyBuilder::new()
            .fft_size(fft_size)
            .smoothing(smoothing)
            .min_db(-140.0)
            .max_db(0.0)
            .rate(rate)
            .window(window::blackman)
            .plan()
    }

    fn sine_frames(n: usize, freq: f32, rate: usize) -> Vec<[f32; 2]> {
        (0..n)
            .map(|i| {
                let s = (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin();
                [s, s]
            })
            .collect()
    }

    #[test]
    fn test_bin_count() {
        let sampler = sampler(2048, 0.5, 44100);

        assert_eq!(sampler.bin_count(), 1024);
    }

    #[test]
    fn test_silence_is_floor() {
        let mut sampler = sampler(512, 0.0, 8000);
        let buf = analyzer::SampleBuffer::new(1024, 8000);
        let mut out = vec![0xffu8; sampler.bin_count()];

        assert!(sampler.sample_into(&buf, &mut out));
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tone_peaks_at_bin() {
        let rate = 8000;
        let mut sampler = sampler(512, 0.0, rate);
        let buf = analyzer::SampleBuffer::new(1024, rate);
        buf.push(&sine_frames(1024, 500.0, rate));

        let mut out = vec![0u8; sampler.bin_count()];
        assert!(sampler.sample_into(&buf, &mut out));

        // 500 Hz lands on bucket 32 at this rate and transform size
        let peak = (0..out.len()).max_by_key(|&i| out[i]).unwrap();
        assert_eq!(peak, 32);
        assert!(out[peak] > 200, "peak byte was {}", out[peak]);
    }

    #[test]
    fn test_not_ready_skips() {
        let mut sampler = sampler(512, 0.5, 8000);
        // Ring smaller than one transform window
        let buf = analyzer::SampleBuffer::new(256, 8000);
        let mut out = vec![0xaau8; sampler.bin_count()];

        assert!(!sampler.sample_into(&buf, &mut out));
        assert!(out.iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn test_smoothing_decays() {
        let rate = 8000;
        let mut sampler = sampler(512, 0.5, rate);
        let buf = analyzer::SampleBuffer::new(1024, rate);
        buf.push(&sine_frames(1024, 500.0, rate));

        let mut loud = vec![0u8; sampler.bin_count()];
        assert!(sampler.sample_into(&buf, &mut loud));
        assert!(sampler.sample_into(&buf, &mut loud));

        // Replace the tone with silence, the smoothed value must decay
        // instead of dropping straight to the floor
        buf.push(&vec![[0.0; 2]; 1024]);
        let mut faded = vec![0u8; sampler.bin_count()];
        assert!(sampler.sample_into(&buf, &mut faded));

        assert!(faded[32] > 0);
        assert!(faded[32] < loud[32]);
    }

    #[test]
    #[should_panic]
    fn test_wrong_output_length() {
        let mut sampler = sampler(512, 0.5, 8000);
        let buf = analyzer::SampleBuffer::new(1024, 8000);
        let mut out = vec![0u8; 7];

        sampler.sample_into(&buf, &mut out);
    }

    #[test]
    #[should_panic]
    fn test_bad_smoothing() {
        ByteFrequencyBuilder::new()
            .fft_size(512)
            .smoothing(1.0)
            .min_db(-140.0)
            .max_db(0.0)
            .rate(8000)
            .window(window::blackman)
            .plan();
    }
}
