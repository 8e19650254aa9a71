//! Fourier Analysis
use super::Sample;
use crate::analyzer;

/// Window functions
///
/// A window-function takes a size and returns a `Vec` of that length filled
/// with the precomputed window coefficients.  Blackman is the default because
/// the byte-frequency contract specifies it.
pub mod window {
    /// Blackman Window
    pub fn blackman(size: usize) -> Vec<f32> {
        apodize::blackman_iter(size).map(|f| f as f32).collect()
    }

    /// Hamming Window
    pub fn hamming(size: usize) -> Vec<f32> {
        apodize::hamming_iter(size).map(|f| f as f32).collect()
    }

    /// Hanning Window
    pub fn hanning(size: usize) -> Vec<f32> {
        apodize::hanning_iter(size).map(|f| f as f32).collect()
    }

    /// No window function / Rectangle window
    pub fn none(size: usize) -> Vec<f32> {
        vec![1.0; size]
    }

    /// Get the window function for the specified name
    pub fn from_str(name: &str) -> Option<fn(usize) -> Vec<f32>> {
        match name {
            "blackman" => Some(blackman),
            "hamming" => Some(hamming),
            "hanning" => Some(hanning),
            "none" => Some(none),
            _ => None,
        }
    }
}

/// Builder for FourierAnalyzer
#[derive(Debug, Default)]
pub struct FourierBuilder {
    /// Length of the fourier transform
    ///
    /// Most efficient if this is a power of two
    ///
    /// Can also be set from config as `"audio.fourier.length"`.
    pub length: Option<usize>,

    /// Window Function
    ///
    /// A few window functions are defined in the [`window`](window/index.html) module.
    ///
    /// Can also be set from config as `"audio.fourier.window"`.
    pub window: Option<fn(usize) -> Vec<f32>>,

    /// Rate of the played data
    ///
    /// `FourierAnalyzer` will panic if the `SampleBuffer`'s rate does not match.
    ///
    /// Can also be set from config as `"audio.rate"`.
    pub rate: Option<usize>,
}

impl FourierBuilder {
    /// Create a new FourierBuilder
    pub fn new() -> FourierBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn length(&mut self, length: usize) -> &mut FourierBuilder {
        self.length = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut FourierBuilder {
        self.window = Some(f);
        self
    }

    /// Set the sample rate of the `SampleBuffer`
    pub fn rate(&mut self, rate: usize) -> &mut FourierBuilder {
        self.rate = Some(rate);
        self
    }

    /// Plan the fourier transform and prepare buffers
    pub fn plan(&mut self) -> FourierAnalyzer {
        let length = self
            .length
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.length", 2048));
        let window = (self.window.unwrap_or_else(|| {
            window::from_str(&crate::CONFIG.get_or("audio.fourier.window", "blackman".to_string()))
                .expect("Selected window type not found!")
        }))(length);
        let rate = self
            .rate
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.rate", 44100));

        FourierAnalyzer::new(length, window, rate)
    }
}

/// Fourier Analyzer
///
/// Mixes the stereo ring down to mono, applies the window and yields
/// normalized magnitudes (`|X[k]| / N`) per frequency bin.
///
/// # Example
/// ```
/// # use bars_core::analyzer::fourier::*;
/// let analyzer = FourierBuilder::new()
///     .length(2048)
///     .window(window::blackman)
///     .rate(44100)
///     .plan();
/// ```
#[derive(Clone)]
pub struct FourierAnalyzer {
    length: usize,
    buckets: usize,
    window: Vec<Sample>,

    rate: usize,
    lowest: analyzer::Frequency,
    highest: analyzer::Frequency,

    fft: std::sync::Arc<dyn rustfft::FFT<Sample>>,

    input: Vec<rustfft::num_complex::Complex<Sample>>,
    output: Vec<rustfft::num_complex::Complex<Sample>>,

    spectrum: analyzer::Spectrum<Vec<analyzer::SignalStrength>>,
}

impl std::fmt::Debug for FourierAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FourierAnalyzer {{ length: {:?}, rate: {:?}, lowest: {:?}, highest: {:?} }}",
            self.length, self.rate, self.lowest, self.highest,
        )
    }
}

impl FourierAnalyzer {
    fn new(length: usize, window: Vec<f32>, rate: usize) -> FourierAnalyzer {
        use rustfft::num_traits::Zero;

        let fft = rustfft::FFTplanner::new(false).plan_fft(length);
        let buckets = length / 2;

        let lowest = rate as f32 / length as f32;
        let highest = rate as f32 / 2.0;

        let fa = FourierAnalyzer {
            length,
            buckets,
            window,

            rate,
            lowest,
            highest,

            fft,

            input: Vec::with_capacity(length),
            output: vec![rustfft::num_complex::Complex::zero(); length],

            spectrum: analyzer::Spectrum::new(vec![0.0; buckets]),
        };

        log::debug!("FourierAnalyzer({:p}):", &fa);
        log::debug!("    Fourier Length      = {:8}", length);
        log::debug!("    Buckets             = {:8}", buckets);
        log::debug!("    Rate                = {:8}", rate);
        log::debug!("    Lowest  Frequency   = {:8.3} Hz", lowest);
        log::debug!("    Highest Frequency   = {:8.3} Hz", highest);

        fa
    }

    /// Return the number of buckets
    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Return the transform length
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Analyze the most recent transform window of a `SampleBuffer`
    ///
    /// The buffer must hold at least `length` frames, the byte-frequency
    /// sampler guards for that before calling in.
    pub fn analyze(
        &mut self,
        buf: &analyzer::SampleBuffer,
    ) -> analyzer::Spectrum<&[analyzer::SignalStrength]> {
        log::trace!("FourierAnalyzer({:p}): Analyzing ...", &self);

        assert_eq!(
            buf.rate(),
            self.rate,
            "Samplerate of buffer does not match!"
        );

        self.input.clear();
        for ([l, r], window) in buf.iter(self.length).zip(self.window.iter()) {
            self.input
                .push(rustfft::num_complex::Complex::new((l + r) * 0.5 * window, 0.0));
        }

        debug_assert_eq!(self.input.len(), self.length);

        self.fft.process(&mut self.input, &mut self.output);

        let norm = 1.0 / self.length as f32;
        for (s, o) in self.spectrum.iter_mut().zip(self.output.iter()) {
            *s = o.norm() * norm;
        }

        self.spectrum.as_ref()
    }
}
