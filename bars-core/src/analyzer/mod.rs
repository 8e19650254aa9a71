pub mod bytefreq;
pub mod fourier;
pub mod samples;
pub mod spectrum;

pub use self::bytefreq::{ByteFrequencyBuilder, ByteFrequencySampler};
pub use self::fourier::{window, FourierAnalyzer, FourierBuilder};
pub use self::samples::{Sample, SampleBuffer};
pub use self::spectrum::{Frequency, SignalStrength, Spectrum};
