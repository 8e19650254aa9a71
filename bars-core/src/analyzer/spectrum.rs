//! Spectrum Storage Type

/// Type Alias for Frequencies
pub type Frequency = f32;

/// Type Alias for Signal Strengths
pub type SignalStrength = f32;

/// Trait for types that can be used as storage for a spectrum
pub trait Storage: std::ops::Deref<Target = [SignalStrength]> {}

/// Trait for types that can be used as mutable storage for a spectrum
pub trait StorageMut: std::ops::Deref<Target = [SignalStrength]> + std::ops::DerefMut {}

impl<T> Storage for T where T: std::ops::Deref<Target = [SignalStrength]> {}

impl<T> StorageMut for T where T: Storage + std::ops::DerefMut {}

/// Magnitude per frequency bin
///
/// Generic over its storage so the analyzer can hand out borrowed views of
/// its transform buffer without copying.
#[derive(Debug, Clone)]
pub struct Spectrum<S: Storage> {
    buckets: S,
}

impl<S: Storage> std::ops::Index<usize> for Spectrum<S> {
    type Output = SignalStrength;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buckets[index]
    }
}

impl<S: Storage> Spectrum<S> {
    /// Create a new spectrum over a storage buffer
    ///
    /// # Example
    /// ```
    /// # use bars_core::analyzer;
    /// let spectrum = analyzer::Spectrum::new(vec![0.0; 128]);
    /// ```
    pub fn new(data: S) -> Spectrum<S> {
        Spectrum { buckets: data }
    }

    /// Iterate over the buckets of this spectrum
    pub fn iter<'a>(&'a self) -> std::slice::Iter<'a, SignalStrength> {
        self.buckets.iter()
    }

    /// Return the number of buckets in this spectrum
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn as_ref<'a>(&'a self) -> Spectrum<&'a [SignalStrength]> {
        Spectrum {
            buckets: &self.buckets,
        }
    }

    /// Return the highest signal strengh in this spectrum
    pub fn max(&self) -> SignalStrength {
        *self
            .buckets
            .iter()
            .max_by(|a, b| a.partial_cmp(b).unwrap())
            .unwrap()
    }
}

impl<S: StorageMut> Spectrum<S> {
    /// Iterate over this spectrums buckets mutably
    pub fn iter_mut<'a>(&'a mut self) -> std::slice::IterMut<'a, SignalStrength> {
        self.buckets.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_shares_data() {
        let spectrum = Spectrum::new((0..64).map(|x| x as f32).collect::<Vec<_>>());
        let view = spectrum.as_ref();

        assert_eq!(view.len(), 64);
        assert_eq!(view[63], 63.0);
        assert_eq!(view.max(), spectrum.max());
    }

    #[test]
    fn test_max() {
        let spectrum = Spectrum::new(vec![0.1, 0.9, 0.3]);

        assert_eq!(spectrum.max(), 0.9);
    }

    #[test]
    fn test_write_through_iter_mut() {
        let mut spectrum = Spectrum::new(vec![0.0; 8]);
        for (i, s) in spectrum.iter_mut().enumerate() {
            *s = i as f32;
        }

        assert_eq!(spectrum.iter().sum::<f32>(), 28.0);
        assert_eq!(spectrum[7], 7.0);
    }
}
