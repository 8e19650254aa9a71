//! Sample Transport
use std::collections;
use std::sync;

pub type Sample = f32;

type _SampleBuf = sync::Arc<parking_lot::Mutex<collections::VecDeque<[Sample; 2]>>>;

/// Ring of the most recent stereo sample frames
///
/// The playback tap is the only writer, the analyzer reads the tail.
/// Cloning is cheap and shares the underlying ring.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    buf: _SampleBuf,
    rate: usize,
}

impl SampleBuffer {
    /// Create a ring holding `size` frames at `rate` Hz, prefilled with silence
    pub fn new(size: usize, rate: usize) -> SampleBuffer {
        let buf = collections::VecDeque::from(vec![[0.0; 2]; size]);

        SampleBuffer {
            buf: sync::Arc::new(parking_lot::Mutex::new(buf)),
            rate,
        }
    }

    /// Sample rate of the frames in this ring
    #[inline]
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Number of frames currently held
    ///
    /// Constant after construction, pushes drop the oldest frames.
    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append frames, dropping the oldest ones to keep the size
    pub fn push(&self, new: &[[Sample; 2]]) {
        let mut lock = self.buf.lock();

        #[cfg(debug_assertions)]
        let debug_size = lock.len();

        for sample in new.iter() {
            lock.pop_front().expect("Failed to pop sample!");
            lock.push_back(*sample);
        }

        #[cfg(debug_assertions)]
        assert_eq!(debug_size, lock.len(), "Sample buffer size differs!");
    }

    /// Iterate over the most recent `size` frames
    ///
    /// Panics if `size` exceeds the ring size.  The ring stays locked for the
    /// lifetime of the iterator.
    pub fn iter<'a>(&'a self, size: usize) -> SampleIterator<'a> {
        let lock = self.buf.lock();
        assert!(size <= lock.len(), "Requested more frames than the ring holds!");

        SampleIterator {
            index: lock.len() - size,
            buf: lock,
        }
    }
}

pub struct SampleIterator<'a> {
    buf: parking_lot::MutexGuard<'a, collections::VecDeque<[Sample; 2]>>,
    index: usize,
}

impl Iterator for SampleIterator<'_> {
    type Item = [f32; 2];

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.buf.get(self.index).cloned();
        self.index += 1;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        let buf = SampleBuffer::new(16, 8000);

        buf.push(&[[1.0; 2]; 8]);

        assert_eq!(buf.len(), 16);
        assert_eq!(buf.iter(8).collect::<Vec<_>>(), vec![[1.0; 2]; 8]);
    }

    #[test]
    fn test_overflow() {
        let buf = SampleBuffer::new(16, 8000);

        buf.push(
            &(100..120)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );

        buf.push(
            &(0..32)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );

        assert_eq!(
            buf.iter(16).collect::<Vec<_>>(),
            (16..32)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn test_tail() {
        let buf = SampleBuffer::new(32, 8000);

        buf.push(
            &(0..32)
                .map(|i| [i as Sample, i as Sample])
                .collect::<Vec<_>>(),
        );

        assert_eq!(
            buf.iter(4).collect::<Vec<_>>(),
            &[[28.0; 2], [29.0; 2], [30.0; 2], [31.0; 2]],
        );
    }

    #[test]
    #[should_panic]
    fn test_oversized_read() {
        let buf = SampleBuffer::new(8, 8000);

        let _ = buf.iter(9);
    }
}
