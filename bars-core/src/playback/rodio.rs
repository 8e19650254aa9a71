use crate::analyzer;
use crate::playback;

/// Frames collected before a push into the shared ring
const TAP_CHUNK: usize = 256;

#[derive(Debug, Default)]
pub struct RodioBuilder {
    pub rate: Option<usize>,
    pub buffer_size: Option<usize>,
    pub track: Option<std::path::PathBuf>,
}

impl RodioBuilder {
    pub fn new() -> RodioBuilder {
        Default::default()
    }

    pub fn rate(&mut self, rate: usize) -> &mut RodioBuilder {
        self.rate = Some(rate);
        self
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut RodioBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn track<P: Into<std::path::PathBuf>>(&mut self, track: P) -> &mut RodioBuilder {
        self.track = Some(track.into());
        self
    }

    pub fn create(&mut self) -> Result<RodioPlayer, playback::PlaybackError> {
        let rate = self.rate.unwrap_or(44100);
        let buffer_size = self.buffer_size.unwrap_or(16384);
        let track = self.track.clone().unwrap_or_else(|| "sample.mp3".into());

        RodioPlayer::new(rate, buffer_size, &track)
    }

    pub fn build(&mut self) -> Result<Box<dyn playback::Player>, playback::PlaybackError> {
        Ok(Box::new(self.create()?))
    }
}

/// Player backed by a rodio output sink
///
/// The decoded track is resampled to uniform stereo at the configured rate,
/// wrapped in a [`TapSource`](struct.TapSource.html) and appended to a paused
/// sink.  `play()` unpauses; `dispose()` drops the sink, which detaches the
/// tap from the output.
pub struct RodioPlayer {
    buffer: analyzer::SampleBuffer,
    sink: Option<rodio::Sink>,
    _stream: rodio::OutputStream,
}

impl std::fmt::Debug for RodioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RodioPlayer {{ rate: {:?}, disposed: {:?} }}",
            self.buffer.rate(),
            self.sink.is_none(),
        )
    }
}

impl RodioPlayer {
    fn new(
        rate: usize,
        buffer_size: usize,
        track: &std::path::Path,
    ) -> Result<RodioPlayer, playback::PlaybackError> {
        let buffer = analyzer::SampleBuffer::new(buffer_size, rate);

        let file = std::fs::File::open(track)?;
        let decoder = rodio::Decoder::new(std::io::BufReader::new(file))?;
        let uniform =
            rodio::source::UniformSourceIterator::<_, f32>::new(decoder, 2, rate as u32);
        let tap = TapSource::new(uniform, buffer.clone());

        let (stream, handle) = rodio::OutputStream::try_default()?;
        let sink = rodio::Sink::try_new(&handle)?;
        sink.append(tap);
        // Wait for the user trigger
        sink.pause();

        log::debug!("RodioPlayer:");
        log::debug!("    Track               = {:?}", track);
        log::debug!("    Rate                = {:8}", rate);
        log::debug!("    Ring Size           = {:8}", buffer_size);

        Ok(RodioPlayer {
            buffer,
            sink: Some(sink),
            _stream: stream,
        })
    }
}

impl playback::Player for RodioPlayer {
    fn play(&mut self) {
        if let Some(ref sink) = self.sink {
            sink.play();
        }
    }

    fn tap(&self) -> Option<&analyzer::SampleBuffer> {
        self.sink.as_ref().map(|_| &self.buffer)
    }

    fn dispose(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

/// Source adapter that passes every sample through unchanged while pushing
/// stereo frames into the shared ring
///
/// Mono input lands in both channels, channels beyond the first two are
/// forwarded but not captured.
pub struct TapSource<S> {
    inner: S,
    buffer: analyzer::SampleBuffer,
    chunk: Vec<[f32; 2]>,
    channels: u16,
    position: u16,
    frame: [f32; 2],
}

impl<S> TapSource<S>
where
    S: rodio::Source<Item = f32>,
{
    pub fn new(inner: S, buffer: analyzer::SampleBuffer) -> TapSource<S> {
        let channels = inner.channels();
        assert!(channels > 0, "Source without channels!");

        TapSource {
            inner,
            buffer,
            chunk: Vec::with_capacity(TAP_CHUNK),
            channels,
            position: 0,
            frame: [0.0; 2],
        }
    }

    fn flush(&mut self) {
        if !self.chunk.is_empty() {
            self.buffer.push(&self.chunk);
            self.chunk.clear();
        }
    }
}

impl<S> Iterator for TapSource<S>
where
    S: rodio::Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = match self.inner.next() {
            Some(sample) => sample,
            None => {
                self.flush();
                return None;
            }
        };

        match self.position {
            0 => self.frame = [sample, sample],
            1 => self.frame[1] = sample,
            _ => (),
        }

        self.position += 1;
        if self.position == self.channels {
            self.position = 0;
            self.chunk.push(self.frame);
            if self.chunk.len() == TAP_CHUNK {
                self.flush();
            }
        }

        Some(sample)
    }
}

impl<S> rodio::Source for TapSource<S>
where
    S: rodio::Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        self.inner.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::buffer::SamplesBuffer;
    use rodio::Source;

    #[test]
    fn test_passthrough_stereo() {
        let input: Vec<f32> = (0..512).map(|i| i as f32 / 512.0).collect();
        let source = SamplesBuffer::new(2, 44100, input.clone());
        let tap = TapSource::new(source, analyzer::SampleBuffer::new(1024, 44100));

        let output: Vec<f32> = tap.collect();
        assert_eq!(output, input);
    }

    #[test]
    fn test_passthrough_mono() {
        let input: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let source = SamplesBuffer::new(1, 44100, input.clone());
        let tap = TapSource::new(source, analyzer::SampleBuffer::new(256, 44100));

        let output: Vec<f32> = tap.collect();
        assert_eq!(output, input);
    }

    #[test]
    fn test_ring_sees_stereo_frames() {
        let mut input = Vec::new();
        for i in 0..512 {
            input.push(i as f32);
            input.push(-(i as f32));
        }
        let source = SamplesBuffer::new(2, 44100, input);
        let buffer = analyzer::SampleBuffer::new(512, 44100);
        let tap = TapSource::new(source, buffer.clone());

        let _: Vec<f32> = tap.collect();

        assert_eq!(
            buffer.iter(512).collect::<Vec<_>>(),
            (0..512)
                .map(|i| [i as f32, -(i as f32)])
                .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn test_mono_fills_both_channels() {
        let input: Vec<f32> = (0..300).map(|i| i as f32).collect();
        let source = SamplesBuffer::new(1, 44100, input);
        let buffer = analyzer::SampleBuffer::new(300, 44100);
        let tap = TapSource::new(source, buffer.clone());

        let _: Vec<f32> = tap.collect();

        assert_eq!(
            buffer.iter(300).collect::<Vec<_>>(),
            (0..300).map(|i| [i as f32, i as f32]).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn test_partial_chunk_flushed_at_end() {
        // 10 frames, well below the chunk size
        let input: Vec<f32> = vec![0.5; 20];
        let source = SamplesBuffer::new(2, 44100, input);
        let buffer = analyzer::SampleBuffer::new(64, 44100);
        let tap = TapSource::new(source, buffer.clone());

        let _: Vec<f32> = tap.collect();

        assert_eq!(buffer.iter(10).collect::<Vec<_>>(), vec![[0.5; 2]; 10]);
    }

    #[test]
    fn test_source_properties_preserved() {
        let source = SamplesBuffer::new(2, 48000, vec![0.0f32; 64]);
        let tap = TapSource::new(source, analyzer::SampleBuffer::new(64, 48000));

        assert_eq!(tap.channels(), 2);
        assert_eq!(tap.sample_rate(), 48000);
    }
}
