//! Media Playback
//!
//! A player owns the audio output and the decoded media stream and feeds a
//! [`SampleBuffer`](../analyzer/samples/struct.SampleBuffer.html) as a side
//! effect of playing.  The render loop only ever needs three things from it:
//! start playing, borrow the sample ring, release everything on teardown.
#[cfg(feature = "rodioplay")]
pub mod rodio;

use crate::analyzer;

/// Error conditions while setting up playback
///
/// The render path itself has no error taxonomy, only guarded skips; these
/// cover the fallible setup work before the first tick.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("can't open media track: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "rodioplay")]
    #[error("can't decode media track: {0}")]
    Decode(#[from] ::rodio::decoder::DecoderError),

    #[cfg(feature = "rodioplay")]
    #[error("can't open audio output: {0}")]
    Stream(#[from] ::rodio::StreamError),

    #[cfg(feature = "rodioplay")]
    #[error("can't create output sink: {0}")]
    Sink(#[from] ::rodio::PlayError),

    #[error("player type does not exist: {0}")]
    UnknownPlayer(String),
}

/// A playing media source feeding a sample ring
///
/// State machine: Idle until [`play`](#tymethod.play), Playing until
/// [`dispose`](#tymethod.dispose), no way back to Idle.
pub trait Player: std::fmt::Debug {
    /// Start playback.  Further calls are no-ops.
    fn play(&mut self);

    /// Borrow the sample ring this player pushes into
    ///
    /// Returns `None` once disposed; a tick that finds the tap gone must
    /// treat that as a no-op rather than an error.
    fn tap(&self) -> Option<&analyzer::SampleBuffer>;

    /// Release the audio output and stop feeding the ring
    fn dispose(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct PlayerBuilder {
    pub rate: Option<usize>,
    pub buffer_size: Option<usize>,
    pub track: Option<std::path::PathBuf>,
    pub player: Option<String>,
}

impl PlayerBuilder {
    pub fn new() -> PlayerBuilder {
        Default::default()
    }

    pub fn rate(&mut self, rate: usize) -> &mut PlayerBuilder {
        self.rate = Some(rate);
        self
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut PlayerBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn track<P: Into<std::path::PathBuf>>(&mut self, track: P) -> &mut PlayerBuilder {
        self.track = Some(track.into());
        self
    }

    pub fn player<S: Into<String>>(&mut self, player: S) -> &mut PlayerBuilder {
        self.player = Some(player.into());
        self
    }

    pub fn build(&mut self) -> Result<Box<dyn Player>, PlaybackError> {
        let rate = self
            .rate
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.rate", 44100));
        let buffer_size = self
            .buffer_size
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.buffer", 16384));
        let track = self
            .track
            .clone()
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.track", "sample.mp3".to_string()).into());
        let player = self
            .player
            .as_ref()
            .cloned()
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.player", "rodio".to_string()));

        match &*player {
            #[cfg(feature = "rodioplay")]
            "rodio" => self::rodio::RodioBuilder {
                rate: Some(rate),
                buffer_size: Some(buffer_size),
                track: Some(track),
            }
            .build(),

            other => Err(PlaybackError::UnknownPlayer(other.to_string())),
        }
    }
}
