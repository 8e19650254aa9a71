//! A small framework for bar-graph audio visualization in Rust.
//!
//! A player feeds samples of a media track into a shared ring, a
//! byte-frequency sampler turns the most recent transform window into
//! per-bin magnitudes and the render module maps those onto colored
//! bar rectangles.  Painting the rectangles is left to the display
//! frontend.
//!
//! # Example
//! ```no_run
//! fn main() -> Result<(), bars_core::playback::PlaybackError> {
//!     // Initialize logging and the default config sources.
//!     bars_core::default_log();
//!     bars_core::default_config();
//!
//!     let mut player = bars_core::playback::PlayerBuilder::new()
//!         .track("sample.mp3")
//!         .build()?;
//!
//!     let mut sampler = bars_core::analyzer::ByteFrequencyBuilder::new().plan();
//!     let params = bars_core::render::RenderParams::new(1600.0, 800.0);
//!
//!     // The two reusable per-frame buffers
//!     let mut freqs = vec![0u8; sampler.bin_count()];
//!     let mut rects = Vec::new();
//!
//!     let mut frames = bars_core::Frames::new();
//!     let stop = frames.stop_handle();
//!
//!     // In a real frontend this happens on the user's start click
//!     player.play();
//!
//!     for frame in frames.iter() {
//!         let buf = match player.tap() {
//!             Some(buf) => buf,
//!             // Disposed player, this tick is a no-op
//!             None => continue,
//!         };
//!         if !sampler.sample_into(buf, &mut freqs) {
//!             continue;
//!         }
//!         bars_core::render::frame_geometry(&params, &freqs, &mut rects);
//!         // Paint `rects` on your surface of choice here
//!
//!         if frame.frame > 600 {
//!             player.dispose();
//!             stop.stop();
//!         }
//!     }
//!     Ok(())
//! }
//! ```
pub mod analyzer;
pub mod frames;
pub mod helpers;
pub mod playback;
pub mod render;

#[doc(inline)]
pub use crate::frames::{Frames, StopHandle};

/// `ezconf` configuration
///
/// Usually you will call [`default_config`](fn.default_config.html) in the beginning
/// which will populate this object, but you can also specify your own custom config
/// sources.
///
/// # Example
/// To make use of this config, use code similar to this:
///
/// ```rust
/// # bars_core::default_config();
/// let some_configurable_value = bars_core::CONFIG.get_or(
///     // Toml path to value
///     "foo.bar",
///     // Default value.  Type gets inferred from this
///     123,
/// );
/// ```
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Initialize config from default sources
///
/// The default sources are:
/// * `./visualizer.toml`
/// * `./config/visualizer.toml`
/// * Defaults from code
pub fn default_config() {
    CONFIG
        .init(
            [
                ezconf::Source::File("visualizer.toml"),
                ezconf::Source::File("config/visualizer.toml"),
            ]
            .iter(),
        )
        .expect("Can't load config");
}

/// Initialize logger
///
/// By default, enable debug output in debug-builds.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    color_backtrace::install();
}
