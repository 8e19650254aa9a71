//! Render Loop
//!
//! An explicit, paced tick loop with a cancellation flag instead of a
//! self-rescheduling frame callback.  The teardown path sets the flag
//! through a [`StopHandle`](struct.StopHandle.html) and the iterator ends on
//! the next check; a tick always runs to completion, ticks never overlap.
use std::sync::atomic;
use std::sync::Arc;
use std::time;

/// Cancellation flag for the render loop
///
/// Cloneable, all clones stop the same loop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flag: Arc<atomic::AtomicBool>,
}

impl StopHandle {
    /// End the loop before its next tick
    pub fn stop(&self) {
        self.flag.store(true, atomic::Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(atomic::Ordering::Relaxed)
    }
}

/// One tick of the render loop
#[derive(Debug)]
pub struct Frame {
    /// Seconds since the loop started
    pub time: f32,
    /// Running frame number
    pub frame: usize,
}

/// Tick source for the render loop
#[derive(Debug)]
pub struct Frames {
    flag: Arc<atomic::AtomicBool>,
    frame_time: time::Duration,
}

impl Frames {
    /// Create a tick source paced from config (`"vis.fps"`, default 60)
    pub fn new() -> Frames {
        Frames::from_fps(crate::CONFIG.get_or("vis.fps", 60))
    }

    /// Create a tick source paced at a fixed frame rate
    pub fn from_fps(fps: usize) -> Frames {
        assert!(fps > 0, "Frame rate must be positive!");
        Frames::with_frame_time(time::Duration::from_micros(1_000_000 / fps as u64))
    }

    /// Create a tick source with an explicit frame time
    pub fn with_frame_time(frame_time: time::Duration) -> Frames {
        Frames {
            flag: Arc::new(atomic::AtomicBool::new(false)),
            frame_time,
        }
    }

    /// Handle for the teardown path to end the loop
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: self.flag.clone(),
        }
    }

    pub fn iter<'a>(&'a mut self) -> FramesIter<'a> {
        FramesIter {
            flag: &self.flag,
            frame_time: self.frame_time,
            start: time::Instant::now(),
            last: None,
            frame: 0,
        }
    }
}

impl Default for Frames {
    fn default() -> Frames {
        Frames::new()
    }
}

#[derive(Debug)]
pub struct FramesIter<'a> {
    flag: &'a atomic::AtomicBool,
    frame_time: time::Duration,
    start: time::Instant,
    last: Option<time::Instant>,
    frame: usize,
}

impl Iterator for FramesIter<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.flag.load(atomic::Ordering::Relaxed) {
            return None;
        }

        // Pace against the previous tick
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }
        self.last = Some(time::Instant::now());

        let frame = self.frame;
        self.frame += 1;

        Some(Frame {
            time: crate::helpers::time(self.start),
            frame,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up() {
        let mut frames = Frames::with_frame_time(time::Duration::from_micros(0));
        let stop = frames.stop_handle();

        let mut seen = Vec::new();
        for frame in frames.iter() {
            seen.push(frame.frame);
            if frame.frame == 4 {
                stop.stop();
            }
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_frame_rate_pacing() {
        let frames = Frames::from_fps(50);

        assert_eq!(frames.frame_time, time::Duration::from_micros(20_000));
    }

    #[test]
    #[should_panic]
    fn test_zero_frame_rate() {
        Frames::from_fps(0);
    }

    #[test]
    fn test_stopped_before_start() {
        let mut frames = Frames::with_frame_time(time::Duration::from_micros(0));
        frames.stop_handle().stop();

        assert!(frames.iter().next().is_none());
    }

    #[test]
    fn test_stop_handle_clones_share_flag() {
        let frames = Frames::with_frame_time(time::Duration::from_micros(0));
        let a = frames.stop_handle();
        let b = a.clone();

        b.stop();

        assert!(a.is_stopped());
    }

    #[test]
    fn test_time_monotonic() {
        let mut frames = Frames::with_frame_time(time::Duration::from_micros(100));
        let stop = frames.stop_handle();

        let mut last = -1.0;
        for frame in frames.iter() {
            assert!(frame.time >= last);
            last = frame.time;
            if frame.frame == 9 {
                stop.stop();
            }
        }
    }
}
