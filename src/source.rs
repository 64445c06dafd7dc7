use std::collections::VecDeque;
use crate::error::MonitorError;
use crate::vision::Frame;
/// Something that can hand over the current video frame on demand.
///
/// `Ok(None)` means no frame is available this tick; `Err` is a terminal
/// capture failure (device lost, permission revoked) that ends the session.
pub trait FrameSource: Send {
    fn capture(&mut self) -> Result<Option<Frame>, MonitorError>;
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualFrameSource {
    queue: VecDeque<Frame>,
    repeat_last: bool,
    last: Option<Frame>,
}
impl ManualFrameSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            queue: frames.into_iter().collect(),
            repeat_last: false,
            last: None,
        }
    }
    /// Keep returning the final frame once the queue is drained.
    pub fn repeat_last(mut self) -> Self {
        self.repeat_last = true;
        self
    }
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
impl FrameSource for ManualFrameSource {
    fn capture(&mut self) -> Result<Option<Frame>, MonitorError> {
        match self.queue.pop_front() {
            Some(frame) => {
                if self.repeat_last {
                    self.last = Some(frame.clone());
                }
                Ok(Some(frame))
            }
            None if self.repeat_last => Ok(self.last.clone()),
            None => Ok(None),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    #[test]
    fn plays_back_in_order() {
        let frames = (0..3u8).map(|g| Frame::from_pixel(2, 2, Rgb([50, g, 50])));
        let mut source = ManualFrameSource::new(frames);
        for g in 0..3u8 {
            assert_eq!(source.capture().unwrap().unwrap().get_pixel(0, 0).0[1], g);
        }
        assert!(source.capture().unwrap().is_none());
    }
    #[test]
    fn repeat_last_holds_final_frame() {
        let mut source =
            ManualFrameSource::new([Frame::from_pixel(2, 2, Rgb([9, 9, 9]))]).repeat_last();
        source.capture().unwrap();
        assert_eq!(source.remaining(), 0);
        assert!(source.capture().unwrap().is_some());
        assert!(source.capture().unwrap().is_some());
    }
}
