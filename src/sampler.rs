// src/sampler.rs
//! Fixed-rate tick loop driving one monitoring session.
//!
//! Each session runs on its own thread which owns the pipeline, frame
//! source and sink while monitoring. Ticks execute back to back on that
//! thread, so a tick can never start while the previous one is still
//! running; deadlines missed by an overrunning tick are dropped rather than
//! queued. `stop()` joins the thread and takes the session back, so once it
//! returns nothing can touch the buffer any more.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use log::{debug, error, info};
use crate::error::MonitorError;
use crate::history::VitalsSink;
use crate::pipeline::VitalPipeline;
use crate::source::FrameSource;
use crate::types::VitalSigns;
use crate::vision::{Detector, Detectors};
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Monitoring,
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks_run: u64,
    pub ticks_skipped: u64,
    pub snapshots_emitted: u64,
}
#[derive(Default)]
struct Counters {
    ticks_run: AtomicU64,
    ticks_skipped: AtomicU64,
    snapshots_emitted: AtomicU64,
}
impl Counters {
    fn stats(&self) -> TickStats {
        TickStats {
            ticks_run: self.ticks_run.load(Ordering::Relaxed),
            ticks_skipped: self.ticks_skipped.load(Ordering::Relaxed),
            snapshots_emitted: self.snapshots_emitted.load(Ordering::Relaxed),
        }
    }
}
struct Session {
    pipeline: VitalPipeline,
    source: Box<dyn FrameSource>,
    sink: Box<dyn VitalsSink>,
}
struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<(Session, Option<MonitorError>)>,
}
pub struct FrameSampler {
    detectors: Arc<Detectors>,
    session: Option<Session>,
    worker: Option<Worker>,
    counters: Arc<Counters>,
    last_error: Option<MonitorError>,
}
impl FrameSampler {
    pub fn new(
        pipeline: VitalPipeline,
        source: impl FrameSource + 'static,
        sink: impl VitalsSink + 'static,
        detectors: Arc<Detectors>,
    ) -> Self {
        Self {
            detectors,
            session: Some(Session {
                pipeline,
                source: Box::new(source),
                sink: Box::new(sink),
            }),
            worker: None,
            counters: Arc::new(Counters::default()),
            last_error: None,
        }
    }
    /// Current state, after reaping a worker that ended on its own.
    pub fn poll(&mut self) -> SamplerState {
        let finished = self
            .worker
            .as_ref()
            .is_some_and(|w| w.handle.is_finished());
        if finished {
            if let Some(worker) = self.worker.take() {
                if let Err(e) = self.reap(worker) {
                    error!("{e}");
                }
            }
        }
        self.state()
    }
    pub fn state(&self) -> SamplerState {
        if self.worker.is_some() {
            SamplerState::Monitoring
        } else {
            SamplerState::Idle
        }
    }
    pub fn is_monitoring(&self) -> bool {
        self.state() == SamplerState::Monitoring
    }
    /// Counters of the current (or most recent) session.
    pub fn stats(&self) -> TickStats {
        self.counters.stats()
    }
    /// Terminal error that ended the last session, if any.
    pub fn take_error(&mut self) -> Option<MonitorError> {
        self.last_error.take()
    }
    /// The session pipeline; only reachable while idle.
    pub fn pipeline(&self) -> Option<&VitalPipeline> {
        self.session.as_ref().map(|s| &s.pipeline)
    }
    /// Clear the buffer and begin ticking every `1 / samplingRate` seconds.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        if self.poll() == SamplerState::Monitoring {
            return Err(MonitorError::AlreadyMonitoring);
        }
        let detector = self.detectors.get().ok_or(MonitorError::NotReady)?;
        let mut session = self.session.take().ok_or(MonitorError::WorkerPanicked)?;
        session.pipeline.reset();
        let period = session.pipeline.config().tick_period();
        let counters = Arc::new(Counters::default());
        self.counters = Arc::clone(&counters);
        self.last_error = None;
        let (stop_tx, stop_rx) = channel::<()>();
        let handle = thread::spawn(move || {
            let mut session = session;
            let started = Instant::now();
            let mut next_tick = started + period;
            loop {
                let wait = next_tick.saturating_duration_since(Instant::now());
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Stop requested, or the sampler itself is gone.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                counters.ticks_run.fetch_add(1, Ordering::Relaxed);
                match run_tick(&mut session, detector.as_ref(), started.elapsed()) {
                    Ok(Some(vitals)) => {
                        session.sink.emit(vitals);
                        counters.snapshots_emitted.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!("monitoring session failed: {e}");
                        session.sink.session_failed(&e);
                        return (session, Some(e));
                    }
                }
                next_tick += period;
                let now = Instant::now();
                if now > next_tick {
                    let missed = skipped_ticks(now - next_tick, period);
                    debug!("tick overran; skipping {missed} tick(s)");
                    counters
                        .ticks_skipped
                        .fetch_add(missed as u64, Ordering::Relaxed);
                    next_tick += period * missed;
                }
            }
            (session, None)
        });
        self.worker = Some(Worker { stop_tx, handle });
        info!("monitoring started ({:?} per tick)", period);
        Ok(())
    }
    /// Stop ticking. When this returns no further tick runs for the session.
    pub fn stop(&mut self) -> Result<(), MonitorError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        worker.stop_tx.send(()).ok();
        self.reap(worker)?;
        info!("monitoring stopped after {} ticks", self.stats().ticks_run);
        Ok(())
    }
    fn reap(&mut self, worker: Worker) -> Result<(), MonitorError> {
        let (session, failure) = worker
            .handle
            .join()
            .map_err(|_| MonitorError::WorkerPanicked)?;
        self.session = Some(session);
        if failure.is_some() {
            self.last_error = failure;
        }
        Ok(())
    }
}
impl Drop for FrameSampler {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
fn run_tick(
    session: &mut Session,
    detector: &dyn Detector,
    timestamp: Duration,
) -> Result<Option<VitalSigns>, MonitorError> {
    let Some(frame) = session.source.capture()? else {
        debug!("no frame available at {timestamp:?}");
        return Ok(None);
    };
    let face = detector.detect_face(&frame);
    session
        .pipeline
        .process_frame(&frame, face.as_ref(), timestamp)
        .map(Some)
}
/// Deadlines passed while a tick overran, given how far behind `next_tick` we are.
fn skipped_ticks(behind: Duration, period: Duration) -> u32 {
    let period_ns = period.as_nanos().max(1);
    (behind.as_nanos() / period_ns) as u32 + 1
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::history::{ChannelSink, SessionEvent, SharedHistory, VitalHistory};
    use crate::source::ManualFrameSource;
    use crate::types::BoundingBox;
    use crate::vision::{Frame, StaticDetector};
    use image::Rgb;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc::channel;
    struct CountingSource {
        captured: Arc<AtomicUsize>,
        delay: Duration,
    }
    impl FrameSource for CountingSource {
        fn capture(&mut self) -> Result<Option<Frame>, MonitorError> {
            thread::sleep(self.delay);
            self.captured.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Frame::from_pixel(32, 24, Rgb([120, 140, 110]))))
        }
    }
    struct FailingSource;
    impl FrameSource for FailingSource {
        fn capture(&mut self) -> Result<Option<Frame>, MonitorError> {
            Err(MonitorError::Capture("permission denied".into()))
        }
    }
    fn config(rate: f64) -> Arc<MonitorConfig> {
        Arc::new(MonitorConfig {
            sampling_rate: rate,
            ..MonitorConfig::default()
        })
    }
    fn detectors() -> Arc<Detectors> {
        let face = BoundingBox::new(0.1, 0.1, 0.8, 0.8);
        Arc::new(Detectors::ready(Arc::new(StaticDetector::new(Some(face)))))
    }
    fn counting(captured: &Arc<AtomicUsize>, delay: Duration) -> CountingSource {
        CountingSource {
            captured: Arc::clone(captured),
            delay,
        }
    }
    #[test]
    fn start_requires_ready_detectors() {
        let pipeline = VitalPipeline::new(config(30.0)).unwrap();
        let source = ManualFrameSource::new(Vec::new());
        let history = SharedHistory::new(VitalHistory::new(60, 5));
        let mut sampler = FrameSampler::new(pipeline, source, history, Arc::new(Detectors::new()));
        assert!(matches!(sampler.start(), Err(MonitorError::NotReady)));
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(sampler.pipeline().is_some());
    }
    #[test]
    fn no_samples_after_stop() {
        let captured = Arc::new(AtomicUsize::new(0));
        let history = SharedHistory::new(VitalHistory::new(1000, 5));
        let mut sampler = FrameSampler::new(
            VitalPipeline::new(config(50.0)).unwrap(),
            counting(&captured, Duration::ZERO),
            history.clone(),
            detectors(),
        );
        sampler.start().unwrap();
        assert!(sampler.is_monitoring());
        assert!(matches!(sampler.start(), Err(MonitorError::AlreadyMonitoring)));
        thread::sleep(Duration::from_millis(300));
        sampler.stop().unwrap();
        assert_eq!(sampler.state(), SamplerState::Idle);
        let buffered = sampler.pipeline().unwrap().buffer().len();
        let frames = captured.load(Ordering::SeqCst);
        let emitted = history.snapshot().len();
        assert!(buffered > 0);
        assert_eq!(emitted as u64, sampler.stats().snapshots_emitted);
        thread::sleep(Duration::from_millis(200));
        assert_eq!(sampler.pipeline().unwrap().buffer().len(), buffered);
        assert_eq!(captured.load(Ordering::SeqCst), frames);
        assert_eq!(history.snapshot().len(), emitted);
        // Stopping twice is harmless.
        sampler.stop().unwrap();
    }
    #[test]
    fn restart_clears_buffer() {
        let captured = Arc::new(AtomicUsize::new(0));
        let mut sampler = FrameSampler::new(
            VitalPipeline::new(config(5.0)).unwrap(),
            counting(&captured, Duration::ZERO),
            SharedHistory::new(VitalHistory::new(60, 5)),
            detectors(),
        );
        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(1100));
        sampler.stop().unwrap();
        assert!(sampler.pipeline().unwrap().buffer().len() >= 3);
        sampler.start().unwrap();
        sampler.stop().unwrap();
        assert_eq!(sampler.pipeline().unwrap().buffer().len(), 0);
    }
    #[test]
    fn overrunning_ticks_are_skipped_not_queued() {
        let captured = Arc::new(AtomicUsize::new(0));
        let mut sampler = FrameSampler::new(
            VitalPipeline::new(config(100.0)).unwrap(),
            counting(&captured, Duration::from_millis(35)),
            SharedHistory::new(VitalHistory::new(60, 5)),
            detectors(),
        );
        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(400));
        sampler.stop().unwrap();
        let stats = sampler.stats();
        assert!(stats.ticks_skipped > 0, "{stats:?}");
        assert!(stats.ticks_run < 20, "{stats:?}");
        assert_eq!(stats.ticks_run as usize, captured.load(Ordering::SeqCst));
    }
    #[test]
    fn capture_failure_ends_session() {
        let (tx, rx) = channel();
        let mut sampler = FrameSampler::new(
            VitalPipeline::new(config(50.0)).unwrap(),
            FailingSource,
            ChannelSink::new(tx),
            detectors(),
        );
        sampler.start().unwrap();
        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(event, SessionEvent::Failed(msg) if msg.contains("permission denied")));
        let deadline = Instant::now() + Duration::from_secs(2);
        while sampler.poll() == SamplerState::Monitoring && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(sampler.state(), SamplerState::Idle);
        assert!(matches!(sampler.take_error(), Some(MonitorError::Capture(_))));
        assert!(sampler.pipeline().is_some());
    }
    #[test]
    fn skip_count_rounds_up() {
        let period = Duration::from_millis(10);
        assert_eq!(skipped_ticks(Duration::from_millis(1), period), 1);
        assert_eq!(skipped_ticks(Duration::from_millis(25), period), 3);
    }
}
