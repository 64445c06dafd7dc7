// src/history.rs
use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use crate::error::MonitorError;
use crate::types::VitalSigns;
/// Receives the sampler's output. Called from the sampler thread.
pub trait VitalsSink: Send {
    /// One snapshot per completed tick.
    fn emit(&mut self, vitals: VitalSigns);
    /// The session hit a terminal error and is going back to idle.
    fn session_failed(&mut self, _error: &MonitorError) {}
}
/// Messages sent from the sampler thread to the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Vitals(VitalSigns),
    Failed(String),
}
/// Forwards sampler output over an mpsc channel.
pub struct ChannelSink {
    tx: Sender<SessionEvent>,
}
impl ChannelSink {
    pub fn new(tx: Sender<SessionEvent>) -> Self {
        Self { tx }
    }
}
impl VitalsSink for ChannelSink {
    fn emit(&mut self, vitals: VitalSigns) {
        // Receiver gone means nobody is watching; the session keeps running.
        self.tx.send(SessionEvent::Vitals(vitals)).ok();
    }
    fn session_failed(&mut self, error: &MonitorError) {
        self.tx.send(SessionEvent::Failed(error.to_string())).ok();
    }
}
/// Bounded rolling history of snapshots for display.
#[derive(Clone, Debug)]
pub struct VitalHistory {
    entries: VecDeque<VitalSigns>,
    capacity: usize,
    smoothing_window: usize,
}
impl VitalHistory {
    pub fn new(capacity: usize, smoothing_window: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            smoothing_window: smoothing_window.max(1),
        }
    }
    pub fn push(&mut self, vitals: VitalSigns) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(vitals);
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn latest(&self) -> Option<VitalSigns> {
        self.entries.back().copied()
    }
    pub fn iter(&self) -> impl Iterator<Item = &VitalSigns> {
        self.entries.iter()
    }
    /// Rounded mean of the last `smoothing_window` snapshots. With fewer
    /// snapshots than that, the latest one is returned as is.
    pub fn smoothed(&self) -> VitalSigns {
        let Some(latest) = self.latest() else {
            return VitalSigns::unavailable();
        };
        if self.entries.len() < self.smoothing_window {
            return latest;
        }
        let window = self.entries.iter().rev().take(self.smoothing_window);
        let n = self.smoothing_window as f64;
        let (hr, rr, stress) = window.fold((0.0, 0.0, 0.0), |(hr, rr, s), v| {
            (hr + v.heart_rate, rr + v.respiratory_rate, s + v.stress_level)
        });
        VitalSigns::new((hr / n).round(), (rr / n).round(), (stress / n).round())
    }
}
/// History shared between the sampler thread and a reader.
#[derive(Clone, Debug)]
pub struct SharedHistory(Arc<Mutex<VitalHistory>>);
impl SharedHistory {
    pub fn new(history: VitalHistory) -> Self {
        Self(Arc::new(Mutex::new(history)))
    }
    /// Copy of the current history; a poisoned lock still yields the data.
    pub fn snapshot(&self) -> VitalHistory {
        match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
impl VitalsSink for SharedHistory {
    fn emit(&mut self, vitals: VitalSigns) {
        match self.0.lock() {
            Ok(mut guard) => guard.push(vitals),
            Err(poisoned) => poisoned.into_inner().push(vitals),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    #[test]
    fn history_is_bounded() {
        let mut history = VitalHistory::new(3, 2);
        for hr in [60.0, 61.0, 62.0, 63.0] {
            history.push(VitalSigns::new(hr, 12.0, 40.0));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().next().unwrap().heart_rate, 61.0);
        assert_eq!(history.latest().unwrap().heart_rate, 63.0);
    }
    #[test]
    fn smoothing_averages_recent_window() {
        let mut history = VitalHistory::new(60, 3);
        assert_eq!(history.smoothed(), VitalSigns::unavailable());
        history.push(VitalSigns::new(70.0, 14.0, 30.0));
        history.push(VitalSigns::new(80.0, 16.0, 50.0));
        // Not enough entries yet: latest passes through.
        assert_eq!(history.smoothed(), VitalSigns::new(80.0, 16.0, 50.0));
        history.push(VitalSigns::new(75.0, 15.0, 41.0));
        history.push(VitalSigns::new(77.0, 18.0, 40.0));
        assert_eq!(history.smoothed(), VitalSigns::new(77.0, 16.0, 44.0));
    }
    #[test]
    fn channel_sink_forwards_events() {
        let (tx, rx) = channel();
        let mut sink = ChannelSink::new(tx);
        sink.emit(VitalSigns::new(72.0, 15.0, 20.0));
        sink.session_failed(&MonitorError::Capture("camera unplugged".into()));
        assert_eq!(
            rx.recv().unwrap(),
            SessionEvent::Vitals(VitalSigns::new(72.0, 15.0, 20.0))
        );
        assert!(matches!(rx.recv().unwrap(), SessionEvent::Failed(msg) if msg.contains("unplugged")));
    }
    #[test]
    fn shared_history_collects_from_sink_side() {
        let shared = SharedHistory::new(VitalHistory::new(10, 5));
        let mut sink = shared.clone();
        sink.emit(VitalSigns::new(65.0, 12.0, 10.0));
        assert_eq!(shared.snapshot().latest(), Some(VitalSigns::new(65.0, 12.0, 10.0)));
    }
}
