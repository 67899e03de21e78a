//! Live refresh loop for `--progress`.
//!
//! Single-threaded and cooperative: fetch, classify and draw, then wait out the
//! refresh interval in one-unit steps, checking for the cancel key after each
//! step. The fetch itself blocks, so a slow host delays the next cancel check
//! by up to the remote query timeout.

use crate::models::classification::ClassificationResult;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shortest wait unit; a zero-length unit would turn the wait into a busy loop.
pub const MIN_UNIT: Duration = Duration::from_millis(1);

/// One fetch → extract → classify cycle.
pub trait Poll {
    fn poll(&mut self) -> ClassificationResult;
}

impl<F: FnMut() -> ClassificationResult> Poll for F {
    fn poll(&mut self) -> ClassificationResult {
        self()
    }
}

/// Something that can show a frame.
pub trait Screen {
    fn draw(&mut self, frame: &LiveFrame) -> Result<()>;
}

/// One unit of waiting. Returns `true` if the operator cancelled.
pub trait Waiter {
    fn wait_unit(&mut self) -> Result<bool>;
}

/// How long to wait between refreshes: `units` waits of `unit` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub units: u32,
    pub unit:  Duration,
}

impl Cadence {
    /// Split `secs` into whole units of `unit` (at least one unit, and
    /// never shorter than `MIN_UNIT`).
    pub fn from_secs(secs: u32, unit: Duration) -> Self {
        let unit  = unit.max(MIN_UNIT);
        let units = (u128::from(secs) * 1000).div_ceil(unit.as_millis().max(1));
        Self {
            units: u32::try_from(units).unwrap_or(u32::MAX).max(1),
            unit,
        }
    }

    /// Wall time between two fetches.
    pub fn period(&self) -> Duration {
        self.unit * self.units
    }
}

/// What is on screen: the result of the last completed cycle.
#[derive(Debug, Clone)]
pub struct LiveFrame {
    pub host:     String,
    pub counter:  u64,
    pub taken_at: DateTime<Local>,
    pub cadence:  Cadence,
    pub result:   ClassificationResult,
}

impl LiveFrame {
    /// Refresh period rounded to whole seconds, for display.
    pub fn refresh_secs(&self) -> u64 {
        self.cadence.period().as_secs_f64().round() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rendering,
    /// `tick` wait units of the current interval have elapsed
    Waiting { tick: u32 },
    Terminal,
}

pub struct LiveRefresh<P, S, W> {
    host:     String,
    cadence:  Cadence,
    poller:   P,
    screen:   S,
    waiter:   W,
    phase:    Phase,
    counter:  u64,
    last:     Option<LiveFrame>,
}

impl<P: Poll, S: Screen, W: Waiter> LiveRefresh<P, S, W> {
    pub fn new(host: impl Into<String>, cadence: Cadence, poller: P, screen: S, waiter: W) -> Self {
        Self {
            host:     host.into(),
            cadence:  Cadence {
                units: cadence.units.max(1),
                unit:  cadence.unit.max(MIN_UNIT),
            },
            poller,
            screen,
            waiter,
            phase:    Phase::Idle,
            counter:  0,
            last:     None,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn last_frame(&self) -> Option<&LiveFrame> {
        self.last.as_ref()
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> Result<Phase> {
        self.phase = match self.phase {
            Phase::Idle | Phase::Rendering => {
                self.render_cycle()?;
                Phase::Waiting { tick: 0 }
            }
            Phase::Waiting { tick } if tick >= self.cadence.units => Phase::Rendering,
            Phase::Waiting { tick } => {
                if self.waiter.wait_unit()? {
                    info!(tick = tick + 1, frame = self.counter, "live refresh cancelled");
                    Phase::Terminal
                } else {
                    Phase::Waiting { tick: tick + 1 }
                }
            }
            Phase::Terminal => Phase::Terminal,
        };
        Ok(self.phase)
    }

    /// Run until cancelled and hand back the last completed classification.
    pub fn run(mut self) -> Result<ClassificationResult> {
        while self.step()? != Phase::Terminal {}
        Ok(self.last
            .map(|f| f.result)
            .unwrap_or_else(ClassificationResult::unreachable))
    }

    fn render_cycle(&mut self) -> Result<()> {
        self.counter += 1;
        let result = self.poller.poll();
        if result.reachable {
            debug!(frame = self.counter, rebuilding = result.rebuilding.len(), "refreshed");
        } else {
            warn!(frame = self.counter, "source unreachable, drawing degraded frame");
        }
        let frame = LiveFrame {
            host:     self.host.clone(),
            counter:  self.counter,
            taken_at: Local::now(),
            cadence:  self.cadence,
            result,
        };
        self.screen.draw(&frame)?;
        self.last = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::disk::{sample_disk, DiskState};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<LiveFrame>,
    }

    impl Screen for &mut Recorder {
        fn draw(&mut self, frame: &LiveFrame) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    /// Cancels on the n-th wait unit overall (1-based); counts every unit.
    struct CancelAt {
        at:    Option<u32>,
        units: Rc<Cell<u32>>,
    }

    impl Waiter for CancelAt {
        fn wait_unit(&mut self) -> Result<bool> {
            self.units.set(self.units.get() + 1);
            Ok(Some(self.units.get()) == self.at)
        }
    }

    fn secs(n: u32) -> Cadence {
        Cadence::from_secs(n, Duration::from_secs(1))
    }

    fn rebuilding(id: &str) -> ClassificationResult {
        classify(&[sample_disk(id, DiskState::Rebuilding, false)])
    }

    #[test]
    fn first_frame_is_drawn_before_any_wait() {
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let mut live = LiveRefresh::new("prx11a", secs(60), || rebuilding("0:0:1"), &mut rec,
                                        CancelAt { at: None, units: units.clone() });
        assert_eq!(live.phase(), Phase::Idle);
        assert_eq!(live.step().unwrap(), Phase::Waiting { tick: 0 });
        assert_eq!(units.get(), 0);
        assert_eq!(live.last_frame().map(|f| f.counter), Some(1));
        drop(live);
        assert_eq!(rec.frames.len(), 1);
    }

    #[test]
    fn cancel_mid_wait_exits_without_another_fetch() {
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let fetches = Rc::new(Cell::new(0));
        let f = fetches.clone();
        let poller = move || {
            f.set(f.get() + 1);
            rebuilding("0:0:1")
        };

        let last = LiveRefresh::new("prx11a", secs(60), poller, &mut rec,
                                    CancelAt { at: Some(12), units: units.clone() })
            .run()
            .unwrap();

        assert_eq!(fetches.get(), 1);
        assert_eq!(units.get(), 12);
        assert_eq!(rec.frames.len(), 1);
        assert_eq!(last.rebuilding[0].id, "0:0:1");
    }

    #[test]
    fn full_interval_elapses_before_next_fetch() {
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let mut n = 0;
        let poller = move || {
            n += 1;
            rebuilding(&format!("0:0:{}", n))
        };

        // 60 units of the first interval, then 12 into the second
        let last = LiveRefresh::new("prx11a", secs(60), poller, &mut rec,
                                    CancelAt { at: Some(72), units: units.clone() })
            .run()
            .unwrap();

        assert_eq!(rec.frames.len(), 2);
        assert_eq!(rec.frames[1].counter, 2);
        assert_eq!(last.rebuilding[0].id, "0:0:2");
    }

    #[test]
    fn unreachable_cycle_keeps_looping_with_empty_frame() {
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let mut calls = 0;
        let poller = move || {
            calls += 1;
            if calls == 1 { rebuilding("0:0:1") } else { ClassificationResult::unreachable() }
        };

        let last = LiveRefresh::new("prx11a", secs(3), poller, &mut rec,
                                    CancelAt { at: Some(8), units: units.clone() })
            .run()
            .unwrap();

        assert_eq!(rec.frames.len(), 3);
        assert!(rec.frames[0].result.reachable);
        assert!(!rec.frames[1].result.reachable);
        assert!(rec.frames[1].result.rebuilding.is_empty());
        assert!(!last.reachable);
        assert!(last.all.is_empty());
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let last = LiveRefresh::new("h", secs(0), || ClassificationResult::unreachable(), &mut rec,
                                    CancelAt { at: Some(3), units: units.clone() })
            .run()
            .unwrap();
        assert_eq!(rec.frames.len(), 3);
        assert!(!last.reachable);
    }

    #[test]
    fn cadence_counts_units_of_the_configured_length() {
        let c = Cadence::from_secs(60, Duration::from_millis(500));
        assert_eq!(c.units, 120);
        assert_eq!(c.period(), Duration::from_secs(60));

        let c = Cadence::from_secs(60, Duration::from_millis(700));
        assert_eq!(c.units, 86);
        assert!(c.period() >= Duration::from_secs(60));
    }

    #[test]
    fn zero_length_unit_is_clamped() {
        let c = Cadence::from_secs(60, Duration::ZERO);
        assert_eq!(c.unit, MIN_UNIT);
        assert_eq!(c.period(), Duration::from_secs(60));

        let raw = Cadence { units: 0, unit: Duration::ZERO };
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let live = LiveRefresh::new("h", raw, || ClassificationResult::unreachable(), &mut rec,
                                    CancelAt { at: None, units: units.clone() });
        assert_eq!(live.cadence, Cadence { units: 1, unit: MIN_UNIT });
    }

    #[test]
    fn frame_reports_real_refresh_period() {
        let mut rec = Recorder::default();
        let units = Rc::new(Cell::new(0));
        let cadence = Cadence::from_secs(60, Duration::from_millis(500));
        LiveRefresh::new("h", cadence, || ClassificationResult::unreachable(), &mut rec,
                         CancelAt { at: Some(1), units: units.clone() })
            .run()
            .unwrap();
        let frame = &rec.frames[0];
        assert_eq!(frame.refresh_secs(), 60);
        assert_eq!(frame.cadence.unit * frame.cadence.units, Duration::from_secs(60));
    }
}
