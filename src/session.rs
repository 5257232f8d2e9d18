//! The capture → decide → dispatch loop.

use crate::action::{Action, ActionKind, Dispatcher};
use crate::config::Config;
use crate::error::VmResult;
use crate::fps::FpsCounter;
use crate::gesture::{GestureMachine, InteractionMode};
use crate::landmarks::LandmarkSnapshot;
use crate::source::LandmarkSource;
use crate::trace::{TraceRow, TraceWriter};
use std::collections::HashMap;
use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub frames: u64,
    pub hand_frames: u64,
    pub mode_frames: HashMap<InteractionMode, u64>,
    pub actions: HashMap<ActionKind, u64>,
    pub dispatch_errors: u64,
    pub avg_fps: f32,
    pub duration: Duration,
}

impl SessionStats {
    pub fn mode_count(&self, mode: InteractionMode) -> u64 {
        self.mode_frames.get(&mode).copied().unwrap_or(0)
    }

    pub fn action_count(&self, kind: ActionKind) -> u64 {
        self.actions.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_actions(&self) -> u64 {
        self.actions.values().sum()
    }
}

pub struct Session<S, D> {
    source: S,
    dispatcher: D,
    machine: GestureMachine,
    stop: Arc<AtomicBool>,
    fps: FpsCounter,
    trace: Option<TraceWriter<File>>,
    stats: SessionStats,
}

impl<S: LandmarkSource, D: Dispatcher> Session<S, D> {
    pub fn new(config: &Config, source: S, dispatcher: D) -> Self {
        let screen = config.cursor.resolve_screen(dispatcher.screen_size());
        info!("🖥️  Screen {}x{}", screen.0, screen.1);
        Self {
            source,
            dispatcher,
            machine: GestureMachine::new(config, screen),
            stop: Arc::new(AtomicBool::new(false)),
            fps: FpsCounter::default(),
            trace: None,
            stats: SessionStats::default(),
        }
    }

    pub fn with_trace(mut self, trace: TraceWriter<File>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Setting the flag ends the loop before the next frame is pulled.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn machine(&self) -> &GestureMachine {
        &self.machine
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Runs until the stop flag is set or the source ends. A held drag
    /// button is released on the way out.
    pub fn run(&mut self) -> VmResult<SessionStats> {
        info!("▶️  Reading frames from {}", self.source.describe());

        let result = self.pump();
        if let Some(release) = self.machine.shutdown() {
            info!("Releasing held drag button");
            self.dispatch(&release);
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.flush()?;
        }
        result?;

        self.stats.avg_fps = self.fps.average();
        self.stats.duration = self.fps.span();
        info!(
            "⏹️  Session ended after {} frames ({} with a hand)",
            self.stats.frames, self.stats.hand_frames
        );
        Ok(self.stats.clone())
    }

    fn pump(&mut self) -> VmResult<()> {
        while !self.stop.load(Ordering::Relaxed) {
            let Some(detection) = self.source.next_frame()? else {
                debug!("source exhausted");
                break;
            };
            self.process(detection.timestamp, detection.primary())?;
        }
        Ok(())
    }

    fn process(
        &mut self,
        timestamp: Duration,
        hand: Option<&LandmarkSnapshot>,
    ) -> VmResult<()> {
        self.fps.tick(timestamp);
        let frame = self.stats.frames;
        self.stats.frames += 1;
        if hand.is_some() {
            self.stats.hand_frames += 1;
        }

        let transition = self.machine.step(timestamp, hand);
        *self.stats.mode_frames.entry(transition.mode).or_insert(0) += 1;

        if let Some(action) = transition.action.as_ref() {
            self.dispatch(action);
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.write(&TraceRow::new(
                frame,
                timestamp,
                transition.mode,
                transition.action.as_ref(),
            ))?;
        }
        Ok(())
    }

    // A failed injection costs one action, never the session.
    fn dispatch(&mut self, action: &Action) {
        match self.dispatcher.dispatch(action) {
            Ok(()) => {
                *self.stats.actions.entry(action.kind()).or_insert(0) += 1;
            }
            Err(e) => {
                self.stats.dispatch_errors += 1;
                warn!("⚠️  Dispatch of {:?} failed: {}", action, e);
            }
        }
    }
}
