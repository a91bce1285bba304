//! Playback scheduler
//!
//! Drains the animation queue one timestamp at a time. After a drain the
//! scheduler settles for as long as the slowest event of that bucket, then
//! either drains the next bucket (while playing) or stops. The host feeds
//! elapsed time in through `tick`, so playback runs equally well on wall-clock
//! or virtual time.

use rapidrouter_common::AppConfig;

use crate::dispatch::EventDispatcher;
use crate::error::SchedulerError;
use crate::event::AnimationEvent;
use crate::gauge::update_fuel_gauge;
use crate::map::Level;
use crate::popup::PopupComposer;
use crate::queue::AnimationQueue;
use crate::stage::Stage;
use crate::ticks::TickSource;

/// Runs once the settle delay of the step it was passed to has elapsed
pub type StepCallback = Box<dyn FnOnce()>;

/// Pending end of a drain
struct Settle {
    remaining_ms: u32,
    on_complete: Option<StepCallback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No queue yet; call `reset`
    NotStarted,
    Idle,
    /// A bucket was dispatched and its settle delay is pending
    Draining,
    Finished,
}

pub struct Scheduler {
    dispatcher: EventDispatcher,
    /// Vehicle lanes put back on the start by `reset`
    vans: usize,
    queue: Option<AnimationQueue>,
    /// Read cursor: next bucket to drain
    timestamp: usize,
    playing: bool,
    settle: Option<Settle>,
    finished: bool,
}

impl Scheduler {
    pub fn new(dispatcher: EventDispatcher, vans: usize) -> Self {
        Self {
            dispatcher,
            vans,
            queue: None,
            timestamp: 0,
            playing: false,
            settle: None,
            finished: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let dispatcher =
            EventDispatcher::new(config.playback, PopupComposer::new(config.level.clone()));
        Self::new(dispatcher, config.vans)
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// Draw a level from scratch and fill the fuel gauge
    pub fn render_level(&mut self, level: &Level, stage: &mut dyn Stage) {
        let start = level.map.start;
        stage.clear_all();
        stage.render_map(&level.map);
        stage.render_decor(&level.decor);
        stage.render_vehicles(&start, self.vans);
        stage.render_origin(&start);
        stage.render_destinations(&level.map.destinations);
        stage.render_traffic_lights(&level.traffic_lights);
        update_fuel_gauge(stage, 100.0);
    }

    /// Start over with an empty queue and put the board back into its starting state.
    /// A pending settle is dropped together with its callback.
    pub fn reset(&mut self, level: &Level, stage: &mut dyn Stage) {
        if self.settle.take().is_some() {
            tracing::debug!("Reset dropped an in-flight drain");
        }
        self.queue = Some(AnimationQueue::new());
        self.timestamp = 0;
        self.playing = false;
        self.finished = false;

        for light in &level.traffic_lights {
            stage.transition_traffic_light(light.id, light.state, 0);
        }
        for destination in &level.map.destinations {
            stage.transition_destination(destination.id, false, 0);
        }
        for id in 0..self.vans {
            stage.skip_outstanding_animations(id);
            stage.set_vehicle_position(&level.map.start, id);
        }
        stage.remove_wreckage();
        tracing::info!("Animation reset ({} vans)", self.vans);
    }

    pub fn queue(&self) -> Option<&AnimationQueue> {
        self.queue.as_ref()
    }

    pub fn queue_mut(&mut self) -> Result<&mut AnimationQueue, SchedulerError> {
        self.queue.as_mut().ok_or(SchedulerError::NotReset)
    }

    /// Swap in a prepared queue (e.g. an imported one) and rewind to its start
    pub fn replace_queue(&mut self, queue: AnimationQueue) -> Result<(), SchedulerError> {
        if self.queue.is_none() {
            return Err(SchedulerError::NotReset);
        }
        self.settle = None;
        self.queue = Some(queue);
        self.timestamp = 0;
        self.playing = false;
        self.finished = false;
        Ok(())
    }

    /// Add an event to the current write timestamp
    pub fn append_event(&mut self, event: AnimationEvent) -> Result<(), SchedulerError> {
        self.queue_mut()?.append(event);
        Ok(())
    }

    /// Open the next write timestamp; returns its index
    pub fn advance_timestamp(&mut self) -> Result<usize, SchedulerError> {
        Ok(self.queue_mut()?.start_new_timestamp())
    }

    /// Start continuous playback. No-op while playing or draining.
    pub fn play(&mut self, stage: &mut dyn Stage) {
        let Some(queue) = &self.queue else {
            tracing::warn!("play() before reset ignored");
            return;
        };
        if self.is_animating() || self.playing || queue.is_empty() {
            return;
        }
        self.playing = true;
        self.step(stage, None);
    }

    /// Stop after the drain in flight; never cuts it short
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Dispatch the bucket at the read cursor and arm its settle delay.
    /// Ignored while another drain is settling.
    pub fn step(&mut self, stage: &mut dyn Stage, on_complete: Option<StepCallback>) {
        if self.settle.is_some() {
            tracing::trace!("Step ignored, drain in flight");
            return;
        }
        if self.queue.is_none() {
            tracing::warn!("step() before reset ignored");
            return;
        }

        let mut max_delay = self.dispatcher.playback().default_animation_ms;

        let bucket = self
            .queue
            .as_mut()
            .and_then(|q| q.take_bucket(self.timestamp));
        if let Some(events) = bucket {
            tracing::debug!("Timestamp {}: {} events", self.timestamp, events.len());
            for event in events {
                let delay = self.dispatcher.dispatch(event, stage);
                max_delay = max_delay.max(delay);
            }
            self.timestamp += 1;
        }

        let len = self.queue.as_ref().map_or(0, AnimationQueue::len);
        if self.timestamp >= len {
            if !self.finished {
                tracing::info!("Playback finished after {} timestamps", len);
            }
            self.playing = false;
            self.finished = true;
        }

        self.settle = Some(Settle {
            remaining_ms: max_delay,
            on_complete,
        });
    }

    /// Let `dt_ms` of time pass. Time left over after a settle ends counts
    /// towards the next one, so one long tick can drain several buckets.
    pub fn tick(&mut self, dt_ms: u32, stage: &mut dyn Stage) {
        let mut budget = dt_ms;
        while let Some(settle) = self.settle.as_mut() {
            if budget < settle.remaining_ms {
                settle.remaining_ms -= budget;
                return;
            }
            budget -= settle.remaining_ms;

            let Some(Settle { on_complete, .. }) = self.settle.take() else {
                return;
            };
            if let Some(callback) = on_complete {
                callback();
            }
            if self.playing {
                self.step(stage, None);
            }
        }
    }

    /// Feed the time reported by a tick source
    pub fn pump(&mut self, ticks: &mut dyn TickSource, stage: &mut dyn Stage) {
        let dt = ticks.elapsed_ms();
        if dt > 0 {
            tracing::trace!("Tick {}ms", dt);
            self.tick(dt, stage);
        }
    }

    /// Skip straight past every pending settle (and the drains they chain into)
    pub fn fast_forward(&mut self, stage: &mut dyn Stage) {
        while let Some(remaining) = self.settle_remaining_ms() {
            self.tick(remaining, stage);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True while a drained bucket's settle delay is pending
    pub fn is_animating(&self) -> bool {
        self.settle.is_some()
    }

    pub fn settle_remaining_ms(&self) -> Option<u32> {
        self.settle.as_ref().map(|s| s.remaining_ms)
    }

    /// Read cursor
    pub fn timestamp(&self) -> usize {
        self.timestamp
    }

    /// Write cursor
    pub fn last_timestamp(&self) -> usize {
        self.queue.as_ref().map_or(0, AnimationQueue::last_timestamp)
    }

    pub fn state(&self) -> PlaybackState {
        if self.queue.is_none() {
            PlaybackState::NotStarted
        } else if self.settle.is_some() {
            PlaybackState::Draining
        } else if self.finished {
            PlaybackState::Finished
        } else {
            PlaybackState::Idle
        }
    }
}
