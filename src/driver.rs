use crate::config::EngineConfig;
use crate::phase::PhaseTable;
use crate::store::{Action, MissionSnapshot, MissionStore, SystemStatusUpdate};
use crate::synth::Synthesizer;
use crate::telemetry::MissionClock;
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Shared handle to the single mission store
pub type StoreHandle = Arc<Mutex<MissionStore>>;

/// The state the ticker thread shares with the engine
struct Core {
    store: StoreHandle,
    synth: Mutex<Synthesizer>,
    phases: PhaseTable,
    max_mission_time: Option<u32>,
    launch_epoch: Option<DateTime<Utc>>,
    subscribers: Mutex<Vec<Sender<MissionSnapshot>>>,
    live_timers: AtomicUsize,
}

impl Core {
    /// Advance the mission by one second, returns false if the mission wasn't active
    fn tick(&self) -> bool {
        let snapshot = {
            let mut store = self.store.lock();

            // checked under the lock so a stop always beats the next tick
            if !store.is_active() {
                return false;
            }

            let mission = *store.mission();
            let mission_time = mission.mission_time.saturating_add(1);
            let flight_phase = self.phases.phase_at(mission_time);
            let packet_count = mission.packet_count.saturating_add(1);

            store.dispatch(Action::UpdateMissionTime {
                mission_time,
                flight_phase,
                packet_count,
            });

            let sample = self
                .synth
                .lock()
                .synthesize(mission_time, flight_phase, packet_count);
            let status = SystemStatusUpdate::from_sample(mission_time, &sample);
            tracing::debug!(
                "{} {flight_phase} packet {packet_count} altitude {:.1}m",
                MissionClock(mission_time),
                sample.altitude
            );

            store.dispatch(Action::UpdateTelemetry(sample));
            store.dispatch(Action::UpdateSystemStatus(status));

            if self.max_mission_time.map_or(false, |max| mission_time >= max) {
                tracing::info!("Mission reached {}, stopping.", MissionClock(mission_time));
                store.dispatch(Action::Stop);
            }

            self.has_subscribers().then(|| store.clone())
        };

        if let Some(snapshot) = snapshot {
            self.publish(snapshot);
        }
        true
    }

    fn has_subscribers(&self) -> bool {
        !self.subscribers.lock().is_empty()
    }

    /// send the snapshot to everyone listening, forgetting anyone who hung up
    fn publish(&self, snapshot: MissionSnapshot) {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());

        let dropped = before - subscribers.len();
        if dropped > 0 {
            tracing::debug!("Dropped {dropped} disconnected subscriber(s).");
        }
    }

    fn publish_current(&self) {
        if self.has_subscribers() {
            let snapshot = self.store.lock().clone();
            self.publish(snapshot);
        }
    }
}

/// The recurring timer driving [`Core::tick`]
struct Ticker {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(core: Arc<Core>, period: Duration) -> Result<Self> {
        let (cancel, cancelled) = mpsc::channel::<()>();

        core.live_timers.fetch_add(1, Ordering::SeqCst);
        let thread_core = core.clone();
        let spawned = thread::Builder::new()
            .name("ticker".to_string())
            .spawn(move || {
                loop {
                    match cancelled.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            if !thread_core.tick() {
                                tracing::debug!("Mission no longer active, ticker exiting.");
                                break;
                            }
                        }
                        // cancelled, or the engine went away
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                thread_core.live_timers.fetch_sub(1, Ordering::SeqCst);
            });

        match spawned {
            Ok(handle) => Ok(Self { cancel, handle }),
            Err(e) => {
                core.live_timers.fetch_sub(1, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the timer and wait for any tick in progress to finish
    fn cancel(self) {
        // the thread may have already exited on its own
        let _ = self.cancel.send(());
        if self.handle.join().is_err() {
            tracing::error!("The ticker thread panicked.");
        }
    }
}

/// Runs a mission: owns the store, the synthesizer and the one timer ticking them.
pub struct MissionEngine {
    core: Arc<Core>,
    tick_period: Duration,
    ticker: Option<Ticker>,
}

impl MissionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let store = MissionStore::with_history_capacity(config.history_capacity);
        Self::with_store(config, Arc::new(Mutex::new(store)))
    }

    /// Drive an existing store, e.g. one the display already holds a handle to
    pub fn with_store(config: EngineConfig, store: StoreHandle) -> Result<Self> {
        config.validate()?;

        let synth = match config.seed {
            Some(seed) => Synthesizer::seeded(seed),
            None => Synthesizer::from_entropy(),
        }
        .with_phases(config.phases.clone());

        let core = Core {
            store,
            synth: Mutex::new(synth),
            phases: config.phases,
            max_mission_time: config.max_mission_time,
            launch_epoch: config.launch_epoch,
            subscribers: Mutex::new(vec![]),
            live_timers: AtomicUsize::new(0),
        };

        Ok(Self {
            core: Arc::new(core),
            tick_period: config.tick_period,
            ticker: None,
        })
    }

    pub fn store(&self) -> StoreHandle {
        self.core.store.clone()
    }

    pub fn snapshot(&self) -> MissionSnapshot {
        self.core.store.lock().clone()
    }

    /// Receive a snapshot after every tick and every control action
    pub fn subscribe(&self) -> Receiver<MissionSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.core.subscribers.lock().push(tx);
        rx
    }

    /// Start a fresh mission and the timer that ticks it.
    /// Starting while already running restarts the mission on a single timer.
    pub fn start(&mut self) -> Result<()> {
        self.cancel_ticker();
        self.begin();

        self.ticker = Some(Ticker::spawn(self.core.clone(), self.tick_period)?);
        tracing::info!("Mission started, ticking every {:?}.", self.tick_period);
        Ok(())
    }

    /// Start a fresh mission without a timer, advance it with [`MissionEngine::tick`]
    pub fn start_stepped(&mut self) {
        self.cancel_ticker();
        self.begin();
        tracing::info!("Mission started in stepped mode.");
    }

    pub fn stop(&mut self) {
        self.core.store.lock().dispatch(Action::Stop);
        self.cancel_ticker();
        tracing::info!("Mission stopped.");
        self.core.publish_current();
    }

    pub fn reset(&mut self) {
        self.core.store.lock().dispatch(Action::Reset);
        self.cancel_ticker();
        tracing::info!("Mission reset.");
        self.core.publish_current();
    }

    /// Run one tick now, returns false if the mission isn't active
    pub fn tick(&self) -> bool {
        self.core.tick()
    }

    /// Route an operator action: lifecycle actions go through the timer
    /// handling, everything else straight to the store.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Start => self.start()?,
            Action::Stop => self.stop(),
            Action::Reset => self.reset(),
            action => {
                self.core.store.lock().dispatch(action);
                self.core.publish_current();
            }
        }
        Ok(())
    }

    pub fn has_live_timer(&self) -> bool {
        self.ticker.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Number of timer threads currently running
    pub fn live_timers(&self) -> usize {
        self.core.live_timers.load(Ordering::SeqCst)
    }

    /// Tear the timer down, the store is left as it is
    pub fn shutdown(&mut self) {
        if self.ticker.is_some() {
            tracing::debug!("Shutting down the mission timer.");
        }
        self.cancel_ticker();
    }

    fn begin(&mut self) {
        let epoch = self.core.launch_epoch.unwrap_or_else(Utc::now);
        let flight_phase = self.core.phases.phase_at(0);

        {
            let mut store = self.core.store.lock();
            store.dispatch(Action::Start);
            store.dispatch(Action::UpdateMissionTime {
                mission_time: 0,
                flight_phase,
                packet_count: 0,
            });
            self.core.synth.lock().set_epoch(epoch);
        }

        self.core.publish_current();
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

impl Drop for MissionEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
