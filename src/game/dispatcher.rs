//! Single-threaded game loop and the handle HTTP handlers use to reach it.
//!
//! ```text
//!  axum handlers (tokio workers)          scripty-game-thread
//!  ┌──────────────────────────┐   mpsc   ┌──────────────────────────────┐
//!  │ Dispatcher::submit/call  │ ───────▶ │ every tick: engine.tick(),   │
//!  │                          │ ◀─────── │ then run queued tasks in     │
//!  └──────────────────────────┘ oneshot  │ order, one at a time         │
//!                                        └──────────────────────────────┘
//! ```
//!
//! The engine is moved onto the game thread and never shared, so world state
//! needs no locks. `call` waits for a result with a timeout; `submit` does not
//! wait at all.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::GameEngine;

type Task = Box<dyn FnOnce(&mut dyn GameEngine) + Send + 'static>;

struct QueuedTask {
    id: Uuid,
    label: &'static str,
    run: Task,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("game thread is not running")]
    Closed,

    #[error("game thread did not run the task within {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("task panicked: {0}")]
    TaskPanicked(String),

    #[error("game thread dropped the task before it completed")]
    Dropped,
}

#[derive(Debug, Default)]
struct Stats {
    ticks: AtomicU64,
    queued: AtomicUsize,
}

/// Cloneable handle for queueing work onto the game thread
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<QueuedTask>,
    stats: Arc<Stats>,
}

impl Dispatcher {
    /// Queue a task without waiting for it. The returned id shows up in the
    /// game thread's logs.
    pub fn submit<F>(&self, label: &'static str, task: F) -> Result<Uuid, DispatchError>
    where
        F: FnOnce(&mut dyn GameEngine) + Send + 'static,
    {
        let id = Uuid::new_v4();
        self.stats.queued.fetch_add(1, Ordering::SeqCst);

        let queued = QueuedTask {
            id,
            label,
            run: Box::new(task),
        };
        if self.tx.send(queued).is_err() {
            self.stats.queued.fetch_sub(1, Ordering::SeqCst);
            return Err(DispatchError::Closed);
        }

        debug!(task_id = %id, label, "queued game-thread task");
        Ok(id)
    }

    /// Queue a task and wait up to `timeout` for its result.
    ///
    /// On timeout the task stays queued and still runs later; its result is
    /// discarded.
    pub async fn call<F, T>(&self, label: &'static str, timeout: Duration, task: F) -> Result<T, DispatchError>
    where
        F: FnOnce(&mut dyn GameEngine) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        self.submit(label, move |engine| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(engine)))
                .map_err(|payload| panic_message(payload.as_ref()));
            // The caller may have timed out already
            let _ = result_tx.send(outcome);
        })?;

        match tokio::time::timeout(timeout, result_rx).await {
            Err(_) => Err(DispatchError::Timeout(timeout)),
            Ok(Err(_)) => Err(DispatchError::Dropped),
            Ok(Ok(Err(message))) => Err(DispatchError::TaskPanicked(message)),
            Ok(Ok(Ok(value))) => Ok(value),
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.stats.ticks.load(Ordering::SeqCst)
    }

    /// Tasks submitted but not yet started
    pub fn queued(&self) -> usize {
        self.stats.queued.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns the game thread. Dropping it stops the loop.
pub struct GameThread {
    dispatcher: Dispatcher,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GameThread {
    pub fn spawn<E>(engine: E, tick_interval: Duration) -> std::io::Result<Self>
    where
        E: GameEngine + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let stats = Arc::new(Stats::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let stats = Arc::clone(&stats);
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("scripty-game-thread".to_string())
                .spawn(move || run_loop(engine, rx, stats, shutdown, tick_interval))?
        };

        info!(tick_interval_ms = tick_interval.as_millis() as u64, "game thread started");

        Ok(Self {
            dispatcher: Dispatcher { tx, stats },
            shutdown,
            handle: Some(handle),
        })
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Run whatever is already queued, stop the loop, and join the thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("game thread exited with a panic");
            }
            info!("game thread stopped");
        }
    }
}

impl Drop for GameThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop<E: GameEngine>(
    mut engine: E,
    mut rx: mpsc::UnboundedReceiver<QueuedTask>,
    stats: Arc<Stats>,
    shutdown: Arc<AtomicBool>,
    tick_interval: Duration,
) {
    let mut next_tick = Instant::now() + tick_interval;

    loop {
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }
        // Skip missed ticks instead of bursting to catch up
        next_tick = next_tick.max(Instant::now()) + tick_interval;

        engine.tick();
        stats.ticks.fetch_add(1, Ordering::SeqCst);

        // Only what was queued before this tick started; work submitted while
        // draining waits for the next tick
        let due = stats.queued.load(Ordering::SeqCst);
        for _ in 0..due {
            match rx.try_recv() {
                Ok(task) => run_task(&mut engine, task, &stats),
                Err(_) => break,
            }
        }

        if shutdown.load(Ordering::SeqCst) {
            rx.close();
            while let Ok(task) = rx.try_recv() {
                run_task(&mut engine, task, &stats);
            }
            return;
        }
    }
}

fn run_task(engine: &mut dyn GameEngine, task: QueuedTask, stats: &Stats) {
    stats.queued.fetch_sub(1, Ordering::SeqCst);

    let QueuedTask { id, label, run } = task;
    let started = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(|| run(engine))) {
        Ok(()) => debug!(task_id = %id, label, elapsed_us = started.elapsed().as_micros() as u64, "game-thread task finished"),
        Err(payload) => warn!(task_id = %id, label, "game-thread task panicked: {}", panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BlockPos, InMemoryEngine, Material};

    const FAST_TICK: Duration = Duration::from_millis(2);
    const WAIT: Duration = Duration::from_secs(5);

    fn engine() -> InMemoryEngine {
        InMemoryEngine::with_worlds(["world"])
    }

    #[tokio::test]
    async fn test_call_returns_task_result() {
        let game = GameThread::spawn(engine(), FAST_TICK).unwrap();
        let dispatcher = game.dispatcher();

        let has_world = dispatcher.call("probe", WAIT, |engine| engine.has_world("world")).await;
        assert_eq!(has_world, Ok(true));
        game.shutdown();
    }

    #[tokio::test]
    async fn test_tasks_run_in_submission_order() {
        let game = GameThread::spawn(engine(), FAST_TICK).unwrap();
        let dispatcher = game.dispatcher();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..20 {
            let order = Arc::clone(&order);
            dispatcher
                .submit("record", move |_| order.lock().unwrap().push(i))
                .unwrap();
        }
        dispatcher.call("flush", WAIT, |_| ()).await.unwrap();

        assert_eq!(*order.lock().unwrap(), (0..20).collect::<Vec<_>>());
        game.shutdown();
    }

    #[tokio::test]
    async fn test_panicking_task_does_not_stop_the_loop() {
        let game = GameThread::spawn(engine(), FAST_TICK).unwrap();
        let dispatcher = game.dispatcher();

        dispatcher.submit("boom", |_| panic!("fire-and-forget boom")).unwrap();
        let err = dispatcher
            .call("boom", WAIT, |_| -> () { panic!("engine exploded") })
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::TaskPanicked("engine exploded".to_string()));

        let placed = dispatcher
            .call("place", WAIT, |engine| {
                let pos = BlockPos::new(0, 64, 0);
                engine.load_chunk("world", pos.chunk())?;
                engine.set_block("world", pos, Material::Stone)
            })
            .await
            .unwrap();
        assert_eq!(placed, Ok(true));
        game.shutdown();
    }

    #[tokio::test]
    async fn test_call_times_out_when_not_ticked() {
        let game = GameThread::spawn(engine(), Duration::from_secs(3600)).unwrap();
        let dispatcher = game.dispatcher();

        let err = dispatcher
            .call("slow", Duration::from_millis(20), |_| ())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::Timeout(Duration::from_millis(20)));
        assert_eq!(dispatcher.queued(), 1);
        // Dropping `game` here would block for an hour; leak the thread instead
        std::mem::forget(game);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_rejected() {
        let game = GameThread::spawn(engine(), FAST_TICK).unwrap();
        let dispatcher = game.dispatcher();
        game.shutdown();

        assert!(dispatcher.is_closed());
        assert_eq!(dispatcher.submit("late", |_| ()), Err(DispatchError::Closed));
        assert_eq!(dispatcher.queued(), 0);
    }

    #[tokio::test]
    async fn test_ticks_advance() {
        let game = GameThread::spawn(engine(), FAST_TICK).unwrap();
        let dispatcher = game.dispatcher();
        dispatcher.call("a", WAIT, |_| ()).await.unwrap();
        dispatcher.call("b", WAIT, |_| ()).await.unwrap();
        assert!(dispatcher.current_tick() >= 2);
        game.shutdown();
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
