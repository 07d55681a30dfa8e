#![forbid(unsafe_code)]

// Harness - spawns simulated players, paces their actions, stops them on deadline or Ctrl+C

pub mod selector;

use crate::client::{GameApi, HttpGameApi, RealtimeConnector, WsConnector};
use crate::config::LoadConfig;
use crate::metrics::{ActionCounters, LoadSummary};
use crate::session::PlayerSession;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, warn};

pub use selector::{Pacing, TaskSelector};

/// Everything one simulated user needs from the harness.
pub struct UserContext<A, C> {
    pub label: String,
    pub api: Arc<A>,
    pub connector: Arc<C>,
    pub selector: Arc<TaskSelector>,
    pub pacing: Pacing,
    pub counters: Arc<ActionCounters>,
    pub shutdown: watch::Receiver<bool>,
}

/// Runs the whole load test and returns the outcome counts.
pub async fn run_load_test(config: LoadConfig) -> Result<LoadSummary> {
    config.validate()?;

    let api = Arc::new(HttpGameApi::new(config.base_url()?, config.request_timeout)?);
    let connector = Arc::new(WsConnector::new(
        config.realtime_url()?.as_str(),
        config.request_timeout,
    ));
    let selector = Arc::new(TaskSelector::new(&config.weights)?);
    let pacing = config.pacing()?;
    let counters = Arc::new(ActionCounters::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    info!(
        "Starting {} users against {} for {}s",
        config.users,
        config.host,
        config.duration.as_secs()
    );

    let started = Instant::now();
    let mut handles = Vec::with_capacity(config.users);
    for i in 0..config.users {
        let ctx = UserContext {
            label: format!("user-{i}"),
            api: api.clone(),
            connector: connector.clone(),
            selector: selector.clone(),
            pacing,
            counters: counters.clone(),
            shutdown: shutdown_rx.clone(),
        };
        handles.push(tokio::spawn(run_user(ctx, StdRng::from_entropy())));
    }

    tokio::select! {
        _ = sleep(config.duration) => {
            info!("Test duration elapsed, stopping users");
        }
        _ = interrupted(tokio::signal::ctrl_c()) => {
            info!("Received Ctrl+C, stopping users");
        }
    }
    shutdown_tx.send_replace(true);

    for handle in handles {
        if let Err(e) = handle.await {
            warn!("User task ended abnormally: {}", e);
        }
    }

    info!("All users stopped");
    Ok(counters.summary(config.users, started.elapsed()))
}

/// One user's lifetime: pick, run, wait, repeat until shutdown, then tear down.
///
/// Shutdown interrupts an in-flight action as well as the pacing wait.
pub async fn run_user<A, C>(ctx: UserContext<A, C>, mut rng: StdRng)
where
    A: GameApi,
    C: RealtimeConnector,
{
    let UserContext {
        label,
        api,
        connector,
        selector,
        pacing,
        counters,
        mut shutdown,
    } = ctx;

    let session_rng = StdRng::seed_from_u64(rng.gen());
    let mut session = PlayerSession::new(api, connector, session_rng, counters);
    info!("{}: Session started as {}", label, session.state().player_name);

    loop {
        if stop_requested(&shutdown) {
            break;
        }

        let task = selector.pick(&mut rng);
        tokio::select! {
            _ = session.run(task) => {}
            _ = wait_for_shutdown(&mut shutdown) => break,
        }

        let delay = pacing.delay(&mut rng);
        tokio::select! {
            _ = sleep(delay) => {}
            _ = wait_for_shutdown(&mut shutdown) => break,
        }
    }

    session.teardown().await;
    info!("{}: Session stopped", label);
}

/// Resolves when Ctrl+C arrives. If the handler cannot be installed, never
/// resolves, so the run lasts until its deadline.
async fn interrupted(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        warn!("Cannot listen for Ctrl+C, running until the deadline: {}", e);
        std::future::pending::<()>().await;
    }
}

fn stop_requested(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Resolves once shutdown is signalled or the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeConnector, FakeGameApi};
    use crate::session::{Action, TaskWeights};
    use std::time::Duration;

    fn context(
        api: Arc<FakeGameApi>,
        connector: Arc<FakeConnector>,
        weights: TaskWeights,
        counters: Arc<ActionCounters>,
        shutdown: watch::Receiver<bool>,
    ) -> UserContext<FakeGameApi, FakeConnector> {
        UserContext {
            label: "user-test".to_string(),
            api,
            connector,
            selector: Arc::new(TaskSelector::new(&weights).unwrap()),
            pacing: Pacing::new(Duration::from_millis(1), Duration::from_millis(2)).unwrap(),
            counters,
            shutdown,
        }
    }

    #[tokio::test]
    async fn test_user_runs_until_shutdown_then_tears_down() {
        let api = Arc::new(FakeGameApi::new());
        let connector = Arc::new(FakeConnector::new());
        let counters = Arc::new(ActionCounters::new());
        let (tx, rx) = watch::channel(false);

        // Only create is ever picked: first run creates, joins and connects,
        // every later run is skipped by the in-game guard.
        let weights = TaskWeights::parse("1,0,0,0").unwrap();
        let ctx = context(api.clone(), connector.clone(), weights, counters.clone(), rx);
        let handle = tokio::spawn(run_user(ctx, StdRng::seed_from_u64(9)));

        sleep(Duration::from_millis(100)).await;
        tx.send_replace(true);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("user did not stop")
            .unwrap();

        assert_eq!(counters.stats(Action::CreateGame).succeeded, 1);
        assert!(counters.stats(Action::CreateGame).skipped >= 1);
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.closes(), 1);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_signal_setup_failure_does_not_stop_run() {
        let broken = async { Err::<(), _>(std::io::Error::other("no signal driver")) };
        let waited = tokio::time::timeout(Duration::from_millis(50), interrupted(broken)).await;
        assert!(waited.is_err());

        let delivered = async { Ok::<(), std::io::Error>(()) };
        tokio::time::timeout(Duration::from_secs(1), interrupted(delivered))
            .await
            .expect("delivered signal should resolve");
    }

    #[tokio::test]
    async fn test_user_stops_when_already_signalled() {
        let api = Arc::new(FakeGameApi::new());
        let connector = Arc::new(FakeConnector::new());
        let counters = Arc::new(ActionCounters::new());
        let (tx, rx) = watch::channel(true);

        let ctx = context(
            api.clone(),
            connector.clone(),
            TaskWeights::default(),
            counters,
            rx,
        );
        run_user(ctx, StdRng::seed_from_u64(1)).await;
        drop(tx);

        assert!(api.calls().is_empty());
        assert_eq!(connector.closes(), 0);
    }

    #[tokio::test]
    async fn test_user_stops_when_sender_dropped() {
        let api = Arc::new(FakeGameApi::new());
        let connector = Arc::new(FakeConnector::new());
        let counters = Arc::new(ActionCounters::new());
        let (tx, rx) = watch::channel(false);

        let ctx = context(api, connector, TaskWeights::default(), counters, rx);
        let handle = tokio::spawn(run_user(ctx, StdRng::seed_from_u64(2)));
        sleep(Duration::from_millis(20)).await;
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("user did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_vote_failures_force_recreate() {
        let mut api = FakeGameApi::new();
        api.vote_reply = Some(404);
        let api = Arc::new(api);
        let connector = Arc::new(FakeConnector::new());
        let counters = Arc::new(ActionCounters::new());
        let (tx, rx) = watch::channel(false);

        let weights = TaskWeights::parse("1,0,1,0").unwrap();
        let ctx = context(api, connector.clone(), weights, counters.clone(), rx);
        let handle = tokio::spawn(run_user(ctx, StdRng::seed_from_u64(5)));

        sleep(Duration::from_millis(200)).await;
        tx.send_replace(true);
        handle.await.unwrap();

        // Each failed vote drops the game, so create keeps firing again
        assert!(counters.stats(Action::SubmitVote).failed >= 1);
        assert!(counters.stats(Action::CreateGame).succeeded >= 2);
        // The realtime channel stays open across games and is closed once
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.closes(), 1);
    }
}
