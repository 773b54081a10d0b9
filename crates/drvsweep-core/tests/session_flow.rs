//! Integration tests for the session orchestrator.
//!
//! A scripted runner stands in for pnputil so the whole
//! enumerate -> parse -> remove -> reload cycle runs without a process.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use drvsweep_core::{
    CommandError, CommandRunner, ElevationError, ElevationPort, ErrorCategory, SessionDeps,
    SessionError, SessionEvent, SessionEventEmitter, SessionOrchestrator, SessionState, Settings,
    ToolInvocation, ToolOutput,
};

const TWO_DRIVERS: &str = r#"<?xml version="1.0"?>
<PnpUtil>
  <Driver DriverName="oem1.inf">
    <OriginalName>a.inf</OriginalName>
    <Devices count="0"/>
  </Driver>
  <Driver DriverName="oem2.inf">
    <OriginalName>b.inf</OriginalName>
    <Devices><Device/></Devices>
  </Driver>
  <Driver DriverName="machine.inf"><Devices count="0"/></Driver>
</PnpUtil>"#;

const ONE_DRIVER: &str = r#"<PnpUtil><Driver DriverName="oem2.inf"><Devices><Device/></Devices></Driver></PnpUtil>"#;

fn ok(stdout: &str) -> Result<ToolOutput, CommandError> {
    Ok(ToolOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

fn exit(code: i32, stderr: &str) -> Result<ToolOutput, CommandError> {
    Ok(ToolOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

/// Answers enumerations and removals from separate scripts.
#[derive(Default)]
struct FakePnpUtil {
    enumerations: Mutex<VecDeque<Result<ToolOutput, CommandError>>>,
    removals: Mutex<VecDeque<Result<ToolOutput, CommandError>>>,
    calls: Mutex<Vec<ToolInvocation>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
}

impl FakePnpUtil {
    fn new() -> Self {
        Self::default()
    }

    fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn enumerate(self, result: Result<ToolOutput, CommandError>) -> Self {
        self.enumerations.lock().unwrap().push_back(result);
        self
    }

    fn remove(self, result: Result<ToolOutput, CommandError>) -> Self {
        self.removals.lock().unwrap().push_back(result);
        self
    }

    fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    fn removal_targets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.first().map(String::as_str) == Some("/delete-driver"))
            .map(|c| c.args[1].clone())
            .collect()
    }

    fn enumeration_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) == Some("/enum-drivers"))
            .count()
    }
}

#[async_trait]
impl CommandRunner for FakePnpUtil {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, CommandError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(invocation.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let script = if invocation.args.first().map(String::as_str) == Some("/enum-drivers") {
            &self.enumerations
        } else {
            &self.removals
        };
        let result = script.lock().unwrap().pop_front().unwrap_or_else(|| ok(""));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

struct FixedElevation(bool);

impl ElevationPort for FixedElevation {
    fn is_elevated(&self) -> bool {
        self.0
    }

    fn relaunch_elevated(&self) -> Result<(), ElevationError> {
        Err(ElevationError::Unsupported("test".to_string()))
    }
}

#[derive(Default)]
struct CollectingEmitter {
    events: Mutex<Vec<SessionEvent>>,
}

impl CollectingEmitter {
    fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SessionEventEmitter for CollectingEmitter {
    fn emit(&self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn build(runner: Arc<FakePnpUtil>) -> (Arc<SessionOrchestrator>, Arc<CollectingEmitter>) {
    let events = Arc::new(CollectingEmitter::default());
    let session = SessionOrchestrator::new(SessionDeps {
        runner,
        elevation: Arc::new(FixedElevation(true)),
        events: events.clone(),
        settings: Settings::default(),
    });
    (Arc::new(session), events)
}

#[tokio::test]
async fn load_surfaces_only_oem_records() {
    let runner = Arc::new(FakePnpUtil::new().enumerate(ok(TWO_DRIVERS)));
    let (session, events) = build(runner.clone());

    let inventory = session.load_inventory().await.unwrap();
    let names: Vec<_> = inventory.iter().map(|r| r.package_name.as_str()).collect();
    assert_eq!(names, ["oem1.inf", "oem2.inf"]);
    assert_eq!(inventory[0].usage_count, 0);
    assert_eq!(inventory[1].usage_count, 1);

    assert_eq!(session.state(), SessionState::Ready);
    assert!(events.events().contains(&SessionEvent::InventoryLoaded { count: 2, unused: 1 }));
}

#[tokio::test]
async fn empty_selection_is_rejected_without_process_calls() {
    let runner = Arc::new(FakePnpUtil::new());
    let (session, _) = build(runner.clone());

    let err = session.remove_selected(Vec::<String>::new()).await.unwrap_err();
    assert_eq!(err, SessionError::NoSelection);
    assert_eq!(err.category(), ErrorCategory::NoSelection);

    let err = session.remove_selected(["", "  "]).await.unwrap_err();
    assert_eq!(err, SessionError::NoSelection);

    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn batch_attempts_every_item_then_reloads_once() {
    let runner = Arc::new(
        FakePnpUtil::new()
            .enumerate(ok(TWO_DRIVERS))
            .remove(ok("Driver package deleted successfully."))
            .remove(exit(1, "One or more devices are presently installed using the specified INF."))
            .remove(ok("Driver package deleted successfully."))
            .enumerate(ok(ONE_DRIVER)),
    );
    let (session, events) = build(runner.clone());
    session.load_inventory().await.unwrap();

    let report = session
        .remove_selected(["oem1.inf", "oem2.inf", "oem9.inf"])
        .await
        .unwrap();

    assert_eq!(runner.removal_targets(), ["oem1.inf", "oem2.inf", "oem9.inf"]);
    assert_eq!(runner.enumeration_count(), 2);

    let results: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| (o.package_name.as_str(), o.succeeded))
        .collect();
    assert_eq!(
        results,
        [("oem1.inf", true), ("oem2.inf", false), ("oem9.inf", true)]
    );
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.all_succeeded());
    assert!(report.outcomes[1].diagnostic_text.contains("presently installed"));

    let refreshed = report.refresh.as_ref().unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(session.inventory().len(), 1);

    // The reload is strictly after the last removal.
    let calls = runner.calls();
    assert_eq!(calls.last().unwrap().args[0], "/enum-drivers");

    // Per-item outcomes are reported in call order.
    let completed: Vec<_> = events
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SessionEvent::RemovalCompleted { outcome } => Some(outcome.package_name),
            _ => None,
        })
        .collect();
    assert_eq!(completed, ["oem1.inf", "oem2.inf", "oem9.inf"]);
}

#[tokio::test]
async fn launch_failure_does_not_abort_batch() {
    let runner = Arc::new(
        FakePnpUtil::new()
            .remove(Err(CommandError::Launch {
                program: "pnputil".to_string(),
                reason: "not found".to_string(),
            }))
            .remove(ok(""))
            .enumerate(ok(ONE_DRIVER)),
    );
    let (session, _) = build(runner.clone());

    let report = session.remove_selected(["oem1.inf", "oem2.inf"]).await.unwrap();
    assert_eq!(runner.removal_targets().len(), 2);
    assert!(!report.outcomes[0].succeeded);
    assert!(report.outcomes[1].succeeded);
    assert_eq!(runner.enumeration_count(), 1);
}

#[tokio::test]
async fn duplicate_names_attempted_once_in_order() {
    let runner = Arc::new(FakePnpUtil::new());
    let (session, _) = build(runner.clone());

    session
        .remove_selected(["oem3.inf", "oem1.inf", "oem3.inf"])
        .await
        .unwrap();
    assert_eq!(runner.removal_targets(), ["oem3.inf", "oem1.inf"]);
}

#[tokio::test]
async fn failed_reload_keeps_previous_snapshot() {
    let runner = Arc::new(
        FakePnpUtil::new()
            .enumerate(ok(TWO_DRIVERS))
            .enumerate(ok("<PnpUtil><Driver DriverName=\"oem1.inf\">"))
            .enumerate(exit(5, "Access is denied.")),
    );
    let (session, events) = build(runner);
    let first = session.load_inventory().await.unwrap();

    let err = session.load_inventory().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Parse);
    assert_eq!(session.state(), SessionState::Ready);
    assert!(Arc::ptr_eq(&first, &session.inventory()));

    let err = session.load_inventory().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Enumeration);
    assert_eq!(err.diagnostic(), "Access is denied.");
    assert!(Arc::ptr_eq(&first, &session.inventory()));

    assert!(events.events().iter().any(|e| matches!(
        e,
        SessionEvent::InventoryFailed {
            category: ErrorCategory::Parse,
            ..
        }
    )));
}

#[tokio::test]
async fn first_load_failure_leaves_session_uninitialized() {
    let runner = Arc::new(
        FakePnpUtil::new()
            .enumerate(exit(2, ""))
            .enumerate(ok(ONE_DRIVER)),
    );
    let (session, _) = build(runner);

    let err = session.load_inventory().await.unwrap_err();
    assert_eq!(err.diagnostic(), "exited with code 2");
    assert_eq!(session.state(), SessionState::Uninitialized);
    assert!(session.inventory().is_empty());

    // Recoverable: a retry is allowed.
    assert!(session.load_inventory().await.is_ok());
    assert_eq!(session.state(), SessionState::Ready);
}

#[tokio::test]
async fn reload_after_batch_reports_parse_failure() {
    let runner = Arc::new(
        FakePnpUtil::new()
            .enumerate(ok(TWO_DRIVERS))
            .remove(ok(""))
            .enumerate(ok("garbage")),
    );
    let (session, _) = build(runner);
    session.load_inventory().await.unwrap();

    let report = session.remove_selected(["oem1.inf"]).await.unwrap();
    assert!(report.all_succeeded());
    assert_eq!(report.refresh.unwrap_err().category(), ErrorCategory::Parse);
    assert_eq!(session.inventory().len(), 2);
}

#[tokio::test]
async fn not_elevated_session_declines_removals() {
    let runner = Arc::new(FakePnpUtil::new());
    let session = SessionOrchestrator::new(SessionDeps {
        runner: runner.clone(),
        elevation: Arc::new(FixedElevation(false)),
        events: Arc::new(CollectingEmitter::default()),
        settings: Settings::default(),
    });

    let report = session.remove_selected(["oem1.inf"]).await.unwrap();
    assert!(!report.outcomes[0].succeeded);
    assert!(runner.removal_targets().is_empty());
    // The post-batch reload still happens.
    assert_eq!(runner.enumeration_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_operations_are_serialized() {
    let runner = Arc::new(
        (0..4).fold(FakePnpUtil::with_delay(Duration::from_millis(20)), |fake, _| {
            fake.enumerate(ok(ONE_DRIVER))
        }),
    );
    let (session, _) = build(runner.clone());

    let batch = session.spawn_remove(vec!["oem1.inf".to_string(), "oem2.inf".to_string()]);
    let loads: Vec<_> = (0..3).map(|_| session.spawn_load()).collect();

    batch.await.unwrap().unwrap();
    for load in loads {
        load.await.unwrap().unwrap();
    }

    assert_eq!(runner.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(runner.calls().len(), 2 + 1 + 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn readers_see_whole_snapshots() {
    let runner = Arc::new(
        FakePnpUtil::with_delay(Duration::from_millis(5))
            .enumerate(ok(TWO_DRIVERS))
            .enumerate(ok(ONE_DRIVER)),
    );
    let (session, _) = build(runner);

    let load = session.spawn_load();
    let reload = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            let _ = session.load_inventory().await;
        })
    };

    for _ in 0..50 {
        let snapshot = session.inventory();
        assert!(matches!(snapshot.len(), 0..=2));
        assert!(snapshot.iter().all(|r| r.package_name.starts_with("oem")));
        tokio::task::yield_now().await;
    }

    load.await.unwrap().unwrap();
    reload.await.unwrap();
}
