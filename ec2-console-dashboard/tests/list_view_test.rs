// List page controller against the simulated backend

mod common;

use common::{config, ScriptedApi, SimulatedApi, DB, WEB};
use ec2_console_common::{ControlAction, InstanceState};
use ec2_console_dashboard::{ListView, LoadState, Notice, ViewError};
use ec2_console_providers::mock::default_catalog;
use std::sync::Arc;
use std::time::Duration;

fn state_in(view: &ListView, id: &str) -> InstanceState {
    view.snapshot()
        .instances()
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.state.clone())
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_mount_loads_catalog() {
    let api = Arc::new(SimulatedApi::new());
    let view = ListView::new(api.clone(), &config());
    assert_eq!(view.snapshot().load_state(), &LoadState::Idle);

    view.mount().await;

    let model = view.snapshot();
    assert_eq!(model.load_state(), &LoadState::Loaded);
    assert_eq!(model.instances().len(), 4);
    assert_eq!(api.list_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_then_refresh_shows_running() {
    let api = Arc::new(SimulatedApi::new());
    let view = ListView::new(api.clone(), &config());
    view.mount().await;

    view.toggle(DB);
    view.submit(ControlAction::Start).await.unwrap();

    let model = view.snapshot();
    assert_eq!(
        model.notice(),
        Some(&Notice::Confirmation("Instances are starting".into()))
    );
    assert!(model.selection().is_empty());
    assert!(!model.action_pending());
    assert!(view.has_scheduled_refresh());
    // nothing re-fetched yet
    assert_eq!(state_in(&view, DB), InstanceState::Stopped);

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert_eq!(api.list_calls(), 1);

    // refresh fires at 2000 ms, the list itself takes 500 ms
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(api.list_calls(), 2);
    assert_eq!(state_in(&view, DB), InstanceState::Running);
    assert!(!view.has_scheduled_refresh());
}

#[tokio::test(start_paused = true)]
async fn test_refresh_follows_action_without_mount() {
    let api = Arc::new(SimulatedApi::new());
    let view = ListView::new(api.clone(), &config());
    view.refresh().await;
    view.toggle(WEB);

    view.submit(ControlAction::Stop).await.unwrap();
    assert!(view.has_scheduled_refresh());

    tokio::time::sleep(Duration::from_millis(2600)).await;
    assert_eq!(api.list_calls(), 2);
    assert_eq!(state_in(&view, WEB), InstanceState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_empty_selection_never_calls_relay() {
    let api = Arc::new(SimulatedApi::new());
    let view = ListView::new(api.clone(), &config());
    view.mount().await;

    let err = view.submit(ControlAction::Stop).await.unwrap_err();

    assert_eq!(err, ViewError::EmptySelection);
    assert_eq!(api.control_calls(), 0);
    assert_eq!(
        view.snapshot().notice().map(Notice::text),
        Some("Select the instances to operate on")
    );
    assert!(!view.has_scheduled_refresh());
}

#[tokio::test(start_paused = true)]
async fn test_second_submit_rejected_while_in_flight() {
    let api = Arc::new(SimulatedApi::new());
    let view = ListView::new(api.clone(), &config());
    view.mount().await;
    view.toggle(WEB);

    let (first, second) = tokio::join!(
        view.submit(ControlAction::Stop),
        view.submit(ControlAction::Stop)
    );

    assert_eq!(first, Ok(()));
    assert_eq!(second, Err(ViewError::ActionInFlight));
    assert_eq!(api.control_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_cancels_scheduled_refresh() {
    let api = Arc::new(SimulatedApi::new());
    let view = ListView::new(api.clone(), &config());
    view.mount().await;
    view.toggle(WEB);
    view.submit(ControlAction::Stop).await.unwrap();
    assert!(view.has_scheduled_refresh());

    view.unmount();
    tokio::time::sleep(Duration::from_millis(5000)).await;

    assert!(!view.has_scheduled_refresh());
    assert_eq!(api.list_calls(), 1);
    // the backend still settled on its own
    assert_eq!(api.store().state_of(WEB).await, Some(InstanceState::Stopped));
}

#[tokio::test(start_paused = true)]
async fn test_failed_action_keeps_selection() {
    let api = Arc::new(ScriptedApi::default());
    api.push_list(Duration::from_millis(10), Ok(vec![]));
    let view = ListView::new(api.clone(), &config());
    view.mount().await;
    // selection only accepts listed IDs, so load one first
    api.push_list(Duration::from_millis(10), Ok(default_catalog()));
    view.refresh().await;
    view.toggle(WEB);

    view.submit(ControlAction::Stop).await.unwrap();

    let model = view.snapshot();
    assert_eq!(model.selection(), [WEB]);
    assert!(model.notice().is_some_and(Notice::is_error));
    assert!(!view.has_scheduled_refresh());
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_is_discarded() {
    let api = Arc::new(ScriptedApi::default());
    let catalog = default_catalog();
    api.push_list(Duration::from_millis(1000), Ok(catalog[..1].to_vec()));
    api.push_list(Duration::from_millis(100), Ok(catalog.clone()));
    let view = ListView::new(api.clone(), &config());

    tokio::join!(view.refresh(), view.refresh());

    let model = view.snapshot();
    assert_eq!(model.load_state(), &LoadState::Loaded);
    assert_eq!(model.instances().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_rows() {
    let api = Arc::new(ScriptedApi::default());
    api.push_list(Duration::from_millis(10), Ok(default_catalog()));
    api.push_list(
        Duration::from_millis(10),
        Err(ec2_console_dashboard::ApiFailure {
            status: Some(500),
            message: "Failed to retrieve the EC2 instance list".into(),
        }),
    );
    let view = ListView::new(api.clone(), &config());
    view.mount().await;
    view.refresh().await;

    let model = view.snapshot();
    assert!(model.load_state().error().is_some());
    assert_eq!(model.instances().len(), 4);
}
