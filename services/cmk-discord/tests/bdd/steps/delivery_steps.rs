//! BDD step definitions for webhook delivery

use std::sync::Arc;

use cucumber::{given, then, when};

use cmk_discord::io::HttpClient;
use cmk_discord::NotifyError;

use crate::world::{NotifyWorld, RecordingWebhook};

#[given(expr = "the webhook responds with status {int} and body {string}")]
fn webhook_responds(world: &mut NotifyWorld, status: u16, body: String) {
    world.webhook = Some(Arc::new(RecordingWebhook::new(status, &body)));
}

#[when("the notification is sent")]
async fn send_notification(world: &mut NotifyWorld) {
    let webhook = world
        .webhook
        .get_or_insert_with(|| Arc::new(RecordingWebhook::new(204, "")))
        .clone();
    let http: Arc<dyn HttpClient> = webhook;
    world.result = Some(cmk_discord::run(world.env.clone(), http).await);
}

#[then("the notification should succeed")]
fn notification_succeeds(world: &mut NotifyWorld) {
    let result = world.result.as_ref().expect("no result");
    result.as_ref().unwrap();
}

#[then(expr = "the delivery should fail with status {int} and body {string}")]
fn delivery_fails(world: &mut NotifyWorld, expected_status: u16, expected_body: String) {
    match world.result.as_ref().expect("no result") {
        Err(NotifyError::Delivery { status, body }) => {
            assert_eq!(*status, expected_status);
            assert_eq!(*body, expected_body);
        }
        other => panic!("expected a delivery error, got {other:?}"),
    }
}

#[then("the run should fail with a configuration error")]
fn fails_with_config_error(world: &mut NotifyWorld) {
    match world.result.as_ref().expect("no result") {
        Err(err @ NotifyError::Config(_)) => assert_eq!(err.exit_code(), 2),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[then(expr = "the run should fail with missing field {string}")]
fn fails_with_missing_field(world: &mut NotifyWorld, expected: String) {
    match world.result.as_ref().expect("no result") {
        Err(NotifyError::MissingField { field }) => assert_eq!(*field, expected),
        other => panic!("expected a missing field error, got {other:?}"),
    }
}

#[then(expr = "the run should fail with unknown state {string}")]
fn fails_with_unknown_state(world: &mut NotifyWorld, expected: String) {
    match world.result.as_ref().expect("no result") {
        Err(NotifyError::UnknownSeverity(state)) => assert_eq!(*state, expected),
        other => panic!("expected an unknown severity error, got {other:?}"),
    }
}

#[then("no request should have been sent")]
fn no_request(world: &mut NotifyWorld) {
    assert!(world.requests().is_empty());
}

#[then(expr = "exactly {int} request(s) should have been sent to the webhook")]
fn request_count(world: &mut NotifyWorld, expected: usize) {
    let requests = world.requests();
    assert_eq!(requests.len(), expected);
    assert!(requests
        .iter()
        .all(|(url, _)| url == "https://discord.com/api/webhooks/123456/secret-token"));
}
