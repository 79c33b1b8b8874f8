//! Concurrency behaviour of the explanation pipeline: timeouts, cancellation
//! and abort-on-drop.

use super::common::test_helpers::offset_of;
use super::common::{FixedReply, Slow};
use explain_bridge::core::explanation_service::{prepare_prompt, Explanation, ExplanationService};
use explain_bridge::core::method_context::{Cursor, Position, PromptTemplate};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const SOURCE: &str = "LIMIT = 5\n\ndef clamp(value):\n    return min(value, LIMIT)\n";

fn cursor() -> Cursor {
    Cursor::Offset(offset_of(SOURCE, "return"))
}

async fn wait_until_started(client: &Slow) {
    for _ in 0..200 {
        if client.started.load(Ordering::SeqCst) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("inference never started");
}

#[tokio::test]
async fn test_slow_inference_times_out() {
    let client = Arc::new(Slow::new(Duration::from_secs(30)));
    let service = ExplanationService::new(
        Arc::clone(&client),
        PromptTemplate::default(),
        Duration::from_millis(50),
    );

    let explanation = service.explain(SOURCE.to_string(), cursor()).await;

    assert_eq!(explanation, Explanation::Failed);
    assert!(client.started.load(Ordering::SeqCst));
    assert!(!client.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_cancel_aborts_inflight_inference() {
    let client = Arc::new(Slow::new(Duration::from_millis(300)));
    let service = ExplanationService::new(
        Arc::clone(&client),
        PromptTemplate::default(),
        Duration::from_secs(5),
    );

    let task = service.submit(SOURCE.to_string(), cursor());
    wait_until_started(&client).await;
    task.cancel();

    assert_eq!(task.await, Explanation::Failed);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!client.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_dropping_task_aborts_it() {
    let client = Arc::new(Slow::new(Duration::from_millis(200)));
    let service = ExplanationService::new(
        Arc::clone(&client),
        PromptTemplate::default(),
        Duration::from_secs(5),
    );

    let task = service.submit(SOURCE.to_string(), cursor());
    wait_until_started(&client).await;
    drop(task);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!client.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let client = Arc::new(FixedReply::new("explained"));
    let service = ExplanationService::new(
        Arc::clone(&client),
        PromptTemplate::default(),
        Duration::from_secs(5),
    );

    let inside = service.submit(SOURCE.to_string(), cursor());
    let outside = service.submit(SOURCE.to_string(), Cursor::Offset(0));
    let by_position = service.submit(
        SOURCE.to_string(),
        Cursor::Position(Position { line: 3, character: 4 }),
    );

    assert_eq!(inside.await, Explanation::Generated("explained".into()));
    assert_eq!(outside.await, Explanation::NoMethodFound);
    assert_eq!(by_position.await, Explanation::Generated("explained".into()));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_empty_reply_is_a_failure() {
    let service = ExplanationService::new(
        FixedReply::new("   "),
        PromptTemplate::default(),
        Duration::from_secs(5),
    );
    assert_eq!(service.explain(SOURCE.to_string(), cursor()).await, Explanation::Failed);
}

#[tokio::test]
async fn test_prepare_prompt_without_client() {
    let prepared = prepare_prompt(SOURCE.to_string(), cursor(), &PromptTemplate::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(prepared.payload.function_name.as_deref(), Some("clamp"));
    assert_eq!(
        prepared.prompt,
        "Explain the method def clamp(value):\n    return min(value, LIMIT)\n\
         We have the following external references:\nLIMIT=5 in plain English. \
         Ignore built-in Python methods from the external references."
    );

    let outside = prepare_prompt(SOURCE.to_string(), Cursor::Offset(0), &PromptTemplate::default())
        .await
        .unwrap();
    assert!(outside.is_none());
}
