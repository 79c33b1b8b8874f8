//! # End-to-End Integration Tests
//!
//! Drive the whole pipeline from a file on disk to the rendered prompt and the
//! final explanation, with a stub inference client.

use super::common::test_helpers::{create_test_file_in_dir, offset_of, python_module};
use super::common::{AlwaysFails, FixedReply};
use explain_bridge::core::explanation_service::{Explanation, ExplanationService};
use explain_bridge::core::method_context::{ContextExtractor, Cursor, ExternalReference, PromptTemplate};
use explain_bridge::core::utils::FileUtils;
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn reference(name: &str, text: &str) -> ExternalReference {
    ExternalReference {
        name: name.to_string(),
        text: text.to_string(),
    }
}

fn service<C: explain_bridge::inference::InferenceClient + 'static>(client: C) -> ExplanationService<C> {
    ExplanationService::new(client, PromptTemplate::default(), Duration::from_secs(5))
}

#[tokio::test]
async fn test_scenario_module_constant() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let source = "OFFSET = 10\n\ndef add(a, b):\n    return a + b + OFFSET\n";
    let path = create_test_file_in_dir(&dir, "math_utils.py", source).await?;

    let source = FileUtils::read_source(&path, 64).await?;
    let payload = ContextExtractor::new()
        .extract_at(&source, offset_of(&source, "return"))?
        .expect("cursor inside add");

    assert_eq!(payload.function_text, "def add(a, b):\n    return a + b + OFFSET");
    assert_eq!(payload.external_references, vec![reference("OFFSET", "OFFSET=10")]);
    Ok(())
}

#[tokio::test]
async fn test_scenario_module_level_cursor() {
    let client = Arc::new(FixedReply::new("unused"));
    let service = service(Arc::clone(&client));
    let source = python_module().to_string();

    let explanation = service
        .explain(source.clone(), Cursor::Offset(offset_of(&source, "import json")))
        .await;

    assert_eq!(explanation, Explanation::NoMethodFound);
    assert_eq!(explanation.message(), "No method found");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_scenario_inference_failure() {
    let client = Arc::new(AlwaysFails::default());
    let service = service(Arc::clone(&client));
    let source = python_module().to_string();

    let explanation = service
        .explain(source.clone(), Cursor::Offset(offset_of(&source, "path = P")))
        .await;

    assert_eq!(explanation, Explanation::Failed);
    assert_eq!(explanation.message(), "An error occurred during explanation generation");
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scenario_module_function_reference() {
    let source = python_module();
    let payload = ContextExtractor::new()
        .extract_at(source, offset_of(source, "settings = load_settings"))
        .unwrap()
        .unwrap();

    assert_eq!(payload.function_name.as_deref(), Some("connect"));
    let names: Vec<_> = payload.external_references.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["load_settings", "Client"]);

    let helper = &payload.external_references[0].text;
    assert!(helper.starts_with("@memoize\ndef load_settings(name):\n    path = P(name)"));
    assert!(!helper.contains("Load settings from disk"));
    assert!(payload.external_references[1].text.starts_with("class Client:"));
}

#[test]
fn test_realistic_function_context() {
    let source = python_module();
    let payload = ContextExtractor::new()
        .extract_at(source, offset_of(source, "path = P"))
        .unwrap()
        .unwrap();

    assert_eq!(
        payload.function_text,
        "@memoize\ndef load_settings(name):\n    path = P(name)\n    for attempt in range(MAX_RETRIES):\n        \
         if path.exists():\n            return json.loads(path.read_text())\n    return dict(DEFAULTS)"
    );
    assert_eq!(
        payload.external_references,
        vec![
            reference(
                "memoize",
                "def memoize(func):\n    cache = {}\n    def wrapper(*args):\n        if args not in cache:\n            \
                 cache[args] = func(*args)\n        return cache[args]\n    return wrapper"
            ),
            reference("P", "from pathlib import Path as P"),
            reference("MAX_RETRIES", "MAX_RETRIES=3"),
            reference("json", "import json"),
            reference("DEFAULTS", "DEFAULTS={\n    \"timeout\": 30,\n}"),
        ]
    );
}

#[test]
fn test_closure_sees_enclosing_function_names_as_external() {
    let source = python_module();
    let extractor = ContextExtractor::new();

    let wrapper = extractor
        .extract_at(source, offset_of(source, "if args not in cache"))
        .unwrap()
        .unwrap();
    assert_eq!(wrapper.function_name.as_deref(), Some("wrapper"));
    assert_eq!(
        wrapper.external_references,
        vec![reference("cache", "cache={}"), reference("func", "func")]
    );

    let memoize = extractor
        .extract_at(source, offset_of(source, "cache = {}"))
        .unwrap()
        .unwrap();
    assert!(memoize.external_references.is_empty());
}

#[test]
fn test_class_body_is_not_a_function() {
    let source = python_module();
    let payload = ContextExtractor::new()
        .extract_at(source, offset_of(source, "retries = MAX_RETRIES"))
        .unwrap();
    assert_eq!(payload, None);
}

#[test]
fn test_extract_all_covers_nested_functions() {
    let payloads = ContextExtractor::new().extract_all(python_module()).unwrap();
    let names: Vec<_> = payloads
        .iter()
        .filter_map(|p| p.function_name.as_deref())
        .collect();
    assert_eq!(names, vec!["memoize", "wrapper", "load_settings", "connect"]);
}

#[tokio::test]
async fn test_prompt_reaches_client() {
    let client = Arc::new(FixedReply::new("It loads settings."));
    let service = service(Arc::clone(&client));
    let source = python_module().to_string();

    let explanation = service
        .submit(source.clone(), Cursor::Offset(offset_of(&source, "path = P")))
        .await;
    assert_eq!(explanation, Explanation::Generated("It loads settings.".into()));

    let prompts = client.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Explain the method @memoize\ndef load_settings(name):"));
    assert!(prompts[0].contains("\nWe have the following external references:\ndef memoize(func):\n"));
    assert!(prompts[0].contains("\nfrom pathlib import Path as P\n"));
    assert!(prompts[0].ends_with("Ignore built-in Python methods from the external references."));
}
