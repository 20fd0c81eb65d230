//! Background resolution state machine tests
//!
//! Completions are delivered by hand through `update` so the arrival order
//! is fully controlled; the runtime tests at the bottom drive real threads.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{fetch_generation, fetched_urls, test_image, test_model, StubFetcher};
use emojiart::fetch::FetchError;
use emojiart::messages::{BackgroundMsg, DocumentMsg, Msg, UiMsg};
use emojiart::model::{Alert, AppModel, BackgroundState};
use emojiart::runtime::Runtime;
use emojiart::update::update;

fn resolved(url: &str, generation: u64, width: u32, height: u32) -> Msg {
    Msg::Background(BackgroundMsg::Resolved {
        url: url.to_string(),
        generation,
        result: Ok(Arc::new(test_image(width, height))),
    })
}

fn failed(url: &str, generation: u64, error: FetchError) -> Msg {
    Msg::Background(BackgroundMsg::Resolved {
        url: url.to_string(),
        generation,
        result: Err(error),
    })
}

/// Set the background and return the generation of the fetch it started
fn set_background(model: &mut AppModel, url: &str) -> u64 {
    fetch_generation(update(model, Msg::set_background(url)))
}

fn resolved_url(model: &AppModel) -> Option<&str> {
    match &model.background {
        BackgroundState::Resolved(url, _) => Some(url),
        _ => None,
    }
}

// ========================================================================
// Transitions
// ========================================================================

#[test]
fn test_starts_idle() {
    let model = test_model();
    assert_eq!(model.background, BackgroundState::Idle);
}

#[test]
fn test_set_background_starts_resolving() {
    let mut model = test_model();

    let cmd = update(&mut model, Msg::set_background("a"));

    assert_eq!(model.background, BackgroundState::Resolving("a".to_string()));
    assert_eq!(fetched_urls(cmd), vec!["a".to_string()]);
}

#[test]
fn test_current_completion_resolves() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");

    update(&mut model, resolved("a", a, 4, 3));

    assert_eq!(resolved_url(&model), Some("a"));
    let image = model.background.image().unwrap();
    assert_eq!((image.width, image.height), (4, 3));
}

#[test]
fn test_current_failure_sets_failed_and_alerts() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");

    update(&mut model, failed("a", a, FetchError::BadImageData));

    assert_eq!(
        model.background,
        BackgroundState::Failed("a".to_string(), "bad image data".to_string())
    );
    assert_eq!(
        model.ui.alert,
        Some(Alert::BackgroundFailed {
            url: "a".to_string(),
            reason: "bad image data".to_string(),
        })
    );

    update(&mut model, Msg::Ui(UiMsg::DismissAlert));
    assert_eq!(model.ui.alert, None);
}

#[test]
fn test_transport_failure_reason_is_carried() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");

    update(
        &mut model,
        failed("a", a, FetchError::Transport("connection refused".to_string())),
    );

    assert_eq!(model.background.failure_reason(), Some("connection refused"));
}

#[test]
fn test_clearing_background_goes_idle() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    update(&mut model, resolved("a", a, 1, 1));

    let cmd = update(&mut model, Msg::Document(DocumentMsg::SetBackground(None)));

    assert_eq!(model.background, BackgroundState::Idle);
    assert!(fetched_urls(cmd).is_empty());
}

#[test]
fn test_empty_string_clears_background() {
    let mut model = test_model();
    update(&mut model, Msg::set_background("a"));

    update(&mut model, Msg::set_background(""));

    assert_eq!(model.document().background(), None);
    assert_eq!(model.background, BackgroundState::Idle);
}

#[test]
fn test_setting_same_reference_does_not_refetch() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    update(&mut model, resolved("a", a, 1, 1));

    let cmd = update(&mut model, Msg::set_background("a"));

    assert!(fetched_urls(cmd).is_empty());
    assert_eq!(resolved_url(&model), Some("a"));
}

#[test]
fn test_token_edits_leave_background_alone() {
    let mut model = test_model();
    update(&mut model, Msg::set_background("a"));

    let cmd = update(
        &mut model,
        Msg::add_token("🌲", emojiart::model::Position::ZERO, 40),
    );

    assert!(fetched_urls(cmd).is_empty());
    assert!(model.background.is_resolving());
}

// ========================================================================
// Staleness
// ========================================================================

#[test]
fn test_superseded_success_is_discarded() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    set_background(&mut model, "b");

    let cmd = update(&mut model, resolved("a", a, 1, 1));

    assert!(cmd.is_none());
    assert_eq!(model.background, BackgroundState::Resolving("b".to_string()));
}

#[test]
fn test_superseded_failure_is_discarded_without_alert() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    set_background(&mut model, "b");

    update(&mut model, failed("a", a, FetchError::BadImageData));

    assert_eq!(model.background, BackgroundState::Resolving("b".to_string()));
    assert_eq!(model.ui.alert, None);
}

#[test]
fn test_out_of_order_completions_keep_latest() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    let b = set_background(&mut model, "b");

    update(&mut model, resolved("b", b, 2, 2));
    update(&mut model, resolved("a", a, 1, 1));

    assert_eq!(resolved_url(&model), Some("b"));
}

#[test]
fn test_completion_after_clear_is_discarded() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    update(&mut model, Msg::Document(DocumentMsg::SetBackground(None)));

    update(&mut model, resolved("a", a, 1, 1));

    assert_eq!(model.background, BackgroundState::Idle);
}

#[test]
fn test_undo_restores_previous_reference_and_refetches() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    update(&mut model, resolved("a", a, 1, 1));
    let b = set_background(&mut model, "b");

    let cmd = update(&mut model, Msg::undo());

    assert_eq!(model.document().background(), Some("a"));
    assert_eq!(model.background, BackgroundState::Resolving("a".to_string()));
    assert_eq!(fetched_urls(cmd), vec!["a".to_string()]);

    // The in-flight fetch for "b" is now stale
    update(&mut model, resolved("b", b, 2, 2));
    assert!(model.background.is_resolving());
}

#[test]
fn test_returning_to_reference_ignores_earlier_fetch_failure() {
    let mut model = test_model();
    let first = set_background(&mut model, "a");
    set_background(&mut model, "b");
    let second = set_background(&mut model, "a");
    assert!(second > first);

    update(&mut model, resolved("a", second, 2, 2));
    let cmd = update(
        &mut model,
        failed("a", first, FetchError::Transport("timeout".to_string())),
    );

    assert!(cmd.is_none());
    assert_eq!(resolved_url(&model), Some("a"));
    assert_eq!(model.ui.alert, None);
}

#[test]
fn test_returning_to_reference_ignores_earlier_fetch_success() {
    let mut model = test_model();
    let first = set_background(&mut model, "a");
    set_background(&mut model, "b");
    let second = set_background(&mut model, "a");

    update(&mut model, failed("a", second, FetchError::BadImageData));
    update(&mut model, resolved("a", first, 2, 2));

    assert_eq!(model.background.failure_reason(), Some("bad image data"));
}

#[test]
fn test_earlier_fetch_for_same_reference_does_not_end_resolving() {
    let mut model = test_model();
    let first = set_background(&mut model, "a");
    set_background(&mut model, "b");
    set_background(&mut model, "a");

    update(&mut model, resolved("a", first, 1, 1));

    assert_eq!(model.background, BackgroundState::Resolving("a".to_string()));
}

#[test]
fn test_duplicate_completion_is_ignored() {
    let mut model = test_model();
    let a = set_background(&mut model, "a");
    update(&mut model, resolved("a", a, 3, 3));

    let cmd = update(&mut model, failed("a", a, FetchError::BadImageData));

    assert!(cmd.is_none());
    assert_eq!(resolved_url(&model), Some("a"));
}

// ========================================================================
// Runtime (real worker threads)
// ========================================================================

fn runtime_with(fetcher: Arc<StubFetcher>) -> Runtime {
    Runtime::new(test_model(), fetcher)
}

#[test]
fn test_runtime_resolves_background() {
    let fetcher = Arc::new(StubFetcher::new().with_image("a", 5, 5));
    let mut runtime = runtime_with(fetcher);

    runtime.dispatch(Msg::set_background("a"));
    assert!(runtime.wait_idle(Duration::from_secs(10)));

    assert_eq!(resolved_url(runtime.model()), Some("a"));
}

#[test]
fn test_runtime_slow_superseded_fetch_loses() {
    let fetcher = Arc::new(StubFetcher::new().with_image("a", 1, 1).with_image("b", 2, 2));
    let release_a = fetcher.gate("a");
    let mut runtime = runtime_with(fetcher);

    runtime.dispatch(Msg::set_background("a"));
    runtime.dispatch(Msg::set_background("b"));

    // "b" is ungated and finishes first
    assert!(runtime.wait_for_message(Duration::from_secs(10)));
    assert_eq!(resolved_url(runtime.model()), Some("b"));

    release_a.send(()).unwrap();
    assert!(runtime.wait_idle(Duration::from_secs(10)));
    assert_eq!(resolved_url(runtime.model()), Some("b"));
}

#[test]
fn test_runtime_fast_superseded_fetch_is_ignored() {
    let fetcher = Arc::new(StubFetcher::new().with_image("a", 1, 1).with_image("b", 2, 2));
    let release_a = fetcher.gate("a");
    let release_b = fetcher.gate("b");
    let mut runtime = runtime_with(fetcher);

    runtime.dispatch(Msg::set_background("a"));
    runtime.dispatch(Msg::set_background("b"));

    drop(release_a);
    assert!(runtime.wait_for_message(Duration::from_secs(10)));
    assert_eq!(
        runtime.model().background,
        BackgroundState::Resolving("b".to_string())
    );

    drop(release_b);
    assert!(runtime.wait_idle(Duration::from_secs(10)));
    assert_eq!(resolved_url(runtime.model()), Some("b"));
}

#[test]
fn test_runtime_bad_bytes_fail() {
    let fetcher = Arc::new(StubFetcher::new().with_bytes("a", b"not an image"));
    let mut runtime = runtime_with(fetcher);

    runtime.dispatch(Msg::set_background("a"));
    assert!(runtime.wait_idle(Duration::from_secs(10)));

    assert_eq!(
        runtime.model().background.failure_reason(),
        Some("bad image data")
    );
}

#[test]
fn test_runtime_start_resolves_opened_document() {
    let mut document = emojiart::model::Document::new();
    document.set_background(Some("a".to_string()));
    let fetcher = Arc::new(StubFetcher::new().with_image("a", 3, 3));
    let mut runtime = Runtime::new(common::test_model_with(document), fetcher);

    runtime.start();
    assert!(runtime.model().background.is_resolving());
    assert!(runtime.wait_idle(Duration::from_secs(10)));

    assert_eq!(resolved_url(runtime.model()), Some("a"));
}

#[test]
fn test_runtime_with_fetching_disabled_never_resolves() {
    let fetcher = Arc::new(StubFetcher::new().with_image("a", 3, 3));
    let mut runtime = runtime_with(fetcher).with_background_fetch(false);

    runtime.dispatch(Msg::set_background("a"));
    assert!(runtime.wait_idle(Duration::from_secs(10)));

    assert_eq!(
        runtime.model().background,
        BackgroundState::Resolving("a".to_string())
    );
    assert_eq!(runtime.model().ui.alert, None);
}
