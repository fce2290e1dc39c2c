//! Tests for the query dispatcher

use super::*;
use crate::fuzzy::MatchResult;
use crate::test_utils::test_helpers::{WorkerStub, matches};
use proptest::prelude::*;
use std::time::Duration;

const DEBOUNCE_MS: u64 = 120;

fn setup() -> (QueryDispatcher, WorkerStub, SuggestionStore) {
    let (request_tx, response_rx, stub) = WorkerStub::channels();
    let dispatcher = QueryDispatcher::with_channels(DEBOUNCE_MS, request_tx, response_rx);
    (dispatcher, stub, SuggestionStore::new())
}

fn after(start: Instant, ms: u64) -> Instant {
    start + Duration::from_millis(ms)
}

// =========================================================================
// Unit Tests
// =========================================================================

#[test]
fn test_submit_schedules_without_sending() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    assert_eq!(dispatcher.submit("foo", start, &mut store), Submission::Scheduled);
    assert!(dispatcher.tick(after(start, 10), &mut store).is_none());
    assert!(stub.take_requests().is_empty());
    assert!(dispatcher.has_pending_query());
}

#[test]
fn test_tick_after_window_sends_with_current_generation() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("foo", start, &mut store);
    let event = dispatcher.tick(after(start, DEBOUNCE_MS), &mut store);

    let requests = stub.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "foo");
    assert_eq!(requests[0].generation, store.generation());
    assert_eq!(event, Some(DispatchEvent::Sent(requests[0].generation)));
}

#[test]
fn test_rapid_submissions_send_only_the_last() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("f", start, &mut store);
    dispatcher.tick(after(start, 40), &mut store);
    dispatcher.submit("fo", after(start, 40), &mut store);
    dispatcher.tick(after(start, 80), &mut store);
    dispatcher.submit("foo", after(start, 80), &mut store);
    dispatcher.tick(after(start, 80 + DEBOUNCE_MS), &mut store);

    let requests = stub.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "foo");
}

#[test]
fn test_empty_submit_clears_without_rpc() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("foo", start, &mut store);
    dispatcher.tick(after(start, DEBOUNCE_MS), &mut store);
    let sent = stub.take_requests().remove(0);
    stub.respond(&sent, matches(&["src/foo.ts"]));
    dispatcher.poll(&mut store);
    assert_eq!(store.len(), 1);

    let outcome = dispatcher.submit("", after(start, 200), &mut store);

    assert_eq!(outcome, Submission::Cleared);
    assert!(store.is_empty());
    assert!(!dispatcher.has_pending_query());
    assert!(dispatcher.tick(after(start, 1_000), &mut store).is_none());
    assert!(stub.take_requests().is_empty());
}

#[test]
fn test_empty_submit_drops_pending_text() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("foo", start, &mut store);
    dispatcher.submit("", after(start, 10), &mut store);
    dispatcher.tick(after(start, 1_000), &mut store);

    assert!(stub.take_requests().is_empty());
}

#[test]
fn test_poll_applies_current_response() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("foo", start, &mut store);
    dispatcher.tick(after(start, DEBOUNCE_MS), &mut store);
    let sent = stub.take_requests().remove(0);
    stub.respond(&sent, matches(&["src/foo.ts", "foo/bar.rs"]));

    let events = dispatcher.poll(&mut store);

    assert_eq!(events, vec![DispatchEvent::Applied(sent.generation)]);
    assert_eq!(store.query(), "foo");
    assert_eq!(store.len(), 2);
}

#[test]
fn test_late_response_for_superseded_query_is_dropped() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("a", start, &mut store);
    dispatcher.tick(after(start, DEBOUNCE_MS), &mut store);
    dispatcher.submit("ab", after(start, 200), &mut store);
    dispatcher.tick(after(start, 200 + DEBOUNCE_MS), &mut store);
    let mut requests = stub.take_requests();
    let newer = requests.pop().unwrap();
    let older = requests.pop().unwrap();
    assert!(older.generation < newer.generation);

    stub.respond(&older, matches(&["a.rs"]));
    assert_eq!(
        dispatcher.poll(&mut store),
        vec![DispatchEvent::Stale(older.generation)]
    );
    assert!(store.is_empty());

    stub.respond(&newer, matches(&["ab.rs"]));
    assert_eq!(
        dispatcher.poll(&mut store),
        vec![DispatchEvent::Applied(newer.generation)]
    );
    assert_eq!(store.get(0).unwrap().path(), "ab.rs");
}

#[test]
fn test_failure_leaves_results_unchanged() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("foo", start, &mut store);
    dispatcher.tick(after(start, DEBOUNCE_MS), &mut store);
    let first = stub.take_requests().remove(0);
    stub.respond(&first, matches(&["foo.rs"]));
    dispatcher.poll(&mut store);

    dispatcher.submit("food", after(start, 300), &mut store);
    dispatcher.tick(after(start, 300 + DEBOUNCE_MS), &mut store);
    let second = stub.take_requests().remove(0);
    stub.fail(&second, RpcError::Disconnected);

    let events = dispatcher.poll(&mut store);

    assert_eq!(
        events,
        vec![DispatchEvent::Failed(second.generation, RpcError::Disconnected)]
    );
    assert_eq!(store.get(0).unwrap().path(), "foo.rs");
    assert_eq!(store.query(), "foo");
    // The failed generation stays consumed
    assert_eq!(store.generation(), second.generation);
}

#[test]
fn test_failure_of_stale_query_is_stale() {
    let (mut dispatcher, mut stub, mut store) = setup();
    let start = Instant::now();

    dispatcher.submit("a", start, &mut store);
    dispatcher.tick(after(start, DEBOUNCE_MS), &mut store);
    dispatcher.submit("ab", after(start, 200), &mut store);
    dispatcher.tick(after(start, 200 + DEBOUNCE_MS), &mut store);
    let older = stub.take_requests().remove(0);

    stub.fail(&older, RpcError::TimedOut(Duration::from_secs(2)));
    assert_eq!(
        dispatcher.poll(&mut store),
        vec![DispatchEvent::Stale(older.generation)]
    );
}

#[test]
fn test_tick_without_worker_consumes_generation_and_fails() {
    let mut dispatcher = QueryDispatcher::new(0);
    let mut store = SuggestionStore::new();
    let now = Instant::now();

    dispatcher.submit("foo", now, &mut store);
    let event = dispatcher.tick(now, &mut store);

    assert_eq!(
        event,
        Some(DispatchEvent::Failed(store.generation(), RpcError::WorkerGone))
    );
    assert_ne!(store.generation(), Generation::INITIAL);
}

#[test]
fn test_poll_handles_disconnected_channel() {
    let (mut dispatcher, stub, mut store) = setup();
    drop(stub);
    assert!(dispatcher.poll(&mut store).is_empty());
    assert!(dispatcher.poll(&mut store).is_empty());
}

#[test]
fn test_discard_responses_drops_everything() {
    let (mut dispatcher, stub, mut store) = setup();
    let generation = Generation::next();
    store.track(generation);
    let request = QueryRequest {
        query: "x".to_string(),
        generation,
    };
    stub.respond(&request, matches(&["x.rs"]));
    stub.respond(&request, matches(&["y.rs"]));

    assert_eq!(dispatcher.discard_responses(), 2);
    assert!(dispatcher.poll(&mut store).is_empty());
    assert!(store.is_empty());
}

// =========================================================================
// Property Tests
// =========================================================================

// For any burst of keystrokes faster than the debounce window, only the last
// text is sent and only its response is applied.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_last_query_wins(
        queries in prop::collection::vec("[a-z]{0,6}", 1..12),
        gaps in prop::collection::vec(0u64..DEBOUNCE_MS, 12)
    ) {
        let (mut dispatcher, mut stub, mut store) = setup();
        let start = Instant::now();
        let mut now = start;

        for (i, query) in queries.iter().enumerate() {
            dispatcher.submit(query, now, &mut store);
            dispatcher.tick(now, &mut store);
            now += Duration::from_millis(gaps[i]);
        }
        let last = queries.last().unwrap().clone();
        dispatcher.tick(now + Duration::from_millis(DEBOUNCE_MS), &mut store);

        let requests = stub.take_requests();
        if last.is_empty() {
            prop_assert!(requests.is_empty());
            prop_assert!(store.is_empty());
        } else {
            prop_assert_eq!(requests.len(), 1);
            prop_assert_eq!(&requests[0].query, &last);
            stub.respond(&requests[0], vec![MatchResult::new(format!("{}.rs", last), 1, vec![])]);
            dispatcher.poll(&mut store);
            prop_assert_eq!(store.query(), last.as_str());
        }
    }
}
