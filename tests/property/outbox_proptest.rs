//! Property-based tests for replay order and the retry cap

use crate::common::{ScriptedRemote, TestStore};
use frontdesk_sync::frontdesk::RetryPolicy;
use frontdesk_sync::shared::ActionKind;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn action_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![Just(ActionKind::CheckIn), Just(ActionKind::CheckOut)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_replay_matches_enqueue_order(
        actions in prop::collection::vec((0..4u8, action_kind(), 0..3u64), 1..12)
    ) {
        tokio_test::block_on(async {
            let store = TestStore::new().await;
            let remote = Arc::new(ScriptedRemote::accepting());
            let engine = store.engine(remote.clone());

            let mut expected = Vec::new();
            for (booking, kind, gap) in &actions {
                // Zero gaps produce identical timestamps
                store.clock.advance(Duration::from_millis(*gap));
                let booking_id = format!("B{}", booking);
                store.outbox.enqueue(&booking_id, *kind).await.unwrap();
                expected.push((*kind, booking_id));
            }

            let result = engine.drain().await.unwrap();
            let seen: Vec<(ActionKind, String)> = remote
                .calls()
                .into_iter()
                .map(|c| (c.kind, c.booking_id))
                .collect();

            prop_assert_eq!(result.synced, actions.len() as u64);
            prop_assert_eq!(seen, expected);
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn test_retry_count_never_exceeds_cap(max_retries in 1..5u32, drains in 0..8u32) {
        tokio_test::block_on(async {
            let store = TestStore::new().await;
            let remote = Arc::new(ScriptedRemote::responding(503));
            let engine = store.engine(remote.clone()).with_policy(RetryPolicy::new(max_retries));
            let action = store.outbox.enqueue("B1", ActionKind::CheckIn).await.unwrap();

            let mut last = None;
            for _ in 0..drains {
                last = Some(engine.drain().await.unwrap());
            }

            let attempts = drains.min(max_retries);
            let stored = store.outbox.get(&action.id).await.unwrap().unwrap();
            prop_assert_eq!(stored.retry_count, attempts);
            prop_assert_eq!(remote.call_count() as u32, attempts);

            if let Some(result) = last {
                let dead = drains >= max_retries;
                prop_assert_eq!(result.failed, u64::from(dead));
                prop_assert_eq!(result.pending, u64::from(!dead));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
