//! Property-Based Tests for the Backlog and its Save Codec
//!
//! Uses `proptest` to check that buffered dialogue survives encoding and
//! framing unchanged, and that draining and clearing behave the same for any
//! backlog shape.

use proptest::prelude::*;

use earshot_core::codec;
use earshot_core::record::{self, SaveRecord};
use earshot_core::testing::RecordingService;
use earshot_core::{combined_event_text, Backlog, CharacterKey, Exchange};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_exchange() -> impl Strategy<Value = Exchange> {
    (
        "[A-Za-z ]{0,12}",
        "\\PC{1,40}",
        "[A-Za-z ]{0,12}",
        "\\PC{0,80}",
        // Quarter hours keep timestamps exact through JSON.
        0u32..100_000,
    )
        .prop_map(|(speaker, query, responder, response, quarters)| {
            Exchange::new(speaker, query, responder, response, quarters as f32 / 4.0)
        })
}

fn arb_backlog() -> impl Strategy<Value = Backlog> {
    prop::collection::btree_map(
        1u32..u32::MAX,
        prop::collection::vec(arb_exchange(), 1..6),
        0..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, exchanges)| (CharacterKey(key), exchanges))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Property: codec and record framing round-trip
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn codec_round_trip_preserves_backlog(backlog in arb_backlog()) {
        let bytes = codec::encode(&backlog).expect("encode");
        let decoded = codec::decode(&bytes).expect("decode");
        prop_assert_eq!(decoded, backlog);
    }

    #[test]
    fn history_record_round_trip(backlog in arb_backlog()) {
        let stream = SaveRecord::write_all(&[SaveRecord::history(&backlog).expect("record")])
            .expect("frame");
        let records = SaveRecord::read_all(&stream).expect("read");
        let restored = record::restore_history(&records).expect("restore");
        prop_assert_eq!(restored, Some(backlog));
    }

    #[test]
    fn truncated_payload_never_panics(backlog in arb_backlog(), cut in 0usize..64) {
        let bytes = codec::encode(&backlog).expect("encode");
        let end = bytes.len().saturating_sub(cut + 1);
        prop_assert!(codec::decode(&bytes[..end]).is_err());
    }
}

// ---------------------------------------------------------------------------
// Property: drain sends once and removes exactly one key
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn drain_sends_combined_text_once(backlog in arb_backlog()) {
        let service = RecordingService::new();
        let mut working = backlog.clone();

        for (key, exchanges) in backlog.iter() {
            let before = working.len();
            prop_assert!(working.drain_and_send(key, &service));
            prop_assert_eq!(working.len(), before - 1);
            prop_assert!(!working.contains(key));
            prop_assert_eq!(
                service.sent().last().cloned(),
                Some(combined_event_text(exchanges))
            );
            prop_assert!(!working.drain_and_send(key, &service));
        }

        prop_assert!(working.is_empty());
        prop_assert_eq!(service.sent().len(), backlog.len());
    }

    #[test]
    fn append_preserves_capture_order(exchanges in prop::collection::vec(arb_exchange(), 1..20)) {
        let key = CharacterKey(42);
        let mut backlog = Backlog::new();
        for e in &exchanges {
            backlog.append(key, e.clone());
        }
        prop_assert_eq!(backlog.get(key), Some(exchanges.as_slice()));
        prop_assert_eq!(backlog.exchange_count(), exchanges.len());
    }

    #[test]
    fn clear_always_empties(backlog in arb_backlog()) {
        let mut backlog = backlog;
        backlog.clear();
        prop_assert!(backlog.is_empty());
        prop_assert_eq!(backlog.exchange_count(), 0);
    }
}
