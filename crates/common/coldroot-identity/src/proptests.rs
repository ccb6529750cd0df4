//! Property-based tests for derivation and lineage invariants.

use proptest::prelude::*;

use crate::{
    build_lineage_event, derive_epoch_seed, seed_to_keypair, verify_lineage, Keypair,
    LINEAGE_KIND,
};

proptest! {
    /// Same root and label always derive the same seed.
    #[test]
    fn derivation_is_deterministic(root in any::<[u8; 32]>(), label in ".{0,40}") {
        prop_assert_eq!(
            derive_epoch_seed(&root, &label).unwrap(),
            derive_epoch_seed(&root, &label).unwrap()
        );
    }

    /// Distinct labels derive distinct seeds.
    #[test]
    fn derivation_separates_labels(root in any::<[u8; 32]>(), a in ".{0,24}", b in ".{0,24}") {
        prop_assume!(a != b);
        prop_assert_ne!(
            derive_epoch_seed(&root, &a).unwrap(),
            derive_epoch_seed(&root, &b).unwrap()
        );
    }

    /// Distinct roots derive distinct seeds for the same label.
    #[test]
    fn derivation_separates_roots(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        prop_assume!(a != b);
        prop_assert_ne!(
            derive_epoch_seed(&a, "2025-Q1").unwrap(),
            derive_epoch_seed(&b, "2025-Q1").unwrap()
        );
    }

    /// Any seed length other than 32 is refused.
    #[test]
    fn wrong_length_seeds_rejected(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(bytes.len() != 32);
        prop_assert!(derive_epoch_seed(&bytes, "x").is_err());
        prop_assert!(seed_to_keypair(&bytes).is_err());
    }

    /// Events built by a root verify under that root.
    #[test]
    fn built_events_verify(
        root_seed in any::<[u8; 32]>(),
        epoch_pk in any::<[u8; 32]>(),
        label in ".{0,40}",
        created_at in any::<i64>(),
    ) {
        let root = Keypair::from_seed(&root_seed);
        let event = build_lineage_event(&root, &epoch_pk, &label, LINEAGE_KIND, Some(created_at));
        prop_assert!(verify_lineage(&root.public_key_hex(), &event));
    }

    /// Verification never panics on arbitrary field contents.
    #[test]
    fn arbitrary_events_do_not_panic(
        claimed in "[0-9a-fA-F]{0,70}",
        kind in any::<u32>(),
        pubkey in "[0-9a-fx]{0,70}",
        tags in proptest::collection::vec(proptest::collection::vec("root|sig|epoch|[a-f0-9]{0,130}", 0..4), 0..5),
    ) {
        let event = crate::LineageEvent { kind, pubkey, created_at: 0, tags, content: String::new() };
        let _ = verify_lineage(&claimed, &event);
    }
}
