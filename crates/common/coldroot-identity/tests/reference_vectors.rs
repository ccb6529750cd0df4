use coldroot_identity::{
    build_lineage_event, derive_epoch_seed, deterministic_created_at, seed_to_keypair,
    verify_lineage, verify_lineage_value, LineageEvent, RootSeed, VectorSet, LINEAGE_KIND,
};

const VECTORS: &str = include_str!("vectors/cold_root_identity.v1.json");

fn load_vectors() -> VectorSet {
    serde_json::from_str(VECTORS).expect("vector file should parse")
}

#[test]
fn root_vector() {
    let v = load_vectors();
    let seed = RootSeed::from_hex(&v.root.seed_hex).unwrap();
    let root = seed.keypair();

    assert_eq!(v.root.sk_hex.as_deref(), Some(seed.to_hex().as_str()));
    assert_eq!(v.root.pk_hex.as_deref(), Some(root.public_key_hex().as_str()));
    assert_eq!(v.root.npub.as_deref(), Some(root.npub().as_str()));
    assert_eq!(v.root.nsec.as_deref(), Some(root.nsec().as_str()));
}

#[test]
fn epoch_2025_q1_vector() {
    let v = load_vectors();
    let epoch = v.epochs.iter().find(|e| e.id == "epoch-2025-Q1").unwrap();
    let seed = RootSeed::from_hex(&v.root.seed_hex).unwrap();

    let epoch_seed = derive_epoch_seed(seed.as_bytes(), &epoch.label).unwrap();
    let keypair = seed_to_keypair(&epoch_seed).unwrap();

    assert_eq!(epoch.sk_hex.as_deref(), Some(hex::encode(epoch_seed).as_str()));
    assert_eq!(epoch.pk_hex.as_deref(), Some(keypair.public_key_hex().as_str()));
}

#[test]
fn every_lineage_event_is_reproduced_byte_for_byte() {
    let v = load_vectors();
    let seed = RootSeed::from_hex(&v.root.seed_hex).unwrap();
    let root = seed.keypair();

    for epoch in &v.epochs {
        let expected = epoch.lineage_event.as_ref().unwrap();
        let keypair = seed.derive_epoch(&epoch.label);
        let actual = build_lineage_event(
            &root,
            &keypair.public_key_bytes(),
            &epoch.label,
            LINEAGE_KIND,
            Some(deterministic_created_at(&epoch.label).unwrap()),
        );
        assert_eq!(&actual, expected, "{}", epoch.id);
        assert_eq!(
            serde_json::to_string(&actual).unwrap(),
            serde_json::to_string(expected).unwrap()
        );
        assert!(verify_lineage(&root.public_key_hex(), &actual));
    }
}

#[test]
fn whole_set_verifies() {
    let v = load_vectors();
    let mismatches = v.verify().unwrap();
    assert!(mismatches.is_empty(), "{mismatches:?}");

    let mut repopulated = v.clone();
    repopulated.populate().unwrap();
    assert_eq!(repopulated, v);
}

#[test]
fn raw_json_event_verifies() {
    let raw: serde_json::Value = serde_json::from_str(VECTORS).unwrap();
    let root_hex = raw["root"]["pk_hex"].as_str().unwrap();
    let event = &raw["epochs"][0]["lineage_event"];

    assert!(verify_lineage_value(root_hex, event));
    assert!(verify_lineage_value(&root_hex.to_uppercase(), event));

    let typed: LineageEvent = serde_json::from_value(event.clone()).unwrap();
    assert!(verify_lineage(root_hex, &typed));
}

#[test]
fn published_wire_shape() {
    let v = load_vectors();
    let event = v.epochs[0].lineage_event.as_ref().unwrap();
    let text = serde_json::to_string(event).unwrap();
    assert_eq!(
        text,
        concat!(
            r#"{"kind":30001,"#,
            r#""pubkey":"3a25f00cf9f83af19a827798a93b72ad641a10cc63452aae589e24da2cf16c58","#,
            r#""created_at":1735689600,"#,
            r#""tags":[["root","4cb5abf6ad79fbf5abbccafcc269d85cd2651ed4b885b5869f241aedf0a5ba29"],"#,
            r#"["sig","af2f980e33872dc1ccd6259fe2e12f0232050c61ac71c945935bebdef5aabf2b09750892e93f696056c3719666ae8b8647eb3b5a0ce59ce06e1de66b2a8eca00"],"#,
            r#"["epoch","2025-Q1"]],"#,
            r#""content":""}"#
        )
    );
}
