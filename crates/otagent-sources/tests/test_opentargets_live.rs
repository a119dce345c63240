//! Live queries against the public Open Targets Platform.
//!
//! Run with: cargo test --package otagent-sources --test test_opentargets_live -- --ignored --nocapture

use otagent_sources::{OpenTargetsClient, TargetLookup};

#[tokio::test]
#[ignore] // Requires network access
async fn test_asthma_to_targets() {
    let client = OpenTargetsClient::new().expect("client");

    let disease_id = client.resolve_disease("asthma").await.expect("asthma resolves");
    println!("asthma -> {}", disease_id);

    let targets = client
        .fetch_targets_for_disease(&disease_id, 5, false)
        .await
        .expect("associations");
    println!("top targets: {:?}", targets);
    assert_eq!(targets.len(), 5);

    let records = client.fetch_associations(&disease_id, 5).await.expect("associations");
    assert!(records.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_braf_drugs_and_details() {
    let client = OpenTargetsClient::new().expect("client");
    let braf = vec!["ENSG00000157764".to_string()];

    let drugs = client.fetch_drugs_for_targets(&braf, 5).await;
    println!("BRAF drugs: {:?}", drugs);
    assert!(drugs["ENSG00000157764"].len() <= 5);

    let details = client
        .fetch_drug_details(&["vemurafenib".to_string()], true)
        .await;
    for (id, record) in &details {
        println!("{} -> {:?}", id, record.as_ref().map(|r| &r.name));
        assert!(record.as_ref().map(|r| r.name.is_some()).unwrap_or(false));
    }
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_target_safety_batch_with_bad_id() {
    let client = OpenTargetsClient::new().expect("client");
    let ids = vec!["ENSG00000141510".to_string(), "NOT_A_GENE".to_string()];

    let safety = client.fetch_safety(&ids).await;
    assert_eq!(safety.len(), 2);
    assert!(matches!(safety["ENSG00000141510"], TargetLookup::Found(_)));
    println!("{}", serde_json::to_string_pretty(&safety).unwrap());
}
