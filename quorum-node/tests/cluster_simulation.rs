use std::collections::HashSet;

use quorum_common::{crypto::hash::digest, error::QuorumError, utils::NodeId};
use quorum_node::{NodeConfig, Simulation};
use quorum_pool::{GossipPolicy, QuorumPolicy};

#[tokio::test]
async fn test_every_epoch_is_sealed_by_every_node() {
    let config = NodeConfig::local_cluster(4, 3);
    let simulation = Simulation::start(config.clone()).unwrap();

    let reports = simulation.run().await.unwrap();

    assert_eq!(reports.len(), 3);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.epoch, i as u64 + 1);
        assert_eq!(report.committee, config.committees[i]);
        assert_eq!(report.block_hash, digest(format!("epoch-{}/block", report.epoch).as_bytes()));
        // the node rotated out of the committee still observes and seals
        assert_eq!(report.sealed_by.len(), config.nodes.len());
    }

    let hashes: HashSet<&String> = reports.iter().map(|r| &r.block_hash).collect();
    assert_eq!(hashes.len(), 3);
}

#[tokio::test]
async fn test_contested_local_vote_survives_rotation() {
    let config: NodeConfig = serde_json::from_str(
        r#"{
            "nodes": ["a", "b", "c", "d"],
            "committees": [["a", "b", "c"], ["a", "b", "c", "d"]]
        }"#,
    )
    .unwrap();
    let simulation = Simulation::start(config).unwrap();

    let reports = simulation.run().await.unwrap();

    // the epoch 1 contested payload was backed only by "a"
    let proposer = NodeId::from("a");
    let pool = simulation.pool(&proposer).unwrap();
    let snapshot = pool.tally(&digest(b"epoch-1/contested")).unwrap();

    assert_eq!(snapshot.voters, vec![proposer.clone()]);
    assert!(!snapshot.ready);
    assert!(reports[1].pending[&proposer] >= 1);
}

#[tokio::test]
async fn test_byzantine_threshold_cluster() {
    let mut config = NodeConfig::local_cluster(7, 2);
    config.pool.quorum = QuorumPolicy::Byzantine;
    config.pool.gossip = GossipPolicy::All;

    let simulation = Simulation::start(config).unwrap();
    let reports = simulation.run().await.unwrap();

    assert!(reports.iter().all(|r| r.sealed_by.len() == 7));
}

#[tokio::test]
async fn test_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster.json");
    std::fs::write(
        &path,
        r#"{
            "nodes": ["alice", "bob", "carol"],
            "committees": [["alice", "bob", "carol"], ["alice", "bob"]],
            "settle_timeout_ms": 5000
        }"#,
    )
    .unwrap();

    let config = NodeConfig::load_from_file(&path).unwrap();
    let simulation = Simulation::start(config).unwrap();
    let reports = simulation.run().await.unwrap();

    assert_eq!(reports[1].committee, vec![NodeId::from("alice"), NodeId::from("bob")]);
    assert_eq!(reports[1].sealed_by.len(), 3);
}

#[tokio::test]
async fn test_gossip_disabled_is_rejected() {
    let mut config = NodeConfig::local_cluster(3, 1);
    config.pool.gossip = GossipPolicy::Never;

    let err = Simulation::start(config).err().unwrap();
    assert!(matches!(err, QuorumError::Config(_)));
}
