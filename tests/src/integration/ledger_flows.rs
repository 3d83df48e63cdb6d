//! # End-to-end ledger flows
//!
//! Drives the hierarchy service against the in-memory store and audits the
//! resulting forest, covering the full create/update/delete/attendance
//! lifecycle across all three tiers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_02_chain_store::{ChainStore, InMemoryChainStore};
    use cc_03_validator::ForestValidator;
    use cc_04_hierarchy::HierarchyService;
    use shared_types::{AttendanceStatus, LedgerConfig, StudentUpdate, GENESIS_SENTINEL};

    fn config() -> LedgerConfig {
        LedgerConfig::for_tests()
    }

    fn setup() -> (
        Arc<InMemoryChainStore>,
        HierarchyService<InMemoryChainStore>,
        ForestValidator<InMemoryChainStore>,
    ) {
        let store = Arc::new(InMemoryChainStore::new());
        let hierarchy = HierarchyService::new(store.clone(), config());
        let validator = ForestValidator::new(store.clone(), config());
        (store, hierarchy, validator)
    }

    #[tokio::test]
    async fn root_chain_genesis_and_first_event_have_the_documented_shape() {
        let (store, hierarchy, validator) = setup();

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let genesis = store
            .load_chain(&dept.chain_id)
            .await
            .unwrap()
            .unwrap()
            .remove(0);
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.prev_hash, GENESIS_SENTINEL);
        assert!(genesis.hash.starts_with("00"));

        hierarchy
            .update_department(&dept.id, "School of Informatics")
            .await
            .unwrap();
        let chain = store.load_chain(&dept.chain_id).await.unwrap().unwrap();
        assert_eq!(chain[1].index, 1);
        assert_eq!(chain[1].prev_hash, genesis.hash);
        assert!(chain[1].hash.starts_with("00"));

        let report = validator.validate_forest().await.unwrap();
        assert!(report.valid);
    }

    #[tokio::test]
    async fn full_lifecycle_forest_stays_valid() {
        let (_store, hierarchy, validator) = setup();

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let class = hierarchy.create_class("CS101", &dept.id).await.unwrap();
        let alice = hierarchy
            .create_student("Alice Smith", "CS-001", &class.id)
            .await
            .unwrap();
        let bob = hierarchy
            .create_student("Bob Johnson", "CS-002", &class.id)
            .await
            .unwrap();

        hierarchy
            .mark_attendance(&alice.id, AttendanceStatus::Present, Some("2024-03-01".into()), None)
            .await
            .unwrap();
        hierarchy
            .mark_attendance(&bob.id, AttendanceStatus::Leave, None, Some("Sick".into()))
            .await
            .unwrap();
        hierarchy
            .update_student(
                &alice.id,
                StudentUpdate {
                    name: Some("Alice Smith-Jones".into()),
                    roll_no: None,
                },
            )
            .await
            .unwrap();
        hierarchy.delete_student(&bob.id).await.unwrap();

        let report = validator.validate_forest().await.unwrap();
        assert!(report.valid, "tombstoned entities still audit cleanly");
        assert_eq!(report.summary.total_invalid, 0);
        // Deleted students stay in the report: chains are never dropped.
        assert_eq!(report.departments[0].classes[0].students.len(), 2);

        let stats = hierarchy.system_stats().await.unwrap();
        assert_eq!(stats.entities.students, 1);
        assert_eq!(stats.attendance.total_records, 2);
        // 4 genesis + 2 attendance + 1 update + 1 tombstone.
        assert_eq!(stats.blockchain.total_blocks, 8);
    }

    #[tokio::test]
    async fn child_links_stay_valid_as_the_parent_chain_grows() {
        let (_store, hierarchy, validator) = setup();

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let class = hierarchy.create_class("CS101", &dept.id).await.unwrap();
        hierarchy
            .create_student("Alice Smith", "CS-001", &class.id)
            .await
            .unwrap();

        // The class genesis now references a historical department hash.
        hierarchy.update_department(&dept.id, "Renamed 1").await.unwrap();
        hierarchy.update_department(&dept.id, "Renamed 2").await.unwrap();
        // And the student genesis a historical class hash.
        hierarchy.update_class(&class.id, "CS101 v2").await.unwrap();

        let report = validator.validate_forest().await.unwrap();
        assert!(
            report.valid,
            "historical membership keeps grown parents valid"
        );
    }

    #[tokio::test]
    async fn report_serializes_with_the_documented_wire_shape() {
        let (_store, hierarchy, validator) = setup();

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        hierarchy.create_class("CS101", &dept.id).await.unwrap();

        let report = validator.validate_forest().await.unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["summary"]["totalInvalid"], 0);
        let dept_node = &json["departments"][0];
        assert!(dept_node["chainId"].as_str().unwrap().starts_with("dept-"));
        assert!(dept_node["classes"][0]["chainId"]
            .as_str()
            .unwrap()
            .starts_with("class-"));
    }

    #[tokio::test]
    async fn tree_endpoint_mirrors_the_active_forest() {
        let (_store, hierarchy, _validator) = setup();

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let class = hierarchy.create_class("CS101", &dept.id).await.unwrap();
        let alice = hierarchy
            .create_student("Alice Smith", "CS-001", &class.id)
            .await
            .unwrap();
        hierarchy.delete_student(&alice.id).await.unwrap();

        let tree = hierarchy.hierarchy_tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 1);
        // Tombstoned students leave the active tree but not the ledger.
        assert!(tree[0].children[0].children.is_empty());
        assert!(hierarchy
            .get_chain(alice.chain_id.as_str())
            .await
            .unwrap()
            .is_some());
    }
}
