//! # Concurrent append behaviour
//!
//! Many writers race on the same chain; the conditional append plus the
//! service-level retry must serialize them into one linear history with no
//! lost or duplicated blocks.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_02_chain_store::{ChainStore, InMemoryChainStore};
    use cc_03_validator::ForestValidator;
    use cc_04_hierarchy::HierarchyService;
    use shared_types::{AttendanceStatus, LedgerConfig};

    /// Retry budget sized for the writer fan-out below, not for production.
    fn racy_config() -> LedgerConfig {
        LedgerConfig {
            max_append_retries: 64,
            ..LedgerConfig::for_tests()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_writers_produce_one_linear_history() {
        const WRITERS: usize = 8;

        let store = Arc::new(InMemoryChainStore::new());
        let hierarchy = Arc::new(HierarchyService::new(store.clone(), racy_config()));

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let class = hierarchy.create_class("CS101", &dept.id).await.unwrap();
        let alice = hierarchy
            .create_student("Alice Smith", "CS-001", &class.id)
            .await
            .unwrap();

        let mut handles = Vec::with_capacity(WRITERS);
        for _ in 0..WRITERS {
            let hierarchy = hierarchy.clone();
            let student_id = alice.id.clone();
            handles.push(tokio::spawn(async move {
                hierarchy
                    .mark_attendance(&student_id, AttendanceStatus::Present, None, None)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let chain = store.load_chain(&alice.chain_id).await.unwrap().unwrap();
        assert_eq!(chain.len(), 1 + WRITERS, "no appends lost or duplicated");
        for (i, window) in chain.windows(2).enumerate() {
            assert_eq!(window[1].index, (i as u64) + 1);
            assert_eq!(window[1].prev_hash, window[0].hash);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_child_creation_keeps_the_forest_valid() {
        const STUDENTS: usize = 6;

        let store = Arc::new(InMemoryChainStore::new());
        let hierarchy = Arc::new(HierarchyService::new(store.clone(), racy_config()));

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let class = hierarchy.create_class("CS101", &dept.id).await.unwrap();

        // Enrolments race against renames of the class they link to.
        let mut handles = Vec::new();
        for i in 0..STUDENTS {
            let hierarchy = hierarchy.clone();
            let class_id = class.id.clone();
            handles.push(tokio::spawn(async move {
                hierarchy
                    .create_student(&format!("Student {i}"), &format!("CS-{i:03}"), &class_id)
                    .await
                    .map(|_| ())
            }));
        }
        for i in 0..3 {
            let hierarchy = hierarchy.clone();
            let class_id = class.id.clone();
            handles.push(tokio::spawn(async move {
                hierarchy
                    .update_class(&class_id, &format!("CS101 rev {i}"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let validator = ForestValidator::new(store.clone(), racy_config());
        let report = validator.validate_forest().await.unwrap();
        assert!(report.valid, "every enrolment links to a real class hash");
        assert_eq!(report.departments[0].classes[0].students.len(), STUDENTS);
    }

    #[tokio::test]
    async fn sequential_appends_need_no_retry_budget() {
        let store = Arc::new(InMemoryChainStore::new());
        let hierarchy = HierarchyService::new(
            store.clone(),
            LedgerConfig {
                max_append_retries: 1,
                ..LedgerConfig::for_tests()
            },
        );

        let dept = hierarchy.create_department("School of Computing").await.unwrap();
        let class = hierarchy.create_class("CS101", &dept.id).await.unwrap();
        let alice = hierarchy
            .create_student("Alice Smith", "CS-001", &class.id)
            .await
            .unwrap();

        // Sequential appends never conflict, so the tight budget is enough here.
        hierarchy
            .mark_attendance(&alice.id, AttendanceStatus::Absent, None, None)
            .await
            .unwrap();
        let chain = store.load_chain(&alice.chain_id).await.unwrap().unwrap();
        assert_eq!(chain.len(), 2);
    }
}
