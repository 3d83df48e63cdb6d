//! # Tamper detection
//!
//! Mutates persisted blocks behind the store's back and checks that the audit
//! pins the damage to the right chain and block while every untouched chain
//! keeps auditing clean.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_01_chain::Block;
    use cc_02_chain_store::{ChainStore, InMemoryChainStore};
    use cc_03_validator::ForestValidator;
    use cc_04_hierarchy::HierarchyService;
    use shared_types::{AttendanceStatus, EntityHandle, LedgerConfig};

    struct Campus {
        store: Arc<InMemoryChainStore>,
        validator: ForestValidator<InMemoryChainStore>,
        alice: EntityHandle,
        bob: EntityHandle,
        class: EntityHandle,
    }

    /// One department, one class, two students with two marks each.
    async fn seeded_campus() -> Campus {
        let store = Arc::new(InMemoryChainStore::new());
        let hierarchy = HierarchyService::new(store.clone(), LedgerConfig::for_tests());

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
        for student in [&alice, &bob] {
            for _ in 0..2 {
                hierarchy
                    .mark_attendance(&student.id, AttendanceStatus::Present, None, None)
                    .await
                    .unwrap();
            }
        }

        let validator = ForestValidator::new(store.clone(), LedgerConfig::for_tests());
        Campus {
            store,
            validator,
            alice,
            bob,
            class,
        }
    }

    async fn blocks_of(store: &InMemoryChainStore, handle: &EntityHandle) -> Vec<Block> {
        store.load_chain(&handle.chain_id).await.unwrap().unwrap()
    }

    /// Re-mine a mutated block from a fresh digest so only the intended
    /// defect remains.
    fn reseal(block: &mut Block) {
        block.nonce = 0;
        block.hash = block.compute_hash().unwrap();
        block
            .mine(&LedgerConfig::for_tests().difficulty_prefix, 50_000_000)
            .unwrap();
    }

    fn student_reports(
        report: &cc_03_validator::ValidationReport,
    ) -> Vec<&cc_03_validator::StudentReport> {
        report.departments[0].classes[0].students.iter().collect()
    }

    #[tokio::test]
    async fn edited_payload_is_pinned_to_its_block() {
        let campus = seeded_campus().await;

        let mut blocks = blocks_of(&campus.store, &campus.alice).await;
        // Flip a mark without re-sealing; the stored hash no longer matches.
        blocks[1].transactions = vec![shared_types::Transaction::AttendanceMark {
            student_id: campus.alice.id.clone(),
            class_id: campus.class.id.clone(),
            status: AttendanceStatus::Absent,
            date: None,
            notes: None,
        }];
        campus
            .store
            .replace_chain_unchecked(&campus.alice.chain_id, blocks);

        let report = campus.validator.validate_forest().await.unwrap();
        assert!(!report.valid);
        assert_eq!(report.summary.total_invalid, 1);

        let students = student_reports(&report);
        let alice = students
            .iter()
            .find(|s| s.id == campus.alice.id)
            .unwrap();
        assert!(!alice.valid);
        assert_eq!(
            alice.reason.as_deref(),
            Some("Hash mismatch at block 1: stored hash does not match recomputed digest")
        );
        // The sibling chain is untouched and stays clean.
        let bob = students.iter().find(|s| s.id == campus.bob.id).unwrap();
        assert!(bob.valid);
        assert!(report.departments[0].classes[0].valid);
    }

    #[tokio::test]
    async fn resealed_block_without_proof_of_work_is_rejected() {
        let campus = seeded_campus().await;

        let mut blocks = blocks_of(&campus.store, &campus.alice).await;
        // Re-seal block 1 with a consistent digest but no mining: walk nonces
        // until the digest fails the difficulty, so the test is deterministic.
        blocks[1].timestamp = "2024-01-01T00:00:00.000Z".into();
        loop {
            let digest = blocks[1].compute_hash().unwrap();
            if !digest.starts_with("00") {
                blocks[1].hash = digest;
                break;
            }
            blocks[1].nonce += 1;
        }
        campus
            .store
            .replace_chain_unchecked(&campus.alice.chain_id, blocks);

        let report = campus.validator.validate_forest().await.unwrap();
        let students = student_reports(&report);
        let alice = students.iter().find(|s| s.id == campus.alice.id).unwrap();
        assert!(!alice.valid);
        assert_eq!(
            alice.reason.as_deref(),
            Some("Proof of work failed at block 1: hash lacks difficulty prefix \"00\"")
        );
    }

    #[tokio::test]
    async fn rerouted_predecessor_breaks_the_link() {
        let campus = seeded_campus().await;

        let mut blocks = blocks_of(&campus.store, &campus.alice).await;
        // Point block 2 back at genesis and re-seal it properly. The digest
        // and proof of work both pass; only the linkage check can catch it.
        blocks[2].prev_hash = blocks[0].hash.clone();
        reseal(&mut blocks[2]);
        campus
            .store
            .replace_chain_unchecked(&campus.alice.chain_id, blocks);

        let report = campus.validator.validate_forest().await.unwrap();
        let students = student_reports(&report);
        let alice = students.iter().find(|s| s.id == campus.alice.id).unwrap();
        assert!(!alice.valid);
        assert_eq!(
            alice.reason.as_deref(),
            Some("Link broken at block 2: prev_hash does not match expected predecessor")
        );
    }

    #[tokio::test]
    async fn forged_cross_tier_link_is_detected() {
        let campus = seeded_campus().await;

        let mut blocks = blocks_of(&campus.store, &campus.alice).await;
        // Re-anchor the student genesis to a hash the class never produced.
        blocks[0].prev_hash =
            "00ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff".into();
        reseal(&mut blocks[0]);
        // Re-seal the successors so only the cross-tier anchor is wrong.
        for i in 1..blocks.len() {
            blocks[i].prev_hash = blocks[i - 1].hash.clone();
            reseal(&mut blocks[i]);
        }
        campus
            .store
            .replace_chain_unchecked(&campus.alice.chain_id, blocks);

        let report = campus.validator.validate_forest().await.unwrap();
        assert!(!report.valid);
        let students = student_reports(&report);
        let alice = students.iter().find(|s| s.id == campus.alice.id).unwrap();
        assert!(!alice.valid);
        assert_eq!(
            alice.reason.as_deref(),
            Some("Genesis link broken: parent chain does not contain the referenced hash")
        );
    }
}
