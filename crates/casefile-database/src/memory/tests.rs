use super::*;

fn folder(case: i64, parent: Option<&FolderNode>, name: &str, slug: &str) -> NewFolder {
    NewFolder {
        id: FolderId::new(),
        case_id: CaseId(case),
        parent_id: parent.map(|p| p.id),
        name: name.to_string(),
        path: match parent {
            Some(p) => format!("{}/{slug}", p.path),
            None => slug.to_string(),
        },
        depth: parent.map_or(0, |p| p.depth + 1),
    }
}

fn file(folder: &FolderNode, name: &str, size: i64) -> NewFileRecord {
    let id = FileId::new();
    NewFileRecord {
        id,
        case_id: folder.case_id,
        folder_id: folder.id,
        original_filename: name.to_string(),
        stored_object_key: FileRecord::object_key(folder.case_id, id),
        size_bytes: size,
        mime_type: "application/pdf".to_string(),
        uploaded_by: "adv-1".to_string(),
        document_category: None,
        tags: Vec::new(),
        is_generated: false,
    }
}

#[tokio::test]
async fn test_duplicate_path_conflicts() {
    let store = MemoryStore::new();
    store
        .create(&folder(42, None, "Correspondence", "correspondence"))
        .await
        .unwrap();
    let err = store
        .create(&folder(42, None, "correspondence", "correspondence"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, casefile_core::error::ErrorKind::Conflict);

    // Another case is unaffected.
    assert!(
        store
            .create(&folder(43, None, "Correspondence", "correspondence"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_seed_roots_is_idempotent() {
    let store = MemoryStore::new();
    let roots = vec![
        folder(7, None, "Correspondence", "correspondence"),
        folder(7, None, "Identification", "identification"),
    ];
    let first = store.seed_roots(CaseId(7), &roots).await.unwrap();
    assert_eq!(first.created, 2);

    let again = vec![folder(7, None, "Correspondence", "correspondence")];
    let second = store.seed_roots(CaseId(7), &again).await.unwrap();
    assert_eq!(second.created, 0);

    let mut a: Vec<_> = first.roots.iter().map(|r| r.id).collect();
    let mut b: Vec<_> = second.roots.iter().map(|r| r.id).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_commit_updates_folder_count_and_is_idempotent() {
    let store = MemoryStore::new();
    let root = store
        .create(&folder(1, None, "Financial", "financial"))
        .await
        .unwrap();
    let pending = store.create_pending(&file(&root, "a.pdf", 10)).await.unwrap();
    assert_eq!(pending.status, FileStatus::Pending);
    assert!(
        store
            .list_committed_in_folder(root.case_id, root.id)
            .await
            .unwrap()
            .is_empty()
    );

    let first = store.commit(root.case_id, pending.id).await.unwrap();
    assert!(first.transitioned);
    let second = store.commit(root.case_id, pending.id).await.unwrap();
    assert!(!second.transitioned);

    let folder = FolderStore::find_by_id(&store, root.case_id, root.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(folder.file_count, 1);
    assert!(!store.mark_orphaned(root.case_id, pending.id).await.unwrap());
}

#[tokio::test]
async fn test_commit_rescues_orphan_but_not_after_folder_delete() {
    let store = MemoryStore::new();
    let root = store
        .create(&folder(1, None, "Financial", "financial"))
        .await
        .unwrap();

    let rescued = store.create_pending(&file(&root, "a.pdf", 10)).await.unwrap();
    assert!(store.mark_orphaned(root.case_id, rescued.id).await.unwrap());
    let outcome = store.commit(root.case_id, rescued.id).await.unwrap();
    assert_eq!(outcome.record.status, FileStatus::Committed);

    let stranded = store.create_pending(&file(&root, "b.pdf", 10)).await.unwrap();
    let deleted = store.delete(root.case_id, root.id, true).await.unwrap();
    assert_eq!(deleted.removed_folders, 1);
    assert_eq!(deleted.orphaned_committed.len(), 1);
    assert_eq!(deleted.orphaned_pending, 1);

    let err = store.commit(root.case_id, stranded.id).await.unwrap_err();
    assert_eq!(err.kind, casefile_core::error::ErrorKind::NotFound);
    let record = FileStore::find_by_id(&store, root.case_id, stranded.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, FileStatus::Orphaned);
}

#[tokio::test]
async fn test_delete_without_force_requires_empty_folder() {
    let store = MemoryStore::new();
    let root = store
        .create(&folder(1, None, "Financial", "financial"))
        .await
        .unwrap();
    let child = store
        .create(&folder(1, Some(&root), "Statements", "statements"))
        .await
        .unwrap();

    let err = store.delete(root.case_id, root.id, false).await.unwrap_err();
    assert_eq!(err.kind, casefile_core::error::ErrorKind::Conflict);

    let deleted = store.delete(root.case_id, root.id, true).await.unwrap();
    assert_eq!(deleted.removed_folders, 2);
    assert!(
        store
            .find_by_path(root.case_id, &child.path)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(store.count(root.case_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sweep_helpers() {
    let store = MemoryStore::new();
    let root = store
        .create(&folder(9, None, "Financial", "financial"))
        .await
        .unwrap();
    let pending = store.create_pending(&file(&root, "a.pdf", 10)).await.unwrap();

    let orphaned = store
        .orphan_stale_pending(Utc::now() + chrono::Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(orphaned, 1);

    let found = store.find_orphaned(10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(store.purge_orphaned(root.case_id, pending.id).await.unwrap());
    assert!(!store.purge_orphaned(root.case_id, pending.id).await.unwrap());
}

#[tokio::test]
async fn test_aggregate_counts_committed_only() {
    let store = MemoryStore::new();
    let root = store
        .create(&folder(3, None, "Financial", "financial"))
        .await
        .unwrap();
    let mut generated = file(&root, "letter.pdf", 100);
    generated.is_generated = true;
    let a = store.create_pending(&generated).await.unwrap();
    let _b = store.create_pending(&file(&root, "b.pdf", 50)).await.unwrap();
    store.commit(root.case_id, a.id).await.unwrap();

    let totals = store.aggregate(root.case_id).await.unwrap();
    assert_eq!(
        totals,
        FileAggregate {
            files: 1,
            bytes: 100,
            generated: 1
        }
    );
}

#[tokio::test]
async fn test_listing_is_newest_first_and_skips_pending() {
    let store = MemoryStore::new();
    let root = store
        .create(&folder(4, None, "Financial", "financial"))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for name in ["january.pdf", "february.pdf", "march.pdf", "draft.pdf"] {
        let record = store.create_pending(&file(&root, name, 10)).await.unwrap();
        ids.push(record.id);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    // "draft.pdf" stays pending.
    for id in &ids[..3] {
        store.commit(root.case_id, *id).await.unwrap();
    }

    let listed = store
        .list_committed_in_folder(root.case_id, root.id)
        .await
        .unwrap();
    let names: Vec<&str> = listed.iter().map(|f| f.original_filename.as_str()).collect();
    assert_eq!(names, vec!["march.pdf", "february.pdf", "january.pdf"]);
    assert!(listed.windows(2).all(|w| w[0].uploaded_at >= w[1].uploaded_at));

    let whole_case = store.list_committed(root.case_id).await.unwrap();
    assert_eq!(whole_case.len(), 3);
}
