/*!
 * Manifest tree construction and repository layout tests
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use comet::{
    BuiltTree, Digest, FileRepo, HashGroup, Manifest, Name, PointerKind, WireObject,
    DEFAULT_FANOUT,
};

fn name() -> Name {
    Name::new("icn:/producer/file").unwrap()
}

fn write_source(dir: &Path, contents: &[u8]) -> PathBuf {
    let path = dir.join("source.bin");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

fn build(
    dir: &Path,
    contents: &[u8],
    block_size: usize,
    fan_out: usize,
) -> (FileRepo, BuiltTree) {
    let repo_dir = dir.join("repo");
    fs::create_dir(&repo_dir).unwrap();
    let source = write_source(dir, contents);

    let repo = FileRepo::open(&repo_dir, block_size)
        .unwrap()
        .with_fan_out(fan_out)
        .unwrap();
    let built = repo.load_file(&name(), &source).unwrap();
    (repo, built)
}

/// Decode the manifest stored under a digest.
fn load_manifest(repo: &FileRepo, digest: &Digest) -> Manifest {
    match WireObject::decode(&repo.resolve(digest).unwrap()).unwrap() {
        WireObject::Manifest(manifest) => manifest,
        other => panic!("expected manifest, got {:?}", other),
    }
}

/// Walk every group of the tree rooted at `root`, depth-first.
fn collect_groups(repo: &FileRepo, root: &Manifest, out: &mut Vec<(bool, HashGroup)>) {
    for (index, group) in root.groups().iter().enumerate() {
        out.push((out.is_empty() && index == 0, group.clone()));
        for pointer in group.pointers() {
            if pointer.kind() == PointerKind::Manifest {
                let child = load_manifest(repo, pointer.digest());
                collect_groups(repo, &child, out);
            }
        }
    }
}

#[test]
fn empty_file_builds_empty_root_group() {
    let dir = tempdir().unwrap();
    let (_repo, built) = build(dir.path(), b"", 4096, DEFAULT_FANOUT);

    let group = built.root.root_group().unwrap();
    assert!(group.is_empty());
    assert_eq!(group.data_size(), 0);
    assert_eq!(
        group.overall_data_digest().unwrap().to_hex(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn single_chunk_file_has_one_data_pointer() {
    let dir = tempdir().unwrap();
    let (_repo, built) = build(dir.path(), &[0x41u8; 100], 4096, DEFAULT_FANOUT);

    let group = built.root.root_group().unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.pointers()[0].kind(), PointerKind::Data);
    assert_eq!(group.data_size(), 100);
}

#[test]
fn exactly_one_full_group_stays_flat() {
    // fan_out chunks of exactly block_size bytes: no nesting at all.
    let dir = tempdir().unwrap();
    let data = vec![7u8; DEFAULT_FANOUT * 4096];
    let (_repo, built) = build(dir.path(), &data, 4096, DEFAULT_FANOUT);

    let group = built.root.root_group().unwrap();
    assert_eq!(group.len(), DEFAULT_FANOUT);
    assert!(group
        .pointers()
        .iter()
        .all(|p| p.kind() == PointerKind::Data));
    assert_eq!(group.data_size(), (DEFAULT_FANOUT * 4096) as u64);
    assert_eq!(built.stats.manifests, 1);
}

#[test]
fn one_byte_overflow_nests_one_manifest() {
    // One byte past a full group: the root keeps the first chunk in file
    // order plus a pointer to the interior manifest holding the rest.
    let dir = tempdir().unwrap();
    let data = vec![9u8; DEFAULT_FANOUT * 4096 + 1];
    let (repo, built) = build(dir.path(), &data, 4096, DEFAULT_FANOUT);

    let group = built.root.root_group().unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(group.pointers()[0].kind(), PointerKind::Data);
    assert_eq!(group.pointers()[1].kind(), PointerKind::Manifest);

    let interior = load_manifest(&repo, group.pointers()[1].digest());
    let interior_group = interior.root_group().unwrap();
    assert_eq!(interior_group.len(), DEFAULT_FANOUT);
    assert_eq!(interior_group.block_size(), Some(4096));
    assert_eq!(
        interior_group.entry_size(),
        ((DEFAULT_FANOUT - 1) * 4096 + 1) as u64
    );
    assert_eq!(interior_group.data_size(), interior_group.entry_size());
    assert!(interior_group.overall_data_digest().is_none());
}

#[test]
fn partial_final_chunk_keeps_its_length() {
    let dir = tempdir().unwrap();
    let data = vec![3u8; 2 * 4096 + 37];
    let (repo, built) = build(dir.path(), &data, 4096, DEFAULT_FANOUT);

    let group = built.root.root_group().unwrap();
    assert_eq!(group.len(), 3);

    let last = group.pointers().last().unwrap();
    let wire = repo.resolve(last.digest()).unwrap();
    match WireObject::decode(&wire).unwrap() {
        WireObject::Content(object) => assert_eq!(object.payload_len(), 37),
        other => panic!("expected content object, got {:?}", other),
    }
}

#[test]
fn every_interior_group_is_full() {
    // Deep tree with a small fan-out; every group but the root is full.
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..=255u8).cycle().take(50 * 32).collect();
    let (repo, built) = build(dir.path(), &data, 32, 4);

    let mut groups = Vec::new();
    collect_groups(&repo, &built.root, &mut groups);
    assert!(groups.len() > 2);

    for (is_root, group) in &groups {
        if *is_root {
            assert!(group.len() >= 1 && group.len() <= 4);
        } else {
            assert_eq!(group.len(), 4);
        }
    }

    // Exactly one group in the whole tree carries the overall digest.
    let digest_count = groups
        .iter()
        .filter(|(_, g)| g.overall_data_digest().is_some())
        .count();
    assert_eq!(digest_count, 1);
    assert!(groups[0].1.overall_data_digest().is_some());
}

#[test]
fn overall_digest_is_forward_file_order() {
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let (_repo, built) = build(dir.path(), &data, 512, 4);

    assert_eq!(
        built.root.root_group().unwrap().overall_data_digest(),
        Some(&Digest::of(&data))
    );
}

#[test]
fn terminal_group_metadata_is_pinned() {
    // block_size/entry_size stay unset on the terminal group even after
    // rotations; data_size carries the total.
    let dir = tempdir().unwrap();
    let data = vec![5u8; 10 * 32 + 3];
    let (_repo, built) = build(dir.path(), &data, 32, 4);

    let group = built.root.root_group().unwrap();
    assert_eq!(group.block_size(), None);
    assert_eq!(group.entry_size(), 0);
    assert_eq!(group.data_size(), (10 * 32 + 3) as u64);
}

#[test]
fn repository_entries_are_content_addressed() {
    let dir = tempdir().unwrap();
    let data = vec![11u8; 5000];
    let (repo, _built) = build(dir.path(), &data, 512, 4);

    let mut entries = 0;
    for entry in fs::read_dir(repo.store().directory()).unwrap() {
        let entry = entry.unwrap();
        let contents = fs::read(entry.path()).unwrap();
        let file_name = entry.file_name().into_string().unwrap();
        assert_eq!(file_name.len(), 64);
        assert_eq!(Digest::of(&contents).to_hex(), file_name);
        entries += 1;
    }
    assert!(entries > 0);
}

#[test]
fn rebuilding_the_same_file_is_idempotent() {
    let dir = tempdir().unwrap();
    let repo_dir = dir.path().join("repo");
    fs::create_dir(&repo_dir).unwrap();
    let source = write_source(dir.path(), &vec![13u8; 4000]);

    let repo = FileRepo::open(&repo_dir, 512).unwrap().with_fan_out(4).unwrap();
    let first = repo.load_file(&name(), &source).unwrap();

    let snapshot = |dir: &Path| {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    };
    let before = snapshot(&repo_dir);

    let second = repo.load_file(&name(), &source).unwrap();
    assert_eq!(first.root_digest, second.root_digest);
    assert_eq!(snapshot(&repo_dir), before);
}
