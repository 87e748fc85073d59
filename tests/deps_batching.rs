// tests/deps_batching.rs

//! Dependency list parsing and install batching.

use std::collections::HashSet;

use proptest::prelude::*;

use gowatch::build::deps::parse_go_list;
use gowatch::build::INSTALL_BATCH_SIZE;

#[test]
fn batches_preserve_order_and_size_limit() {
    let deps: Vec<String> = (0..45).map(|i| format!("pkg/dep{i}")).collect();
    let batches: Vec<&[String]> = deps.chunks(INSTALL_BATCH_SIZE).collect();

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].len(), 20);
    assert_eq!(batches[1].len(), 20);
    assert_eq!(batches[2].len(), 5);

    let rejoined: Vec<String> = batches.concat();
    assert_eq!(rejoined, deps);
}

proptest! {
    /// For any `go list` style output, the parsed-then-batched install
    /// requests cover the full deduplicated set: no duplicates, no
    /// omissions, no batch above the size cap.
    #[test]
    fn batched_installs_cover_resolved_set(
        deps in prop::collection::vec("[a-z]{1,8}(/[a-z]{1,8}){0,2}", 0..100)
    ) {
        let listing = format!("[{}]\n", deps.join(" "));
        let parsed = parse_go_list(&listing);

        let unique: HashSet<&String> = deps.iter().collect();
        prop_assert_eq!(parsed.len(), unique.len());

        let mut covered = HashSet::new();
        for batch in parsed.chunks(INSTALL_BATCH_SIZE) {
            prop_assert!(!batch.is_empty());
            prop_assert!(batch.len() <= INSTALL_BATCH_SIZE);
            for dep in batch {
                prop_assert!(covered.insert(dep.clone()), "duplicate install: {}", dep);
            }
        }
        for dep in unique {
            prop_assert!(covered.contains(dep), "missing install: {}", dep);
        }
    }
}
