use grove_render::{sanitize, IdAllocator};
use proptest::prelude::*;
use std::collections::HashSet;

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(raw in any::<String>()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once.clone());
        prop_assert!(is_valid_id(&once), "{:?} -> {:?}", raw, once);
    }

    #[test]
    fn allocator_never_shares_an_id(
        raws in prop::collection::hash_set("[a-z_/. -]{0,6}|end|graph|class", 0..40)
    ) {
        let mut ids = IdAllocator::new();
        let mut seen = HashSet::new();

        for raw in &raws {
            let id = ids.id_for(raw);
            prop_assert!(is_valid_id(&id));
            prop_assert!(seen.insert(id.clone()), "{:?} reused {:?}", raw, id);
        }
        for raw in &raws {
            prop_assert!(seen.contains(&ids.id_for(raw)));
        }
    }

    #[test]
    fn allocator_is_stable_per_input(raws in prop::collection::vec(".{0,8}", 1..30)) {
        let mut ids = IdAllocator::new();
        let first: Vec<String> = raws.iter().map(|r| ids.id_for(r)).collect();
        let again: Vec<String> = raws.iter().map(|r| ids.id_for(r)).collect();
        prop_assert_eq!(first, again);
    }
}
