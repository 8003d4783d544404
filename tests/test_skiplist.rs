use ladder_kv::{GeometricLevels, NodeId, Options, SkipList, SkipListError};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

type List = SkipList<u8, u32, GeometricLevels, 6>;

fn setup_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn entries<V: Clone>(list: &SkipList<u8, V, GeometricLevels, 6>) -> Vec<(u8, V)> {
    let mut out = vec![];
    let mut cursor = list.sentinel();
    loop {
        let next = list.next(cursor).unwrap();
        if next.is_sentinel() {
            return out;
        }
        out.push((*list.key(next).unwrap(), list.value(next).unwrap().clone()));
        cursor = next;
    }
}

/// Handle of the node at `position` in base order, where 0 is the sentinel.
fn nth(list: &List, position: usize) -> NodeId {
    let mut cursor = list.sentinel();
    for _ in 0..position {
        cursor = list.next(cursor).unwrap();
    }
    cursor
}

#[test]
fn scenario_out_of_order_inserts() {
    setup_logging();
    let mut list: SkipList<u8, &str, GeometricLevels, 6> = SkipList::with_seed(0.5, 1);
    list.insert(1, "a");
    list.insert(3, "c");
    list.insert(2, "b");
    assert_eq!(entries(&list), vec![(1, "a"), (2, "b"), (3, "c")]);

    let before_two = list.find_last_less_than(&2);
    assert_eq!(list.key(before_two), Some(&1));
    list.validate().unwrap();
}

#[test]
fn empty_list_boundaries() {
    setup_logging();
    let mut list: List = SkipList::new(0.5);
    assert!(list.find_last_less_than(&0).is_sentinel());
    assert!(list.find_last_less_than(&u8::MAX).is_sentinel());
    assert_eq!(list.find_first(&3), None);
    assert_eq!(list.remove(&3), None);
    assert!(matches!(
        list.remove_next(list.sentinel()),
        Err(SkipListError::InvalidArgument(_))
    ));
}

#[test]
fn duplicates_are_all_kept() {
    setup_logging();
    let mut list: List = SkipList::with_seed(0.5, 99);
    for value in 0..3 {
        list.insert(5, value);
    }
    let first = list.find_first(&5).unwrap();
    assert_eq!(list.key(first), Some(&5));
    assert_eq!(list.value(first), Some(&0));
    assert_eq!(entries(&list), vec![(5, 0), (5, 1), (5, 2)]);
}

#[test]
fn predecessor_delete_walkthrough() {
    setup_logging();
    let mut list: List = SkipList::with_options(Options {
        probability: 0.5,
        capacity: 16,
        seed: Some(3),
    });
    for key in [10, 20, 30, 40] {
        list.insert(key, u32::from(key) * 10);
    }

    let before = list.find_last_less_than(&30);
    assert_eq!(list.remove_next(before), Ok((30, 300)));
    assert_eq!(list.find_first(&30), None);

    let last = list.find_last_less_than(&u8::MAX);
    assert_eq!(
        list.remove_next(last),
        Err(SkipListError::InvalidArgument("can't remove the sentinel"))
    );

    // Slots are recycled, but the old handle stays dead.
    let stale = list.find_first(&20).unwrap();
    list.remove_node(stale).unwrap();
    let fresh = list.insert(25, 250);
    assert_ne!(stale, fresh);
    assert!(matches!(
        list.remove_next(stale),
        Err(SkipListError::InvalidArgument(_))
    ));

    assert_eq!(entries(&list), vec![(10, 100), (25, 250), (40, 400)]);
    list.validate().unwrap();
}

#[test]
fn towers_get_tall_enough_to_matter() {
    let mut list: List = SkipList::with_seed(0.5, 5);
    let ids: Vec<NodeId> = (0..=255u8).map(|key| list.insert(key, 0)).collect();
    let tallest = ids.iter().filter_map(|&id| list.height(id)).max();
    assert!(tallest >= Some(3), "tallest tower {tallest:?}");
    assert_eq!(list.height(list.sentinel()), Some(6));
    list.validate().unwrap();
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u32),
    Remove(u8),
    RemoveNext(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..32, any::<u32>()).prop_map(|(key, value)| Op::Insert(key, value)),
        1 => (0u8..32).prop_map(Op::Remove),
        1 => (0usize..64).prop_map(Op::RemoveNext),
    ]
}

fn check(list: &List) -> Result<(), TestCaseError> {
    list.validate()
        .map_err(|err| TestCaseError::fail(format!("{err:#}")))
}

proptest! {
    // Random workloads match a sorted vector and never break the level structure.
    #[test]
    fn prop_matches_sorted_model(seed in any::<u64>(), ops in vec(op(), 0..200)) {
        let mut list: List = SkipList::with_seed(0.5, seed);
        let mut model: Vec<(u8, u32)> = vec![];

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    list.insert(key, value);
                    let at = model.partition_point(|(k, _)| *k <= key);
                    model.insert(at, (key, value));
                }
                Op::Remove(key) => {
                    let at = model.iter().position(|(k, _)| *k == key);
                    let expected = at.map(|at| model.remove(at).1);
                    prop_assert_eq!(list.remove(&key), expected);
                }
                Op::RemoveNext(position) => {
                    let position = position % (model.len() + 1);
                    let before = nth(&list, position);
                    if position == model.len() {
                        prop_assert!(matches!(
                            list.remove_next(before),
                            Err(SkipListError::InvalidArgument(_))
                        ));
                    } else {
                        prop_assert_eq!(list.remove_next(before), Ok(model.remove(position)));
                    }
                }
            }
            check(&list)?;
        }

        prop_assert_eq!(list.len(), model.len());
        prop_assert_eq!(entries(&list), model);
    }

    // Both searches agree with a linear scan over base order.
    #[test]
    fn prop_searches_agree_with_scan(
        seed in any::<u64>(),
        keys in vec(0u8..64, 0..100),
        probe in 0u8..70,
    ) {
        let mut list: List = SkipList::with_seed(0.25, seed);
        for (value, key) in keys.iter().enumerate() {
            list.insert(*key, value as u32);
        }
        let model = entries(&list);

        let less = model.partition_point(|(k, _)| *k < probe);
        let found = list.find_last_less_than(&probe);
        if less == 0 {
            prop_assert!(found.is_sentinel());
        } else {
            prop_assert_eq!(found, nth(&list, less));
        }

        let first = list.find_first(&probe);
        match model.get(less) {
            Some((k, value)) if *k == probe => {
                let first = first.unwrap();
                prop_assert_eq!(first, nth(&list, less + 1));
                prop_assert_eq!(list.value(first), Some(value));
            }
            _ => {
                prop_assert_eq!(first, None);
            }
        }
    }
}
