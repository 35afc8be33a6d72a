use std::collections::BTreeMap;

use llrb_ost::{Error, OrderedMap, Rank};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates keys from a range narrow enough to cause frequent collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn searchexample() -> OrderedMap<char, usize> {
    let mut map = OrderedMap::new();
    for (i, key) in "SEARCHEXAMPLE".chars().enumerate() {
        map.put(key, i);
    }
    map
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Put(i64, i64),
    Delete(i64),
    Get(i64),
    Contains(i64),
    DeleteMin,
    DeleteMax,
    Floor(i64),
    Ceiling(i64),
    Rank(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Put(k, v)),
        3 => key_strategy().prop_map(MapOp::Delete),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Contains),
        1 => Just(MapOp::DeleteMin),
        1 => Just(MapOp::DeleteMax),
        1 => key_strategy().prop_map(MapOp::Floor),
        1 => key_strategy().prop_map(MapOp::Ceiling),
        1 => key_strategy().prop_map(MapOp::Rank),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both OrderedMap and
    /// BTreeMap and asserts identical results, and a structurally sound tree,
    /// at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: OrderedMap<i64, i64> = OrderedMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Put(k, v) => {
                    prop_assert_eq!(map.put(*k, *v), bt_map.insert(*k, *v), "put({}, {})", k, v);
                }
                MapOp::Delete(k) => {
                    prop_assert_eq!(map.delete(k), bt_map.remove(k), "delete({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::Contains(k) => {
                    prop_assert_eq!(map.contains(k), bt_map.contains_key(k), "contains({})", k);
                }
                MapOp::DeleteMin => {
                    prop_assert_eq!(map.delete_min().ok(), bt_map.pop_first(), "delete_min()");
                }
                MapOp::DeleteMax => {
                    prop_assert_eq!(map.delete_max().ok(), bt_map.pop_last(), "delete_max()");
                }
                MapOp::Floor(k) => {
                    let expected = bt_map.range(..=*k).next_back().map(|(k, _)| k);
                    prop_assert_eq!(map.floor(k).ok(), expected, "floor({})", k);
                }
                MapOp::Ceiling(k) => {
                    let expected = bt_map.range(*k..).next().map(|(k, _)| k);
                    prop_assert_eq!(map.ceiling(k).ok(), expected, "ceiling({})", k);
                }
                MapOp::Rank(k) => {
                    prop_assert_eq!(map.rank(k), bt_map.range(..*k).count(), "rank({})", k);
                }
            }

            prop_assert_eq!(map.len(), bt_map.len());
            prop_assert!(map.is_balanced());
        }

        prop_assert!(map.check());
        prop_assert!(map.iter().eq(bt_map.iter()));
    }

    /// Inserting then deleting every key in random order leaves an empty,
    /// balanced tree, and the tree stays sound at every intermediate step.
    #[test]
    fn delete_everything_in_random_order(
        keys in proptest::collection::vec(key_strategy(), 1..TEST_SIZE),
        order in any::<proptest::sample::Index>(),
    ) {
        let mut map: OrderedMap<i64, ()> = keys.iter().map(|k| (*k, ())).collect();
        let mut remaining: Vec<i64> = map.keys().copied().collect();
        let rotate = order.index(remaining.len());
        remaining.rotate_left(rotate);

        for key in &remaining {
            prop_assert_eq!(map.delete(key), Some(()));
            prop_assert!(map.check());
        }

        prop_assert!(map.is_empty());
        prop_assert_eq!(map.height(), -1);
    }

    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: OrderedMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(map.iter().len(), bt_map.len());
        prop_assert!(map.iter().eq(bt_map.iter()));
        prop_assert!(map.keys().eq(bt_map.keys()));
        prop_assert!(map.values().eq(bt_map.values()));

        let mut visited = Vec::new();
        map.for_each_in_order(|k, v| visited.push((*k, *v)));
        let expected: Vec<(i64, i64)> = bt_map.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&visited, &expected);

        let owned: Vec<(i64, i64)> = map.into_iter().collect();
        prop_assert_eq!(owned, expected);
    }

    #[test]
    fn get_mut_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        probes in proptest::collection::vec(key_strategy(), 100),
    ) {
        let mut map: OrderedMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for k in &probes {
            if let Some(v) = map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
            if let Some(v) = bt_map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
        }

        prop_assert!(map.iter().eq(bt_map.iter()));
    }

    #[test]
    fn clone_and_eq_match_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: OrderedMap<i64, i64> = entries.iter().copied().collect();
        let mut copy = map.clone();
        prop_assert_eq!(&copy, &map);

        if let Ok((k, _)) = copy.delete_min() {
            prop_assert_ne!(&copy, &map);
            copy.put(k, *map.get(&k).expect("key came from the map"));
            prop_assert_eq!(&copy, &map);
        }
    }
}

// ─── Order statistics ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn select_matches_sorted_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: OrderedMap<i64, i64> = entries.iter().copied().collect();
        let sorted: Vec<(i64, i64)> = entries.iter().copied().collect::<BTreeMap<_, _>>().into_iter().collect();

        for (i, (k, v)) in sorted.iter().enumerate() {
            prop_assert_eq!(map.select(i), Ok(k));
            prop_assert_eq!(map.get_by_rank(i), Some((k, v)));
            prop_assert_eq!(map[Rank(i)], *v);
            prop_assert_eq!(map.rank_of(k), Some(i));
        }

        prop_assert_eq!(
            map.select(sorted.len()),
            Err(Error::RankOutOfBounds { rank: sorted.len(), len: sorted.len() })
        );
    }

    #[test]
    fn rank_select_inverse(entries in proptest::collection::vec(key_strategy(), TEST_SIZE)) {
        let map: OrderedMap<i64, ()> = entries.iter().map(|k| (*k, ())).collect();

        for i in 0..map.len() {
            let key = map.select(i).expect("rank is in bounds");
            prop_assert_eq!(map.rank(key), i);
        }
    }

    #[test]
    fn order_stats_after_mutations(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: OrderedMap<i64, i64> = OrderedMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Put(k, v) => {
                    map.put(*k, *v);
                    bt_map.insert(*k, *v);
                }
                MapOp::Delete(k) => {
                    map.delete(k);
                    bt_map.remove(k);
                }
                _ => {}
            }
        }

        for (i, k) in bt_map.keys().enumerate() {
            prop_assert_eq!(map.select(i), Ok(k));
            prop_assert_eq!(map.rank(k), i);
        }
    }

    #[test]
    fn keys_in_range_matches_btreemap(
        keys in proptest::collection::vec(key_strategy(), TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
    ) {
        let map: OrderedMap<i64, ()> = keys.iter().map(|k| (*k, ())).collect();
        let bt_map: BTreeMap<i64, ()> = keys.iter().map(|k| (*k, ())).collect();

        let actual: Vec<i64> = map.keys_in_range(&lo, &hi).copied().collect();
        let expected: Vec<i64> = if lo <= hi {
            bt_map.range(lo..=hi).map(|(k, _)| *k).collect()
        } else {
            Vec::new()
        };

        prop_assert_eq!(map.len_in_range(&lo, &hi), expected.len());
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn height_is_logarithmic(keys in proptest::collection::vec(any::<u32>(), 1..TEST_SIZE)) {
        let map: OrderedMap<u32, ()> = keys.iter().map(|k| (*k, ())).collect();
        let bound = 2.0 * ((map.len() + 1) as f64).log2();
        prop_assert!((map.height() as f64) <= bound, "height {} exceeds {}", map.height(), bound);
    }
}

// ─── Scripted scenarios ──────────────────────────────────────────────────────

#[test]
fn searchexample_renders_textbook_shape() {
    let map = searchexample();

    assert_eq!(map.len(), 10);
    assert_eq!(
        map.render(true),
        concat!(
            "      X:B\n",
            "         S:R\n",
            "   R:B\n",
            "      P:B\n",
            "M:B\n",
            "      L:B\n",
            "         H:R\n",
            "   E:B\n",
            "      C:B\n",
            "         A:R\n",
        )
    );
    assert!(map.check());
}

#[test]
fn deleting_inner_node_adopts_successor() {
    let mut map = searchexample();

    assert_eq!(map.delete(&'E'), Some(12));
    assert_eq!(
        map.render(true),
        concat!(
            "      X:B\n",
            "         S:R\n",
            "   R:B\n",
            "      P:B\n",
            "M:B\n",
            "      L:B\n",
            "   H:B\n",
            "      C:B\n",
            "         A:R\n",
        )
    );
    assert!(map.check());
}

#[test]
fn delete_min_and_max_reshape() {
    let mut map = searchexample();

    assert_eq!(map.delete_min(), Ok(('A', 8)));
    assert_eq!(map.delete_max(), Ok(('X', 7)));
    assert_eq!(
        map.render(true),
        concat!(
            "      S:B\n",
            "   R:B\n",
            "      P:B\n",
            "M:B\n",
            "      L:B\n",
            "         H:R\n",
            "   E:B\n",
            "      C:B\n",
        )
    );
    assert!(map.check());
}

#[test]
fn searchexample_round_trip() {
    let mut map = searchexample();

    // Duplicate keys only replace values.
    assert_eq!(map.get(&'E'), Some(&12));
    assert_eq!(map.get(&'A'), Some(&8));

    for key in "SEARCHEXAMPLE".chars() {
        map.delete(&key);
        assert!(map.check());
    }

    assert!(map.is_empty());
    assert!(map.is_balanced());
    assert_eq!(map.render(true), "");
}

#[test]
fn reinsertion_updates_without_growing() {
    let mut map = searchexample();
    let shape = map.render(true);

    assert_eq!(map.put('E', 100), Some(12));
    assert_eq!(map.len(), 10);
    assert_eq!(map.get(&'E'), Some(&100));
    assert_eq!(map.render(true), shape);
}

#[test]
fn floor_and_ceiling_boundaries() {
    let map = OrderedMap::from([(2, ()), (5, ()), (8, ())]);

    assert_eq!(map.floor(&5), Ok(&5));
    assert_eq!(map.ceiling(&5), Ok(&5));
    assert_eq!(map.floor(&1), Err(Error::NotFound));
    assert_eq!(map.ceiling(&9), Err(Error::NotFound));
    assert_eq!(map.floor(&6), Ok(&5));
    assert_eq!(map.ceiling(&6), Ok(&8));
}

#[test]
fn delete_min_drains_in_order() {
    let mut map: OrderedMap<i32, i32> = (1..=10).map(|k| (k, k * k)).collect();

    for k in 1..=10 {
        assert_eq!(map.delete_min(), Ok((k, k * k)));
        assert!(map.check());
    }

    assert!(map.is_empty());
    assert_eq!(map.delete_min(), Err(Error::NotFound));
}

#[test]
fn empty_map_queries_fail_cleanly() {
    let mut map: OrderedMap<i32, i32> = OrderedMap::default();

    assert_eq!(map.min(), Err(Error::NotFound));
    assert_eq!(map.max(), Err(Error::NotFound));
    assert_eq!(map.floor(&0), Err(Error::NotFound));
    assert_eq!(map.ceiling(&0), Err(Error::NotFound));
    assert_eq!(map.select(0), Err(Error::RankOutOfBounds { rank: 0, len: 0 }));
    assert_eq!(map.delete_max(), Err(Error::NotFound));
    assert_eq!(map.delete(&0), None);
    assert_eq!(map.rank(&0), 0);
    assert_eq!(map.height(), -1);
    assert_eq!(map.keys_in_range(&0, &10).count(), 0);
    assert!(map.check());
}

#[test]
fn string_keys_borrow_as_str() {
    let mut map: OrderedMap<String, u32> = OrderedMap::new();
    map.put("pear".to_string(), 3);
    map.put("apple".to_string(), 1);
    map.put("fig".to_string(), 2);

    assert_eq!(map.get("fig"), Some(&2));
    assert_eq!(map["pear"], 3);
    assert_eq!(map.rank("banana"), 1);
    assert_eq!(map.keys_in_range("b", "g").collect::<Vec<_>>(), ["fig"]);
    assert_eq!(map.delete("apple"), Some(1));
    assert_eq!(map.min().map(String::as_str), Ok("fig"));
}

#[test]
fn reverse_newtype_flips_the_order() {
    use std::cmp::Reverse;

    let map: OrderedMap<Reverse<i32>, ()> = (1..=5).map(|k| (Reverse(k), ())).collect();

    assert_eq!(map.min(), Ok(&Reverse(5)));
    assert_eq!(map.select(1), Ok(&Reverse(4)));
    assert_eq!(map.floor(&Reverse(0)), Ok(&Reverse(1)));
}

#[test]
fn debug_formats_like_a_map() {
    let map = OrderedMap::from([(2, "b"), (1, "a")]);
    assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
}
