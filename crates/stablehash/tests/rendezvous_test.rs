//! Scenario tests for rendezvous hashing.

use stablehash::{new_rendezvous_hash, new_rendezvous_hash_weighted, HashSpace, StableHash};

fn expect_node(hash: &HashSpace<&'static str>, key: &str, expected: &str) {
    assert_eq!(hash.get_node(key), Some(expected), "owner of {key}");
}

fn expect_nodes_abc(hash: &HashSpace<&'static str>) {
    expect_node(hash, "test", "b");
    expect_node(hash, "test1", "b");
    expect_node(hash, "test2", "a");
    expect_node(hash, "test3", "a");
    expect_node(hash, "test4", "c");
    expect_node(hash, "test5", "c");
    expect_node(hash, "aaaa", "b");
    expect_node(hash, "bbbb", "a");
}

#[test]
fn test_single_node_abc() {
    let hash = new_rendezvous_hash(["a", "b", "c"]);
    expect_nodes_abc(&hash);
}

#[test]
fn test_add_node() {
    let hash = new_rendezvous_hash(["a", "b", "c"]).add_node("d");

    expect_node(&hash, "test", "b");
    expect_node(&hash, "test1", "d"); // *
    expect_node(&hash, "test2", "a");
    expect_node(&hash, "test3", "a");
    expect_node(&hash, "test4", "c");
    expect_node(&hash, "test5", "c");
    expect_node(&hash, "aaaa", "d"); // *
    expect_node(&hash, "bbbb", "d"); // *

    let hash = hash.remove_node(&"d");
    expect_nodes_abc(&hash);
}

#[test]
fn test_remove_node() {
    let hash = new_rendezvous_hash(["a", "b", "c", "d"]);
    expect_node(&hash, "test", "b");
    expect_node(&hash, "test1", "d");
    expect_node(&hash, "test2", "a");
    expect_node(&hash, "aaaa", "d");

    let hash = hash.remove_node(&"a");
    expect_node(&hash, "test", "b");
    expect_node(&hash, "test1", "d");
    expect_node(&hash, "test4", "c");
    expect_node(&hash, "test5", "c");
    expect_node(&hash, "aaaa", "d");
    expect_node(&hash, "bbbb", "d");

    let hash = hash.remove_node(&"c");
    expect_node(&hash, "test", "b");
    expect_node(&hash, "test1", "d");
    expect_node(&hash, "aaaa", "d");
    expect_node(&hash, "bbbb", "d");

    let hash = hash.remove_node(&"b");
    expect_node(&hash, "test1", "d");
    expect_node(&hash, "aaaa", "d");
    expect_node(&hash, "bbbb", "d");
}

#[test]
fn test_node_ranges_in_score_order() {
    let hash = new_rendezvous_hash(["a", "b", "c"]);
    let cases: [(&str, [&str; 2]); 8] = [
        ("test", ["b", "c"]),
        ("test1", ["b", "c"]),
        ("test2", ["a", "b"]),
        ("test3", ["a", "c"]),
        ("test4", ["c", "a"]),
        ("test5", ["c", "a"]),
        ("aaaa", ["b", "a"]),
        ("bbbb", ["a", "c"]),
    ];
    for (key, expected) in cases {
        assert_eq!(hash.get_nodes(key, 2).unwrap(), expected, "owners of {key}");
        assert_eq!(hash.get_node(key), Some(expected[0]));
    }
}

#[test]
fn test_only_removed_nodes_keys_move() {
    let before = new_rendezvous_hash(["a", "b", "c", "d"]);
    let after = before.remove_node(&"b");
    for i in 0..500 {
        let key = format!("key-{i}");
        let old = before.get_node(&key).unwrap();
        if old != "b" {
            assert_eq!(after.get_node(&key), Some(old), "{key} moved");
        }
    }
}

#[test]
fn test_weighted_scores() {
    let hash = new_rendezvous_hash_weighted([("a", 1), ("b", 3), ("c", 1)]).unwrap();
    for key in ["test", "test1", "test2", "test3", "test4", "test5", "aaaa", "bbbb"] {
        expect_node(&hash, key, "b");
    }
    assert_eq!(hash.get_nodes("test", 3).unwrap(), vec!["b", "c", "a"]);
}

#[test]
fn test_weight_argument_ignored_after_construction() {
    let plain = new_rendezvous_hash(["a", "b", "c"]);
    let heavy = new_rendezvous_hash(["a", "c"]).add_weighted_node("b", 100).unwrap();
    let updated = new_rendezvous_hash(["a", "b", "c"])
        .update_weighted_node("b", 100)
        .unwrap();
    for key in ["test", "test1", "test2", "test3", "test4", "test5", "aaaa", "bbbb"] {
        assert_eq!(heavy.get_node(key), plain.get_node(key));
        assert_eq!(updated.get_node(key), plain.get_node(key));
    }
}

#[test]
fn test_size_out_of_range() {
    let hash = new_rendezvous_hash(["a", "b", "c"]);
    assert!(hash.get_nodes("test", 0).is_err());
    assert!(hash.get_nodes("test", 4).is_err());
    assert_eq!(hash.get_nodes("test", 3).unwrap().len(), 3);
}
