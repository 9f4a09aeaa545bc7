//! End-to-end behavior scenarios across the whole list surface.

use packlist_core::{Direction, End, PackList, Value};

fn contents(list: &mut PackList) -> Vec<Vec<u8>> {
    list.iter(Direction::HeadToTail)
        .map(|e| e.into_value().into_bytes())
        .collect()
}

#[test]
fn three_pushes_with_fill_two() {
    let mut list = PackList::with_options(2, 0);
    list.push_tail(b"1");
    list.push_tail(b"2");
    list.push_tail(b"3");

    assert_eq!(list.segment_count(), 2);
    assert_eq!(list.count(), 3);
    assert_eq!(contents(&mut list), vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]);
    list.assert_invariants();
}

#[test]
fn del_range_removes_middle_element() {
    let mut list = PackList::with_options(2, 0);
    list.push_tail(b"1");
    list.push_tail(b"2");
    list.push_tail(b"3");

    assert!(list.del_range(1, 1));
    assert_eq!(list.count(), 2);
    assert_eq!(contents(&mut list), vec![b"1".to_vec(), b"3".to_vec()]);
    list.assert_invariants();
}

#[test]
fn window_of_one_over_four_segments() {
    let mut list = PackList::with_options(4, 1);
    for i in 0..16 {
        list.push_tail(format!("window element {i} aaaaaaaaaaaaaaaaaaaaaaaa").as_bytes());
    }
    assert_eq!(list.segment_count(), 4);

    let first = list.head_segment().unwrap();
    let second = list.next_segment(first).unwrap();
    let third = list.next_segment(second).unwrap();
    let fourth = list.tail_segment().unwrap();

    assert!(list.compressed_bytes(first).is_none());
    assert!(list.compressed_bytes(second).is_some());
    assert!(list.compressed_bytes(third).is_some());
    assert!(list.compressed_bytes(fourth).is_none());
    list.assert_invariants();
}

#[test]
fn negative_index_and_out_of_bounds() {
    let mut list = PackList::new();
    list.push_tail(b"a");
    list.push_tail(b"b");
    list.push_tail(b"c");

    assert_eq!(list.index(-1).unwrap().value(), &Value::Bytes(b"c".to_vec()));
    assert!(list.index(3).is_none());
}

#[test]
fn rotate_tail_to_head() {
    let mut list = PackList::with_options(2, 0);
    list.push_tail(b"1");
    list.push_tail(b"2");
    list.push_tail(b"3");

    list.rotate();
    assert_eq!(contents(&mut list), vec![b"3".to_vec(), b"1".to_vec(), b"2".to_vec()]);
    list.assert_invariants();
}

#[test]
fn index_reads_identical_across_a_compression_cycle() {
    let mut list = PackList::with_options(8, 1);
    for i in 0..64 {
        list.push_tail(format!("stable payload number {i} ......................").as_bytes());
    }
    // Reading an interior element decompresses and restores its segment;
    // the value must be byte-identical before and after the cycle.
    let before = list.get(20).unwrap();
    let again = list.get(20).unwrap();
    assert_eq!(before, again);
    list.assert_invariants();
}

#[test]
fn push_pop_sequence_matches_deque_semantics() {
    let mut list = PackList::with_options(3, 0);
    let mut deque = std::collections::VecDeque::new();

    let script: &[(bool, Option<&[u8]>)] = &[
        (true, Some(b"a")),
        (true, Some(b"b")),
        (false, Some(b"c")),
        (true, None),
        (false, Some(b"d")),
        (false, None),
        (true, Some(b"e")),
        (true, None),
        (false, None),
        (true, None),
    ];
    for (at_head, push) in script {
        match (at_head, push) {
            (true, Some(v)) => {
                list.push_head(v);
                deque.push_front(v.to_vec());
            }
            (false, Some(v)) => {
                list.push_tail(v);
                deque.push_back(v.to_vec());
            }
            (true, None) => {
                assert_eq!(list.pop(End::Head).map(Value::into_bytes), deque.pop_front());
            }
            (false, None) => {
                assert_eq!(list.pop(End::Tail).map(Value::into_bytes), deque.pop_back());
            }
        }
        list.assert_invariants();
    }
    assert_eq!(contents(&mut list), Vec::from(deque));
}

#[test]
fn replace_preserves_count_and_neighbors() {
    let mut list = PackList::with_options(2, 0);
    for i in 0..6 {
        list.push_tail(format!("v{i}").as_bytes());
    }
    assert!(list.replace_at_index(3, b"swapped"));
    assert_eq!(list.count(), 6);
    assert_eq!(
        contents(&mut list),
        vec![
            b"v0".to_vec(),
            b"v1".to_vec(),
            b"v2".to_vec(),
            b"swapped".to_vec(),
            b"v4".to_vec(),
            b"v5".to_vec(),
        ]
    );
    list.assert_invariants();
}

#[test]
fn compare_uses_packed_equality_semantics() {
    let mut list = PackList::new();
    list.push_tail(b"500");
    list.push_tail(b"text");

    let number = list.index(0).unwrap();
    assert!(number.matches(b"500"));
    assert!(!number.matches(b"0500"));
    assert!(!number.matches(b"501"));

    let text = list.index(1).unwrap();
    assert!(text.matches(b"text"));
    assert!(!text.matches(b"tex"));
}

#[test]
fn bookmarks_survive_restructuring() {
    let mut list = PackList::with_options(2, 0);
    for i in 0..10 {
        list.push_tail(format!("x{i}").as_bytes());
    }
    assert_eq!(list.segment_count(), 5);

    let third = {
        let first = list.head_segment().unwrap();
        let second = list.next_segment(first).unwrap();
        list.next_segment(second).unwrap()
    };
    assert!(list.bookmark_create("resume", third));

    // Drop the two leading segments; the bookmark's segment is untouched.
    assert!(list.del_range(0, 3));
    assert_eq!(list.bookmark_find("resume"), Some(third));

    // An iterator can resume from the bookmarked segment's first element.
    let mut found = None;
    let mut iter = list.iter(Direction::HeadToTail);
    while let Some(entry) = iter.next_entry() {
        if entry.segment() == third && entry.offset() == 0 {
            found = Some(entry.into_value().into_bytes());
            break;
        }
    }
    drop(iter);
    assert_eq!(found, Some(b"x4".to_vec()));
}

#[test]
fn duplicate_then_diverge() {
    let mut list = PackList::with_options(4, 1);
    for i in 0..20 {
        list.push_tail(format!("shared content {i} ........................").as_bytes());
    }
    let mut copy = list.dup();

    list.push_tail(b"only in original");
    copy.push_head(b"only in copy");

    assert_eq!(list.count(), 21);
    assert_eq!(copy.count(), 21);
    assert!(list.get(-1).unwrap().matches(b"only in original"));
    assert!(copy.get(0).unwrap().matches(b"only in copy"));
    list.assert_invariants();
    copy.assert_invariants();
}

#[test]
fn oversized_values_get_their_own_segments() {
    let mut list = PackList::with_options(-1, 0);
    list.push_tail(&[b'a'; 10_000]);
    list.push_tail(b"small");
    list.push_tail(&[b'b'; 20_000]);

    assert_eq!(list.count(), 3);
    assert!(list.get(0).unwrap().matches(&[b'a'; 10_000]));
    assert!(list.get(2).unwrap().matches(&[b'b'; 20_000]));
    list.assert_invariants();
}

#[test]
fn pop_custom_transfers_ownership_through_saver() {
    let mut list = PackList::new();
    list.push_tail(b"payload");

    let length = list.pop_custom(End::Tail, |bytes| bytes.len());
    assert_eq!(length, Some(packlist_core::Popped::Bytes(7)));
    assert!(list.is_empty());
}
