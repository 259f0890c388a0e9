#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::rc::Rc;

use common::{disordered_parents, person, Person};
use sdiffer_core::{diffable_struct, DiffError, Differ, Diffable, SortRule};

struct Kennel {
    items: Vec<i32>,
    pet: Box<dyn Diffable>,
}

diffable_struct!(Kennel { items as "Items", pet as "Pet" });

fn ascending_i32() -> SortRule<i32> {
    SortRule::new(".*", |x: &i32, y: &i32| x < y).unwrap()
}

fn by_age() -> SortRule<Person> {
    SortRule::new(r"^Person\.Parents$", |a: &Person, b: &Person| a.age < b.age).unwrap()
}

fn paths(differ: &Differ) -> Vec<String> {
    differ.diffs().iter().map(|d| d.path().to_string()).collect()
}

#[test]
fn test_unsorted_lists_compare_positionally() {
    let (me, he) = disordered_parents();
    let mut differ = Differ::new();
    differ.compare(&me, &he).unwrap();

    assert_eq!(
        paths(&differ),
        vec![
            "Person.Name",
            "Person.Age",
            "Person.Parents[0].Name",
            "Person.Parents[0].Age",
            "Person.Parents[1].Name",
            "Person.Parents[1].Age",
            "Person.Parents[2].Age",
        ]
    );
}

#[test]
fn test_compare_mut_sorts_in_place() {
    // GIVEN parents in different orders
    let (mut me, mut he) = disordered_parents();
    let mut differ = Differ::new();
    differ.with_sorter(by_age());

    // WHEN compared with in-place sorting
    differ.compare_mut(&mut me, &mut he).unwrap();

    // THEN only genuine differences remain
    assert_eq!(
        paths(&differ),
        vec!["Person.Name", "Person.Age", "Person.Parents[2].Age"]
    );

    // AND the caller's data stays sorted
    let ages: Vec<i64> = he.parents.iter().map(|p| p.age).collect();
    assert_eq!(ages, vec![30, 40, 50]);
    assert_eq!(he.parents[0].age, 30);
    assert_eq!(me.parents[0].name, "p1");
}

#[test]
fn test_compare_sorts_without_touching_data() {
    let (me, he) = disordered_parents();
    let mut differ = Differ::new();
    differ.with_sorter(by_age());
    differ.compare(&me, &he).unwrap();

    assert_eq!(
        paths(&differ),
        vec!["Person.Name", "Person.Age", "Person.Parents[2].Age"]
    );
    assert_eq!(he.parents[0].name, "p2");
}

#[test]
fn test_compare_and_compare_mut_agree() {
    let (me, he) = disordered_parents();
    let mut differ = Differ::new();
    differ.with_sorter(by_age());
    differ.compare(&me, &he).unwrap();
    let borrowed = differ.diffs().to_vec();

    let (mut me, mut he) = disordered_parents();
    differ.compare_mut(&mut me, &mut he).unwrap();
    assert_eq!(differ.diffs(), borrowed.as_slice());
}

#[test]
fn test_find_diff_is_literal_and_fuzzy_find_is_pattern() {
    let (mut me, mut he) = disordered_parents();
    let mut differ = Differ::new();
    differ.with_sorter(by_age());
    differ.compare_mut(&mut me, &mut he).unwrap();

    assert!(differ.find_diff("Person.Parents[[0-9]+].Age").is_none());
    assert!(differ.find_diff("Person.Parents[2].Age").is_some());

    let found = differ
        .find_diff_fuzzily(r"Person\.Parents\[[0-9]+\]\.Age")
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path(), "Person.Parents[2].Age");
}

#[test]
fn test_sorter_for_other_element_type_keeps_order() {
    let (me, he) = disordered_parents();
    let mut differ = Differ::new();
    differ.with_sorter(SortRule::new(r"^Person\.Parents$", |a: &i32, b: &i32| a < b).unwrap());
    differ.compare(&me, &he).unwrap();
    assert_eq!(differ.diffs().len(), 7);

    let (mut me, mut he) = disordered_parents();
    differ.compare_mut(&mut me, &mut he).unwrap();
    assert_eq!(differ.diffs().len(), 7);
    assert_eq!(he.parents[0].name, "p2");
}

#[test]
fn test_sorter_applies_to_nested_lists() {
    let mut me = person("me", 1);
    let mut he = person("me", 1);
    let mut father = person("f", 50);
    father.str_arr = vec!["b".into(), "a".into()];
    me.parents.push(father);
    let mut father = person("f", 50);
    father.str_arr = vec!["a".into(), "b".into()];
    he.parents.push(father);

    let mut differ = Differ::new();
    differ.with_sorter(
        SortRule::new(r"\.StrArr$", |a: &String, b: &String| a < b).unwrap(),
    );
    differ.compare(&me, &he).unwrap();
    assert!(differ.diffs().is_empty());

    differ.compare_mut(&mut me, &mut he).unwrap();
    assert!(differ.diffs().is_empty());
    assert_eq!(me.parents[0].str_arr, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_root_shape_mismatch_reorders_nothing() {
    let mut a = vec![3i32, 2, 1];
    let mut b = vec![3i64, 2, 1];
    let mut differ = Differ::new();
    differ.with_sorter(ascending_i32());

    assert!(differ.compare_mut(&mut a, &mut b).is_err());
    assert_eq!(a, vec![3, 2, 1]);
}

#[test]
fn test_nested_shape_mismatch_reorders_nothing() {
    // GIVEN a sorted field ahead of a field whose dynamic shapes differ
    let mut a = Kennel {
        items: vec![3, 2, 1],
        pet: Box::new(1i32),
    };
    let mut b = Kennel {
        items: vec![1, 2, 3],
        pet: Box::new("cat".to_string()),
    };
    let mut differ = Differ::new();
    differ.with_sorter(SortRule::new(r"\.Items$", |x: &i32, y: &i32| x < y).unwrap());

    // WHEN compared with in-place sorting
    let err = differ.compare_mut(&mut a, &mut b).unwrap_err();

    // THEN the comparison fails and neither operand was reordered
    assert!(matches!(err, DiffError::ShapeMismatch { .. }));
    assert_eq!(a.items, vec![3, 2, 1]);
    assert!(differ.diffs().is_empty());
}

#[test]
fn test_shared_rc_list_is_compared_in_sorted_order() {
    // GIVEN a list behind an Rc that has another owner
    let mut a = Rc::new(vec![2i32, 1]);
    let other_owner = Rc::clone(&a);
    let mut b = Rc::new(vec![1i32, 2]);
    let mut differ = Differ::new();
    differ.with_sorter(ascending_i32());

    // WHEN compared both ways
    differ.compare(&a, &b).unwrap();
    let borrowed = differ.diffs().len();
    differ.compare_mut(&mut a, &mut b).unwrap();

    // THEN both agree that the lists match
    assert_eq!(borrowed, 0);
    assert!(differ.diffs().is_empty());

    // AND the shared list keeps its order
    assert_eq!(*other_owner, vec![2, 1]);
}

#[test]
fn test_unique_rc_list_is_sorted_in_place() {
    let mut a = Rc::new(vec![2i32, 1]);
    let mut b = Rc::new(vec![1i32, 2]);
    let mut differ = Differ::new();
    differ.with_sorter(ascending_i32());

    differ.compare_mut(&mut a, &mut b).unwrap();
    assert!(differ.diffs().is_empty());
    assert_eq!(*a, vec![1, 2]);
}

#[test]
fn test_long_presorted_lists_sort_on_a_small_stack() {
    // GIVEN long lists already in ascending and descending order
    let ascending: Vec<i32> = (0..3_000).collect();
    let descending: Vec<i32> = (0..3_000).rev().collect();

    // WHEN both comparisons run on a thread with a small stack
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(move || {
            let mut differ = Differ::new();
            differ.with_sorter(ascending_i32());
            differ.compare(&ascending, &descending).unwrap();
            let borrowed = differ.diffs().len();

            let (mut a, mut b) = (ascending, descending);
            differ.compare_mut(&mut a, &mut b).unwrap();
            (borrowed, differ.diffs().len(), a == b)
        })
        .unwrap();

    // THEN the sort completes and the lists match
    assert_eq!(handle.join().unwrap(), (0, 0, true));
}
