use lineage::{ConsanguinityOracle, FamilyGraph, FamilyRecord, IndividualRecord, Pedigree, Sex, Size};

fn person(id: u32, sex: Sex) -> IndividualRecord {
    IndividualRecord {
        id,
        sex,
        label_size: Size::new(40.0, 20.0),
        ..Default::default()
    }
}

fn family(id: u32, parents: &[u32], children: &[u32]) -> FamilyRecord {
    FamilyRecord {
        id,
        parent_ids: parents.to_vec(),
        child_ids: children.to_vec(),
        label_size: None,
    }
}

/// Cousins P7 and P8 share the grandparent family F1. F9 is an unrelated tree.
fn cousins_and_strangers() -> Pedigree {
    Pedigree::new(
        [
            person(1, Sex::Male),
            person(2, Sex::Female),
            person(3, Sex::Male),
            person(4, Sex::Female),
            person(5, Sex::Female),
            person(6, Sex::Male),
            person(7, Sex::Male),
            person(8, Sex::Female),
            person(20, Sex::Male),
            person(21, Sex::Female),
            person(22, Sex::Male),
        ],
        [
            family(1, &[1, 2], &[3, 4]),
            family(2, &[3, 5], &[7]),
            family(3, &[6, 4], &[8]),
            family(9, &[20, 21], &[22]),
        ],
    )
}

fn oracle(p: &Pedigree) -> ConsanguinityOracle {
    let graph = FamilyGraph::build(p).unwrap();
    ConsanguinityOracle::new(&graph, p)
}

#[test]
fn cousins_with_a_common_grandparent_family_are_related() {
    let p = cousins_and_strangers();
    let o = oracle(&p);
    assert!(o.are_related(7, 8));
    assert!(o.are_related(8, 7));
}

#[test]
fn individuals_in_disjoint_trees_are_not_related() {
    let p = cousins_and_strangers();
    let o = oracle(&p);
    assert!(!o.are_related(7, 22));
    assert!(!o.are_related(3, 20));
    assert!(!o.are_related(1, 22));
}

#[test]
fn parents_are_queried_through_their_families() {
    let p = cousins_and_strangers();
    let o = oracle(&p);
    // P1 is only a parent: the query widens to F1.
    assert!(o.are_related(1, 8));
    assert!(o.are_related(8, 1));
    assert!(o.are_related(3, 4));
    assert!(o.are_related(20, 21));
}

#[test]
fn individuals_without_family_membership_are_never_related() {
    let p = Pedigree::new(
        [person(1, Sex::Male), person(2, Sex::Female), person(3, Sex::Male)],
        [family(1, &[1, 2], &[])],
    );
    let o = oracle(&p);
    // P3 is an isolated leaf node, P1 only a parent.
    assert!(!o.are_related(1, 3));
    assert!(!o.are_related(99, 1));
    assert!(!o.are_related(99, 98));
}
