use lineage::{
    BranchSet, Brancher, ConsanguinityOracle, FamilyGraph, FamilyRecord, IndividualRecord,
    LayoutConfig, LinkKind, NodeRef, Pedigree, Sex, Size,
};
use std::collections::BTreeSet;
use NodeRef::{Family as F, Individual as P};

fn person(id: u32, sex: Sex, birth: Option<&str>) -> IndividualRecord {
    IndividualRecord {
        id,
        sex,
        birth_date: birth.map(str::to_string),
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

fn branch(p: &mut Pedigree) -> (FamilyGraph, BranchSet) {
    let config = LayoutConfig::default();
    let mut graph = FamilyGraph::build(p).unwrap();
    let oracle = ConsanguinityOracle::new(&graph, p);
    let set = Brancher::new(&config).run(&mut graph, p, &oracle).unwrap();
    (graph, set)
}

/// F1's child P3 founds F2, and F2 lists P1, a founder of F1, as its child.
fn cycle() -> Pedigree {
    Pedigree::new(
        [
            person(1, Sex::Male, None),
            person(2, Sex::Female, None),
            person(3, Sex::Male, None),
            person(4, Sex::Female, None),
        ],
        [family(1, &[1, 2], &[3]), family(2, &[3, 4], &[1])],
    )
}

/// Cousins P7 and P8, both grandchildren of F1, marry each other in F4.
fn cousin_marriage() -> Pedigree {
    Pedigree::new(
        [
            person(1, Sex::Male, None),
            person(2, Sex::Female, None),
            person(3, Sex::Male, Some("1950-01-01")),
            person(4, Sex::Female, Some("1952-01-01")),
            person(5, Sex::Female, Some("1951-01-01")),
            person(6, Sex::Male, Some("1953-01-01")),
            person(7, Sex::Male, Some("1975-01-01")),
            person(8, Sex::Female, Some("1977-01-01")),
            person(9, Sex::Male, Some("2000-01-01")),
        ],
        [
            family(1, &[1, 2], &[3, 4]),
            family(2, &[3, 5], &[7]),
            family(3, &[6, 4], &[8]),
            family(4, &[7, 8], &[9]),
        ],
    )
}

fn assert_branching_invariant(graph: &FamilyGraph, set: &BranchSet) {
    let mut seen: BTreeSet<NodeRef> = BTreeSet::new();
    for b in &set.branches {
        let mut roots = 0;
        for v in 0..b.len() {
            assert!(seen.insert(b.node(v)), "{} is in two branches", b.node(v));
            match b.parent(v) {
                None => roots += 1,
                Some(parent) => assert!(b.children(parent).contains(&v)),
            }
        }
        assert_eq!(roots, 1, "branch {} must have exactly one root", b.id());
        assert_eq!(b.parent(b.root()), None);
    }

    let mut expected: BTreeSet<NodeRef> = graph.nodes().into_iter().collect();
    expected.extend(set.duplicates.iter().map(|&id| P(id)));
    assert_eq!(seen, expected);
}

#[test]
fn a_cycle_is_broken_with_exactly_one_duplicate() {
    let mut p = cycle();
    let (graph, set) = branch(&mut p);

    assert_eq!(set.removed, vec![(F(2), F(1))]);
    assert_eq!(graph.link(F(2), F(1)), Some(LinkKind::Branch));
    assert_eq!(graph.link(F(1), F(2)), Some(LinkKind::Standard));

    assert_eq!(set.duplicates, BTreeSet::from([5]));
    assert_eq!(set.branch_links, BTreeSet::from([(1, 5)]));
    assert_eq!(p.individual(5).unwrap().duplicate_of, Some(1));
    assert_eq!(p.family(2).unwrap().children, vec![1, 5]);

    assert_eq!(set.branches.len(), 1);
    let b = &set.branches[0];
    assert_eq!(b.nodes(), &[F(1), F(2), P(5)]);
    assert_eq!(b.root_node(), F(1));
    assert_eq!(b.children_of(F(2)), vec![P(5)]);
    assert_branching_invariant(&graph, &set);
}

#[test]
fn a_shared_descendant_family_is_reached_through_one_parent_line() {
    let mut p = cousin_marriage();
    let (graph, set) = branch(&mut p);

    assert_eq!(set.removed, vec![(F(3), F(4))]);
    assert_eq!(set.duplicates, BTreeSet::from([10]));
    assert_eq!(set.branch_links, BTreeSet::from([(8, 10)]));

    assert_eq!(set.branches.len(), 1);
    let b = &set.branches[0];
    assert_eq!(b.root_node(), F(1));
    assert_eq!(b.children_of(F(1)), vec![F(2), F(3)]);
    assert_eq!(b.children_of(F(2)), vec![F(4)]);
    assert_eq!(b.children_of(F(3)), vec![P(10)]);
    assert_eq!(b.children_of(F(4)), vec![P(9)]);
    assert_branching_invariant(&graph, &set);
}

#[test]
fn branch_ids_are_written_back_onto_the_graph() {
    let mut p = Pedigree::new(
        [
            person(1, Sex::Male, None),
            person(2, Sex::Female, None),
            person(3, Sex::Male, None),
            person(4, Sex::Male, None),
            person(5, Sex::Female, None),
            person(6, Sex::Female, None),
        ],
        [family(1, &[1, 2], &[3]), family(2, &[4, 5], &[6])],
    );
    let (graph, set) = branch(&mut p);

    assert_eq!(set.branches.len(), 2);
    assert_eq!(set.branches[0].nodes(), &[F(1), P(3)]);
    assert_eq!(set.branches[1].nodes(), &[F(2), P(6)]);
    assert_eq!(graph.branch_of(P(3)), Some(0));
    assert_eq!(graph.branch_of(F(2)), Some(1));
    assert_eq!(set.branch_of(P(6)), Some(1));
    assert!(set.removed.is_empty());
    assert!(set.duplicates.is_empty());
    assert_branching_invariant(&graph, &set);
}

#[test]
fn leaf_children_are_ordered_by_birth_date() {
    let mut p = Pedigree::new(
        [
            person(1, Sex::Male, None),
            person(2, Sex::Female, None),
            person(3, Sex::Male, Some("2000-01-01")),
            person(4, Sex::Female, Some("1998-05-01")),
            person(5, Sex::Male, None),
        ],
        [family(1, &[1, 2], &[3, 4, 5])],
    );
    let (_, set) = branch(&mut p);
    assert_eq!(set.branches[0].children_of(F(1)), vec![P(5), P(4), P(3)]);
}

#[test]
fn a_married_child_sorts_by_the_parent_who_descends_from_the_family() {
    // P3 (1960) marries into F2 with the older P5 (1940); P4 (1950) stays a leaf.
    let mut p = Pedigree::new(
        [
            person(1, Sex::Male, None),
            person(2, Sex::Female, None),
            person(3, Sex::Female, Some("1960-01-01")),
            person(4, Sex::Male, Some("1950-01-01")),
            person(5, Sex::Male, Some("1940-01-01")),
            person(6, Sex::Male, None),
        ],
        [family(1, &[1, 2], &[3, 4]), family(2, &[5, 3], &[6])],
    );
    let (_, set) = branch(&mut p);
    // F1 is related to both of F2's parents through F2 itself; the first parent checked is the
    // father, so F2 sorts by P5's 1940 date, ahead of P4.
    assert_eq!(set.branches[0].children_of(F(1)), vec![F(2), P(4)]);
}

#[test]
fn a_single_parent_family_sorts_by_that_parent() {
    let mut p = Pedigree::new(
        [
            person(1, Sex::Male, None),
            person(2, Sex::Female, None),
            person(3, Sex::Female, Some("1960-01-01")),
            person(4, Sex::Male, Some("1950-01-01")),
            person(6, Sex::Male, None),
        ],
        [family(1, &[1, 2], &[3, 4]), family(2, &[3], &[6])],
    );
    let (_, set) = branch(&mut p);
    assert_eq!(set.branches[0].children_of(F(1)), vec![P(4), F(2)]);
}

#[test]
fn repeated_runs_allocate_independent_ids() {
    let mut a = cycle();
    let mut b = cycle();
    let (_, first) = branch(&mut a);
    let (_, second) = branch(&mut b);
    assert_eq!(first.duplicates, second.duplicates);
    assert_eq!(first.branch_links, second.branch_links);
}
