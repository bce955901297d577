use lineage::{Error, FamilyGraph, FamilyRecord, IndividualRecord, LinkKind, NodeRef, Pedigree, Sex, Size};
use NodeRef::{Family as F, Individual as P};

fn person(id: u32, sex: Sex, father: Option<u32>, mother: Option<u32>) -> IndividualRecord {
    IndividualRecord {
        id,
        sex,
        father_id: father,
        mother_id: mother,
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

/// Three generations: F1 has children P3 and P4, who found F2 and F3; F2 has two leaf children.
fn three_generations() -> Pedigree {
    Pedigree::new(
        [
            person(1, Sex::Male, None, None),
            person(2, Sex::Female, None, None),
            person(3, Sex::Male, Some(1), Some(2)),
            person(4, Sex::Female, Some(1), Some(2)),
            person(5, Sex::Female, None, None),
            person(6, Sex::Male, None, None),
            person(7, Sex::Male, Some(3), Some(5)),
            person(8, Sex::Female, Some(3), Some(5)),
        ],
        [
            family(1, &[1, 2], &[3, 4]),
            family(2, &[3, 5], &[7, 8]),
            family(3, &[6, 4], &[]),
        ],
    )
}

#[test]
fn families_point_at_the_families_of_children_who_are_parents() {
    let p = three_generations();
    let g = FamilyGraph::build(&p).unwrap();

    assert_eq!(g.nodes(), vec![F(1), F(2), F(3), P(7), P(8)]);
    assert_eq!(
        g.edges(),
        vec![(F(1), F(2)), (F(1), F(3)), (F(2), P(7)), (F(2), P(8))]
    );
    assert!(g.has_node(F(3)));
    assert!(!g.has_node(P(3)));
    assert!(g.has_edge(F(1), F(2)));
    assert!(!g.has_edge(F(2), F(1)));
    assert_eq!(g.link(F(1), F(2)), Some(LinkKind::Standard));
    assert_eq!(g.link(F(2), F(3)), None);
}

#[test]
fn leaves_are_attached_to_the_family_of_their_recorded_parents() {
    // P3 is listed by neither family as a child, but names P1 and P2 as parents.
    let p = Pedigree::new(
        [
            person(1, Sex::Male, None, None),
            person(2, Sex::Female, None, None),
            person(3, Sex::Male, Some(1), Some(2)),
        ],
        [family(1, &[1, 2], &[])],
    );
    let g = FamilyGraph::build(&p).unwrap();
    assert_eq!(g.edges(), vec![(F(1), P(3))]);
}

#[test]
fn one_known_parent_is_enough_to_attach_a_leaf() {
    let p = Pedigree::new(
        [
            person(1, Sex::Male, None, None),
            person(2, Sex::Female, None, None),
            person(3, Sex::Female, None, None),
            person(4, Sex::Male, Some(1), None),
        ],
        [family(1, &[1, 2], &[]), family(2, &[1, 3], &[])],
    );
    let g = FamilyGraph::build(&p).unwrap();
    assert_eq!(g.edges(), vec![(F(1), P(4)), (F(2), P(4))]);
}

#[test]
fn a_family_without_identifiable_parents_is_fatal() {
    let p = Pedigree::new(
        [person(3, Sex::Male, None, None)],
        [family(1, &[], &[3])],
    );
    assert!(matches!(
        FamilyGraph::build(&p),
        Err(Error::FamilyWithoutParents { family: 1 })
    ));

    // Parents that do not resolve to known individuals count as missing.
    let p = Pedigree::new(
        [person(3, Sex::Male, None, None)],
        [family(2, &[10, 11], &[3])],
    );
    assert!(matches!(
        FamilyGraph::build(&p),
        Err(Error::FamilyWithoutParents { family: 2 })
    ));
}

#[test]
fn missing_children_are_skipped() {
    let p = Pedigree::new(
        [person(1, Sex::Male, None, None), person(2, Sex::Female, None, None)],
        [family(1, &[1, 2], &[99])],
    );
    let g = FamilyGraph::build(&p).unwrap();
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn undirected_view_keeps_every_edge() {
    let p = three_generations();
    let g = FamilyGraph::build(&p).unwrap();
    let u = g.undirected();
    assert_eq!(u.node_count(), g.node_count());
    assert_eq!(u.edge_count(), g.edge_count());
    assert!(u.has_edge("F2", "F1"));
}
