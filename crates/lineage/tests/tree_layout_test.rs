use lineage::{Branch, BranchLayoutEngine, Error, LayoutConfig, NodeRef, Point, Size};

const EPS: f64 = 1e-6;

fn build(id: usize, sizes: &[Size], edges: &[(u32, u32)]) -> lineage::Result<Branch> {
    let members = sizes
        .iter()
        .enumerate()
        .map(|(i, s)| (NodeRef::Individual(i as u32 + 1), *s))
        .collect();
    let edges: Vec<(NodeRef, NodeRef)> = edges
        .iter()
        .map(|&(a, b)| (NodeRef::Individual(a), NodeRef::Individual(b)))
        .collect();
    Branch::new(id, members, &edges)
}

fn laid_out(sizes: &[Size], edges: &[(u32, u32)]) -> Branch {
    let mut branch = build(0, sizes, edges).unwrap();
    BranchLayoutEngine::new(&LayoutConfig::default())
        .layout(&mut branch)
        .unwrap();
    branch
}

fn xs(branch: &Branch) -> Vec<f64> {
    (0..branch.len()).map(|v| branch.position(v).x).collect()
}

fn depth(branch: &Branch, mut v: usize) -> usize {
    let mut d = 0;
    while let Some(p) = branch.parent(v) {
        v = p;
        d += 1;
    }
    d
}

/// Deterministic irregular tree: node `i` hangs below a pseudo-random earlier node and has a
/// pseudo-random label width.
fn irregular(n: u32) -> (Vec<Size>, Vec<(u32, u32)>) {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        state >> 33
    };
    let mut sizes = Vec::new();
    let mut edges = Vec::new();
    for i in 1..=n {
        sizes.push(Size::new(10.0 + (next() % 50) as f64, 10.0 + (next() % 15) as f64));
        if i > 1 {
            let parent = 1 + (next() % u64::from(i - 1)) as u32;
            edges.push((parent, i));
        }
    }
    (sizes, edges)
}

#[test]
fn a_single_node_sits_at_the_origin() {
    let branch = laid_out(&[Size::new(40.0, 20.0)], &[]);
    assert_eq!(branch.position(0), Point::new(0.0, 0.0));
    let b = branch.bounds();
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (0.0, 40.0, 0.0, 20.0));
    assert_eq!(branch.width(), 40.0);
    assert_eq!(branch.height(), 20.0);
}

#[test]
fn leaves_are_spaced_by_width_plus_margin_and_the_parent_is_centered() {
    // Parent is wider than the span of its children.
    let branch = laid_out(
        &[
            Size::new(120.0, 20.0),
            Size::new(30.0, 20.0),
            Size::new(30.0, 20.0),
            Size::new(30.0, 20.0),
        ],
        &[(1, 2), (1, 3), (1, 4)],
    );
    assert_eq!(xs(&branch), vec![5.0, 0.0, 50.0, 100.0]);
    // Generation step is the node height plus the tallest label.
    assert_eq!(branch.position(1).y, 70.0);
    let b = branch.bounds();
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (0.0, 130.0, 0.0, 90.0));
}

#[test]
fn apportion_moves_the_right_subtree_and_spreads_the_shift_over_the_middle() {
    // R(1) -> A(2), B(3), C(4); A -> 5, 6, 7; C -> 8, 9, 10.
    let sizes = vec![Size::new(10.0, 10.0); 10];
    let branch = laid_out(
        &sizes,
        &[
            (1, 2),
            (1, 3),
            (1, 4),
            (2, 5),
            (2, 6),
            (2, 7),
            (4, 8),
            (4, 9),
            (4, 10),
        ],
    );
    assert_eq!(
        xs(&branch),
        vec![75.0, 30.0, 75.0, 120.0, 0.0, 30.0, 60.0, 90.0, 120.0, 150.0]
    );
    let ys: Vec<f64> = (0..branch.len()).map(|v| branch.position(v).y).collect();
    assert_eq!(
        ys,
        vec![0.0, 60.0, 60.0, 60.0, 120.0, 120.0, 120.0, 120.0, 120.0, 120.0]
    );
    assert_eq!(branch.width(), 160.0);
    assert_eq!(branch.height(), 130.0);
}

#[test]
fn nodes_on_the_same_generation_never_overlap() {
    let (sizes, edges) = irregular(80);
    let branch = laid_out(&sizes, &edges);
    let hmargin = LayoutConfig::default().hmargin;

    let mut levels: Vec<Vec<usize>> = Vec::new();
    for v in 0..branch.len() {
        let d = depth(&branch, v);
        if levels.len() <= d {
            levels.resize(d + 1, Vec::new());
        }
        levels[d].push(v);
    }
    for level in &mut levels {
        level.sort_by(|&a, &b| branch.position(a).x.total_cmp(&branch.position(b).x));
        for pair in level.windows(2) {
            let (l, r) = (pair[0], pair[1]);
            let gap = branch.position(r).x - (branch.position(l).x + branch.size(l).width);
            assert!(
                gap >= hmargin - EPS,
                "{} and {} are only {gap} apart",
                branch.node(l),
                branch.node(r)
            );
        }
    }
}

#[test]
fn parents_are_centered_over_their_children() {
    let (sizes, edges) = irregular(80);
    let branch = laid_out(&sizes, &edges);
    for v in 0..branch.len() {
        let children = branch.children(v);
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            continue;
        };
        let span = (branch.position(first).x + branch.position(last).x + branch.size(last).width) / 2.0;
        let center = branch.position(v).x + branch.size(v).width / 2.0;
        assert!((span - center).abs() < EPS, "{} is off center", branch.node(v));
    }
}

#[test]
fn layout_is_normalized_and_bounds_cover_every_label() {
    let (sizes, edges) = irregular(50);
    let branch = laid_out(&sizes, &edges);
    let b = branch.bounds();
    assert_eq!(b.min_x, 0.0);
    assert_eq!(b.min_y, 0.0);
    for v in 0..branch.len() {
        let at = branch.position(v);
        let size = branch.size(v);
        assert!(at.x >= b.min_x && at.x + size.width <= b.max_x + EPS);
        assert!(at.y >= b.min_y && at.y + size.height <= b.max_y + EPS);
    }
}

#[test]
fn repeated_layouts_are_bit_identical() {
    let (sizes, edges) = irregular(60);
    let first = laid_out(&sizes, &edges);
    let second = laid_out(&sizes, &edges);
    let bits = |b: &Branch| {
        (0..b.len())
            .map(|v| (b.position(v).x.to_bits(), b.position(v).y.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn very_deep_chains_are_walked_without_recursion() {
    let n: u32 = 200_000;
    let sizes = vec![Size::new(10.0, 10.0); n as usize];
    let edges: Vec<(u32, u32)> = (1..n).map(|i| (i, i + 1)).collect();
    let branch = laid_out(&sizes, &edges);

    let last = branch.len() - 1;
    assert_eq!(branch.position(last), Point::new(0.0, f64::from(n - 1) * 60.0));
    assert!(xs(&branch).iter().all(|&x| x == 0.0));
    assert_eq!(branch.height(), f64::from(n - 1) * 60.0 + 10.0);
}

#[test]
fn set_coordinates_translates_nodes_and_bounds() {
    let mut branch = laid_out(
        &[Size::new(10.0, 10.0), Size::new(10.0, 10.0), Size::new(10.0, 10.0)],
        &[(1, 2), (1, 3)],
    );
    let before = xs(&branch);
    branch.set_coordinates(100.0, 40.0);
    assert_eq!(branch.origin(), Point::new(100.0, 40.0));
    let after = xs(&branch);
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(*b, a + 100.0);
    }
    assert_eq!(branch.bounds().min_x, 100.0);
    assert_eq!(branch.bounds().min_y, 40.0);
    assert_eq!(branch.position(1).y, 100.0);

    branch.set_coordinates(0.0, 0.0);
    assert_eq!(xs(&branch), before);
}

#[test]
fn a_branch_where_every_node_has_a_parent_has_no_root() {
    let sizes = vec![Size::new(10.0, 10.0); 2];
    assert!(matches!(
        build(7, &sizes, &[(1, 2), (2, 1)]),
        Err(Error::BranchWithoutRoot { branch: 7 })
    ));
}
