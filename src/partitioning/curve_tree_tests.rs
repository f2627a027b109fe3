use crate::bounding_volume::BoundingVolume;
use crate::math::{Isometry, Point, Real, Vector};
use crate::partitioning::{
    collect_curves, CurveTree, CurveTreeArguments, CurveTreeBuildError, CurveTreeFactory, Node,
    DEFAULT_MAX_LEAF_SIZE,
};
use crate::scene::{Assembly, CurveObject, Object, ObjectInstance, ParamError};
use crate::shape::Curve;
use std::sync::Arc;

fn random_point(rng: &mut oorandom::Rand64) -> Point<Real> {
    Point::new(
        rng.rand_float() * 10.0 - 5.0,
        rng.rand_float() * 10.0 - 5.0,
        rng.rand_float() * 10.0 - 5.0,
    )
}

// A little tuft of hair: random cubic strands growing from random roots.
fn random_curve_object(rng: &mut oorandom::Rand64, curve_count: usize) -> CurveObject {
    let curves = (0..curve_count)
        .map(|_| {
            let root = random_point(rng);
            let dir = Vector::new(
                rng.rand_float() - 0.5,
                rng.rand_float() + 0.5,
                rng.rand_float() - 0.5,
            );
            let points = [
                root,
                root + dir * 0.3,
                root + dir * 0.6 + Vector::x() * (rng.rand_float() * 0.2),
                root + dir,
            ];
            Curve::new(&points, &[0.05, 0.04, 0.03, 0.01]).unwrap()
        })
        .collect();
    CurveObject::new(curves)
}

fn random_assembly(seed: u64, instance_count: usize, curves_per_instance: usize) -> Assembly {
    let mut rng = oorandom::Rand64::new(seed as u128);
    let mut assembly = Assembly::new(format!("fluffy_{}", seed));

    for _ in 0..instance_count {
        let object = Arc::new(random_curve_object(&mut rng, curves_per_instance));
        let transform = Isometry::translation(
            rng.rand_float() * 100.0 - 50.0,
            rng.rand_float() * 100.0 - 50.0,
            rng.rand_float() * 100.0 - 50.0,
        );
        assembly.push_instance(ObjectInstance::new(object, transform));
    }

    assembly
}

fn build(assembly: &Assembly) -> CurveTree {
    CurveTreeFactory::new(CurveTreeArguments::new(assembly, 0))
        .create()
        .unwrap()
}

struct SphereObject;

impl Object for SphereObject {
    fn model(&self) -> &str {
        "sphere_object"
    }
}

#[test]
fn build_produces_a_well_formed_tree() {
    for curve_count in [0, 1, 2, 3, 7, 31, 64, 200] {
        let assembly = random_assembly(42 + curve_count as u64, 1, curve_count);
        let tree = build(&assembly);

        tree.assert_well_formed();
        assert_eq!(tree.curves().len(), curve_count);
        assert_eq!(tree.keys().len(), curve_count);

        for node in tree.nodes() {
            if let Node::Leaf { count, .. } = node {
                assert!((*count as usize) <= DEFAULT_MAX_LEAF_SIZE);
            }
        }
    }
}

#[test]
fn empty_assembly_builds_an_empty_leaf_root() {
    let assembly = Assembly::new("empty");
    let tree = build(&assembly);

    tree.assert_well_formed();
    assert_eq!(tree.node_count(), 1);
    assert_eq!(
        tree.nodes()[0],
        Node::Leaf {
            aabb: crate::bounding_volume::Aabb::new_invalid(),
            first: 0,
            count: 0
        }
    );
    assert!(!tree.root_aabb().is_valid());
}

#[test]
fn single_curve_builds_a_single_leaf() {
    let assembly = random_assembly(7, 1, 1);
    let tree = build(&assembly);

    tree.assert_well_formed();
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.root_aabb(), tree.curves()[0].local_aabb());
}

#[test]
fn leaf_bounds_contain_their_curves() {
    let assembly = random_assembly(1234, 3, 40);
    let tree = build(&assembly);
    tree.assert_well_formed();

    for node in tree.nodes() {
        if let Node::Leaf { aabb, first, count } = node {
            for i in *first..*first + *count {
                let curve_aabb = tree.curves()[i as usize].local_aabb();
                assert!(aabb.contains(&curve_aabb));
            }
        }
    }
}

#[test]
fn curves_and_keys_stay_paired_through_reordering() {
    let assembly = random_assembly(99, 4, 25);
    let tree = build(&assembly);
    tree.assert_well_formed();

    // Rebuild the pre-reordering sequences and check that each stored curve
    // is the one its key points at.
    let (original_curves, original_keys) = collect_curves(&assembly);

    for (curve, key) in tree.curves().iter().zip(tree.keys().iter()) {
        let original_index = original_keys
            .iter()
            .position(|k| k == key)
            .expect("key lost by the reordering");
        assert_eq!(curve, &original_curves[original_index]);
    }
}

#[test]
fn collection_preserves_iteration_order_and_skips_other_models() {
    let mut assembly = random_assembly(5, 2, 3);
    assembly.push_instance(ObjectInstance::new(
        Arc::new(SphereObject),
        Isometry::identity(),
    ));
    let mut rng = oorandom::Rand64::new(6);
    assembly.push_instance(ObjectInstance::new(
        Arc::new(random_curve_object(&mut rng, 2)),
        Isometry::identity(),
    ));

    let (curves, keys) = collect_curves(&assembly);
    assert_eq!(curves.len(), keys.len());
    assert_eq!(curves.len(), 2 * 3 + 2);

    let provenance: Vec<_> = keys
        .iter()
        .map(|k| (k.object_instance_index(), k.curve_index()))
        .collect();
    assert_eq!(
        provenance,
        [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (3, 0), (3, 1)]
    );
    assert!(keys.iter().all(|k| k.material_index() == 0));
}

#[test]
fn identical_inputs_build_identical_trees() {
    let assembly = random_assembly(2024, 2, 60);
    let first = build(&assembly);
    let second = build(&assembly);

    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.keys(), second.keys());
    assert_eq!(first.curves(), second.curves());
}

#[test]
fn sbvh_is_recognized_but_unimplemented() {
    let mut assembly = random_assembly(11, 1, 10);
    assembly.params_mut().insert("algorithm", "sbvh");

    let result = CurveTreeFactory::new(CurveTreeArguments::new(&assembly, 0)).create();
    assert_eq!(
        result.unwrap_err(),
        CurveTreeBuildError::UnsupportedAlgorithm("sbvh".to_string())
    );
}

#[test]
fn unknown_algorithm_fails_choice_validation() {
    let mut assembly = random_assembly(11, 1, 10);
    assembly.params_mut().insert("algorithm", "octree");

    let result = CurveTreeFactory::new(CurveTreeArguments::new(&assembly, 0)).create();
    assert!(matches!(
        result.unwrap_err(),
        CurveTreeBuildError::InvalidParameter(ParamError::InvalidChoice { .. })
    ));
}

#[test]
fn per_level_counts_sum_to_the_curve_count() {
    let assembly = random_assembly(321, 2, 50);
    let tree = build(&assembly);

    let counts = tree.per_level_curve_counts();
    assert_eq!(counts.iter().sum::<u64>(), tree.curves().len() as u64);
    assert_eq!(counts.len(), tree.max_depth());
}

#[test]
fn coincident_curves_still_build() {
    // Every strand identical: centroid bounds collapse to a point and the
    // partitioner must fall back to median splits.
    let pt = Point::new(1.0, 2.0, 3.0);
    let curve = Curve::new(&[pt, pt + Vector::y()], &[0.1, 0.1]).unwrap();
    let object = CurveObject::new(vec![curve; 23]);

    let mut assembly = Assembly::new("coincident");
    assembly.push_instance(ObjectInstance::new(Arc::new(object), Isometry::identity()));

    let tree = build(&assembly);
    tree.assert_well_formed();
    for node in tree.nodes() {
        if let Node::Leaf { count, .. } = node {
            assert!((*count as usize) <= DEFAULT_MAX_LEAF_SIZE);
        }
    }
}
