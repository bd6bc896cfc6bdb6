mod common;

use glam::{Vec2, Vec3, Vec4};
use mdx_import::coords::{flip_v, reverse_winding, swap_yz};
use mdx_import::ir::{GeosetVertex, Interpolation, Sample, Track, VertexGroup};
use mdx_import::skinning::UNUSED_JOINT;
use mdx_import::{import_model, ImportSettings};

#[test]
fn coordinate_helpers_are_involutions() {
    let points = [
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-4.5, 0.0, 7.25),
        Vec3::ZERO,
    ];
    for p in points {
        assert_eq!(swap_yz(swap_yz(p)), p);
    }
    for face in [[0, 1, 2], [5, 3, 9]] {
        assert_eq!(reverse_winding(reverse_winding(face)), face);
    }
    for uv in [Vec2::new(0.0, 0.0), Vec2::new(0.25, 0.75), Vec2::new(1.0, 1.0)] {
        assert_eq!(flip_v(flip_v(uv)), uv);
    }
}

#[test]
fn influence_weights_sum_to_one_and_unused_slots_are_empty() {
    let mut model = common::model(
        vec![
            common::triangle(vec![0], 0),
            common::triangle(vec![0, 1], 0),
            common::triangle(vec![1, 0, 1], 0),
        ],
        &["a.blp"],
    );
    model.nodes.push(mdx_import::ir::Node::helper(2, "h", Vec3::ZERO, Some(1)));
    model.geosets.push(common::triangle(vec![0, 1, 2, 1], 0));
    let output = import_model(&model, &ImportSettings::default()).unwrap();

    assert_eq!(output.mesh.influences.len(), output.mesh.vertex_count());
    for influence in &output.mesh.influences {
        let sum: f32 = influence.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "weights {:?}", influence.weights);
        for (joint, weight) in influence.joints.iter().zip(influence.weights) {
            if *joint == UNUSED_JOINT {
                assert_eq!(weight, 0.0);
            } else {
                assert!(weight > 0.0);
            }
        }
    }
}

#[test]
fn unreferenced_vertices_never_reach_the_mesh() {
    let mut geoset = common::triangle(vec![0], 0);
    let stray = |x: f32| GeosetVertex {
        position: Vec3::new(x, 50.0, 50.0),
        normal: Vec3::Z,
        tex_coord: Vec2::ZERO,
        group: 1,
    };
    geoset.vertices.insert(0, stray(10.0));
    geoset.vertices.push(stray(20.0));
    geoset.faces = vec![[1, 2, 3]];
    // the stray vertices point at a group that would overflow
    geoset.groups.push(VertexGroup {
        matrices: vec![0, 1, 0, 1, 0],
    });
    let model = common::model(vec![geoset], &["a.blp"]);
    let output = import_model(&model, &ImportSettings::default()).unwrap();

    assert_eq!(output.mesh.vertex_count(), 3);
    assert_eq!(output.mesh.influences.len(), 3);
    assert!(output.mesh.positions.iter().all(|p| p.y != 50.0));
    assert!(output
        .mesh
        .indices
        .iter()
        .all(|&i| (i as usize) < output.mesh.vertex_count()));
}

#[test]
fn windowed_keys_stay_inside_the_sequence() {
    let mut model = common::model(vec![common::triangle(vec![0], 0)], &["a.blp"]);
    let times = [0, 150, 300, 333, 600, 601, 900];
    model.nodes[0].translation = Track::new(
        Interpolation::Linear,
        times.iter().map(|&t| Sample::new(t, Vec3::X)).collect(),
    );
    model.sequences = vec![
        common::sequence("Walk", 300, 600),
        common::sequence("Attack", 601, 900),
    ];
    let settings = ImportSettings {
        sample_rate: 300.0,
        ..Default::default()
    };
    let output = import_model(&model, &settings).unwrap();

    for (clip, sequence) in output.clips.iter().zip(&model.sequences) {
        let expected = times
            .iter()
            .filter(|&&t| sequence.start() <= t && t <= sequence.end())
            .count();
        let keys = &clip.tracks[0].translation.as_ref().unwrap().keys;
        assert_eq!(keys.len(), expected, "{}", clip.name);
        for key in keys {
            assert!(key.time >= 0.0 && key.time <= clip.duration + f32::EPSILON);
        }
    }
}

#[test]
fn rotation_keys_take_the_short_way_round() {
    let mut model = common::model(vec![common::triangle(vec![0], 0)], &["a.blp"]);
    let flipped = |q: Vec4, flip: bool| if flip { -q } else { q };
    let samples = (0..8)
        .map(|i| {
            let angle = i as f32 * 0.6;
            let q = Vec4::new(0.0, 0.0, (angle / 2.0).sin(), (angle / 2.0).cos());
            Sample::new(i * 100, flipped(q, i % 3 == 1))
        })
        .collect();
    model.nodes[1].rotation = Track::new(Interpolation::Linear, samples);
    model.sequences = vec![common::sequence("Spin", 0, 700)];
    let output = import_model(&model, &ImportSettings::default()).unwrap();

    for track in &output.clips[0].tracks {
        if let Some(curve) = &track.rotation {
            for pair in curve.keys.windows(2) {
                assert!(pair[0].value.dot(pair[1].value) >= 0.0);
            }
        }
    }
}
