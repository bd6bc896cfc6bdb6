use glam::{Vec3, Vec4};
use serde::Serialize;

use crate::coords::{convert_rotation, convert_rotation_tangent, swap_yz};
use crate::error::Result;
use crate::ir::{self, Interpolation, Model, Sequence};
use crate::settings::ImportSettings;
use crate::skeleton::Skeleton;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Keyframe<T> {
    /// Seconds from the start of the clip.
    pub time: f32,
    pub value: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_tangent: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_tangent: Option<T>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Curve<T> {
    pub interpolation: Interpolation,
    /// Never empty, ordered by time.
    pub keys: Vec<Keyframe<T>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Track {
    /// Skeleton index of the animated joint.
    pub joint: u32,
    pub path: String,
    pub translation: Option<Curve<Vec3>>,
    /// (x, y, z, w), target convention.
    pub rotation: Option<Curve<Vec4>>,
    pub scale: Option<Curve<Vec3>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub looping: bool,
    /// seconds
    pub duration: f32,
    pub tracks: Vec<Track>,
}

/// One clip per sequence not named in `exclude_animations`.
pub fn bake_clips(
    model: &Model,
    skeleton: &Skeleton,
    settings: &ImportSettings,
) -> Result<Vec<AnimationClip>> {
    settings.validate()?;
    let mut clips = vec![];
    for sequence in &model.sequences {
        if settings.is_animation_excluded(&sequence.name) {
            log::debug!("sequence {} excluded", sequence.name);
            continue;
        }
        let clip = bake_clip(model, skeleton, sequence, settings);
        log::debug!(
            "baked clip {} with {} tracks",
            clip.name,
            clip.tracks.len()
        );
        clips.push(clip);
    }
    Ok(clips)
}

/// Bakes the samples inside the sequence interval for every bone, then
/// helper, and finishes with one continuity pass over the whole clip.
pub fn bake_clip(
    model: &Model,
    skeleton: &Skeleton,
    sequence: &Sequence,
    settings: &ImportSettings,
) -> AnimationClip {
    let rate = settings.sample_rate;
    let tangents = settings.import_tangents;
    let mut tracks = vec![];

    for node in model.skeleton_nodes() {
        let Some(joint_idx) = skeleton.index_of(node.id) else {
            continue;
        };
        let rest = skeleton.joints[joint_idx].local_position;

        let translation = bake_curve(
            &node.translation,
            sequence,
            rate,
            |delta| rest + swap_yz(delta),
            tangents.then_some(&swap_yz as &dyn Fn(Vec3) -> Vec3),
        );
        let rotation = bake_curve(
            &node.rotation,
            sequence,
            rate,
            convert_rotation,
            tangents.then_some(&convert_rotation_tangent as &dyn Fn(Vec4) -> Vec4),
        );
        // scaling never carries tangents
        let scale = bake_curve(&node.scaling, sequence, rate, swap_yz, None);

        if translation.is_none() && rotation.is_none() && scale.is_none() {
            continue;
        }
        tracks.push(Track {
            joint: joint_idx as u32,
            path: skeleton.path(joint_idx),
            translation,
            rotation,
            scale,
        });
    }

    let mut clip = AnimationClip {
        name: sequence.name.clone(),
        looping: !sequence.non_looping,
        duration: sequence.end().saturating_sub(sequence.start()) as f32 / rate,
        tracks,
    };
    ensure_quaternion_continuity(&mut clip);
    clip
}

fn bake_curve<T: Copy, U>(
    track: &ir::Track<T>,
    sequence: &Sequence,
    sample_rate: f32,
    value: impl Fn(T) -> U,
    tangent: Option<&dyn Fn(T) -> U>,
) -> Option<Curve<U>> {
    let start = sequence.start();
    let mut keys: Vec<Keyframe<U>> = track
        .window(start, sequence.end())
        .map(|sample| Keyframe {
            time: (sample.time - start) as f32 / sample_rate,
            value: value(sample.value),
            in_tangent: tangent.and_then(|f| sample.in_tangent.map(f)),
            out_tangent: tangent.and_then(|f| sample.out_tangent.map(f)),
        })
        .collect();
    if keys.is_empty() {
        return None;
    }
    keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    Some(Curve {
        interpolation: track.interpolation,
        keys,
    })
}

/// Flips the sign of a rotation key whenever it points away from the key
/// before it, so every rotation curve in the clip interpolates along the
/// shortest arc.
pub fn ensure_quaternion_continuity(clip: &mut AnimationClip) {
    for track in &mut clip.tracks {
        if let Some(curve) = &mut track.rotation {
            for i in 1..curve.keys.len() {
                let previous = curve.keys[i - 1].value;
                let key = &mut curve.keys[i];
                if previous.dot(key.value) < 0.0 {
                    key.value = -key.value;
                    key.in_tangent = key.in_tangent.map(|t| -t);
                    key.out_tangent = key.out_tangent.map(|t| -t);
                }
            }
        }
    }
}
