//! End-to-end playback: author a keyframe document, write it to disk,
//! load it back, and play it against an in-memory skeleton.

use glam::{Quat, Vec3};
use keyframe_animator::prelude::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct TestBone(Rc<RefCell<Node>>);

#[derive(Debug)]
struct Node {
    name: String,
    rotation: Quat,
    position: Vec3,
    children: Vec<TestBone>,
}

impl TestBone {
    fn new(name: &str) -> Self {
        TestBone(Rc::new(RefCell::new(Node {
            name: name.to_owned(),
            rotation: Quat::IDENTITY,
            position: Vec3::ZERO,
            children: Vec::new(),
        })))
    }

    fn add_child(&self, child: &TestBone) {
        self.0.borrow_mut().children.push(child.clone());
    }
}

impl BoneNode for TestBone {
    fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    fn children(&self) -> Vec<Self> {
        self.0.borrow().children.clone()
    }

    fn rotation(&self) -> Quat {
        self.0.borrow().rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.0.borrow_mut().rotation = rotation;
    }

    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn set_position(&mut self, position: Vec3) {
        self.0.borrow_mut().position = position;
    }
}

fn change(bone: &str, target: Target) -> (String, AnimationChange) {
    (
        bone.to_owned(),
        AnimationChange {
            character: CharacterRef::Primary,
            bone: bone.to_owned(),
            target,
        },
    )
}

#[test]
fn authored_document_plays_back_to_the_final_pose() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slide.json");

    // Same shape as the authoring tool's output: two keys, thirty ticks
    // apart, one sliding bone.
    let set = KeyframeSet::new()
        .with_keyframe(
            0,
            [change("Bone1", Target::from_position(Vec3::ZERO))].into(),
        )
        .with_keyframe(
            30,
            [change("Bone1", Target::from_position(Vec3::new(3.0, 0.0, 0.0)))].into(),
        );
    fs::write(&path, serde_json::to_string_pretty(&set).unwrap()).unwrap();

    let template = load_sequence(&path).unwrap();
    assert_eq!(template.len(), 30);

    let bone = TestBone::new("Bone1");
    let root = TestBone::new("Figure");
    root.add_child(&bone);

    let mut animator = Animator::new();
    animator.register_character(&root, false).unwrap();
    let id = animator.enqueue(&template, "Figure", None);

    for _ in 0..16 {
        animator.tick();
    }
    // Frame 15 of a 30-tick span is the halfway pose.
    assert!((bone.position().x - 1.5).abs() < 1e-5);

    for _ in 0..14 {
        animator.tick();
    }
    assert!(!animator.is_active(id));
    assert_eq!(animator.active_animations(), 0);
    // Last step stops one increment short of the end pose.
    assert!((bone.position().x - 2.9).abs() < 1e-5);

    assert!(!animator.cancel(id));
}

#[test]
fn original_tool_document_parses_and_plays() {
    // Document in the authoring tool's own format: every field written
    // out, placeholder characters, six numeric target components.
    let text = r#"{
        "0": {
            "Bone1": {
                "character": "{General}",
                "bone": "Bone1",
                "target": { "ax": 0.0, "ay": 0.0, "az": 0.0, "px": 0.0, "py": 0.0, "pz": 0.0 }
            }
        },
        "30": {
            "Bone1": {
                "character": "{General}",
                "bone": "Bone1",
                "target": { "ax": 90.0, "ay": 0.0, "az": 0.0, "px": 3.0, "py": 0.0, "pz": 0.0 }
            }
        }
    }"#;

    let template = KeyframeSet::parse(text).unwrap().expand().unwrap();
    assert_eq!(template.len(), 30);

    let bone = TestBone::new("Bone1");
    let root = TestBone::new("Figure");
    root.add_child(&bone);

    let mut animator = Animator::new();
    animator.register_character(&root, false).unwrap();
    animator.enqueue(&template, "Figure", None);

    for _ in 0..16 {
        animator.tick();
    }
    assert!((bone.position().x - 1.5).abs() < 1e-5);
    assert!(bone.rotation() != Quat::IDENTITY);
}

#[test]
fn one_template_drives_two_characters() {
    let template = AnimationSequence::from(vec![
        [change("Bone1", Target::from_position(Vec3::new(1.0, 0.0, 0.0)))]
            .into_iter()
            .collect::<Frame>(),
        [change("Bone1", Target::from_position(Vec3::new(2.0, 0.0, 0.0)))]
            .into_iter()
            .collect::<Frame>(),
    ]);

    let mut animator = Animator::new();
    let mut bones = Vec::new();
    for name in ["Ann", "Ben"] {
        let bone = TestBone::new("Bone1");
        let root = TestBone::new(name);
        root.add_child(&bone);
        animator.register_character(&root, false).unwrap();
        bones.push(bone);
    }

    let ann = animator.enqueue(&template, "Ann", None);
    animator.tick();
    let ben = animator.enqueue(&template, "Ben", None);
    animator.tick();

    // Ann is a tick ahead; Ben starts from the template's first frame.
    assert!(!animator.is_active(ann));
    assert!(animator.is_active(ben));
    assert_eq!(bones[0].position().x, 2.0);
    assert_eq!(bones[1].position().x, 1.0);
}

#[test]
fn sequence_round_trip_survives_persistence() {
    let set = KeyframeSet::new()
        .with_keyframe(
            0,
            [change("Bone1", Target::from_rotation(Vec3::ZERO))].into(),
        )
        .with_keyframe(
            10,
            [change("Bone1", Target::from_rotation(Vec3::new(45.0, 0.0, 0.0)))].into(),
        );
    let sequence = set.expand().unwrap();

    let json = sequence.to_json().unwrap();
    let back = AnimationSequence::from_json(&json).unwrap();
    assert_eq!(back, sequence);
}
