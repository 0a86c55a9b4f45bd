//! Plays the bundled can-can kick against a small in-memory skeleton.
//!
//! Run from the crate root with `cargo run --example cancan`; set
//! `RUST_LOG=debug` to watch the per-frame diagnostics.

use glam::{EulerRot, Quat, Vec3};
use keyframe_animator::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Minimal scene node. A real host implements [`BoneNode`] for handles
/// into its own scene graph; the engine never sees the graph itself.
#[derive(Clone)]
struct DemoBone(Rc<RefCell<Node>>);

struct Node {
    name: String,
    rotation: Quat,
    position: Vec3,
    children: Vec<DemoBone>,
}

impl DemoBone {
    fn new(name: &str) -> Self {
        DemoBone(Rc::new(RefCell::new(Node {
            name: name.to_owned(),
            rotation: Quat::IDENTITY,
            position: Vec3::ZERO,
            children: Vec::new(),
        })))
    }

    fn add_child(&self, child: &DemoBone) {
        self.0.borrow_mut().children.push(child.clone());
    }

    fn euler_degrees(&self) -> Vec3 {
        let (y, x, z) = self.rotation().to_euler(EulerRot::YXZ);
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }
}

impl BoneNode for DemoBone {
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

fn main() -> Result<()> {
    env_logger::init();

    let dancer = DemoBone::new("Dancer");
    let hip = DemoBone::new("Hip");
    let left_leg = DemoBone::new("LeftLeg");
    let right_leg = DemoBone::new("RightLeg");
    dancer.add_child(&hip);
    hip.add_child(&left_leg);
    hip.add_child(&right_leg);

    let mut animator = Animator::new();
    animator.register_character(&dancer, false)?;

    let template = load_sequence("demos/cancan.json")?;
    println!(
        "loaded can-can: {} frames for {} bones",
        template.len(),
        animator.registry().bone_count("Dancer")
    );

    let id = animator.enqueue(&template, "Dancer", None);
    let mut ticks = 0;
    while animator.is_active(id) {
        animator.tick();
        ticks += 1;
        if ticks % 15 == 0 {
            let kick = left_leg.euler_degrees();
            println!(
                "tick {ticks:3}: LeftLeg at ({:6.1}, {:6.1}, {:6.1}), Hip height {:.2}",
                kick.x,
                kick.y,
                kick.z,
                hip.position().y
            );
        }
    }
    println!("animation finished after {ticks} ticks");

    // Direct pose operations bypass the sequencer entirely.
    animator.bend("Dancer", "Hip", Vec3::new(0.0, 45.0, 0.0), false)?;
    animator.shift("Dancer", "Hip", Vec3::new(0.0, 0.25, 0.0), true)?;
    println!("took a bow: Hip now at {}", hip.position());

    Ok(())
}
