use crate::error::Result;
use crate::registry::{BoneNode, BoneRegistry};
use crate::sequence::{AnimationChange, AnimationSequence};
use glam::{EulerRot, Quat, Vec3};
use log::{debug, info, warn};
use std::collections::HashMap;
use uuid::Uuid;

/// Application order for target Euler angles, matching the host
/// convention the animation documents are authored against.
const EULER_ORDER: EulerRot = EulerRot::YXZ;

/// Owns the bone registry and the set of running animation instances,
/// and advances every instance by one frame per [`Animator::tick`].
///
/// All state is owned by the value — hosts and tests can run any number
/// of independent animators. Nothing here blocks or spawns; the host is
/// expected to call `tick` once per frame from its update loop.
pub struct Animator<H: BoneNode> {
    registry: BoneRegistry<H>,
    animations: HashMap<Uuid, AnimationSequence>,
}

impl<H: BoneNode> Default for Animator<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: BoneNode> Animator<H> {
    pub fn new() -> Self {
        Self::with_registry(BoneRegistry::new())
    }

    /// Animator over an already populated registry.
    pub fn with_registry(registry: BoneRegistry<H>) -> Self {
        Self {
            registry,
            animations: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &BoneRegistry<H> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BoneRegistry<H> {
        &mut self.registry
    }

    /// Record every bone under `root` for the character named by the
    /// root node. See [`BoneRegistry::register_character`].
    pub fn register_character(&mut self, root: &H, replace: bool) -> Result<()> {
        self.registry.register_character(root, replace)
    }

    /// Start a template playing for a concrete character.
    ///
    /// The template is resolved against the character names and stored as
    /// a private copy under a fresh instance id; the template itself is
    /// untouched and can be enqueued again for other characters.
    pub fn enqueue(
        &mut self,
        template: &AnimationSequence,
        character: &str,
        secondary: Option<&str>,
    ) -> Uuid {
        info!("applying animation to '{character}' (secondary {secondary:?})");
        let id = Uuid::new_v4();
        self.animations
            .insert(id, template.resolve(character, secondary));
        id
    }

    /// Stop a running instance. Returns whether one was removed; an
    /// unknown or already finished id is a no-op, not an error.
    pub fn cancel(&mut self, id: Uuid) -> bool {
        let removed = self.animations.remove(&id).is_some();
        if removed {
            info!("removing animation '{id}' by request");
        }
        removed
    }

    pub fn is_active(&self, id: Uuid) -> bool {
        self.animations.contains_key(&id)
    }

    pub fn active_animations(&self) -> usize {
        self.animations.len()
    }

    /// Advance every running instance by exactly one frame.
    ///
    /// Each instance has its front frame removed and applied; instances
    /// whose sequence is exhausted are culled after the pass, so no
    /// instance is skipped or advanced twice within one call. A change
    /// naming an unregistered character or bone is skipped with a
    /// diagnostic and never stalls the rest of the frame.
    pub fn tick(&mut self) {
        let registry = &mut self.registry;
        let mut completed = Vec::new();
        for (id, sequence) in self.animations.iter_mut() {
            debug!("processing animation '{id}'");
            let Some(frame) = sequence.pop_front() else {
                completed.push(*id);
                continue;
            };
            if sequence.is_empty() {
                debug!("queuing removal of animation '{id}'");
                completed.push(*id);
            }
            for change in frame.values() {
                apply_change(registry, change);
            }
        }
        for id in completed {
            info!("removing animation '{id}'");
            self.animations.remove(&id);
        }
    }

    /// Set a bone's rotation immediately, bypassing the sequencer.
    ///
    /// `additive` adds the angles to the bone's current Euler angles
    /// instead of replacing them.
    pub fn bend(
        &mut self,
        character: &str,
        bone: &str,
        mut angles: Vec3,
        additive: bool,
    ) -> Result<()> {
        let node = self.registry.bone_mut(character, bone)?;
        if additive {
            angles += euler_degrees(node.rotation());
        }
        node.set_rotation(quat_from_degrees(angles));
        Ok(())
    }

    /// Set a bone's position immediately, bypassing the sequencer.
    pub fn shift(
        &mut self,
        character: &str,
        bone: &str,
        mut position: Vec3,
        additive: bool,
    ) -> Result<()> {
        let node = self.registry.bone_mut(character, bone)?;
        if additive {
            position += node.position();
        }
        node.set_position(position);
        Ok(())
    }
}

fn apply_change<H: BoneNode>(registry: &mut BoneRegistry<H>, change: &AnimationChange) {
    let Some(character) = change.character.name() else {
        warn!(
            "change for bone '{}' was never resolved to a character",
            change.bone
        );
        return;
    };
    if !registry.contains_character(character) {
        let known: Vec<&str> = registry.characters().collect();
        warn!("no character named '{character}' is registered (known: {known:?})");
        return;
    }
    match registry.bone_mut(character, &change.bone) {
        Ok(node) => {
            debug!(
                "animating '{character}' bone '{}' to {:?}",
                change.bone, change.target
            );
            if let Some(angles) = change.target.rotation {
                node.set_rotation(quat_from_degrees(angles));
            }
            if let Some(position) = change.target.position {
                node.set_position(position);
            }
        }
        Err(err) => warn!("{err}"),
    }
}

fn quat_from_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EULER_ORDER,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

fn euler_degrees(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.to_euler(EULER_ORDER);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}
