use crate::error::{AnimationError, Result};
use glam::{Quat, Vec3};
use log::{debug, warn};
use std::collections::HashMap;

/// A handle to an externally owned transform node.
///
/// The engine only ever needs four capabilities from the host scene
/// graph: a node's name, its children, and read/write access to its
/// rotation and position. Cloning a handle clones the handle, not the
/// transform it points at.
pub trait BoneNode: Clone {
    /// Node name, used as the bone key.
    fn name(&self) -> String;
    /// Direct children of this node.
    fn children(&self) -> Vec<Self>;
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

/// Transform handles indexed by character and then bone name.
///
/// Entries are added by [`BoneRegistry::register_character`] and persist
/// until explicitly replaced; the engine never removes them.
#[derive(Debug)]
pub struct BoneRegistry<H: BoneNode> {
    characters: HashMap<String, HashMap<String, H>>,
}

impl<H: BoneNode> Default for BoneRegistry<H> {
    fn default() -> Self {
        Self {
            characters: HashMap::new(),
        }
    }
}

impl<H: BoneNode> BoneRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the hierarchy under `root` depth-first and record every
    /// node's name under the root's name.
    ///
    /// Fails with [`AnimationError::AlreadyRegistered`], leaving the
    /// existing bone map untouched, unless `replace` is set — in which
    /// case the whole map is rebuilt from the hierarchy.
    pub fn register_character(&mut self, root: &H, replace: bool) -> Result<()> {
        let character = root.name();
        debug!("loading bone structure for character '{character}'");
        if self.characters.contains_key(&character) && !replace {
            warn!("character '{character}' already registered and replace is false");
            return Err(AnimationError::AlreadyRegistered { character });
        }
        let mut bones = HashMap::new();
        collect_bones(&character, root, &mut bones);
        self.characters.insert(character, bones);
        Ok(())
    }

    pub fn contains_character(&self, character: &str) -> bool {
        self.characters.contains_key(character)
    }

    /// Registered character names, in no particular order.
    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    /// Number of bones recorded for a character.
    pub fn bone_count(&self, character: &str) -> usize {
        self.characters.get(character).map_or(0, HashMap::len)
    }

    pub fn bone(&self, character: &str, bone: &str) -> Option<&H> {
        self.characters.get(character)?.get(bone)
    }

    pub(crate) fn bone_mut(&mut self, character: &str, bone: &str) -> Result<&mut H> {
        let bones =
            self.characters
                .get_mut(character)
                .ok_or_else(|| AnimationError::UnknownCharacter {
                    character: character.to_owned(),
                })?;
        bones.get_mut(bone).ok_or_else(|| AnimationError::UnknownBone {
            character: character.to_owned(),
            bone: bone.to_owned(),
        })
    }
}

/// Pre-order walk recording `name -> handle` for every node.
fn collect_bones<H: BoneNode>(character: &str, node: &H, bones: &mut HashMap<String, H>) {
    let bone = node.name();
    debug!("{character} has bone '{bone}'");
    if bones.insert(bone.clone(), node.clone()).is_some() {
        warn!("{character} has more than one '{bone}' bone, keeping the last");
    }
    for child in node.children() {
        collect_bones(character, &child, bones);
    }
}
