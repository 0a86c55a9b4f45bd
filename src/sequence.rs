use crate::error::Result;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Placeholder token templates use for the character a sequence is
/// eventually enqueued for.
const PRIMARY_TOKEN: &str = "{General}";
/// Placeholder token for the second character of a paired template.
const SECONDARY_TOKEN: &str = "{General2}";

/// The character an [`AnimationChange`] applies to.
///
/// Authored templates use the placeholder variants;
/// [`AnimationSequence::resolve`] pins every placeholder to a concrete
/// name before the sequence enters playback. On the wire a reference is a
/// plain string: `"{General}"`, `"{General2}"`, or a character name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CharacterRef {
    /// The character the sequence is enqueued for.
    #[default]
    Primary,
    /// The second character of a paired animation.
    Secondary,
    /// A concrete character name.
    Named(String),
}

impl CharacterRef {
    /// The concrete character name, once resolved.
    pub fn name(&self) -> Option<&str> {
        match self {
            CharacterRef::Named(name) => Some(name),
            _ => None,
        }
    }

    fn resolve(&self, primary: &str, secondary: Option<&str>) -> CharacterRef {
        match self {
            CharacterRef::Primary => CharacterRef::Named(primary.to_owned()),
            // A paired template still plays when only one character is
            // supplied; the secondary falls back to the primary.
            CharacterRef::Secondary => {
                CharacterRef::Named(secondary.unwrap_or(primary).to_owned())
            }
            CharacterRef::Named(name) => CharacterRef::Named(name.clone()),
        }
    }
}

impl From<String> for CharacterRef {
    fn from(s: String) -> Self {
        match s.as_str() {
            PRIMARY_TOKEN => CharacterRef::Primary,
            SECONDARY_TOKEN => CharacterRef::Secondary,
            _ => CharacterRef::Named(s),
        }
    }
}

impl From<CharacterRef> for String {
    fn from(r: CharacterRef) -> Self {
        match r {
            CharacterRef::Primary => PRIMARY_TOKEN.to_owned(),
            CharacterRef::Secondary => SECONDARY_TOKEN.to_owned(),
            CharacterRef::Named(name) => name,
        }
    }
}

/// One bone's desired pose at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationChange {
    /// Character the change applies to. Authored documents may omit it.
    #[serde(default)]
    pub character: CharacterRef,
    /// Bone the change applies to. When a change comes out of a keyframe
    /// document the frame's map key wins over this field.
    #[serde(default)]
    pub bone: String,
    pub target: Target,
}

/// All bone changes to apply at one tick, keyed by bone name.
pub type Frame = HashMap<String, AnimationChange>;

/// A dense, ordered run of frames; the index is the tick offset from the
/// start of the sequence. Serializes as a plain array of frames.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationSequence {
    frames: VecDeque<Frame>,
}

impl AnimationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame `index` ticks from the start of the sequence.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }

    pub(crate) fn pop_front(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }

    /// A deep copy with every placeholder pinned to a concrete character.
    ///
    /// Changes that already name a character pass through untouched, so
    /// resolving a placeholder-free sequence yields an equal sequence.
    pub fn resolve(&self, primary: &str, secondary: Option<&str>) -> AnimationSequence {
        let frames = self
            .frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|(bone, change)| {
                        (
                            bone.clone(),
                            AnimationChange {
                                character: change.character.resolve(primary, secondary),
                                ..change.clone()
                            },
                        )
                    })
                    .collect()
            })
            .collect();
        AnimationSequence { frames }
    }

    /// Serialized form used when a host persists a sequence.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a sequence previously produced by
    /// [`AnimationSequence::to_json`].
    pub fn from_json(text: &str) -> Result<AnimationSequence> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<Vec<Frame>> for AnimationSequence {
    fn from(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}
