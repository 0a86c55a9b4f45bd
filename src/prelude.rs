pub use crate::animator::Animator;
pub use crate::error::{AnimationError, Result};
pub use crate::loader::{KeyframeSet, load_sequence};
pub use crate::registry::{BoneNode, BoneRegistry};
pub use crate::sequence::{AnimationChange, AnimationSequence, CharacterRef, Frame};
pub use crate::target::Target;
