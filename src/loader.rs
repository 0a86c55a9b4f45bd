use crate::error::{AnimationError, Result};
use crate::sequence::{AnimationChange, AnimationSequence, Frame};
use log::debug;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// A sparse, authored keyframe document: bone poses at specific ticks, in
/// the order they were written.
///
/// The document form is a JSON object whose keys are integer ticks as
/// strings and whose values are frames. Key order is kept as authored —
/// the loader validates ascending order, it never sorts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyframeSet {
    keyframes: Vec<(i32, Frame)>,
}

impl KeyframeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyframe. Ticks must be added in ascending order, which
    /// [`KeyframeSet::expand`] verifies.
    pub fn with_keyframe(mut self, tick: i32, frame: Frame) -> Self {
        self.keyframes.push((tick, frame));
        self
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Ticks in authored order.
    pub fn ticks(&self) -> impl Iterator<Item = i32> {
        self.keyframes.iter().map(|(tick, _)| *tick)
    }

    /// Parse a keyframe document.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| malformed(e.to_string()))
    }

    /// Expand the sparse keyframes into a dense per-tick sequence.
    ///
    /// Each adjacent pair of keyframes becomes one span of frames, one per
    /// tick between them; every bone keyed at the span's start is linearly
    /// interpolated toward its pose at the span's end. The last keyframe
    /// is an interpolation endpoint only — its pose is never emitted as a
    /// frame, so the sequence length is the tick distance between the
    /// first and last keyframes. Authors who want the final pose held add
    /// a trailing keyframe one tick later.
    pub fn expand(&self) -> Result<AnimationSequence> {
        if self.keyframes.len() < 2 {
            return Err(malformed(format!(
                "a keyframe set needs at least 2 keyframes, found {}",
                self.keyframes.len()
            )));
        }

        let mut frames: Vec<Frame> = Vec::new();
        for pair in self.keyframes.windows(2) {
            let (tick, start_frame) = &pair[0];
            let (next_tick, end_frame) = &pair[1];
            debug!("expanding keyframe span {tick}..{next_tick}");
            if next_tick <= tick {
                return Err(malformed(format!(
                    "keyframe ticks must be strictly ascending, tick {tick} is followed by {next_tick}"
                )));
            }
            let duration = (next_tick - tick) as usize;

            // Check the whole span before any step is written.
            let mut spans = Vec::with_capacity(start_frame.len());
            for (bone, start) in start_frame {
                let end = end_frame.get(bone).ok_or_else(|| {
                    malformed(format!(
                        "bone '{bone}' is keyed at tick {tick} but missing at tick {next_tick}"
                    ))
                })?;
                if !start.target.groups_match(&end.target) {
                    return Err(malformed(format!(
                        "bone '{bone}' switches axis groups between ticks {tick} and {next_tick}"
                    )));
                }
                spans.push((bone, start, end));
            }

            let base = frames.len();
            frames.resize_with(base + duration, Frame::new);
            for (bone, start, end) in spans {
                for step in 0..duration {
                    let t = step as f32 / duration as f32;
                    frames[base + step].insert(
                        bone.clone(),
                        AnimationChange {
                            character: start.character.clone(),
                            bone: bone.clone(),
                            target: start.target.lerp(end.target, t),
                        },
                    );
                }
            }
        }

        debug!(
            "expanded {} keyframes into {} frames",
            self.keyframes.len(),
            frames.len()
        );
        Ok(frames.into())
    }
}

fn malformed(reason: String) -> AnimationError {
    AnimationError::MalformedKeyframeSet { reason }
}

impl Serialize for KeyframeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keyframes.len()))?;
        for (tick, frame) in &self.keyframes {
            map.serialize_entry(&tick.to_string(), frame)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeyframeSet {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = KeyframeSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of integer tick keys to frames")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut keyframes = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, frame)) = map.next_entry::<String, Frame>()? {
                    let tick = key.parse::<i32>().map_err(|_| {
                        de::Error::custom(format!("non-integer tick key '{key}'"))
                    })?;
                    keyframes.push((tick, frame));
                }
                Ok(KeyframeSet { keyframes })
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// Read, parse, and expand an animation file into a playable sequence.
pub fn load_sequence(path: impl AsRef<Path>) -> Result<AnimationSequence> {
    let path = path.as_ref();
    debug!("loading animation '{}'", path.display());
    let text = fs::read_to_string(path)?;
    KeyframeSet::parse(&text)?.expand()
}
