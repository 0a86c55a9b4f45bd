use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A pose target for one bone.
///
/// Rotation and position are independent axis groups; a `None` group
/// leaves that part of the bone untouched when the target is applied.
/// Arithmetic is component-wise, and an operation only produces a group
/// when both operands carry it.
///
/// The serialized form is the six-field record `{ax, ay, az, px, py, pz}`
/// used by animation documents, where an absent group is written as three
/// `null` components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "TargetRecord", into = "TargetRecord")]
pub struct Target {
    /// Euler angles in degrees.
    pub rotation: Option<Vec3>,
    /// World position.
    pub position: Option<Vec3>,
}

impl Target {
    /// Target carrying both axis groups.
    pub fn new(degrees: Vec3, position: Vec3) -> Self {
        Self {
            rotation: Some(degrees),
            position: Some(position),
        }
    }

    /// Target that only rotates the bone.
    pub fn from_rotation(degrees: Vec3) -> Self {
        Self {
            rotation: Some(degrees),
            position: None,
        }
    }

    /// Target that only moves the bone.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            rotation: None,
            position: Some(position),
        }
    }

    /// Linear interpolation toward `end`, with `t` in `[0, 1]`.
    pub fn lerp(self, end: Self, t: f32) -> Self {
        self + (end - self) * t
    }

    /// True when both targets carry the same axis groups.
    pub fn groups_match(&self, other: &Self) -> bool {
        self.rotation.is_some() == other.rotation.is_some()
            && self.position.is_some() == other.position.is_some()
    }
}

fn zip(a: Option<Vec3>, b: Option<Vec3>, op: impl Fn(Vec3, Vec3) -> Vec3) -> Option<Vec3> {
    match (a, b) {
        (Some(a), Some(b)) => Some(op(a, b)),
        _ => None,
    }
}

impl Add for Target {
    type Output = Target;

    fn add(self, rhs: Target) -> Target {
        Target {
            rotation: zip(self.rotation, rhs.rotation, |a, b| a + b),
            position: zip(self.position, rhs.position, |a, b| a + b),
        }
    }
}

impl Sub for Target {
    type Output = Target;

    fn sub(self, rhs: Target) -> Target {
        Target {
            rotation: zip(self.rotation, rhs.rotation, |a, b| a - b),
            position: zip(self.position, rhs.position, |a, b| a - b),
        }
    }
}

impl Mul<f32> for Target {
    type Output = Target;

    fn mul(self, c: f32) -> Target {
        Target {
            rotation: self.rotation.map(|v| v * c),
            position: self.position.map(|v| v * c),
        }
    }
}

impl Mul<Target> for f32 {
    type Output = Target;

    fn mul(self, t: Target) -> Target {
        t * self
    }
}

/// Wire form of [`Target`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct TargetRecord {
    #[serde(default)]
    ax: Option<f32>,
    #[serde(default)]
    ay: Option<f32>,
    #[serde(default)]
    az: Option<f32>,
    #[serde(default)]
    px: Option<f32>,
    #[serde(default)]
    py: Option<f32>,
    #[serde(default)]
    pz: Option<f32>,
}

/// A group counts as present only when all three components are numeric.
fn group(x: Option<f32>, y: Option<f32>, z: Option<f32>) -> Option<Vec3> {
    match (x, y, z) {
        (Some(x), Some(y), Some(z)) if x.is_finite() && y.is_finite() && z.is_finite() => {
            Some(Vec3::new(x, y, z))
        }
        _ => None,
    }
}

impl From<TargetRecord> for Target {
    fn from(r: TargetRecord) -> Self {
        Target {
            rotation: group(r.ax, r.ay, r.az),
            position: group(r.px, r.py, r.pz),
        }
    }
}

impl From<Target> for TargetRecord {
    fn from(t: Target) -> Self {
        TargetRecord {
            ax: t.rotation.map(|v| v.x),
            ay: t.rotation.map(|v| v.y),
            az: t.rotation.map(|v| v.z),
            px: t.position.map(|v| v.x),
            py: t.position.map(|v| v.y),
            pz: t.position.map(|v| v.z),
        }
    }
}
