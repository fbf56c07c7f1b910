//! Solved member forces and support reactions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Force;
use crate::structure::Member;

/// Magnitude below which a member is reported as carrying no force.
pub const ZERO_FORCE_TOLERANCE: f64 = 1.0e-3;

/// How a member is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceState {
    /// Negative axial force: the member is being pushed together.
    Compression,
    /// Positive axial force: the member is being pulled apart.
    Tension,
    /// The member carries no meaningful force.
    ZeroForce,
}

impl ForceState {
    /// Classify a signed axial force.
    ///
    /// # Examples
    /// ```
    /// use truss_statics::ForceState;
    ///
    /// assert_eq!(ForceState::of(-2.795), ForceState::Compression);
    /// assert_eq!(ForceState::of(1.25), ForceState::Tension);
    /// assert_eq!(ForceState::of(0.0), ForceState::ZeroForce);
    /// ```
    #[must_use]
    pub fn of(force: f64) -> Self {
        if force.abs() < ZERO_FORCE_TOLERANCE {
            ForceState::ZeroForce
        } else if force < 0.0 {
            ForceState::Compression
        } else {
            ForceState::Tension
        }
    }
}

impl fmt::Display for ForceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ForceState::Compression => "compression",
            ForceState::Tension => "tension",
            ForceState::ZeroForce => "zero force",
        })
    }
}

/// Axial force carried by one member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberForce {
    /// The member the force belongs to.
    pub member: Member,
    /// Signed axial force, positive in tension.
    pub force: f64,
}

impl MemberForce {
    /// Classification of the force.
    #[must_use]
    pub fn state(&self) -> ForceState {
        ForceState::of(self.force)
    }
}

/// Outcome of a successful equilibrium solve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Member forces, in the order the members were supplied.
    pub member_forces: Vec<MemberForce>,
    /// Reaction at every joint with at least one restrained direction.
    /// Unrestrained components are zero.
    pub reactions: BTreeMap<String, Force>,
}

impl Solution {
    /// Force in the first member joining `a` and `b`, in either orientation.
    #[must_use]
    pub fn member_force(&self, a: &str, b: &str) -> Option<f64> {
        self.member_forces
            .iter()
            .find(|entry| entry.member.connects(a, b))
            .map(|entry| entry.force)
    }

    /// Reaction at a supported joint.
    #[must_use]
    pub fn reaction(&self, joint: &str) -> Option<Force> {
        self.reactions.get(joint).copied()
    }

    /// Vector sum of all support reactions.
    #[must_use]
    pub fn total_reaction(&self) -> Force {
        self.reactions.values().copied().sum()
    }
}
