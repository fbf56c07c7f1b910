//! Error types produced while editing or solving trusses.

use std::fmt;

use thiserror::Error;

use crate::structure::Member;

/// Error returned when the equilibrium solve fails.
///
/// # Examples
///
/// ```
/// use truss_statics::{solve, Joints, Loads, SolveError, Supports};
///
/// let error = solve(&Joints::new(), &[], &Loads::new(), &Supports::new())
///     .expect_err("an empty truss cannot be solved");
/// assert!(error.is_incomplete());
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    /// Returned when there are no joints or no members to analyse.
    #[error("structure is incomplete ({joints} joints, {members} members)")]
    IncompleteStructure {
        /// Number of joints supplied.
        joints: usize,
        /// Number of members supplied.
        members: usize,
    },
    /// Returned when a member, load or support names a joint that does not exist.
    #[error("joint {joint:?} referenced by {referenced_by} does not exist")]
    UnknownJoint {
        /// Name of the missing joint.
        joint: String,
        /// Input entry holding the dangling reference.
        referenced_by: JointReference,
    },
    /// Returned when a member connects two coincident joints.
    #[error("member {member} has zero length")]
    DegenerateGeometry {
        /// The offending member.
        member: Member,
    },
    /// Returned when the equilibrium system is singular or not square.
    ///
    /// Covers both unstable structures (too few members or supports) and
    /// statically indeterminate ones (redundant members or supports).
    #[error(
        "structure is statically indeterminate or unstable \
         ({unknowns} unknowns for {equations} equilibrium equations)"
    )]
    UnsolvableStructure {
        /// Number of equilibrium equations (two per joint).
        equations: usize,
        /// Number of unknown member forces and reaction components.
        unknowns: usize,
    },
}

impl SolveError {
    /// Whether the failure stems from missing joints or members rather than
    /// from the structure itself.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, SolveError::IncompleteStructure { .. })
    }
}

/// Input entry that referenced a joint.
#[derive(Clone, Debug, PartialEq)]
pub enum JointReference {
    /// An endpoint of a member.
    Member(Member),
    /// The target of an external load.
    Load,
    /// A support entry.
    Support,
}

impl fmt::Display for JointReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointReference::Member(member) => write!(f, "member {member}"),
            JointReference::Load => f.write_str("a load"),
            JointReference::Support => f.write_str("a support"),
        }
    }
}

/// Error returned when a string is not a valid external load key.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadKeyError {
    /// Returned when the key does not carry the external force prefix.
    #[error("load key {0:?} does not start with `Ext_`")]
    MissingPrefix(String),
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid names.
///
/// # Examples
///
/// ```
/// use truss_statics::{point, Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// truss.add_joint("A", point(0.0, 0.0)).unwrap();
/// let error = truss.add_member("A", "B").expect_err("unknown joint is rejected");
/// assert_eq!(error, TrussEditError::UnknownJoint("B".to_owned()));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(String),
    /// Returned when no member connects the two joints.
    #[error("no member connects {0:?} and {1:?}")]
    UnknownMember(String, String),
    /// Returned when a joint name is already taken.
    #[error("joint {0:?} already exists in this truss")]
    DuplicateJoint(String),
    /// Returned when a member would connect a joint to itself.
    #[error("member cannot connect joint {0:?} to itself")]
    SelfConnectedMember(String),
    /// Returned when the two joints are already connected.
    #[error("joints {0:?} and {1:?} are already connected")]
    DuplicateMember(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_entry() {
        let error = SolveError::UnknownJoint {
            joint: "D".to_owned(),
            referenced_by: JointReference::Member(Member::new("A", "D")),
        };
        assert_eq!(
            error.to_string(),
            "joint \"D\" referenced by member A-D does not exist"
        );

        let error = SolveError::UnsolvableStructure {
            equations: 6,
            unknowns: 5,
        };
        assert!(error.to_string().contains("5 unknowns for 6"));
        assert!(!error.is_incomplete());
    }
}
