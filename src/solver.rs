//! Equilibrium solver for statically determinate planar trusses.
//!
//! Every joint contributes two force balance equations (ΣFx = 0, ΣFy = 0), see
//! <https://en.wikipedia.org/wiki/Truss#Method_of_joints>. Member forces and
//! support reactions form the unknowns of a single dense linear system that is
//! solved in one LU factorisation.

use std::collections::HashMap;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::errors::{JointReference, SolveError};
use crate::geometry::Force;
use crate::results::{MemberForce, Solution};
use crate::structure::{Joints, Loads, Member, Supports};

/// Decimal digits needed to represent any `f64` exactly.
const MAX_SIGNIFICANT_DECIMALS: u32 = 17;

/// Tunables for [`solve_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOptions {
    /// Decimal places every reported value is rounded to. `None` keeps the raw
    /// floating point result.
    pub decimals: Option<u32>,
    /// Relative pivot magnitude, compared with the largest pivot, below which
    /// the system is treated as singular.
    pub pivot_tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            decimals: Some(3),
            pivot_tolerance: 1.0e-12,
        }
    }
}

impl SolveOptions {
    /// Round a reported value and normalise negative zero.
    ///
    /// Precision beyond what an `f64` can hold leaves the value unrounded.
    fn round(&self, value: f64) -> f64 {
        let rounded = match self.decimals {
            Some(decimals) if decimals < MAX_SIGNIFICANT_DECIMALS => {
                let scale = 10_f64.powf(f64::from(decimals));
                let scaled = value * scale;
                if scaled.is_finite() {
                    scaled.round() / scale
                } else {
                    value
                }
            }
            _ => value,
        };
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }
}

/// Global direction of a reaction component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Offset of the axis' equation within a joint's row pair.
    fn row_offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Unknown reaction component and the column it occupies.
#[derive(Debug)]
struct ReactionSlot<'a> {
    /// Supported joint.
    joint: &'a str,
    /// Restrained direction.
    axis: Axis,
    /// Column of the unknown in the equilibrium matrix.
    column: usize,
}

/// Column assignment for every unknown of the system.
///
/// Member `i` occupies column `i`. Reaction components follow contiguously, one
/// per restrained direction, in support order with X before Y.
#[derive(Debug)]
struct UnknownLayout<'a> {
    /// Number of member force columns.
    members: usize,
    /// Reaction components in column order.
    reactions: Vec<ReactionSlot<'a>>,
}

impl<'a> UnknownLayout<'a> {
    /// Assign columns to all unknowns of a solve.
    fn new(members: &[Member], supports: &'a Supports) -> Self {
        let mut reactions = Vec::new();
        for (joint, support) in supports {
            let fixed = [(Axis::X, support.fix_x), (Axis::Y, support.fix_y)];
            for (axis, _) in fixed.into_iter().filter(|(_, is_fixed)| *is_fixed) {
                reactions.push(ReactionSlot {
                    joint,
                    axis,
                    column: members.len() + reactions.len(),
                });
            }
        }
        Self {
            members: members.len(),
            reactions,
        }
    }

    /// Total number of unknowns.
    fn len(&self) -> usize {
        self.members + self.reactions.len()
    }
}

/// Solve a truss for member forces and support reactions with default options.
///
/// Member forces are positive in tension and negative in compression. Reactions
/// are the forces the supports exert on their joints. All values are rounded to
/// three decimal places.
///
/// # Errors
///
/// - [`SolveError::IncompleteStructure`] when `joints` or `members` is empty.
/// - [`SolveError::UnknownJoint`] when a member, support or load names a joint
///   missing from `joints`.
/// - [`SolveError::DegenerateGeometry`] when a member joins coincident joints.
/// - [`SolveError::UnsolvableStructure`] when the unknown count differs from
///   twice the joint count or the equilibrium matrix is singular.
///
/// # Examples
/// ```
/// use truss_statics::{force, point, solve, Joints, LoadKey, Loads, Member, Support, Supports};
///
/// let joints = Joints::from([
///     ("A".to_owned(), point(0.0, 0.0)),
///     ("B".to_owned(), point(3.0, 0.0)),
///     ("C".to_owned(), point(1.5, 3.0)),
/// ]);
/// let members = [Member::new("A", "B"), Member::new("B", "C"), Member::new("C", "A")];
/// let loads = Loads::from([(LoadKey::new("C"), force(0.0, -5.0))]);
/// let supports = Supports::from([
///     ("A".to_owned(), Support::pinned()),
///     ("B".to_owned(), Support::roller_y()),
/// ]);
///
/// let solution = solve(&joints, &members, &loads, &supports).unwrap();
/// assert_eq!(solution.member_force("A", "B"), Some(1.25));
/// assert_eq!(solution.member_force("B", "C"), Some(-2.795));
/// assert_eq!(solution.reaction("B"), Some(force(0.0, 2.5)));
/// ```
pub fn solve(
    joints: &Joints,
    members: &[Member],
    loads: &Loads,
    supports: &Supports,
) -> Result<Solution, SolveError> {
    solve_with(joints, members, loads, supports, &SolveOptions::default())
}

/// Solve a truss with explicit [`SolveOptions`].
///
/// # Errors
///
/// See [`solve`].
pub fn solve_with(
    joints: &Joints,
    members: &[Member],
    loads: &Loads,
    supports: &Supports,
    options: &SolveOptions,
) -> Result<Solution, SolveError> {
    validate_references(joints, members, loads, supports)?;

    let layout = UnknownLayout::new(members, supports);
    debug!(
        "assembling {} equilibrium equations for {} members and {} reaction components",
        2 * joints.len(),
        layout.members,
        layout.reactions.len()
    );

    let rows = joint_rows(joints);
    let matrix = build_equilibrium_matrix(joints, members, &layout, &rows)?;
    let rhs = build_load_vector(joints, loads, &rows);
    let raw = solve_system(matrix, &rhs, options.pivot_tolerance)?;

    Ok(extract_solution(members, &layout, &raw, options))
}

/// Reject empty inputs and dangling joint references before any matrix work.
fn validate_references(
    joints: &Joints,
    members: &[Member],
    loads: &Loads,
    supports: &Supports,
) -> Result<(), SolveError> {
    if joints.is_empty() || members.is_empty() {
        return Err(SolveError::IncompleteStructure {
            joints: joints.len(),
            members: members.len(),
        });
    }
    for member in members {
        for end in [&member.start, &member.end] {
            if !joints.contains_key(end) {
                return Err(SolveError::UnknownJoint {
                    joint: end.clone(),
                    referenced_by: JointReference::Member(member.clone()),
                });
            }
        }
    }
    if let Some(joint) = supports.keys().find(|joint| !joints.contains_key(*joint)) {
        return Err(SolveError::UnknownJoint {
            joint: joint.clone(),
            referenced_by: JointReference::Support,
        });
    }
    if let Some(key) = loads.keys().find(|key| !joints.contains_key(key.joint())) {
        return Err(SolveError::UnknownJoint {
            joint: key.joint().to_owned(),
            referenced_by: JointReference::Load,
        });
    }
    Ok(())
}

/// First row of each joint's (Fx, Fy) equation pair.
fn joint_rows(joints: &Joints) -> HashMap<&str, usize> {
    joints
        .keys()
        .enumerate()
        .map(|(idx, joint)| (joint.as_str(), idx * 2))
        .collect()
}

/// Assemble the equilibrium matrix.
///
/// A member contributes its unit vector from start to end at the start joint
/// and the opposite vector at the end joint, so at either end the coefficient
/// points from that joint toward the other one.
fn build_equilibrium_matrix(
    joints: &Joints,
    members: &[Member],
    layout: &UnknownLayout<'_>,
    rows: &HashMap<&str, usize>,
) -> Result<DMatrix<f64>, SolveError> {
    let mut matrix = DMatrix::zeros(2 * joints.len(), layout.len());
    for (column, member) in members.iter().enumerate() {
        let start = joints[member.start.as_str()];
        let end = joints[member.end.as_str()];
        let direction =
            start
                .unit_vector_to(end)
                .ok_or_else(|| SolveError::DegenerateGeometry {
                    member: member.clone(),
                })?;

        let start_row = rows[member.start.as_str()];
        let end_row = rows[member.end.as_str()];
        matrix[(start_row, column)] = direction.x;
        matrix[(start_row + 1, column)] = direction.y;
        matrix[(end_row, column)] = -direction.x;
        matrix[(end_row + 1, column)] = -direction.y;
    }
    for slot in &layout.reactions {
        matrix[(rows[slot.joint] + slot.axis.row_offset(), slot.column)] = 1.0;
    }
    Ok(matrix)
}

/// Assemble the right-hand side from the applied loads.
fn build_load_vector(
    joints: &Joints,
    loads: &Loads,
    rows: &HashMap<&str, usize>,
) -> DVector<f64> {
    let mut rhs = DVector::zeros(2 * joints.len());
    for (key, load) in loads {
        let row = rows[key.joint()];
        rhs[row] = load.x;
        rhs[row + 1] = load.y;
    }
    rhs
}

/// Factorise and solve the square system, rejecting singular matrices.
fn solve_system(
    matrix: DMatrix<f64>,
    rhs: &DVector<f64>,
    pivot_tolerance: f64,
) -> Result<DVector<f64>, SolveError> {
    let (equations, unknowns) = matrix.shape();
    let unsolvable = || {
        debug!("equilibrium system with {unknowns} unknowns and {equations} equations rejected");
        SolveError::UnsolvableStructure {
            equations,
            unknowns,
        }
    };
    if equations != unknowns {
        return Err(unsolvable());
    }

    let lu = matrix.lu();
    let pivots = lu.u().diagonal();
    let largest = pivots.amax();
    if largest == 0.0 || pivots.iter().any(|pivot| pivot.abs() <= pivot_tolerance * largest) {
        return Err(unsolvable());
    }
    lu.solve(rhs).ok_or_else(unsolvable)
}

/// Map the raw solution back onto members and supports.
///
/// The system balances the unknowns against the applied loads on the same side,
/// so the physical member forces and reactions are the negated solution.
fn extract_solution(
    members: &[Member],
    layout: &UnknownLayout<'_>,
    raw: &DVector<f64>,
    options: &SolveOptions,
) -> Solution {
    let member_forces = members
        .iter()
        .enumerate()
        .map(|(column, member)| MemberForce {
            member: member.clone(),
            force: options.round(-raw[column]),
        })
        .collect();

    let mut solution = Solution {
        member_forces,
        ..Solution::default()
    };
    for slot in &layout.reactions {
        let value = options.round(-raw[slot.column]);
        let reaction = solution
            .reactions
            .entry(slot.joint.to_owned())
            .or_insert_with(Force::default);
        match slot.axis {
            Axis::X => reaction.x = value,
            Axis::Y => reaction.y = value,
        }
    }
    solution
}
