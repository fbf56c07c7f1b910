//! Input description of a truss as consumed by the equilibrium solver.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{LoadKeyError, SolveError};
use crate::geometry::{Force, Point};
use crate::results::Solution;
use crate::solver::{solve_with, SolveOptions};

/// Joint table: unique joint name to position.
pub type Joints = BTreeMap<String, Point>;

/// External loads keyed by [`LoadKey`], at most one aggregate force per joint.
pub type Loads = BTreeMap<LoadKey, Force>;

/// Restraints keyed by joint name. Joints without an entry are free.
pub type Supports = BTreeMap<String, Support>;

/// Two-force member connecting a pair of joints.
///
/// The pair is unordered for identity purposes, see [`Member::connects`], but
/// the stored orientation fixes the direction of the member's unit vector
/// during assembly. Serialized as `["start", "end"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Member {
    /// First joint of the member.
    pub start: String,
    /// Second joint of the member.
    pub end: String,
}

impl Member {
    /// Create a member between two named joints.
    ///
    /// # Examples
    /// ```
    /// use truss_statics::Member;
    ///
    /// let member = Member::new("A", "B");
    /// assert!(member.connects("B", "A"));
    /// assert_eq!(member.to_string(), "A-B");
    /// ```
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Whether this member joins `a` and `b`, in either orientation.
    #[must_use]
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// Whether `joint` is one of the member's ends.
    #[must_use]
    pub fn touches(&self, joint: &str) -> bool {
        self.start == joint || self.end == joint
    }

    /// The end opposite to `joint`, if `joint` is an end of this member.
    #[must_use]
    pub fn other_end(&self, joint: &str) -> Option<&str> {
        if self.start == joint {
            Some(self.end.as_str())
        } else if self.end == joint {
            Some(self.start.as_str())
        } else {
            None
        }
    }

    /// Orientation independent key: the two joint names in sorted order.
    #[must_use]
    pub fn canonical(&self) -> (&str, &str) {
        if self.start <= self.end {
            (self.start.as_str(), self.end.as_str())
        } else {
            (self.end.as_str(), self.start.as_str())
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl From<(String, String)> for Member {
    fn from((start, end): (String, String)) -> Self {
        Self { start, end }
    }
}

impl From<Member> for (String, String) {
    fn from(value: Member) -> Self {
        (value.start, value.end)
    }
}

/// Which global directions are restrained at a joint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// The X translation is fixed and an X reaction is unknown.
    pub fix_x: bool,
    /// The Y translation is fixed and a Y reaction is unknown.
    pub fix_y: bool,
}

impl Support {
    /// Create a support with explicit restraints.
    #[must_use]
    pub const fn new(fix_x: bool, fix_y: bool) -> Self {
        Self { fix_x, fix_y }
    }

    /// Pin restraining both directions.
    #[must_use]
    pub const fn pinned() -> Self {
        Self::new(true, true)
    }

    /// Roller restraining only the X direction.
    #[must_use]
    pub const fn roller_x() -> Self {
        Self::new(true, false)
    }

    /// Roller restraining only the Y direction.
    #[must_use]
    pub const fn roller_y() -> Self {
        Self::new(false, true)
    }

    /// Number of reaction components this support introduces.
    #[must_use]
    pub fn reaction_count(self) -> usize {
        usize::from(self.fix_x) + usize::from(self.fix_y)
    }
}

/// Key of an external load, kept in a namespace separate from joint names.
///
/// Renders as `Ext_<joint>` and parses back from that form. Everything after
/// the prefix is the joint name, so `Ext_` alone keys the joint named `""`.
///
/// # Examples
/// ```
/// use truss_statics::LoadKey;
///
/// let key: LoadKey = "Ext_C".parse().unwrap();
/// assert_eq!(key.joint(), "C");
/// assert_eq!(key, LoadKey::new("C"));
/// assert!("C".parse::<LoadKey>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoadKey(String);

impl LoadKey {
    /// Prefix separating load keys from joint names.
    pub const PREFIX: &'static str = "Ext_";

    /// Key of the external force applied at `joint`.
    #[must_use]
    pub fn new(joint: impl Into<String>) -> Self {
        Self(joint.into())
    }

    /// Name of the loaded joint.
    #[must_use]
    pub fn joint(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for LoadKey {
    type Err = LoadKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .map(Self::new)
            .ok_or_else(|| LoadKeyError::MissingPrefix(s.to_owned()))
    }
}

impl TryFrom<String> for LoadKey {
    type Error = LoadKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LoadKey> for String {
    fn from(value: LoadKey) -> Self {
        value.to_string()
    }
}

/// Snapshot of the four collections describing a loaded, supported truss.
///
/// # Examples
/// ```
/// use truss_statics::TrussInput;
///
/// let input: TrussInput = serde_json::from_str(r#"{
///     "joints": {"A": [0, 0], "B": [3, 0], "C": [1.5, 3]},
///     "members": [["A", "B"], ["B", "C"], ["C", "A"]],
///     "loads": {"Ext_C": [0, -5]},
///     "supports": {"A": {"fix_x": true, "fix_y": true}, "B": {"fix_x": false, "fix_y": true}}
/// }"#).unwrap();
///
/// let solution = input.solve().unwrap();
/// assert_eq!(solution.member_force("A", "B"), Some(1.25));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrussInput {
    /// Joint positions.
    pub joints: Joints,
    /// Members in the order their forces are reported.
    pub members: Vec<Member>,
    /// External loads.
    #[serde(default)]
    pub loads: Loads,
    /// Support restraints.
    #[serde(default)]
    pub supports: Supports,
}

impl TrussInput {
    /// Solve the snapshot with default [`SolveOptions`].
    ///
    /// # Errors
    ///
    /// See [`solve`](crate::solve).
    pub fn solve(&self) -> Result<Solution, SolveError> {
        self.solve_with(&SolveOptions::default())
    }

    /// Solve the snapshot with explicit options.
    ///
    /// # Errors
    ///
    /// See [`solve`](crate::solve).
    pub fn solve_with(&self, options: &SolveOptions) -> Result<Solution, SolveError> {
        solve_with(
            &self.joints,
            &self.members,
            &self.loads,
            &self.supports,
            options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{force, point};

    #[test]
    fn member_identity_ignores_orientation() {
        let member = Member::new("C", "A");
        assert!(member.connects("A", "C"));
        assert!(!member.connects("A", "B"));
        assert_eq!(member.canonical(), ("A", "C"));
        assert_eq!(member.other_end("C"), Some("A"));
        assert_eq!(member.other_end("B"), None);
        assert!(member.touches("A"));
    }

    #[test]
    fn load_key_rejects_bare_joint_names() {
        assert_eq!(
            "A".parse::<LoadKey>(),
            Err(LoadKeyError::MissingPrefix("A".to_owned()))
        );
        assert_eq!(LoadKey::new("B").to_string(), "Ext_B");
    }

    #[test]
    fn load_key_text_form_is_lossless() {
        for joint in ["", "B", "Ext_B", "joint 7"] {
            let key = LoadKey::new(joint);
            assert_eq!(key.to_string().parse::<LoadKey>(), Ok(key));
        }
    }

    #[test]
    fn input_with_empty_joint_name_survives_json() {
        let mut input = TrussInput::default();
        input.joints.insert(String::new(), point(0.0, 0.0));
        input.joints.insert("B".to_owned(), point(1.0, 0.0));
        input.members.push(Member::new("", "B"));
        input.loads.insert(LoadKey::new(""), force(0.0, -1.0));

        let text = serde_json::to_string(&input).expect("input serializes");
        assert!(text.contains(r#""Ext_":[0.0,-1.0]"#));
        let back: TrussInput = serde_json::from_str(&text).expect("input deserializes");
        assert_eq!(back, input);
    }

    #[test]
    fn support_counts_fixed_directions() {
        assert_eq!(Support::pinned().reaction_count(), 2);
        assert_eq!(Support::roller_x().reaction_count(), 1);
        assert_eq!(Support::roller_y().reaction_count(), 1);
        assert_eq!(Support::default().reaction_count(), 0);
    }

    #[test]
    fn input_serializes_in_compact_form() {
        let mut input = TrussInput::default();
        input.joints.insert("A".to_owned(), point(0.0, 0.0));
        input.joints.insert("B".to_owned(), point(3.0, 0.0));
        input.members.push(Member::new("A", "B"));
        input.loads.insert(LoadKey::new("B"), force(1.0, -2.0));
        input.supports.insert("A".to_owned(), Support::pinned());

        let json = serde_json::to_value(&input).expect("input serializes");
        assert_eq!(json["joints"]["B"], serde_json::json!([3.0, 0.0]));
        assert_eq!(json["members"][0], serde_json::json!(["A", "B"]));
        assert_eq!(json["loads"]["Ext_B"], serde_json::json!([1.0, -2.0]));

        let back: TrussInput = serde_json::from_value(json).expect("input deserializes");
        assert_eq!(back, input);
    }

    #[test]
    fn malformed_load_keys_fail_to_deserialize() {
        let result = serde_json::from_str::<TrussInput>(
            r#"{"joints": {"A": [0, 0]}, "members": [], "loads": {"A": [0, 1]}}"#,
        );
        assert!(result.is_err());
    }
}
