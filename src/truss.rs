//! Editable truss model backed by an undirected graph.

use std::collections::HashMap;

use log::debug;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};

use crate::errors::{SolveError, TrussEditError};
use crate::geometry::{Force, Point};
use crate::results::Solution;
use crate::structure::{LoadKey, Member, Support, TrussInput};

/// Internal representation of a truss joint.
#[derive(Clone, Debug)]
struct Joint {
    /// Unique name of the joint.
    name: String,
    /// Position of the joint.
    position: Point,
    /// Restraint applied at the joint, if any.
    support: Option<Support>,
    /// Aggregate external load applied at the joint, if any.
    load: Option<Force>,
}

/// Container for a planar pin-jointed truss that is edited incrementally.
///
/// Joints are addressed by name. Members are undirected edges, so at most one
/// member may join any pair of joints. Members are reported in the order they
/// were added. The last [`Solution`] is cached until the next edit.
#[derive(Debug, Default)]
pub struct Truss {
    /// Joints as nodes and members as edges weighted by their insertion sequence.
    graph: StableUnGraph<Joint, u64>,
    /// Lookup from joint name to graph node.
    names: HashMap<String, NodeIndex>,
    /// Sequence number handed to the next member.
    next_member: u64,
    /// Result of the last successful evaluation, cleared on every edit.
    solution: Option<Solution>,
}

impl Truss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use truss_statics::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a named joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::DuplicateJoint`] when the name is taken.
    ///
    /// # Examples
    /// ```
    /// use truss_statics::{point, Truss};
    ///
    /// let mut truss = Truss::new();
    /// truss.add_joint("A", point(0.0, 0.0)).unwrap();
    /// assert!(truss.add_joint("A", point(1.0, 0.0)).is_err());
    /// assert_eq!(truss.joint_position("A"), Some(point(0.0, 0.0)));
    /// ```
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        position: Point,
    ) -> Result<NodeIndex, TrussEditError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(TrussEditError::DuplicateJoint(name));
        }
        self.invalidate();
        let node = self.graph.add_node(Joint {
            name: name.clone(),
            position,
            support: None,
            load: None,
        });
        self.names.insert(name, node);
        Ok(node)
    }

    /// Position of a joint.
    #[must_use]
    pub fn joint_position(&self, name: &str) -> Option<Point> {
        self.names.get(name).map(|node| self.graph[*node].position)
    }

    /// Update the position of an existing joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `name` is not part of this truss.
    pub fn move_joint(&mut self, name: &str, position: Point) -> Result<(), TrussEditError> {
        self.joint_mut(name)?.position = position;
        Ok(())
    }

    /// Remove a joint together with its members, load and support.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `name` is not part of this truss.
    pub fn remove_joint(&mut self, name: &str) -> Result<(), TrussEditError> {
        let node = self.node(name)?;
        self.invalidate();
        self.names.remove(name);
        self.graph.remove_node(node);
        debug!("removed joint {name:?} and its members");
        Ok(())
    }

    /// Connect two joints with a new member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when either joint is missing,
    /// [`TrussEditError::SelfConnectedMember`] when both names are equal and
    /// [`TrussEditError::DuplicateMember`] when the joints are already connected.
    pub fn add_member(&mut self, a: &str, b: &str) -> Result<EdgeIndex, TrussEditError> {
        let start = self.node(a)?;
        let end = self.node(b)?;
        if start == end {
            return Err(TrussEditError::SelfConnectedMember(a.to_owned()));
        }
        if self.graph.find_edge(start, end).is_some() {
            return Err(TrussEditError::DuplicateMember(a.to_owned(), b.to_owned()));
        }
        self.invalidate();
        let sequence = self.next_member;
        self.next_member += 1;
        Ok(self.graph.add_edge(start, end, sequence))
    }

    /// Whether a member joins `a` and `b`.
    #[must_use]
    pub fn has_member(&self, a: &str, b: &str) -> bool {
        match (self.names.get(a), self.names.get(b)) {
            (Some(start), Some(end)) => self.graph.find_edge(*start, *end).is_some(),
            _ => false,
        }
    }

    /// Remove the member joining `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when either joint is missing and
    /// [`TrussEditError::UnknownMember`] when they are not connected.
    pub fn remove_member(&mut self, a: &str, b: &str) -> Result<(), TrussEditError> {
        let start = self.node(a)?;
        let end = self.node(b)?;
        let edge = self
            .graph
            .find_edge(start, end)
            .ok_or_else(|| TrussEditError::UnknownMember(a.to_owned(), b.to_owned()))?;
        self.invalidate();
        self.graph.remove_edge(edge);
        Ok(())
    }

    /// Set the restraint state for a joint, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `name` is not part of this truss.
    pub fn set_support(&mut self, name: &str, support: Support) -> Result<(), TrussEditError> {
        self.joint_mut(name)?.support = Some(support);
        Ok(())
    }

    /// Remove the restraint from a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `name` is not part of this truss.
    pub fn clear_support(&mut self, name: &str) -> Result<(), TrussEditError> {
        self.joint_mut(name)?.support = None;
        Ok(())
    }

    /// Apply a point load to a joint, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `name` is not part of this truss.
    pub fn set_load(&mut self, name: &str, load: Force) -> Result<(), TrussEditError> {
        self.joint_mut(name)?.load = Some(load);
        Ok(())
    }

    /// Remove the load from a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `name` is not part of this truss.
    pub fn clear_load(&mut self, name: &str) -> Result<(), TrussEditError> {
        self.joint_mut(name)?.load = None;
        Ok(())
    }

    /// Remove every joint, member, load and support.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.names.clear();
        self.next_member = 0;
        self.solution = None;
    }

    /// Copy the current state into the solver's input collections.
    ///
    /// Members keep the orientation and order they were added with. Edge slots
    /// freed by removals are reused by the graph, so the order comes from the
    /// sequence stored on each edge.
    #[must_use]
    pub fn snapshot(&self) -> TrussInput {
        let mut input = TrussInput::default();
        for joint in self.graph.node_indices().map(|node| &self.graph[node]) {
            input.joints.insert(joint.name.clone(), joint.position);
            if let Some(load) = joint.load {
                input.loads.insert(LoadKey::new(joint.name.as_str()), load);
            }
            if let Some(support) = joint.support {
                input.supports.insert(joint.name.clone(), support);
            }
        }
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|edge| {
                let (start, end) = self.graph.edge_endpoints(edge)?;
                Some((self.graph[edge], start, end))
            })
            .collect();
        edges.sort_unstable_by_key(|(sequence, _, _)| *sequence);
        input.members = edges
            .into_iter()
            .map(|(_, start, end)| {
                Member::new(
                    self.graph[start].name.as_str(),
                    self.graph[end].name.as_str(),
                )
            })
            .collect();
        input
    }

    /// Solve the truss, reusing the cached result when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the structure is incomplete, degenerate or
    /// not statically determinate.
    ///
    /// # Examples
    /// ```
    /// use truss_statics::{force, point, Support, Truss};
    ///
    /// let mut truss = Truss::new();
    /// truss.add_joint("A", point(0.0, 0.0))?;
    /// truss.add_joint("B", point(3.0, 0.0))?;
    /// truss.add_joint("C", point(1.5, 3.0))?;
    /// truss.add_member("A", "B")?;
    /// truss.add_member("B", "C")?;
    /// truss.add_member("C", "A")?;
    /// truss.set_support("A", Support::pinned())?;
    /// truss.set_support("B", Support::roller_y())?;
    /// truss.set_load("C", force(0.0, -5.0))?;
    ///
    /// let solution = truss.evaluate()?;
    /// assert_eq!(solution.member_force("A", "B"), Some(1.25));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn evaluate(&mut self) -> Result<&Solution, SolveError> {
        let solution = match self.solution.take() {
            Some(solution) => solution,
            None => self.snapshot().solve()?,
        };
        Ok(self.solution.insert(solution))
    }

    /// The cached solution, if the truss was evaluated since the last edit.
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Retrieve the axial force in a member after evaluation.
    #[must_use]
    pub fn member_force(&self, a: &str, b: &str) -> Option<f64> {
        self.solution.as_ref()?.member_force(a, b)
    }

    /// Retrieve the reaction at a supported joint after evaluation.
    #[must_use]
    pub fn reaction(&self, name: &str) -> Option<Force> {
        self.solution.as_ref()?.reaction(name)
    }

    /// Drop the cached solution after an edit.
    fn invalidate(&mut self) {
        self.solution = None;
    }

    /// Resolve a joint name to its graph node.
    fn node(&self, name: &str) -> Result<NodeIndex, TrussEditError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| TrussEditError::UnknownJoint(name.to_owned()))
    }

    /// Mutable access to a joint, invalidating the cached solution.
    fn joint_mut(&mut self, name: &str) -> Result<&mut Joint, TrussEditError> {
        let node = self.node(name)?;
        self.invalidate();
        self.graph
            .node_weight_mut(node)
            .ok_or_else(|| TrussEditError::UnknownJoint(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{force, point};

    fn triangle() -> Truss {
        let mut truss = Truss::new();
        truss.add_joint("A", point(0.0, 0.0)).expect("joint added");
        truss.add_joint("B", point(3.0, 0.0)).expect("joint added");
        truss.add_joint("C", point(1.5, 3.0)).expect("joint added");
        truss.add_member("A", "B").expect("member added");
        truss.add_member("B", "C").expect("member added");
        truss.add_member("C", "A").expect("member added");
        truss
            .set_support("A", Support::pinned())
            .expect("support applied");
        truss
            .set_support("B", Support::roller_y())
            .expect("support applied");
        truss.set_load("C", force(0.0, -5.0)).expect("load applied");
        truss
    }

    #[test]
    fn snapshot_mirrors_edits() {
        let truss = triangle();
        let input = truss.snapshot();
        assert_eq!(input.joints.len(), 3);
        assert_eq!(
            input.members,
            [
                Member::new("A", "B"),
                Member::new("B", "C"),
                Member::new("C", "A")
            ]
        );
        assert_eq!(input.loads.get(&LoadKey::new("C")), Some(&force(0.0, -5.0)));
        assert_eq!(input.supports.get("B"), Some(&Support::roller_y()));
    }

    #[test]
    fn members_keep_insertion_order_after_removal() {
        let mut truss = triangle();
        truss.add_joint("D", point(3.0, 3.0)).expect("joint added");
        truss.remove_member("A", "B").expect("member removed");
        truss.add_member("A", "D").expect("member added");
        assert_eq!(
            truss.snapshot().members,
            [
                Member::new("B", "C"),
                Member::new("C", "A"),
                Member::new("A", "D")
            ]
        );

        truss.remove_joint("C").expect("joint removed");
        truss.add_member("B", "D").expect("member added");
        truss.add_member("A", "B").expect("member added");
        assert_eq!(
            truss.snapshot().members,
            [
                Member::new("A", "D"),
                Member::new("B", "D"),
                Member::new("A", "B")
            ]
        );
    }

    #[test]
    fn evaluation_is_cached_until_the_next_edit() {
        let mut truss = triangle();
        assert!(truss.solution().is_none());
        truss.evaluate().expect("triangle is stable");
        assert_eq!(truss.member_force("B", "A"), Some(1.25));
        assert_eq!(truss.reaction("A"), Some(force(0.0, 2.5)));

        truss.set_load("C", force(0.0, -10.0)).expect("load applied");
        assert!(truss.solution().is_none());
        assert_eq!(truss.member_force("A", "B"), None);

        truss.evaluate().expect("triangle is stable");
        assert_eq!(truss.member_force("A", "B"), Some(2.5));
    }

    #[test]
    fn removing_a_joint_cascades() {
        let mut truss = triangle();
        truss.remove_joint("C").expect("joint removed");
        assert_eq!(truss.joint_count(), 2);
        assert_eq!(truss.member_count(), 1);
        let input = truss.snapshot();
        assert!(input.loads.is_empty());
        assert_eq!(input.members, [Member::new("A", "B")]);

        truss.remove_joint("A").expect("joint removed");
        let input = truss.snapshot();
        assert!(input.members.is_empty());
        assert!(!input.supports.contains_key("A"));
        assert!(truss.evaluate().expect_err("no members left").is_incomplete());
    }

    #[test]
    fn member_edits_are_validated() {
        let mut truss = triangle();
        assert_eq!(
            truss.add_member("B", "A"),
            Err(TrussEditError::DuplicateMember("B".to_owned(), "A".to_owned()))
        );
        assert_eq!(
            truss.add_member("A", "A"),
            Err(TrussEditError::SelfConnectedMember("A".to_owned()))
        );
        assert_eq!(
            truss.add_member("A", "Z"),
            Err(TrussEditError::UnknownJoint("Z".to_owned()))
        );

        truss.remove_member("C", "B").expect("member removed");
        assert!(!truss.has_member("B", "C"));
        assert_eq!(
            truss.remove_member("B", "C"),
            Err(TrussEditError::UnknownMember("B".to_owned(), "C".to_owned()))
        );
        assert_eq!(truss.member_count(), 2);
    }

    #[test]
    fn joint_edits_are_validated() {
        let mut truss = triangle();
        assert_eq!(
            truss.add_joint("A", point(5.0, 5.0)).map(|_| ()),
            Err(TrussEditError::DuplicateJoint("A".to_owned()))
        );
        for result in [
            truss.move_joint("Z", point(0.0, 0.0)),
            truss.set_support("Z", Support::pinned()),
            truss.clear_support("Z"),
            truss.set_load("Z", force(1.0, 0.0)),
            truss.clear_load("Z"),
            truss.remove_joint("Z"),
        ] {
            assert_eq!(result, Err(TrussEditError::UnknownJoint("Z".to_owned())));
        }
    }

    #[test]
    fn moving_a_joint_changes_the_result() {
        let mut truss = triangle();
        truss.evaluate().expect("triangle is stable");
        truss
            .move_joint("C", point(1.5, 1.5))
            .expect("joint moved");
        assert_eq!(truss.joint_position("C"), Some(point(1.5, 1.5)));
        let solution = truss.evaluate().expect("triangle is stable");
        assert_eq!(solution.member_force("A", "B"), Some(2.5));
    }

    #[test]
    fn clearing_supports_makes_the_truss_unsolvable() {
        let mut truss = triangle();
        truss.clear_support("B").expect("support cleared");
        truss.clear_load("C").expect("load cleared");
        let error = truss.evaluate().expect_err("unstable");
        assert!(matches!(error, SolveError::UnsolvableStructure { .. }));
    }

    #[test]
    fn reset_empties_the_model() {
        let mut truss = triangle();
        truss.evaluate().expect("triangle is stable");
        truss.reset();
        assert_eq!(truss.joint_count(), 0);
        assert_eq!(truss.member_count(), 0);
        assert!(truss.solution().is_none());
        truss
            .add_joint("A", point(0.0, 0.0))
            .expect("name is free again");
    }
}
