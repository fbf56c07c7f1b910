use std::fmt::Write;

use truss_statics::{ForceState, Solution, SolveError};

/// Display colour conventionally used for each member state.
fn colour(state: ForceState) -> &'static str {
    match state {
        ForceState::Compression => "red",
        ForceState::Tension => "green",
        ForceState::ZeroForce => "yellow",
    }
}

/// Render support reactions and member forces as plain text.
#[must_use]
pub fn render_solution(solution: &Solution) -> String {
    let mut output = String::from("Support Reactions:\n");
    for (joint, reaction) in &solution.reactions {
        writeln!(
            &mut output,
            "{joint}: ({:.2}, {:.2}) N",
            reaction.x, reaction.y
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nMember Forces:\n");
    for entry in &solution.member_forces {
        let state = entry.state();
        writeln!(
            &mut output,
            "{}: {:.2} N {state} ({})",
            entry.member,
            entry.force,
            colour(state)
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\nColors:\nRED = COMPRESSION\nGREEN = TENSION\nYELLOW = ZERO FORCE\n");
    output
}

/// User facing notice for a failed solve.
#[must_use]
pub fn render_failure(error: &SolveError) -> String {
    if error.is_incomplete() {
        "Truss is incomplete! Add joints and members first.".to_owned()
    } else {
        format!("Truss solution failed: {error}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use truss_statics::{force, Member, MemberForce};

    #[test]
    fn formats_reactions_and_member_states() {
        let solution = Solution {
            member_forces: vec![
                MemberForce {
                    member: Member::new("A", "B"),
                    force: 1.25,
                },
                MemberForce {
                    member: Member::new("B", "C"),
                    force: -2.5,
                },
                MemberForce {
                    member: Member::new("C", "D"),
                    force: 0.0,
                },
            ],
            reactions: BTreeMap::from([("A".to_owned(), force(0.0, 2.5))]),
        };
        let report = render_solution(&solution);
        assert!(report.contains("A: (0.00, 2.50) N"));
        assert!(report.contains("A-B: 1.25 N tension (green)"));
        assert!(report.contains("B-C: -2.50 N compression (red)"));
        assert!(report.contains("C-D: 0.00 N zero force (yellow)"));
    }

    #[test]
    fn distinguishes_incomplete_from_unsolvable() {
        let incomplete = SolveError::IncompleteStructure {
            joints: 2,
            members: 0,
        };
        assert_eq!(
            render_failure(&incomplete),
            "Truss is incomplete! Add joints and members first."
        );

        let unsolvable = SolveError::UnsolvableStructure {
            equations: 6,
            unknowns: 7,
        };
        assert!(render_failure(&unsolvable).starts_with("Truss solution failed: "));
    }
}
