use truss_statics::{force, point, Support, Truss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Lay out a three panel Warren truss with a 6 m span
    let mut truss = Truss::new();
    for (name, x, y) in [
        ("L0", 0.0, 0.0),
        ("L1", 2.0, 0.0),
        ("L2", 4.0, 0.0),
        ("L3", 6.0, 0.0),
        ("U1", 1.0, 1.5),
        ("U2", 3.0, 1.5),
        ("U3", 5.0, 1.5),
    ] {
        truss.add_joint(name, point(x, y))?;
    }
    for (a, b) in [
        ("L0", "L1"),
        ("L1", "L2"),
        ("L2", "L3"),
        ("U1", "U2"),
        ("U2", "U3"),
        ("L0", "U1"),
        ("U1", "L1"),
        ("L1", "U2"),
        ("U2", "L2"),
        ("L2", "U3"),
        ("U3", "L3"),
    ] {
        truss.add_member(a, b)?;
    }

    // Pin one end, put the other on a roller and hang loads from the bottom chord
    truss.set_support("L0", Support::pinned())?;
    truss.set_support("L3", Support::roller_y())?;
    truss.set_load("L1", force(0.0, -10.0))?;
    truss.set_load("L2", force(0.0, -10.0))?;

    let solution = truss.evaluate()?;
    for entry in &solution.member_forces {
        println!("{}: {:+.3} ({})", entry.member, entry.force, entry.state());
    }
    for (joint, reaction) in &solution.reactions {
        println!("{joint}: ({:.2}, {:.2})", reaction.x, reaction.y);
    }

    Ok(())
}
