use truss_statics::{force, point, Support, Truss, TrussEditError};

/// Build the reference triangle: a 3 m span with its apex 3 m high, pinned on
/// the left, on a roller on the right and loaded downward at the apex.
pub fn build_reference_truss() -> Result<Truss, TrussEditError> {
    let mut truss = Truss::new();
    truss.add_joint("A", point(0.0, 0.0))?;
    truss.add_joint("B", point(3.0, 0.0))?;
    truss.add_joint("C", point(1.5, 3.0))?;

    truss.add_member("A", "B")?;
    truss.add_member("B", "C")?;
    truss.add_member("C", "A")?;

    // A pin at A and a roller at B give exactly the three reaction components
    // a stable triangle needs (m + r = 2j).
    truss.set_support("A", Support::pinned())?;
    truss.set_support("B", Support::roller_y())?;
    truss.set_load("C", force(0.0, -5.0))?;

    Ok(truss)
}
