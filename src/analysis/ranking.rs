//! Ordering fitted models by residual with a deterministic tie-break.

use crate::result::ModelFit;

/// Sort fits ascending by residual.
///
/// Residuals within `epsilon` of the smallest remaining residual count as
/// equal; among those the model with the lowest priority wins. Selection is
/// done one rank at a time, so the order never depends on the input order
/// or on a non-transitive comparator.
pub fn rank_fits(mut fits: Vec<ModelFit>, epsilon: f64) -> Vec<ModelFit> {
    fits.sort_by_key(|fit| fit.class.priority());

    let mut ranked = Vec::with_capacity(fits.len());
    while !fits.is_empty() {
        let floor = fits
            .iter()
            .map(|fit| fit.residual)
            .fold(f64::INFINITY, f64::min);
        let pick = fits
            .iter()
            .position(|fit| fit.residual <= floor + epsilon)
            .unwrap_or(0);
        ranked.push(fits.remove(pick));
    }
    ranked
}
