use crate::world::agents::Patch;
use crate::world::grid::PatchWorld;

/// Copy the patches of every range around `(x, y)` into one scratch buffer.
///
/// Range order is preserved; each patch appears once because the topology
/// never returns overlapping ranges.
pub(crate) fn gather_candidates(world: &PatchWorld, x: f64, y: f64, radius: f64) -> Vec<&Patch> {
    let region = world.topology().region(x, y, radius);
    let total: usize = region.iter().map(|range| range.len()).sum();

    let mut candidates = Vec::with_capacity(total);
    for range in region {
        candidates.extend(world.patches[range].iter());
    }
    candidates
}
