use crate::chromosome::Chromosome;

/// Receives the fittest chromosome while a run is in progress.
///
/// Called once with generation 0 before evolution starts, then after each
/// generation whose fittest tour differs from the previous one.
pub trait GenerationObserver {
    fn best_changed(&mut self, generation: usize, best: &Chromosome);
}

impl<F> GenerationObserver for F
where
    F: FnMut(usize, &Chromosome),
{
    fn best_changed(&mut self, generation: usize, best: &Chromosome) {
        self(generation, best)
    }
}
