use crate::error::GenerationError;
use crate::geometry::GridShape;

const MIN_STEPS: usize = 4_096;

/// Caps how many tiles one generation phase may visit.
///
/// Every phase is bounded by the grid, so running out means a predicate
/// broke its termination contract rather than an unlucky seed.
#[derive(Debug)]
pub(super) struct StepBudget {
    phase: &'static str,
    limit: usize,
    used: usize,
}

impl StepBudget {
    /// Allows each cell to flood the whole grid once.
    pub(super) fn for_shape(phase: &'static str, shape: GridShape) -> Self {
        let cells = shape.cell_count();
        Self::new(phase, cells.saturating_mul(cells).max(MIN_STEPS))
    }

    pub(super) fn new(phase: &'static str, limit: usize) -> Self {
        Self { phase, limit, used: 0 }
    }

    pub(super) fn charge(&mut self, steps: usize) -> Result<(), GenerationError> {
        self.used = self.used.saturating_add(steps);
        if self.used > self.limit {
            return Err(GenerationError::StepBudgetExceeded {
                phase: self.phase,
                budget: self.limit,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(super) fn used(&self) -> usize {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charging_past_the_limit_names_the_phase() {
        let mut budget = StepBudget::new("remove_small_walls", 10);
        assert_eq!(budget.charge(10), Ok(()));
        assert_eq!(
            budget.charge(1),
            Err(GenerationError::StepBudgetExceeded { phase: "remove_small_walls", budget: 10 })
        );
    }

    #[test]
    fn tiny_grids_still_get_a_floor_budget() {
        let budget = StepBudget::for_shape("carve", GridShape::new(5, 5));
        assert_eq!(budget.limit, MIN_STEPS);
        assert_eq!(budget.used(), 0);
    }
}
