/// Step damping for the refinement loop: starts at `initial`, halves each
/// time the residual grows, never drops below `floor`.
#[derive(Debug, Clone, Copy)]
pub struct DampingController {
    current: f64,
    floor: f64,
    previous_residual: Option<f64>,
    halvings: usize,
}

impl DampingController {
    pub fn new(initial: f64, floor: f64) -> Self {
        Self {
            current: initial,
            floor,
            previous_residual: None,
            halvings: 0,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn halvings(&self) -> usize {
        self.halvings
    }

    /// Record a refinement residual; halves damping on an increase.
    pub fn observe(&mut self, residual: f64) -> f64 {
        if let Some(previous) = self.previous_residual {
            if residual > previous {
                self.current = (self.current * 0.5).max(self.floor);
                self.halvings += 1;
            }
        }
        self.previous_residual = Some(residual);
        self.current
    }
}
