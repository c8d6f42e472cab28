use cascade_core::control::{CancellationToken, Deadline};
use cascade_core::models::RampSchedule;
use proptest::prelude::*;

#[test]
fn cancellation_is_shared_between_clones() {
    let token = CancellationToken::new();
    let worker = token.clone();
    assert!(!worker.is_cancelled());
    token.cancel();
    assert!(worker.is_cancelled());
}

#[test]
fn zero_budget_expires_immediately() {
    assert!(Deadline::start(Some(0)).expired());
    assert!(!Deadline::start(None).expired());
}

proptest! {
    #[test]
    fn linear_ramp_is_monotone_and_bounded(ramp_years in 0u32..20, steps in 1u32..40) {
        let ramp = RampSchedule::Linear { ramp_years };
        let mut prev = 0.0;
        for step in 0..=steps {
            let f = ramp.fraction_at(step);
            prop_assert!((0.0..=1.0).contains(&f));
            prop_assert!(f >= prev);
            prev = f;
        }
    }
}
