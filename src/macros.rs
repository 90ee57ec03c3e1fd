/// Asserts that two `f64` expressions differ by less than `$prec`, printing both values on
/// failure. Used for comparing infection probabilities and velocities after repeated
/// multiplicative interventions.
#[macro_export]
macro_rules! assert_almost_eq {
    ($a:expr, $b:expr, $prec:expr $(,)?) => {
        if !$crate::numeric::almost_eq($a, $b, $prec) {
            panic!(
                "assertion failed: `abs(left - right) < {:e}`, (left: `{}`, right: `{}`)",
                $prec, $a, $b
            );
        }
    };
}
