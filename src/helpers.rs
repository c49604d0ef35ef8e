/// Returns a [`DimensionMismatch`](crate::simplex::DimensionMismatch) from the enclosing function
/// when the two expressions differ.
#[macro_export]
macro_rules! ensure_eq {
    ($expr1: expr, $expr2: expr) => {
        if $expr1 != $expr2 {
            return Err($crate::simplex::DimensionMismatch::new(format!(
                "{0} != {1}\n{0} = {2:?}\n{1} = {3:?}",
                stringify!($expr1),
                stringify!($expr2),
                $expr1,
                $expr2
            )))?;
        }
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond: expr) => {
        if !$cond {
            return Err($crate::simplex::DimensionMismatch::new(format!(
                "assertion failed: {}",
                stringify!($cond)
            )))?;
        }
    };
}

#[macro_export]
macro_rules! dbg_display {
    ($e: expr) => {{
        let val = $e;
        log::debug!(
            "[{}/{}:{}] {} = {}",
            file!(),
            line!(),
            column!(),
            stringify!($e),
            val
        );
        val
    }};
}

// above 2^52 every f64 is an integer, so rounding at that scale cannot change the value
const EXACT_INTEGER_BOUND: f64 = 4_503_599_627_370_496.;

/// Rounds half to even on the scaled value, the way numpy's `round` does.
///
/// A precision finer than the value's own resolution returns it unchanged.
pub fn round_to(val: f64, precision: u32) -> f64 {
    let Ok(exponent) = i32::try_from(precision) else {
        return val;
    };
    let scale = 10f64.powi(exponent);
    let scaled = val * scale;
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_BOUND {
        return val;
    }
    scaled.round_ties_even() / scale
}

pub fn round_all(values: impl IntoIterator<Item = f64>, precision: u32) -> Vec<f64> {
    values
        .into_iter()
        .map(|val| round_to(val, precision))
        .collect()
}

pub fn f64_rounded_string(val: &f64, precision: usize) -> String {
    let s = format!("{val:.precision$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    match s {
        "-0" => "0".to_owned(),
        s => s.to_owned(),
    }
}
