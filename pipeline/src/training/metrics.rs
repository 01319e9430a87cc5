use serde::{Deserialize, Serialize};

/// Regression metrics over a held-out partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub rows: usize,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Scores `preds` against `truth`.
///
/// Returns `None` when there is nothing to score or the lengths differ. A
/// constant `truth` gets an r2 of 1 when predicted exactly and 0 otherwise.
pub fn evaluate(truth: &[f64], preds: &[f64]) -> Option<EvalReport> {
    if truth.is_empty() || truth.len() != preds.len() {
        return None;
    }

    let n = truth.len() as f64;
    let mean = truth.iter().sum::<f64>() / n;

    let (mut ss_res, mut abs, mut ss_tot) = (0.0, 0.0, 0.0);
    for (t, p) in truth.iter().zip(preds) {
        let e = t - p;
        ss_res += e * e;
        abs += e.abs();
        ss_tot += (t - mean) * (t - mean);
    }

    let r2 = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(EvalReport {
        rows: truth.len(),
        rmse: (ss_res / n).sqrt(),
        mae: abs / n,
        r2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions() {
        let r = evaluate(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(r.rmse, 0.0);
        assert_eq!(r.mae, 0.0);
        assert_eq!(r.r2, 1.0);
        assert_eq!(r.rows, 3);
    }

    #[test]
    fn known_errors() {
        let r = evaluate(&[0.0, 4.0], &[1.0, 1.0]).unwrap();
        // errors -1 and 3
        assert_eq!(r.mae, 2.0);
        assert_eq!(r.rmse, 5.0_f64.sqrt());
        // ss_tot = 8, ss_res = 10
        assert_eq!(r.r2, 1.0 - 10.0 / 8.0);
    }

    #[test]
    fn constant_truth() {
        assert_eq!(evaluate(&[2.0, 2.0], &[2.0, 2.0]).unwrap().r2, 1.0);
        assert_eq!(evaluate(&[2.0, 2.0], &[1.0, 2.0]).unwrap().r2, 0.0);
    }

    #[test]
    fn nothing_to_score() {
        assert!(evaluate(&[], &[]).is_none());
        assert!(evaluate(&[1.0], &[]).is_none());
    }
}
