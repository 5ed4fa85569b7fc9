use corelib::{CrossoverEvent, CrossoverKind, Direction};

/// Finds the indices where series `a` strictly crosses series `b`.
///
/// Bullish at `i` when `a[i-1] <= b[i-1]` and `a[i] > b[i]`; bearish when
/// `a[i-1] >= b[i-1]` and `a[i] < b[i]`. Indices where either side of the
/// comparison is undefined are skipped. Events come back in ascending index
/// order, at most one per index. Series of unequal length are compared over
/// their common prefix.
pub fn detect(a: &[Option<f64>], b: &[Option<f64>], kind: CrossoverKind) -> Vec<CrossoverEvent> {
    let n = a.len().min(b.len());
    let mut out = Vec::new();

    for i in 1..n {
        let (Some(a_prev), Some(b_prev), Some(a_now), Some(b_now)) = (a[i - 1], b[i - 1], a[i], b[i])
        else {
            continue;
        };

        let direction = if a_prev <= b_prev && a_now > b_now {
            Direction::Bullish
        } else if a_prev >= b_prev && a_now < b_now {
            Direction::Bearish
        } else {
            continue;
        };

        out.push(CrossoverEvent {
            index: i,
            direction,
            kind,
        });
    }

    out
}
