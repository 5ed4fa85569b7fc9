//! Combines EMA and MACD crossover streams into composite patterns.
//!
//! Both matchers index one stream by `(direction, index)` and probe it once
//! per event of the other stream. Every qualifying pair is reported, so
//! duplicate crossovers on one index (not produced by [`crate::crossover`])
//! would still yield one pattern per pair.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use corelib::{CrossoverEvent, Direction, PatternEvent, Sequence};

type ByIndex<'a> = BTreeMap<(Direction, usize), Vec<&'a CrossoverEvent>>;

/// One event per `(ema, macd)` pair crossing on the same candle in the same direction.
///
/// Output follows the order of `ema_events`.
pub fn simultaneous(
    ema_events: &[CrossoverEvent],
    macd_events: &[CrossoverEvent],
) -> Vec<PatternEvent> {
    let mut macd_at: HashMap<(usize, Direction), usize> = HashMap::new();
    for m in macd_events {
        *macd_at.entry((m.index, m.direction)).or_default() += 1;
    }

    let mut out = Vec::new();
    for e in ema_events {
        let matches = macd_at.get(&(e.index, e.direction)).copied().unwrap_or(0);
        for _ in 0..matches {
            out.push(PatternEvent::simultaneous(e.index, e.direction));
        }
    }

    out
}

/// Every same-direction pair where one stream's crossover is followed by the
/// other's within `max_window` candles (`0 < second - first <= max_window`).
///
/// MACD-leading pairs come first (ordered by MACD event, then EMA event),
/// followed by EMA-leading pairs. A trailing crossover may pair with more
/// than one leading crossover inside the window; each pair is reported.
pub fn sequential(
    ema_events: &[CrossoverEvent],
    macd_events: &[CrossoverEvent],
    max_window: usize,
) -> Vec<PatternEvent> {
    let ema_by_index = index_events(ema_events);
    let macd_by_index = index_events(macd_events);

    let mut out = Vec::new();
    pair_within_window(
        macd_events,
        &ema_by_index,
        max_window,
        Sequence::MacdThenEma,
        &mut out,
    );
    pair_within_window(
        ema_events,
        &macd_by_index,
        max_window,
        Sequence::EmaThenMacd,
        &mut out,
    );

    out
}

fn index_events(events: &[CrossoverEvent]) -> ByIndex<'_> {
    let mut map: ByIndex<'_> = BTreeMap::new();
    for ev in events {
        map.entry((ev.direction, ev.index)).or_default().push(ev);
    }
    map
}

fn pair_within_window(
    leading: &[CrossoverEvent],
    trailing: &ByIndex<'_>,
    max_window: usize,
    sequence: Sequence,
    out: &mut Vec<PatternEvent>,
) {
    for first in leading {
        let lo = Bound::Excluded((first.direction, first.index));
        let hi = Bound::Included((first.direction, first.index.saturating_add(max_window)));

        for (_, seconds) in trailing.range((lo, hi)) {
            for second in seconds {
                out.push(PatternEvent::sequential(
                    first.index,
                    second.index,
                    first.direction,
                    sequence,
                ));
            }
        }
    }
}
