use std::ops::Range;

/// States of the job walk. Terminal states are `Completed`, `Aborted` and
/// `Failed`; everything else is in-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Initializing,
    TableLoop,
    RowLoop,
    Completed,
    Aborted,
    Failed,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobPhase::Completed | JobPhase::Aborted | JobPhase::Failed
        )
    }
}

/// Translates the user-facing 1-based inclusive row selection into a 0-based
/// half-open range over a table with `row_count` rows.
///
/// `start_index` below 1 is clamped to 1; a `last_index` beyond the table is
/// clamped to the table; a selection entirely past the table yields an empty
/// range.
pub fn effective_row_range(
    start_index: usize,
    last_index: Option<usize>,
    row_count: usize,
) -> Range<usize> {
    let start = start_index.max(1) - 1;
    let mut end = last_index.map_or(row_count, |last| last.min(row_count));
    if end < start {
        end = start;
    }
    start..end
}
