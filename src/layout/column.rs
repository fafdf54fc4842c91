use super::cluster::sort_by_start_then_end;
use crate::schedule::time::Timed;

/// One cluster with a column resolved for every member.
#[derive(Debug, Clone)]
pub struct OverlapCluster<T> {
    /// Sorted by `(start, end)`.
    pub members: Vec<T>,
    /// `column_indices[i]` is the column of `members[i]`.
    pub column_indices: Vec<usize>,
    pub column_count: usize,
}

impl<T> OverlapCluster<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
        self.members.iter().zip(self.column_indices.iter().copied())
    }
}

/// Greedy first-fit column assignment.
///
/// Members are visited in `(start, end)` order; each takes the leftmost column
/// whose last occupant has already ended, or opens a new one. This uses as
/// many columns as there are intervals active at the busiest instant.
pub fn assign_columns<T: Timed>(members: Vec<T>) -> OverlapCluster<T> {
    let mut members = members;
    sort_by_start_then_end(&mut members);

    let mut column_end_times: Vec<u16> = Vec::new();
    let mut column_indices = Vec::with_capacity(members.len());

    for member in &members {
        let interval = member.interval();
        let column = match column_end_times
            .iter()
            .position(|&end| end <= interval.start())
        {
            Some(free) => {
                column_end_times[free] = interval.end();
                free
            }
            None => {
                column_end_times.push(interval.end());
                column_end_times.len() - 1
            }
        };
        column_indices.push(column);
    }

    OverlapCluster {
        members,
        column_indices,
        column_count: column_end_times.len(),
    }
}
