use crate::schedule::time::Timed;

/// Sort key shared by the grouper and the column assigner.
pub(crate) fn sort_by_start_then_end<T: Timed>(items: &mut [T]) {
    items.sort_by_key(|item| {
        let interval = item.interval();
        (interval.start(), interval.end())
    });
}

/// Split one day's items into maximal clusters of transitively overlapping
/// intervals.
///
/// Each cluster comes out sorted by `(start, end)`, and clusters are ordered
/// by their first start time. Items that merely touch (`a.end == b.start`)
/// end up in different clusters unless something else links them.
pub fn group_overlaps<T: Timed>(items: impl IntoIterator<Item = T>) -> Vec<Vec<T>> {
    let mut items: Vec<T> = items.into_iter().collect();
    sort_by_start_then_end(&mut items);

    let mut clusters: Vec<Vec<T>> = Vec::new();
    let mut cluster_end = 0;
    for item in items {
        let interval = item.interval();
        if interval.start() < cluster_end {
            if let Some(current) = clusters.last_mut() {
                cluster_end = cluster_end.max(interval.end());
                current.push(item);
                continue;
            }
        }
        cluster_end = interval.end();
        clusters.push(vec![item]);
    }

    clusters
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::test_support::{intervals, random_day};
    use crate::schedule::time::TimeInterval;

    fn shapes(clusters: &[Vec<TimeInterval>]) -> Vec<Vec<String>> {
        clusters
            .iter()
            .map(|c| c.iter().map(|i| i.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_day_has_no_clusters() {
        assert!(group_overlaps(Vec::<TimeInterval>::new()).is_empty());
    }

    #[test]
    fn overlapping_pair_is_one_cluster() {
        let clusters = group_overlaps(intervals(&[("09:30", "10:30"), ("09:00", "10:00")]));
        assert_eq!(shapes(&clusters), [["09:00-10:00", "09:30-10:30"]]);
    }

    #[test]
    fn touching_slots_are_separate() {
        let clusters = group_overlaps(intervals(&[("08:00", "09:00"), ("09:00", "10:00")]));
        assert_eq!(shapes(&clusters), [["08:00-09:00"], ["09:00-10:00"]]);
    }

    #[test]
    fn overlap_is_transitive() {
        // 08:00-09:00 and 09:30-10:00 never meet, the long middle slot links them
        let clusters = group_overlaps(intervals(&[
            ("08:00", "09:00"),
            ("08:30", "09:45"),
            ("09:30", "10:00"),
            ("10:00", "11:00"),
        ]));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 3);
        assert_eq!(clusters[1].len(), 1);
    }

    #[test]
    fn long_slot_swallows_later_short_ones() {
        let clusters = group_overlaps(intervals(&[
            ("08:00", "12:00"),
            ("08:30", "09:00"),
            ("11:00", "11:30"),
            ("12:00", "13:00"),
        ]));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn clusters_partition_input_and_never_overlap_each_other() {
        for seed in 1..200 {
            let day = random_day(seed, 12);
            let clusters = group_overlaps(day.clone());

            let mut flattened: Vec<TimeInterval> = clusters.iter().flatten().copied().collect();
            let mut expected = day.clone();
            flattened.sort();
            expected.sort();
            assert_eq!(flattened, expected, "seed {seed}");

            for (i, a) in clusters.iter().enumerate() {
                for b in clusters.iter().skip(i + 1) {
                    for x in a {
                        assert!(b.iter().all(|y| !x.overlaps(y)), "seed {seed}");
                    }
                }
            }
        }
    }
}
