//! Greedy mirror ordering from host load statistics.

use rand::seq::SliceRandom;
use rand::Rng;

use super::MirrorCandidate;
use crate::host_stats::{HostSnapshot, HostStatistic};

/// Orders candidates so the least contended host is tried first.
///
/// The list is shuffled first so that hosts with equal (or no) statistics are
/// picked uniformly instead of in page order, then stable-sorted by:
/// 1. in-flight requests to the host,
/// 2. completed requests to the host,
/// 3. when the host was last contacted (never contacted first, then oldest).
pub fn rank_mirrors<R>(
    mut candidates: Vec<MirrorCandidate>,
    stats: &HostSnapshot,
    rng: &mut R,
) -> Vec<MirrorCandidate>
where
    R: Rng + ?Sized,
{
    candidates.shuffle(rng);
    candidates.sort_by_key(|c| {
        let s = stats.get(c.host()).copied().unwrap_or_default();
        sort_key(&s)
    });
    candidates
}

fn sort_key(s: &HostStatistic) -> (usize, u64, Option<std::time::Instant>) {
    (s.active, s.completed, s.last_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, Instant};

    fn candidate(url: &str) -> MirrorCandidate {
        MirrorCandidate::parse(url).unwrap()
    }

    fn stat(active: usize, completed: u64, last_start: Option<Instant>) -> HostStatistic {
        HostStatistic {
            active,
            completed,
            last_start,
        }
    }

    fn hosts(ranked: &[MirrorCandidate]) -> Vec<&str> {
        ranked.iter().map(|c| c.host()).collect()
    }

    #[test]
    fn idle_host_ranks_before_busy_host() {
        let now = Instant::now();
        let mut stats = HostSnapshot::new();
        stats.insert("busy.example".into(), stat(1, 3, Some(now)));
        stats.insert("idle.example".into(), stat(0, 3, Some(now)));

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ranked = rank_mirrors(
                vec![
                    candidate("https://busy.example/a.mp3"),
                    candidate("https://idle.example/a.mp3"),
                ],
                &stats,
                &mut rng,
            );
            assert_eq!(hosts(&ranked), ["idle.example", "busy.example"]);
        }
    }

    #[test]
    fn ties_broken_by_completed_then_last_start() {
        let now = Instant::now();
        let earlier = now - Duration::from_secs(10);
        let mut stats = HostSnapshot::new();
        stats.insert("veteran.example".into(), stat(0, 5, Some(earlier)));
        stats.insert("recent.example".into(), stat(0, 1, Some(now)));
        stats.insert("stale.example".into(), stat(0, 1, Some(earlier)));

        let mut rng = StdRng::seed_from_u64(7);
        let ranked = rank_mirrors(
            vec![
                candidate("https://veteran.example/x"),
                candidate("https://recent.example/x"),
                candidate("https://stale.example/x"),
                candidate("https://fresh.example/x"),
            ],
            &stats,
            &mut rng,
        );
        assert_eq!(
            hosts(&ranked),
            ["fresh.example", "stale.example", "recent.example", "veteran.example"]
        );
    }

    #[test]
    fn same_seed_gives_same_cold_start_order() {
        let list: Vec<_> = (0..6)
            .map(|i| candidate(&format!("https://m{i}.example/song.mp3")))
            .collect();
        let stats = HostSnapshot::new();

        let a = rank_mirrors(list.clone(), &stats, &mut StdRng::seed_from_u64(99));
        let b = rank_mirrors(list.clone(), &stats, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);

        let mut sorted_a = hosts(&a);
        sorted_a.sort();
        let mut sorted_in = hosts(&list);
        sorted_in.sort();
        assert_eq!(sorted_a, sorted_in, "ranking must be a permutation");
    }

    #[test]
    fn cold_start_spreads_first_choice() {
        let list: Vec<_> = (0..3)
            .map(|i| candidate(&format!("https://m{i}.example/song.mp3")))
            .collect();
        let stats = HostSnapshot::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut firsts = std::collections::HashSet::new();
        for _ in 0..64 {
            let ranked = rank_mirrors(list.clone(), &stats, &mut rng);
            firsts.insert(ranked[0].host().to_string());
        }
        assert_eq!(firsts.len(), 3, "every mirror should lead at least once");
    }
}
