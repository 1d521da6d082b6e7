//! Property-based tests over random rosters, pool results and bracket outcomes.

use fencing_tournament::logic::pool_count;
use fencing_tournament::{
    advance_de_match, compute_pool_ranking, de_final_ranking, distribute_pools,
    generate_double_elimination_bracket, generate_matches, Competitor, CompetitorId, Pool,
    PoolBounds, RankingMode, Separation,
};
use proptest::prelude::*;
use std::collections::HashSet;

const CLUBS: [&str; 4] = ["Salle Nord", "Salle Sud", "Escrime Club", "Lames"];

// Roster of 4..60 competitors, some seeded, each with one of a few clubs (or none).
fn roster_strategy() -> impl Strategy<Value = Vec<Competitor>> {
    prop::collection::vec((0usize..=CLUBS.len(), any::<bool>()), 4..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (club, seeded))| {
                let mut c = Competitor::new(format!("Fencer {i}"));
                if let Some(name) = CLUBS.get(club) {
                    c = c.with_club(*name);
                }
                if seeded {
                    c = c.with_seed(i as u32 + 1);
                }
                c
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn distribution_partitions_the_roster(roster in roster_strategy()) {
        let bounds = PoolBounds::default();
        let dist = distribute_pools(&roster, bounds, Separation::default()).unwrap();

        prop_assert_eq!(dist.pools.len(), pool_count(roster.len(), bounds));
        let placed: Vec<CompetitorId> = dist
            .pools
            .iter()
            .flat_map(|p| p.competitors.iter().map(|c| c.id))
            .collect();
        let unique: HashSet<_> = placed.iter().collect();
        prop_assert_eq!(placed.len(), roster.len());
        prop_assert_eq!(unique.len(), roster.len());

        let sizes: Vec<usize> = dist.pools.iter().map(Pool::len).collect();
        let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
        prop_assert!(max - min <= 1);

        for conflict in &dist.residual_collisions {
            let pool = &dist.pools[conflict.pool - 1];
            let club = |id: CompetitorId| pool.competitors.iter().find(|c| c.id == id).and_then(|c| c.club.clone());
            prop_assert!(club(conflict.first).is_some());
            prop_assert_eq!(club(conflict.first), club(conflict.second));
        }
    }

    #[test]
    fn pool_ranking_is_consistent(
        size in 3usize..9,
        results in prop::collection::vec((0u32..=5, 0u32..=5, any::<bool>()), 36),
    ) {
        let competitors = (0..size).map(|i| Competitor::new(format!("F{i}"))).collect();
        let mut pool = Pool::new(1, competitors);
        pool.matches = generate_matches(&pool).unwrap();
        let mut fenced = 0;
        for (m, &(x, y, play)) in pool.matches.iter_mut().zip(&results) {
            if play && x != y {
                m.record_touches(x, y).unwrap();
                fenced += 1;
            }
        }

        let ranking = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();
        let ranks: Vec<u32> = ranking.iter().map(|e| e.rank).collect();
        prop_assert_eq!(ranks, (1..=size as u32).collect::<Vec<_>>());
        prop_assert_eq!(ranking.iter().map(|e| e.victories).sum::<u32>(), fenced);
        prop_assert_eq!(ranking.iter().map(|e| e.defeats).sum::<u32>(), fenced);
        prop_assert_eq!(ranking.iter().map(|e| e.index).sum::<i64>(), 0);
        prop_assert!(ranking.windows(2).all(|w| w[0].victories >= w[1].victories));
    }

    #[test]
    fn double_elimination_places_everyone(
        n in 2usize..24,
        coin in prop::collection::vec(any::<bool>(), 64),
    ) {
        let seeds: Vec<CompetitorId> = (0..n).map(|_| CompetitorId::new_v4()).collect();
        let mut bracket = generate_double_elimination_bracket(&seeds).unwrap();
        let mut flips = coin.iter().cycle();
        while let Some(&id) = bracket.ready_nodes().first() {
            let a_wins = *flips.next().unwrap();
            let (ta, tb) = if a_wins { (15, 10) } else { (10, 15) };
            bracket = advance_de_match(&bracket, id, ta, tb).unwrap();
        }

        prop_assert!(bracket.is_complete());
        prop_assert_ne!(bracket.champion, bracket.runner_up);
        let ranking = de_final_ranking(&bracket);
        let placed: HashSet<_> = ranking.iter().map(|p| p.competitor).collect();
        prop_assert_eq!(ranking.len(), n);
        prop_assert_eq!(placed.len(), n);
    }
}
