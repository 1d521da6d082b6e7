//! Integration tests for pool distribution: pool count, serpentine seeding, separation swaps.

use fencing_tournament::logic::distribute_pools_with_draw;
use fencing_tournament::{
    distribute_pools, generate_matches, Competitor, PoolBounds, Separation, TournamentError,
};
use std::collections::HashSet;

fn seeded_roster(n: u32) -> Vec<Competitor> {
    (1..=n)
        .map(|s| Competitor::new(format!("F{s}")).with_seed(s))
        .collect()
}

fn seeds_of(pool: &fencing_tournament::Pool) -> Vec<u32> {
    pool.competitors.iter().filter_map(|c| c.seed).collect()
}

#[test]
fn rejects_rosters_below_four() {
    let roster = seeded_roster(3);
    assert_eq!(
        distribute_pools(&roster, PoolBounds::default(), Separation::none()),
        Err(TournamentError::InsufficientCompetitors {
            required: 4,
            found: 3
        })
    );
}

#[test]
fn rejects_empty_bounds() {
    let roster = seeded_roster(10);
    assert!(matches!(
        distribute_pools(&roster, PoolBounds::new(6, 5), Separation::none()),
        Err(TournamentError::InvalidPoolBounds { min: 6, max: 5 })
    ));
}

#[test]
fn six_competitors_make_one_pool_of_fifteen_bouts() {
    let roster = seeded_roster(6);
    let dist = distribute_pools(&roster, PoolBounds::default(), Separation::none()).unwrap();
    assert_eq!(dist.pools.len(), 1);
    assert_eq!(dist.pools[0].len(), 6);
    assert_eq!(generate_matches(&dist.pools[0]).unwrap().len(), 15);
}

#[test]
fn every_competitor_lands_in_exactly_one_pool() {
    let roster = seeded_roster(23);
    let dist = distribute_pools(&roster, PoolBounds::default(), Separation::none()).unwrap();
    let total: usize = dist.pools.iter().map(|p| p.len()).sum();
    assert_eq!(total, 23);
    let ids: HashSet<_> = dist
        .pools
        .iter()
        .flat_map(|p| p.competitors.iter().map(|c| c.id))
        .collect();
    assert_eq!(ids.len(), 23);
    for pool in &dist.pools {
        assert!(PoolBounds::default().contains(pool.len()));
    }
}

#[test]
fn serpentine_balances_seeds() {
    let roster = seeded_roster(10);
    let dist = distribute_pools(&roster, PoolBounds::default(), Separation::none()).unwrap();
    assert_eq!(dist.pools.len(), 2);
    assert_eq!(seeds_of(&dist.pools[0]), vec![1, 4, 5, 8, 9]);
    assert_eq!(seeds_of(&dist.pools[1]), vec![2, 3, 6, 7, 10]);
    assert_eq!(dist.pools[0].number, 1);
    assert_eq!(dist.pools[1].number, 2);
}

#[test]
fn unseeded_competitors_follow_seeded_ones() {
    let mut roster = vec![Competitor::new("Unseeded A"), Competitor::new("Unseeded B")];
    roster.extend(seeded_roster(4));
    let dist = distribute_pools(&roster, PoolBounds::default(), Separation::none()).unwrap();
    let names: Vec<_> = dist.pools[0].competitors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["F1", "F2", "F3", "F4", "Unseeded A", "Unseeded B"]);
}

#[test]
fn same_club_pair_is_split_with_nearest_seed() {
    let mut roster = seeded_roster(10);
    roster[0] = roster[0].clone().with_club("Alpha");
    roster[3] = roster[3].clone().with_club("alpha");
    let dist = distribute_pools(&roster, PoolBounds::default(), Separation::default()).unwrap();

    assert!(dist.residual_collisions.is_empty());
    assert_eq!(seeds_of(&dist.pools[0]), vec![1, 3, 5, 8, 9]);
    assert_eq!(seeds_of(&dist.pools[1]), vec![2, 4, 6, 7, 10]);
}

#[test]
fn unresolvable_conflicts_are_reported_not_fatal() {
    let roster: Vec<Competitor> = seeded_roster(5)
        .into_iter()
        .map(|c| c.with_nation("FRA"))
        .collect();
    let separation = Separation {
        by_club: false,
        by_league: false,
        by_nation: true,
    };
    let dist = distribute_pools(&roster, PoolBounds::default(), separation).unwrap();
    assert_eq!(dist.pools.len(), 1);
    assert_eq!(dist.residual_collisions.len(), 10);
    assert!(dist.residual_collisions.iter().all(|c| c.pool == 1));
}

#[test]
fn lot_drawing_is_reproducible() {
    let mut roster = seeded_roster(2);
    roster.extend((0..12).map(|i| Competitor::new(format!("U{i}"))));
    let bounds = PoolBounds::default();
    let first = distribute_pools_with_draw(&roster, bounds, Separation::none(), Some(42)).unwrap();
    let second = distribute_pools_with_draw(&roster, bounds, Separation::none(), Some(42)).unwrap();
    assert_eq!(first, second);
    // Seeded competitors still head the first two pools.
    assert_eq!(first.pools[0].competitors[0].seed, Some(1));
    assert_eq!(first.pools[1].competitors[0].seed, Some(2));
}

#[test]
fn swap_skips_a_partner_that_would_clash_in_its_new_pool() {
    let mut roster = seeded_roster(10);
    roster[0] = roster[0].clone().with_club("Club X");
    roster[3] = roster[3].clone().with_club("Club X");
    roster[2] = roster[2].clone().with_club("Club Y");
    roster[4] = roster[4].clone().with_club("Club Y");
    let dist = distribute_pools(&roster, PoolBounds::default(), Separation::default()).unwrap();

    // Seed 3 is the nearest partner for seed 4 but would meet seed 5 (Club Y); seed 2 is next.
    assert!(dist.residual_collisions.is_empty());
    assert_eq!(seeds_of(&dist.pools[0]), vec![1, 2, 5, 8, 9]);
    assert_eq!(seeds_of(&dist.pools[1]), vec![3, 4, 6, 7, 10]);
}

#[test]
fn league_separation_splits_league_mates_and_ignores_clubs() {
    let mut roster = seeded_roster(10);
    roster[0] = roster[0].clone().with_league("North");
    roster[3] = roster[3].clone().with_league("North");
    // Same club, but clubs are not separated here.
    roster[1] = roster[1].clone().with_club("Salle");
    roster[2] = roster[2].clone().with_club("Salle");
    let separation = Separation {
        by_club: false,
        by_league: true,
        by_nation: false,
    };
    let dist = distribute_pools(&roster, PoolBounds::default(), separation).unwrap();

    assert!(dist.residual_collisions.is_empty());
    assert_eq!(seeds_of(&dist.pools[0]), vec![1, 3, 5, 8, 9]);
    assert_eq!(seeds_of(&dist.pools[1]), vec![2, 4, 6, 7, 10]);
}
