//! Integration tests for the overall ranking across pools and the promotion cut.

use fencing_tournament::logic::promotion_cut;
use fencing_tournament::{compute_overall_ranking, generate_matches, Competitor, Pool};

/// A fully fenced pool where each position beats every later one 5-0.
fn fenced_pool(number: usize, names: &[&str]) -> Pool {
    let competitors = names.iter().map(|n| Competitor::new(*n)).collect();
    let mut pool = Pool::new(number, competitors);
    pool.matches = generate_matches(&pool).unwrap();
    for i in 0..pool.matches.len() {
        let m = &pool.matches[i];
        let a_first = pool.position_of(m.a) < pool.position_of(m.b);
        let (ta, tb) = if a_first { (5, 0) } else { (0, 5) };
        pool.matches[i].record_touches(ta, tb).unwrap();
    }
    pool
}

fn pools() -> Vec<Pool> {
    vec![
        fenced_pool(1, &["P0", "P1", "P2", "P3"]),
        fenced_pool(2, &["Q0", "Q1", "Q2", "Q3", "Q4"]),
    ]
}

fn names(ranking: &[fencing_tournament::PoolRankingEntry]) -> Vec<&str> {
    ranking.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn ratio_compares_pools_of_different_sizes() {
    let ranking = compute_overall_ranking(&pools()).unwrap();
    // P0 (3/3) ranks above Q1 (3/4) despite equal victories; Q0 and P0 both at 1.0 split on index.
    assert_eq!(
        names(&ranking),
        vec!["Q0", "P0", "Q1", "P1", "Q2", "P2", "Q3", "P3", "Q4"]
    );
    assert_eq!(ranking.iter().map(|e| e.rank).collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
    assert_eq!(ranking[1].pool, 1);
    assert_eq!(ranking[2].ratio, 0.75);
}

#[test]
fn identical_results_fall_back_to_seed_then_pool() {
    let mut pools = vec![fenced_pool(1, &["A0", "A1", "A2", "A3"]), fenced_pool(2, &["B0", "B1", "B2", "B3"])];
    let ranking = compute_overall_ranking(&pools).unwrap();
    assert_eq!(names(&ranking)[..2], ["A0", "B0"]);

    pools[1].competitors[0].seed = Some(1);
    let ranking = compute_overall_ranking(&pools).unwrap();
    assert_eq!(names(&ranking)[..2], ["B0", "A0"]);
}

#[test]
fn withdrawn_competitors_rank_last() {
    let mut pools = pools();
    pools[1].competitors[0].withdraw();
    let ranking = compute_overall_ranking(&pools).unwrap();
    assert_eq!(ranking.last().unwrap().name, "Q0");
    assert_eq!(ranking[0].name, "P0");
}

#[test]
fn promotion_cut_takes_the_top_active_competitors() {
    let mut pools = pools();
    pools[1].competitors[0].withdraw();
    let ranking = compute_overall_ranking(&pools).unwrap();

    let cut = promotion_cut(&ranking, &pools, Some(3));
    let expected: Vec<_> = ["P0", "Q1", "P1"]
        .iter()
        .map(|n| ranking.iter().find(|e| e.name == *n).unwrap().competitor)
        .collect();
    assert_eq!(cut, expected);

    let everyone = promotion_cut(&ranking, &pools, None);
    assert_eq!(everyone.len(), 8);
    let more_than_available = promotion_cut(&ranking, &pools, Some(20));
    assert_eq!(more_than_available, everyone);
}

#[test]
fn unfenced_pools_rank_in_seed_and_pool_order() {
    let mut pools = pools();
    for pool in &mut pools {
        pool.matches = generate_matches(pool).unwrap();
    }
    let ranking = compute_overall_ranking(&pools).unwrap();
    assert_eq!(
        names(&ranking),
        vec!["P0", "P1", "P2", "P3", "Q0", "Q1", "Q2", "Q3", "Q4"]
    );
    assert!(ranking.iter().all(|e| e.bouts() == 0));
}
