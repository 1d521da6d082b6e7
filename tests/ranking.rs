//! Integration tests for pool rankings in standard and points modes.

use fencing_tournament::logic::{compute_pool_ranking_with, RankingKey, VictoriesKey};
use fencing_tournament::{
    compute_pool_ranking, generate_matches, Competitor, CompetitorId, MatchStatus, Pool,
    PoolRankingEntry, QuestPoints, RankingMode, Score, Side, SpecialOutcome, TournamentError,
};
use std::cmp::Ordering;

fn pool_of(names: &[&str]) -> Pool {
    let competitors = names.iter().map(|n| Competitor::new(*n)).collect();
    let mut pool = Pool::new(1, competitors);
    pool.matches = generate_matches(&pool).unwrap();
    pool
}

fn id(pool: &Pool, pos: usize) -> CompetitorId {
    pool.competitors[pos].id
}

/// Enter touches for the bout between positions `x` and `y`, whichever side each is on.
fn fence(pool: &mut Pool, x: usize, y: usize, touches_x: u32, touches_y: u32) {
    let (x, y) = (id(pool, x), id(pool, y));
    let m = pool
        .matches
        .iter_mut()
        .find(|m| m.involves(x) && m.involves(y))
        .unwrap();
    if m.a == x {
        m.record_touches(touches_x, touches_y).unwrap();
    } else {
        m.record_touches(touches_y, touches_x).unwrap();
    }
}

fn order(ranking: &[PoolRankingEntry]) -> Vec<&str> {
    ranking.iter().map(|e| e.name.as_str()).collect()
}

/// Higher pool position beats every lower one, 5-2.
fn fence_by_position(pool: &mut Pool) {
    let n = pool.len();
    for x in 0..n {
        for y in x + 1..n {
            fence(pool, x, y, 5, 2);
        }
    }
}

#[test]
fn equal_victories_fall_back_to_index_then_touches_scored() {
    let line = |name: &str, scored: u32, received: u32| {
        let mut e = PoolRankingEntry::new(CompetitorId::new_v4(), name, 1);
        e.victories = 3;
        e.defeats = 2;
        e.touches_scored = scored;
        e.touches_received = received;
        e.update_derived();
        e
    };
    let mut lines = vec![line("A", 20, 16), line("B", 22, 20), line("C", 18, 14)];
    lines.sort_by(|a, b| VictoriesKey.compare(a, b));
    assert_eq!(order(&lines), vec!["A", "C", "B"]);
}

#[test]
fn complete_pool_ranks_by_victories() {
    let mut pool = pool_of(&["P0", "P1", "P2", "P3"]);
    fence_by_position(&mut pool);
    let ranking = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();

    assert_eq!(order(&ranking), vec!["P0", "P1", "P2", "P3"]);
    assert_eq!(ranking.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    let top = &ranking[0];
    assert_eq!((top.victories, top.defeats), (3, 0));
    assert_eq!((top.touches_scored, top.touches_received, top.index), (15, 6, 9));
    assert_eq!(top.ratio, 1.0);
    assert_eq!(top.points, None);
    assert_eq!(ranking[3].index, -9);
}

#[test]
fn victories_and_defeats_balance_over_finished_bouts() {
    let mut pool = pool_of(&["A", "B", "C", "D", "E"]);
    fence(&mut pool, 0, 1, 5, 3);
    fence(&mut pool, 2, 3, 1, 5);
    fence(&mut pool, 4, 0, 5, 4);
    let ranking = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();

    let victories: u32 = ranking.iter().map(|e| e.victories).sum();
    let defeats: u32 = ranking.iter().map(|e| e.defeats).sum();
    assert_eq!(victories, 3);
    assert_eq!(defeats, 3);
    let index: i64 = ranking.iter().map(|e| e.index).sum();
    assert_eq!(index, 0);
}

#[test]
fn unfenced_bouts_are_ignored() {
    let mut pool = pool_of(&["A", "B", "C", "D"]);
    fence(&mut pool, 3, 2, 5, 0);
    let ranking = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();

    assert_eq!(ranking[0].name, "D");
    assert_eq!(ranking[0].bouts(), 1);
    // A and B have not fenced; they keep pool order ahead of C's defeat.
    assert_eq!(order(&ranking), vec!["D", "A", "B", "C"]);
    assert_eq!(ranking[1].ratio, 0.0);
}

#[test]
fn ranking_is_idempotent() {
    let mut pool = pool_of(&["A", "B", "C", "D", "E", "F"]);
    fence(&mut pool, 0, 5, 2, 5);
    fence(&mut pool, 1, 4, 5, 4);
    let first = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();
    let second = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();
    assert_eq!(first, second);
}

#[test]
fn double_victory_is_rejected() {
    let mut pool = pool_of(&["A", "B", "C", "D"]);
    let m = &mut pool.matches[0];
    m.score_a = Some(Score::victory(5));
    m.score_b = Some(Score::victory(3));
    m.status = MatchStatus::Finished;
    let bad = m.id;

    assert_eq!(
        compute_pool_ranking(&pool, &RankingMode::Standard),
        Err(TournamentError::InvalidScoreState(bad))
    );
}

#[test]
fn draws_only_rank_in_points_mode() {
    let mut pool = pool_of(&["A", "B", "C", "D"]);
    pool.matches[0].record_draw(3, 3);
    let drawn = pool.matches[0].id;

    assert_eq!(
        compute_pool_ranking(&pool, &RankingMode::Standard),
        Err(TournamentError::InvalidScoreState(drawn))
    );

    let ranking =
        compute_pool_ranking(&pool, &RankingMode::Quest(QuestPoints::default())).unwrap();
    let drawers: Vec<_> = ranking.iter().filter(|e| e.draws == 1).collect();
    assert_eq!(drawers.len(), 2);
    assert!(drawers.iter().all(|e| e.points == Some(2) && e.ratio == 0.0));
}

#[test]
fn forfeit_credits_the_opponent() {
    let mut pool = pool_of(&["A", "B", "C", "D"]);
    let m = &mut pool.matches[0];
    let loser = m.a;
    m.record_special(Side::A, SpecialOutcome::Forfeit);
    let winner = m.b;

    let ranking = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();
    let line = |id| ranking.iter().find(|e| e.competitor == id).unwrap();
    assert_eq!(line(winner).victories, 1);
    assert_eq!(line(winner).rank, 1);
    assert_eq!(line(loser).defeats, 1);
}

#[test]
fn quest_points_follow_margin_buckets() {
    let mut pool = pool_of(&["X", "Y", "Z"]);
    fence(&mut pool, 0, 1, 5, 0);
    fence(&mut pool, 2, 0, 5, 4);
    fence(&mut pool, 1, 2, 5, 4);

    let ranking =
        compute_pool_ranking(&pool, &RankingMode::Quest(QuestPoints::default())).unwrap();
    assert_eq!(order(&ranking), vec!["X", "Z", "Y"]);
    let points: Vec<_> = ranking.iter().map(|e| e.points).collect();
    assert_eq!(points, vec![Some(6), Some(4), Some(3)]);

    // One victory each: the standard mode separates them by index only (+4, 0, -4).
    let standard = compute_pool_ranking(&pool, &RankingMode::Standard).unwrap();
    assert_eq!(order(&standard), vec!["X", "Z", "Y"]);
    assert!(standard.iter().all(|e| e.victories == 1 && e.points.is_none()));
}

#[test]
fn quest_points_are_configurable() {
    let mut pool = pool_of(&["X", "Y", "Z"]);
    fence(&mut pool, 0, 1, 5, 0);
    let flat = QuestPoints {
        victory: vec![fencing_tournament::models::MarginBucket::new(1, 2)],
        defeat: Vec::new(),
        draw: 1,
    };
    let ranking = compute_pool_ranking(&pool, &RankingMode::Quest(flat)).unwrap();
    assert_eq!(ranking[0].points, Some(2));
    assert_eq!(ranking[1].points, Some(0));
}

struct FewestReceived;

impl RankingKey for FewestReceived {
    fn compare(&self, a: &PoolRankingEntry, b: &PoolRankingEntry) -> Ordering {
        a.touches_received.cmp(&b.touches_received)
    }
}

#[test]
fn custom_ranking_key_orders_the_pool() {
    let mut pool = pool_of(&["A", "B", "C"]);
    fence(&mut pool, 0, 1, 5, 4);
    fence(&mut pool, 0, 2, 5, 3);
    fence(&mut pool, 1, 2, 5, 0);

    let ranking = compute_pool_ranking_with(&pool, &FewestReceived).unwrap();
    // Received: A 7, B 5, C 10.
    assert_eq!(order(&ranking), vec!["B", "A", "C"]);
}

#[test]
fn touch_totals_that_overflow_are_rejected() {
    let mut pool = pool_of(&["A", "B", "C", "D"]);
    fence(&mut pool, 0, 2, 5, 3);
    fence(&mut pool, 0, 1, u32::MAX, 0);
    let (a, b) = (id(&pool, 0), id(&pool, 1));
    let huge = pool
        .matches
        .iter()
        .find(|m| m.involves(a) && m.involves(b))
        .unwrap()
        .id;

    // A-C is fenced earlier in the round robin, so A's total overflows on the A-B bout.
    assert_eq!(
        compute_pool_ranking(&pool, &RankingMode::Standard),
        Err(TournamentError::InvalidScoreState(huge))
    );
    assert!(fencing_tournament::compute_overall_ranking(&[pool]).is_err());
}
