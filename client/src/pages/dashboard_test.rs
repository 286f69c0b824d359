use super::*;

#[test]
fn stat_cards_follow_backend_counters() {
    let stats: ApiStats = serde_json::from_str(
        r#"{"total_teams": 10, "total_drivers": 20, "total_seasons": 3,
            "total_races": 66, "total_results": 1320, "top_points": 575}"#,
    )
    .expect("stats");

    let cards = stat_cards(&stats);

    let labels: Vec<_> = cards.iter().map(|card| card.label).collect();
    assert_eq!(labels, ["Teams", "Drivers", "Seasons", "Races", "Results", "Top points"]);
    assert_eq!(cards[1].value, "20");
    assert_eq!(cards[5].value, "575");
}

#[test]
fn half_points_keep_one_decimal() {
    let stats = ApiStats { top_points: 412.5, ..ApiStats::default() };
    assert_eq!(stat_cards(&stats)[5].value, "412.5");
}

#[test]
fn top_points_defaults_when_missing() {
    let stats: ApiStats = serde_json::from_str(
        r#"{"total_teams": 0, "total_drivers": 0, "total_seasons": 0, "total_races": 0, "total_results": 0}"#,
    )
    .expect("stats");
    assert_eq!(stat_cards(&stats)[5].value, "0");
}
