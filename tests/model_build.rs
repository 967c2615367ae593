#![forbid(unsafe_code)]
mod common;

use common::demand_cells;
use hebdoplan::{
    parse_highs_solution, phase_model, required_from_demand, round_percentage, Phase, SolveConfig,
    SolverStatus, WeekMatrix,
};

fn config() -> SolveConfig {
    SolveConfig {
        productivity_rate: 12,
        pt_cap_pct: 50,
        weekender_cap_pct: 30,
        allow_weekend_day_off: false,
    }
}

fn general_variables(model: &str) -> Vec<String> {
    let section = model
        .split("General\n")
        .nth(1)
        .expect("General section")
        .split("End")
        .next()
        .expect("End section");
    section
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[test]
fn sections_come_in_canonical_order() {
    let demand = demand_cells(&[(0, 10, 12)]);
    let model = phase_model(&demand, &config(), Phase::Headcount).unwrap();

    let positions: Vec<usize> = ["Minimize", "Subject To", "Bounds", "General", "End"]
        .iter()
        .map(|section| model.find(section).expect(section))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn variable_names_follow_the_scheme() {
    let demand = demand_cells(&[(0, 10, 12)]);
    let model = phase_model(&demand, &config(), Phase::Headcount).unwrap();

    // type, départ, repos, pause — les composantes optionnelles suivent le type
    assert!(model.contains("xFT_5_1_3"));
    assert!(model.contains("xPT_10_1"));

    let weekend = demand_cells(&[(5, 10, 12)]);
    let model = phase_model(&weekend, &config(), Phase::Headcount).unwrap();
    assert!(model.contains("xWFT_5_3"));
    assert!(model.contains("xWPT_7"));
}

#[test]
fn pruning_keeps_only_contributing_templates() {
    let demand = demand_cells(&[(0, 10, 12)]);
    let model = phase_model(&demand, &config(), Phase::Headcount).unwrap();

    // 40 temps pleins (6 couples départ/pause × 4 repos hors lundi, moins
    // les pauses tombant à 10 h) et 16 temps partiels (départs 7–10)
    assert_eq!(general_variables(&model).len(), 56);
    assert!(!model.contains("xWFT_"));
    assert!(!model.contains("xWPT_"));
    assert!(!model.contains("xFT_20_"));
    assert!(!model.contains("xPT_5_"));
}

#[test]
fn overnight_rows_reach_the_next_day() {
    let demand = demand_cells(&[(0, 2, 12)]);
    let model = phase_model(&demand, &config(), Phase::Headcount).unwrap();

    assert!(model.contains("c_d0_h2:"));
    assert!(model.contains("xFT_20_0_3"));
    assert!(model.contains("xFT_23_0_4"));
    // départ 23 h, pause au 3e créneau : la pause tombe sur 02 h
    assert!(!model.contains("xFT_23_0_3"));
    assert!(!model.contains("xPT_"));
    assert_eq!(general_variables(&model).len(), 30);
}

#[test]
fn coverage_rows_target_the_required_matrix() {
    let demand = demand_cells(&[(0, 10, 24)]);
    let model = phase_model(&demand, &config(), Phase::Headcount).unwrap();

    assert!(model.contains("c_d0_h10:"));
    assert!(model.contains(">= 2"));
}

#[test]
fn cap_rows_use_scaled_integer_coefficients() {
    let demand = demand_cells(&[(0, 10, 12)]);
    let mut config = config();
    config.pt_cap_pct = 30;
    let model = phase_model(&demand, &config, Phase::Headcount).unwrap();

    assert!(model.contains("cap_pt:"));
    assert!(model.contains("70 xPT_"));
    assert!(model.contains("- 30 xFT_"));
    // aucun coefficient décimal dans tout le modèle
    assert!(!model.contains('.'));
    // pas de week-ender actif un lundi : la ligne cap_week disparaît
    assert!(!model.contains("cap_week"));
}

#[test]
fn weekend_demand_brings_the_weekender_cap() {
    let demand = demand_cells(&[(5, 10, 12)]);
    let model = phase_model(&demand, &config(), Phase::Headcount).unwrap();

    assert!(model.contains("cap_week:"));
    assert!(model.contains("70 xWFT_"));
    assert!(model.contains("- 30 xFT_"));
}

#[test]
fn zero_caps_exclude_types_entirely() {
    let demand = demand_cells(&[(5, 10, 12)]);
    let mut config = config();
    config.pt_cap_pct = 0;
    let model = phase_model(&demand, &config, Phase::Headcount).unwrap();
    assert!(!model.contains("xPT_"));
    assert!(!model.contains("xWPT_"));
    assert!(!model.contains("cap_pt"));

    let mut config = self::config();
    config.weekender_cap_pct = 0;
    let model = phase_model(&demand, &config, Phase::Headcount).unwrap();
    assert!(!model.contains("xWFT_"));
    assert!(!model.contains("xWPT_"));
    assert!(!model.contains("cap_week"));
}

#[test]
fn phase_two_caps_headcount_and_ignores_part_timers() {
    let demand = demand_cells(&[(0, 10, 12)]);
    let model = phase_model(
        &demand,
        &config(),
        Phase::PartTimeShare { headcount_cap: 3 },
    )
    .unwrap();

    assert!(model.contains("headcount:"));
    assert!(model.contains("<= 3"));
    let objective = &model[..model.find("Subject To").unwrap()];
    assert!(objective.contains("xFT_"));
    assert!(!objective.contains("xPT_"));
}

#[test]
fn widened_day_off_set_reaches_the_weekend() {
    let demand = demand_cells(&[(0, 10, 12)]);
    let mut config = config();
    config.allow_weekend_day_off = true;
    let model = phase_model(&demand, &config, Phase::Headcount).unwrap();
    assert!(model.contains("xFT_9_6_3"));

    let model = phase_model(&demand, &self::config(), Phase::Headcount).unwrap();
    assert!(!model.contains("xFT_9_6_3"));
}

#[test]
fn required_matrix_takes_ceilings() {
    let demand = demand_cells(&[(0, 10, 1), (1, 11, 12), (2, 12, 13)]);
    let required = required_from_demand(&demand, 12);

    assert_eq!(required.get(0, 10), 1);
    assert_eq!(required.get(1, 11), 1);
    assert_eq!(required.get(2, 12), 2);
    assert_eq!(required.get(3, 13), 0);
}

#[test]
fn percentages_round_half_up() {
    assert_eq!(round_percentage(29.4), 29);
    assert_eq!(round_percentage(29.5), 30);
    assert_eq!(round_percentage(100.0), 100);
    assert_eq!(round_percentage(140.0), 100);
    assert_eq!(round_percentage(-3.0), 0);
}

#[test]
fn matrix_rendering_is_stable() {
    let mut demand = WeekMatrix::zeroed();
    demand.set(0, 10, 24);
    demand.set(6, 23, 7);
    insta::assert_snapshot!(demand.to_string(), @r"
    0 0 0 0 0 0 0 0 0 0 24 0 0 0 0 0 0 0 0 0 0 0 0 0
    0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
    0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
    0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
    0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
    0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
    0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 7
    ");
}

#[test]
fn highs_solution_file_parses_into_primal_values() {
    let raw = "\
Model status
Optimal

# Primal solution values
Feasible
Objective 3
# Columns 3
xFT_9_0_3 1
xPT_10_1 2
xWPT_12 0
# Rows 2
c_d0_h10 3
c_d0_h11 1
";
    let outcome = parse_highs_solution(raw).unwrap();
    assert_eq!(outcome.status, SolverStatus::Optimal);
    assert_eq!(outcome.primal.len(), 3);
    assert_eq!(outcome.primal["xFT_9_0_3"], 1.0);
    assert_eq!(outcome.primal["xPT_10_1"], 2.0);
}

#[test]
fn highs_infeasible_verdict_carries_no_primal() {
    let raw = "\
Model status
Infeasible

# Primal solution values
None
";
    let outcome = parse_highs_solution(raw).unwrap();
    assert_eq!(outcome.status, SolverStatus::Infeasible);
    assert!(outcome.primal.is_empty());
}

#[test]
fn truncated_solution_file_is_rejected() {
    let raw = "\
Model status
Optimal
# Columns 4
xFT_9_0_3 1
";
    assert!(parse_highs_solution(raw).is_err());
}
