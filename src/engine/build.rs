//! Émission du modèle MIP au format LP.
//!
//! Sections dans l'ordre attendu par les back-ends : Minimize, Subject To,
//! Bounds, General, End. Les coefficients de l'objectif valent tous 1 et les
//! lignes de plafond n'emploient que des entiers (mise à l'échelle ×100) :
//! certains back-ends ne tolèrent ni pondérations hétérogènes ni décimales.

use super::types::Phase;
use crate::model::{ShiftTemplate, SolveConfig, WeekMatrix};

// Les lecteurs LP historiques plafonnent la longueur de ligne à 255.
const WRAP_COLUMNS: usize = 200;

pub(super) fn build_model(
    templates: &[ShiftTemplate],
    demand: &WeekMatrix,
    required: &WeekMatrix,
    config: &SolveConfig,
    phase: Phase,
) -> String {
    let mut out = String::new();

    out.push_str("Minimize\n");
    let objective: Vec<(i64, String)> = templates
        .iter()
        .filter(|template| match phase {
            Phase::Headcount => true,
            Phase::PartTimeShare { .. } => !template.worker_type().is_part_time(),
        })
        .map(|template| (1, template.variable_name()))
        .collect();
    debug_assert!(!objective.is_empty());
    push_row(&mut out, "obj", &objective, None);

    out.push_str("Subject To\n");
    for (day, hour, orders) in demand.cells() {
        if orders == 0 {
            continue;
        }
        let covering: Vec<(i64, String)> = templates
            .iter()
            .filter(|template| template.covers(day, hour))
            .map(|template| (1, template.variable_name()))
            .collect();
        debug_assert!(!covering.is_empty());
        let label = format!("c_d{day}_h{hour}");
        push_row(
            &mut out,
            &label,
            &covering,
            Some((">=", i64::from(required.get(day, hour)))),
        );
    }

    push_mix_cap(&mut out, "cap_pt", templates, config.pt_cap_pct, |template| {
        template.worker_type().is_part_time()
    });
    push_mix_cap(&mut out, "cap_week", templates, config.weekender_cap_pct, |template| {
        template.worker_type().is_weekender()
    });

    if let Phase::PartTimeShare { headcount_cap } = phase {
        let everyone: Vec<(i64, String)> = templates
            .iter()
            .map(|template| (1, template.variable_name()))
            .collect();
        push_row(
            &mut out,
            "headcount",
            &everyone,
            Some(("<=", i64::from(headcount_cap))),
        );
    }

    out.push_str("Bounds\n");
    for template in templates {
        out.push(' ');
        out.push_str(&template.variable_name());
        out.push_str(" >= 0\n");
    }

    out.push_str("General\n");
    for template in templates {
        out.push(' ');
        out.push_str(&template.variable_name());
        out.push('\n');
    }

    out.push_str("End\n");
    out
}

/// Ligne de plafond de mixité, liante seulement dans (0, 100) :
/// `(100 − cap)·Σ(capped) − cap·Σ(autres) ≤ 0`. À 0, les types concernés
/// ont déjà été exclus du modèle entier ; à 100 la contrainte est vide.
fn push_mix_cap<F>(out: &mut String, label: &str, templates: &[ShiftTemplate], cap_pct: u8, capped: F)
where
    F: Fn(&ShiftTemplate) -> bool,
{
    if cap_pct == 0 || cap_pct >= 100 {
        return;
    }
    if !templates.iter().any(&capped) {
        return;
    }
    let cap = i64::from(cap_pct);
    let terms: Vec<(i64, String)> = templates
        .iter()
        .map(|template| {
            let coefficient = if capped(template) { 100 - cap } else { -cap };
            (coefficient, template.variable_name())
        })
        .collect();
    push_row(out, label, &terms, Some(("<=", 0)));
}

fn push_row(
    out: &mut String,
    label: &str,
    terms: &[(i64, String)],
    relation: Option<(&str, i64)>,
) {
    out.push(' ');
    out.push_str(label);
    out.push(':');
    let mut line_len = label.len() + 2;
    let mut integers = itoa::Buffer::new();

    for (index, (coefficient, name)) in terms.iter().enumerate() {
        let mut token = String::new();
        if *coefficient < 0 {
            token.push_str("- ");
        } else if index > 0 {
            token.push_str("+ ");
        }
        let magnitude = coefficient.unsigned_abs();
        if magnitude != 1 {
            token.push_str(integers.format(magnitude));
            token.push(' ');
        }
        token.push_str(name);
        append_token(out, &mut line_len, &token);
    }

    if let Some((operator, rhs)) = relation {
        append_token(out, &mut line_len, operator);
        append_token(out, &mut line_len, integers.format(rhs));
    }
    out.push('\n');
}

fn append_token(out: &mut String, line_len: &mut usize, token: &str) {
    if *line_len + token.len() + 1 > WRAP_COLUMNS {
        out.push_str("\n ");
        *line_len = 1;
    } else {
        out.push(' ');
        *line_len += 1;
    }
    out.push_str(token);
    *line_len += token.len();
}
