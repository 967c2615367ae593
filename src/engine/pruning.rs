//! Élagage des gabarits sans contribution possible.
//!
//! Un gabarit qui ne couvre aucun créneau à demande positive vaut 0 dans
//! toute solution optimale ; le retirer réduit d'autant le texte du modèle.

use crate::model::{ShiftTemplate, WeekMatrix};

/// Conserve les gabarits couvrant au moins un créneau à demande positive.
pub(super) fn active_templates(
    universe: &[ShiftTemplate],
    demand: &WeekMatrix,
) -> Vec<ShiftTemplate> {
    universe
        .iter()
        .copied()
        .filter(|template| contributes(template, demand))
        .collect()
}

fn contributes(template: &ShiftTemplate, demand: &WeekMatrix) -> bool {
    demand
        .cells()
        .any(|(day, hour, orders)| orders > 0 && template.covers(day, hour))
}
