//! Catalogue fini des gabarits admissibles.
//!
//! Les heures de début respectent deux interdits structurels : un shift ne
//! démarre jamais entre 00 h et 04 h 59, et ne se termine jamais dans cette
//! même fenêtre (24 h 00 pile est permis).

use crate::model::{ShiftTemplate, SolveConfig};

/// Départs temps plein semaine : 16 h–19 h créeraient une fin entre 01 h et
/// 04 h, donc seuls restent les départs de journée et les départs nocturnes.
pub const FT_STARTS: [u8; 15] = [5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 20, 21, 22, 23];

/// Départs temps partiel semaine : 4 h d'amplitude, fin au plus tard 24 h 00.
pub const PT_STARTS: [u8; 16] = [5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20];

/// Départs temps plein week-end : pas de nocturne, pour ne pas déborder sur
/// le lundi.
pub const WFT_STARTS: [u8; 11] = [5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Départs temps partiel week-end.
pub const WPT_STARTS: [u8; 16] = PT_STARTS;

/// Positions de pause admissibles dans l'amplitude de 9 h.
pub const FT_BREAK_OFFSETS: [u8; 2] = [3, 4];

/// Jours de repos admissibles pour les types semaine.
pub fn day_off_set(allow_weekend_day_off: bool) -> &'static [u8] {
    if allow_weekend_day_off {
        &[0, 1, 2, 3, 4, 5, 6]
    } else {
        &[0, 1, 2, 3, 4]
    }
}

/// Univers complet des gabarits, avant tout élagage. L'ordre d'énumération
/// est fixe (FT, PT, WFT, WPT puis départ, repos, pause croissants) : il
/// détermine l'ordre des variables du modèle et celui des fiches produites.
pub fn enumerate(config: &SolveConfig) -> Vec<ShiftTemplate> {
    let day_offs = day_off_set(config.allow_weekend_day_off);
    let mut universe = Vec::new();

    for &start in &FT_STARTS {
        for &day_off in day_offs {
            for &break_offset in &FT_BREAK_OFFSETS {
                universe.push(ShiftTemplate::FullTime { start, day_off, break_offset });
            }
        }
    }
    for &start in &PT_STARTS {
        for &day_off in day_offs {
            universe.push(ShiftTemplate::PartTime { start, day_off });
        }
    }
    for &start in &WFT_STARTS {
        for &break_offset in &FT_BREAK_OFFSETS {
            universe.push(ShiftTemplate::WeekendFullTime { start, break_offset });
        }
    }
    for &start in &WPT_STARTS {
        universe.push(ShiftTemplate::WeekendPartTime { start });
    }

    universe
}
