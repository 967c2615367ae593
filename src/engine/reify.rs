//! Matérialisation de la solution entière : des comptes par gabarit aux
//! fiches préparateur et à la matrice de couverture.

use crate::model::{ShiftTemplate, TypeCounts, WeekMatrix, Worker, DAYS_PER_WEEK};

/// Déplie chaque gabarit retenu `count` fois, avec des identifiants 1-based
/// séquentiels dans l'ordre d'énumération du catalogue.
pub(super) fn expand_workers(assignment: &[(ShiftTemplate, u32)]) -> Vec<Worker> {
    let mut workers = Vec::new();
    let mut next_id = 1u32;
    for (template, count) in assignment {
        for _ in 0..*count {
            workers.push(materialize(template, next_id));
            next_id += 1;
        }
    }
    workers
}

fn materialize(template: &ShiftTemplate, id: u32) -> Worker {
    let productive_hours = template
        .productive_raw_hours()
        .into_iter()
        .map(|raw| raw % 24)
        .collect();
    Worker {
        id,
        kind: template.worker_type(),
        shift_start: template.start(),
        shift_end: template.shift_end(),
        day_off: template.day_off(),
        productive_hours,
    }
}

/// Reconstruit la matrice de couverture depuis les fiches préparateur.
///
/// Une heure productive < `shift_start` ne peut provenir que d'un départ
/// nocturne : elle est imputée au jour calendaire suivant le jour de poste.
pub fn coverage_from_workers(workers: &[Worker]) -> WeekMatrix {
    let mut coverage = WeekMatrix::zeroed();
    for worker in workers {
        for day in worker.active_days() {
            for &hour in &worker.productive_hours {
                let target_day = if hour < worker.shift_start {
                    (day + 1) % DAYS_PER_WEEK as u8
                } else {
                    day
                };
                coverage.add(target_day, hour, 1);
            }
        }
    }
    coverage
}

pub(super) fn count_by_type(workers: &[Worker]) -> TypeCounts {
    let mut counts = TypeCounts::default();
    for worker in workers {
        counts.bump(worker.kind, 1);
    }
    counts
}
