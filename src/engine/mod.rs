//! Moteur de dimensionnement : catalogue → élagage → modèle → solveur →
//! roster. Une invocation est un calcul atomique ; aucun état ne survit
//! entre deux appels.

mod build;
pub mod catalogue;
mod pruning;
mod reify;
mod types;

pub use reify::coverage_from_workers;
pub use types::{EngineError, Phase};

use crate::model::{
    RosterResult, ShiftTemplate, SolveConfig, SolveStatus, TypeCounts, WeekMatrix, Worker,
};
use crate::progress::{ProgressSink, SolveStage};
use crate::solver::{SolverFactory, SolverStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Moteur mono-coup : encapsule la fabrique de solveurs et un observateur
/// de progression optionnel.
pub struct Engine<'a> {
    factory: &'a dyn SolverFactory,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> Engine<'a> {
    pub fn new(factory: &'a dyn SolverFactory) -> Self {
        Self {
            factory,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    fn notify(&self, stage: SolveStage) {
        if let Some(sink) = self.progress {
            sink.notify(stage);
        }
    }

    /// Point d'entrée unique : demande 7×24 + configuration → roster complet.
    /// Toute issue est rapportée dans le résultat, jamais par panique.
    pub fn solve(&self, demand: &WeekMatrix, config: &SolveConfig) -> RosterResult {
        let started = Instant::now();

        if let Err(message) = config.validate() {
            return failed(SolveStatus::Error, message, started);
        }

        let required = required_from_demand(demand, config.productivity_rate);
        if demand.is_zero() {
            return RosterResult {
                run_id: Uuid::new_v4(),
                status: SolveStatus::Optimal,
                workers: Vec::new(),
                total_workers: 0,
                counts: TypeCounts::default(),
                coverage: WeekMatrix::zeroed(),
                required,
                solve_time_ms: elapsed_ms(started),
                error_message: None,
                generated_at: Utc::now(),
            };
        }

        match self.run_phases(demand, &required, config, started) {
            Ok(result) => result,
            Err(err) => failed(SolveStatus::Error, err.to_string(), started),
        }
    }

    fn run_phases(
        &self,
        demand: &WeekMatrix,
        required: &WeekMatrix,
        config: &SolveConfig,
        started: Instant,
    ) -> Result<RosterResult, EngineError> {
        let templates = prepared_templates(demand, config);

        self.notify(SolveStage::Phase1);
        let model = build::build_model(&templates, demand, required, config, Phase::Headcount);
        let outcome = self.factory.spawn()?.solve(&model)?;
        match outcome.status {
            SolverStatus::Optimal => {}
            SolverStatus::Infeasible => {
                return Ok(failed(
                    SolveStatus::Infeasible,
                    "no feasible roster under the current caps (phase 1)".to_string(),
                    started,
                ));
            }
            SolverStatus::Unknown => {
                return Ok(failed(
                    SolveStatus::Error,
                    "solver returned an unusable status (phase 1)".to_string(),
                    started,
                ));
            }
        }

        let phase1_counts = rounded_counts(&templates, &outcome.primal);
        let headcount_cap = rounded_total(&templates, &outcome.primal);

        let mut counts = phase1_counts.clone();
        let mut used_phase2 = false;
        if config.pt_cap_pct > 0 && has_full_and_part_time(&templates) {
            self.notify(SolveStage::Phase2);
            if let Some(refined) = self.try_phase2(&templates, demand, required, config, headcount_cap)
            {
                counts = refined;
                used_phase2 = true;
            }
        }

        self.notify(SolveStage::BuildingRoster);
        let (workers, coverage, by_type) = match reify_checked(&templates, &counts, required) {
            Ok(parts) => parts,
            // Affectation de phase 2 défectueuse : on retombe sur la phase 1,
            // déjà optimale en effectif.
            Err(_) if used_phase2 => reify_checked(&templates, &phase1_counts, required)
                .map_err(|(day, hour)| EngineError::CoverageShortfall { day, hour })?,
            Err((day, hour)) => return Err(EngineError::CoverageShortfall { day, hour }),
        };

        let total_workers = by_type.total();
        Ok(RosterResult {
            run_id: Uuid::new_v4(),
            status: SolveStatus::Optimal,
            workers,
            total_workers,
            counts: by_type,
            coverage,
            required: *required,
            solve_time_ms: elapsed_ms(started),
            error_message: None,
            generated_at: Utc::now(),
        })
    }

    /// Tout échec de phase 2 (fabrique, solveur, statut non optimal) est
    /// silencieux : l'appelant garde l'affectation de phase 1.
    fn try_phase2(
        &self,
        templates: &[ShiftTemplate],
        demand: &WeekMatrix,
        required: &WeekMatrix,
        config: &SolveConfig,
        headcount_cap: u32,
    ) -> Option<Vec<u32>> {
        let model = build::build_model(
            templates,
            demand,
            required,
            config,
            Phase::PartTimeShare { headcount_cap },
        );
        let mut solver = self.factory.spawn().ok()?;
        let outcome = solver.solve(&model).ok()?;
        (outcome.status == SolverStatus::Optimal)
            .then(|| rounded_counts(templates, &outcome.primal))
    }
}

/// Matrice du requis : plafond de la demande divisée par la productivité.
pub fn required_from_demand(demand: &WeekMatrix, productivity_rate: u32) -> WeekMatrix {
    let mut required = WeekMatrix::zeroed();
    for (day, hour, orders) in demand.cells() {
        if orders > 0 {
            required.set(day, hour, orders.div_ceil(productivity_rate));
        }
    }
    required
}

/// Texte LP d'une phase, pour inspection ou rejeu hors moteur.
pub fn phase_model(
    demand: &WeekMatrix,
    config: &SolveConfig,
    phase: Phase,
) -> Result<String, EngineError> {
    config.validate().map_err(EngineError::InvalidConfig)?;
    let required = required_from_demand(demand, config.productivity_rate);
    let templates = prepared_templates(demand, config);
    Ok(build::build_model(&templates, demand, &required, config, phase))
}

/// Gabarits actifs après élagage et application des plafonds à 0 : un
/// plafond nul exclut les types concernés du modèle entier plutôt que de
/// générer des lignes de fixation par variable.
fn prepared_templates(demand: &WeekMatrix, config: &SolveConfig) -> Vec<ShiftTemplate> {
    let universe = catalogue::enumerate(config);
    let mut templates = pruning::active_templates(&universe, demand);
    if config.pt_cap_pct == 0 {
        templates.retain(|template| !template.worker_type().is_part_time());
    }
    if config.weekender_cap_pct == 0 {
        templates.retain(|template| !template.worker_type().is_weekender());
    }
    templates
}

fn has_full_and_part_time(templates: &[ShiftTemplate]) -> bool {
    templates
        .iter()
        .any(|template| template.worker_type().is_part_time())
        && templates
            .iter()
            .any(|template| !template.worker_type().is_part_time())
}

/// Comptes entiers par gabarit : anomalies numériques arrondies puis
/// bornées à 0. Une variable absente du primal vaut 0.
fn rounded_counts(templates: &[ShiftTemplate], primal: &HashMap<String, f64>) -> Vec<u32> {
    templates
        .iter()
        .map(|template| {
            let value = primal
                .get(&template.variable_name())
                .copied()
                .unwrap_or(0.0);
            value.round().max(0.0) as u32
        })
        .collect()
}

fn rounded_total(templates: &[ShiftTemplate], primal: &HashMap<String, f64>) -> u32 {
    let sum: f64 = templates
        .iter()
        .filter_map(|template| primal.get(&template.variable_name()))
        .sum();
    sum.round().max(0.0) as u32
}

type Reified = (Vec<Worker>, WeekMatrix, TypeCounts);

/// Déplie l'affectation puis revérifie la suffisance de couverture sur
/// chaque créneau exigé ; le premier déficit est rapporté.
fn reify_checked(
    templates: &[ShiftTemplate],
    counts: &[u32],
    required: &WeekMatrix,
) -> Result<Reified, (u8, u8)> {
    let assignment: Vec<(ShiftTemplate, u32)> = templates
        .iter()
        .copied()
        .zip(counts.iter().copied())
        .filter(|(_, count)| *count > 0)
        .collect();
    let workers = reify::expand_workers(&assignment);
    let coverage = coverage_from_workers(&workers);
    for (day, hour, needed) in required.cells() {
        if needed > 0 && coverage.get(day, hour) < needed {
            return Err((day, hour));
        }
    }
    let by_type = reify::count_by_type(&workers);
    Ok((workers, coverage, by_type))
}

fn failed(status: SolveStatus, message: String, started: Instant) -> RosterResult {
    RosterResult {
        run_id: Uuid::new_v4(),
        status,
        workers: Vec::new(),
        total_workers: 0,
        counts: TypeCounts::default(),
        coverage: WeekMatrix::zeroed(),
        required: WeekMatrix::zeroed(),
        solve_time_ms: elapsed_ms(started),
        error_message: Some(message),
        generated_at: Utc::now(),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
