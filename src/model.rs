use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Jours par semaine (0 = lundi, 6 = dimanche).
pub const DAYS_PER_WEEK: usize = 7;
/// Créneaux horaires par jour.
pub const HOURS_PER_DAY: usize = 24;
/// Jours considérés comme week-end.
pub const WEEKEND_DAYS: [u8; 2] = [5, 6];
/// Premier départ considéré comme nocturne (le shift déborde sur le jour suivant).
pub const OVERNIGHT_START: u8 = 20;

/// Type de contrat d'un préparateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerType {
    #[serde(rename = "FT")]
    FullTime,
    #[serde(rename = "PT")]
    PartTime,
    #[serde(rename = "WFT")]
    WeekendFullTime,
    #[serde(rename = "WPT")]
    WeekendPartTime,
}

impl WorkerType {
    pub fn code(&self) -> &'static str {
        match self {
            WorkerType::FullTime => "FT",
            WorkerType::PartTime => "PT",
            WorkerType::WeekendFullTime => "WFT",
            WorkerType::WeekendPartTime => "WPT",
        }
    }

    /// Temps partiel au sens du plafond de mixité (PT + WPT).
    pub fn is_part_time(&self) -> bool {
        matches!(self, WorkerType::PartTime | WorkerType::WeekendPartTime)
    }

    /// Week-ender au sens du plafond de mixité (WFT + WPT).
    pub fn is_weekender(&self) -> bool {
        matches!(self, WorkerType::WeekendFullTime | WorkerType::WeekendPartTime)
    }

    /// Amplitude du shift en heures, pause comprise.
    pub fn span_hours(&self) -> u8 {
        match self {
            WorkerType::FullTime | WorkerType::WeekendFullTime => 9,
            WorkerType::PartTime | WorkerType::WeekendPartTime => 4,
        }
    }
}

impl fmt::Display for WorkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Gabarit d'horaire hebdomadaire : la classe d'emploi du temps choisie par
/// l'optimiseur. Deux gabarits identiques sont interchangeables ; la solution
/// entière compte un nombre de préparateurs par gabarit.
///
/// Chaque variante ne porte que les champs que son type exige : pas de pause
/// sur un temps partiel, pas de jour de repos sur un week-ender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftTemplate {
    FullTime { start: u8, day_off: u8, break_offset: u8 },
    PartTime { start: u8, day_off: u8 },
    WeekendFullTime { start: u8, break_offset: u8 },
    WeekendPartTime { start: u8 },
}

impl ShiftTemplate {
    pub fn worker_type(&self) -> WorkerType {
        match self {
            ShiftTemplate::FullTime { .. } => WorkerType::FullTime,
            ShiftTemplate::PartTime { .. } => WorkerType::PartTime,
            ShiftTemplate::WeekendFullTime { .. } => WorkerType::WeekendFullTime,
            ShiftTemplate::WeekendPartTime { .. } => WorkerType::WeekendPartTime,
        }
    }

    pub fn start(&self) -> u8 {
        match *self {
            ShiftTemplate::FullTime { start, .. }
            | ShiftTemplate::PartTime { start, .. }
            | ShiftTemplate::WeekendFullTime { start, .. }
            | ShiftTemplate::WeekendPartTime { start } => start,
        }
    }

    pub fn day_off(&self) -> Option<u8> {
        match *self {
            ShiftTemplate::FullTime { day_off, .. } | ShiftTemplate::PartTime { day_off, .. } => {
                Some(day_off)
            }
            _ => None,
        }
    }

    pub fn break_offset(&self) -> Option<u8> {
        match *self {
            ShiftTemplate::FullTime { break_offset, .. }
            | ShiftTemplate::WeekendFullTime { break_offset, .. } => Some(break_offset),
            _ => None,
        }
    }

    /// Fin de shift brute : peut dépasser 24 pour un départ nocturne.
    pub fn shift_end(&self) -> u8 {
        self.start() + self.worker_type().span_hours()
    }

    /// Nom de variable MIP : `x{TYPE}_{start}[_{repos}][_{pause}]`, les
    /// composantes optionnelles étant présentes exactement quand le type
    /// porte le champ.
    pub fn variable_name(&self) -> String {
        match *self {
            ShiftTemplate::FullTime { start, day_off, break_offset } => {
                format!("xFT_{start}_{day_off}_{break_offset}")
            }
            ShiftTemplate::PartTime { start, day_off } => format!("xPT_{start}_{day_off}"),
            ShiftTemplate::WeekendFullTime { start, break_offset } => {
                format!("xWFT_{start}_{break_offset}")
            }
            ShiftTemplate::WeekendPartTime { start } => format!("xWPT_{start}"),
        }
    }

    /// Heures productives en notation brute [0, 32) : l'amplitude du shift
    /// moins l'heure de pause. Une heure brute ≥ 24 appartient au jour
    /// calendaire suivant.
    pub fn productive_raw_hours(&self) -> Vec<u8> {
        let start = self.start();
        let span = self.worker_type().span_hours();
        let break_raw = self.break_offset().map(|offset| start + offset);
        (start..start + span)
            .filter(|raw| Some(*raw) != break_raw)
            .collect()
    }

    /// Le gabarit contribue-t-il au créneau `(day, hour)` ?
    ///
    /// Même jour : le jour est travaillé et l'heure fait partie des heures
    /// productives. Débordement nocturne (départ ≥ 20 h) : le shift de la
    /// veille atteint `hour + 24`.
    pub fn covers(&self, day: u8, hour: u8) -> bool {
        match *self {
            ShiftTemplate::FullTime { start, day_off, break_offset } => {
                if day != day_off && productive_contains(start, 9, Some(break_offset), hour) {
                    return true;
                }
                if start < OVERNIGHT_START {
                    return false;
                }
                let previous = (day + DAYS_PER_WEEK as u8 - 1) % DAYS_PER_WEEK as u8;
                previous != day_off && productive_contains(start, 9, Some(break_offset), hour + 24)
            }
            ShiftTemplate::PartTime { start, day_off } => {
                day != day_off && productive_contains(start, 4, None, hour)
            }
            ShiftTemplate::WeekendFullTime { start, break_offset } => {
                WEEKEND_DAYS.contains(&day)
                    && productive_contains(start, 9, Some(break_offset), hour)
            }
            ShiftTemplate::WeekendPartTime { start } => {
                WEEKEND_DAYS.contains(&day) && productive_contains(start, 4, None, hour)
            }
        }
    }
}

fn productive_contains(start: u8, span: u8, break_offset: Option<u8>, raw: u8) -> bool {
    raw >= start && raw < start + span && break_offset.map_or(true, |offset| raw != start + offset)
}

/// Grille dense 7×24 d'entiers. Sert à la demande, au requis et à la
/// couverture ; jour 0 = lundi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekMatrix([[u32; HOURS_PER_DAY]; DAYS_PER_WEEK]);

impl WeekMatrix {
    pub fn zeroed() -> Self {
        Self([[0; HOURS_PER_DAY]; DAYS_PER_WEEK])
    }

    pub fn from_rows(rows: [[u32; HOURS_PER_DAY]; DAYS_PER_WEEK]) -> Self {
        Self(rows)
    }

    pub fn get(&self, day: u8, hour: u8) -> u32 {
        self.0[day as usize][hour as usize]
    }

    pub fn set(&mut self, day: u8, hour: u8, value: u32) {
        self.0[day as usize][hour as usize] = value;
    }

    pub fn add(&mut self, day: u8, hour: u8, delta: u32) {
        self.0[day as usize][hour as usize] += delta;
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|row| row.iter().all(|v| *v == 0))
    }

    pub fn rows(&self) -> &[[u32; HOURS_PER_DAY]; DAYS_PER_WEEK] {
        &self.0
    }

    /// Parcours ligne par ligne : `(jour, heure, valeur)`.
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8, u32)> + '_ {
        self.0.iter().enumerate().flat_map(|(day, row)| {
            row.iter()
                .enumerate()
                .map(move |(hour, value)| (day as u8, hour as u8, *value))
        })
    }
}

impl Default for WeekMatrix {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl fmt::Display for WeekMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (day, row) in self.0.iter().enumerate() {
            if day > 0 {
                writeln!(f)?;
            }
            for (hour, value) in row.iter().enumerate() {
                if hour > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}

/// Configuration du dimensionnement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveConfig {
    /// Commandes traitées par préparateur et par heure productive.
    pub productivity_rate: u32,
    /// Part maximale de temps partiels (PT + WPT) dans l'effectif, en %.
    pub pt_cap_pct: u8,
    /// Part maximale de week-enders (WFT + WPT) dans l'effectif, en %.
    pub weekender_cap_pct: u8,
    /// Autorise le jour de repos des types semaine le samedi ou le dimanche.
    #[serde(default)]
    pub allow_weekend_day_off: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            productivity_rate: 12,
            pt_cap_pct: 50,
            weekender_cap_pct: 30,
            allow_weekend_day_off: false,
        }
    }
}

impl SolveConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.productivity_rate == 0 {
            return Err("productivity_rate must be positive".to_string());
        }
        if self.pt_cap_pct > 100 {
            return Err("pt_cap_pct must lie in [0, 100]".to_string());
        }
        if self.weekender_cap_pct > 100 {
            return Err("weekender_cap_pct must lie in [0, 100]".to_string());
        }
        Ok(())
    }
}

/// Arrondi demi-supérieur d'un pourcentage fractionnaire, borné à [0, 100].
pub fn round_percentage(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// Préparateur concret issu de la solution entière.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Position 1-based dans la liste de sortie.
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: WorkerType,
    pub shift_start: u8,
    /// `shift_start + amplitude` ; peut dépasser 24 pour un départ nocturne.
    pub shift_end: u8,
    pub day_off: Option<u8>,
    /// Heures d'horloge mod 24, pause exclue. Une heure < `shift_start`
    /// appartient au jour calendaire suivant celui du shift.
    pub productive_hours: Vec<u8>,
}

impl Worker {
    /// Jours où le préparateur prend son poste.
    pub fn active_days(&self) -> Vec<u8> {
        if self.kind.is_weekender() {
            return WEEKEND_DAYS.to_vec();
        }
        (0..DAYS_PER_WEEK as u8)
            .filter(|day| Some(*day) != self.day_off)
            .collect()
    }
}

/// Issue terminale d'un dimensionnement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Error,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// Effectif par type de contrat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub full_time: u32,
    pub part_time: u32,
    pub weekend_full_time: u32,
    pub weekend_part_time: u32,
}

impl TypeCounts {
    pub fn bump(&mut self, kind: WorkerType, count: u32) {
        match kind {
            WorkerType::FullTime => self.full_time += count,
            WorkerType::PartTime => self.part_time += count,
            WorkerType::WeekendFullTime => self.weekend_full_time += count,
            WorkerType::WeekendPartTime => self.weekend_part_time += count,
        }
    }

    pub fn part_timers(&self) -> u32 {
        self.part_time + self.weekend_part_time
    }

    pub fn weekenders(&self) -> u32 {
        self.weekend_full_time + self.weekend_part_time
    }

    pub fn total(&self) -> u32 {
        self.full_time + self.part_time + self.weekend_full_time + self.weekend_part_time
    }
}

/// Résultat complet d'un dimensionnement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResult {
    pub run_id: Uuid,
    pub status: SolveStatus,
    pub workers: Vec<Worker>,
    pub total_workers: u32,
    pub counts: TypeCounts,
    pub coverage: WeekMatrix,
    pub required: WeekMatrix,
    /// Temps mur cumulé sur les deux phases, en millisecondes.
    pub solve_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub generated_at: DateTime<Utc>,
}
