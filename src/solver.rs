//! Contrat du solveur MIP externe : texte LP en entrée, valeurs primales en
//! sortie. Le moteur ne présuppose aucun back-end ; `HighsCommand` fournit un
//! adaptateur ligne de commande prêt à l'emploi.

use std::collections::HashMap;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("failed to launch solver process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("solver scratch file error: {0}")]
    Scratch(#[from] std::io::Error),
    #[error("solver exited with {0}")]
    Exit(String),
    #[error("unreadable solver output: {0}")]
    Parse(String),
}

/// Statut rapporté par le back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    /// Tout autre verdict (limite de temps, non borné…) : inexploitable.
    Unknown,
}

/// Affectation primale rendue par le back-end.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub status: SolverStatus,
    pub primal: HashMap<String, f64>,
}

/// Capacité consommée par le moteur : résoudre un modèle fourni au format LP
/// (sections Minimize, Subject To, Bounds, General, End).
pub trait MipSolver {
    fn solve(&mut self, model: &str) -> Result<SolverOutcome, SolverError>;
}

/// Fabrique d'instances fraîches ; le moteur en demande une par phase et ne
/// réutilise jamais un état de résolution.
pub trait SolverFactory {
    fn spawn(&self) -> Result<Box<dyn MipSolver>, SolverError>;
}

/// Adaptateur pour l'exécutable `highs` : modèle écrit dans un fichier
/// temporaire, solution relue via `--solution_file`.
#[derive(Debug, Clone)]
pub struct HighsCommand {
    program: String,
    time_limit_s: Option<u32>,
}

impl HighsCommand {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            time_limit_s: None,
        }
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit_s = Some(seconds);
        self
    }
}

impl Default for HighsCommand {
    fn default() -> Self {
        Self::new("highs")
    }
}

impl SolverFactory for HighsCommand {
    fn spawn(&self) -> Result<Box<dyn MipSolver>, SolverError> {
        Ok(Box::new(self.clone()))
    }
}

impl MipSolver for HighsCommand {
    fn solve(&mut self, model: &str) -> Result<SolverOutcome, SolverError> {
        let scratch = tempfile::tempdir()?;
        let model_path = scratch.path().join("model.lp");
        let solution_path = scratch.path().join("model.sol");
        std::fs::write(&model_path, model)?;

        let mut command = Command::new(&self.program);
        command.arg(&model_path).arg("--solution_file").arg(&solution_path);
        if let Some(limit) = self.time_limit_s {
            command.arg("--time_limit").arg(limit.to_string());
        }
        let output = command.output().map_err(SolverError::Spawn)?;
        if !output.status.success() {
            return Err(SolverError::Exit(format!(
                "{} ({})",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        match std::fs::read_to_string(&solution_path) {
            Ok(raw) => parse_highs_solution(&raw),
            // Certains verdicts n'écrivent pas de fichier ; le journal fait foi.
            Err(_) => {
                let log = String::from_utf8_lossy(&output.stdout);
                if log.contains("Infeasible") {
                    return Ok(SolverOutcome {
                        status: SolverStatus::Infeasible,
                        primal: HashMap::new(),
                    });
                }
                Err(SolverError::Parse(
                    "solver produced no solution file".to_string(),
                ))
            }
        }
    }
}

/// Interprète un fichier solution HiGHS : seules les sections `Model status`
/// et le bloc `# Columns` de la partie primale sont lus, le reste est ignoré.
/// La partie duale répète un bloc `# Columns` : il ne doit pas écraser le
/// primal.
pub fn parse_highs_solution(raw: &str) -> Result<SolverOutcome, SolverError> {
    let mut status = SolverStatus::Unknown;
    let mut primal = HashMap::new();
    let mut lines = raw.lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line == "Model status" {
            for candidate in lines.by_ref() {
                let candidate = candidate.trim();
                if !candidate.is_empty() {
                    status = match candidate {
                        "Optimal" => SolverStatus::Optimal,
                        "Infeasible" => SolverStatus::Infeasible,
                        _ => SolverStatus::Unknown,
                    };
                    break;
                }
            }
        } else if line.starts_with("# Dual solution values") {
            break;
        } else if let Some(rest) = line.strip_prefix("# Columns") {
            let count: usize = rest.trim().parse().map_err(|_| {
                SolverError::Parse(format!("invalid column count: {}", rest.trim()))
            })?;
            for _ in 0..count {
                let entry = lines
                    .next()
                    .ok_or_else(|| SolverError::Parse("truncated columns section".to_string()))?;
                let mut parts = entry.split_whitespace();
                let name = parts
                    .next()
                    .ok_or_else(|| SolverError::Parse("empty column entry".to_string()))?;
                let value: f64 = parts
                    .next()
                    .ok_or_else(|| SolverError::Parse(format!("missing value for {name}")))?
                    .parse()
                    .map_err(|_| SolverError::Parse(format!("invalid value for {name}")))?;
                primal.insert(name.to_string(), value);
            }
        }
    }

    Ok(SolverOutcome { status, primal })
}
