#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hebdoplan::{
    io, phase_model, required_from_demand, round_percentage, Engine, HighsCommand, Phase,
    RosterResult, SolveConfig, SolveStatus, TextProgress,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de dimensionnement d'effectif (solveur MIP externe)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dimensionner le roster d'une semaine
    Solve {
        /// Fichier de demande 7×24 (.csv ou .json)
        #[arg(long)]
        demand: String,
        /// Commandes par préparateur et par heure productive
        #[arg(long, default_value_t = 12)]
        rate: u32,
        /// Part maximale de temps partiels (%)
        #[arg(long, default_value_t = 50.0)]
        pt_cap: f64,
        /// Part maximale de week-enders (%)
        #[arg(long, default_value_t = 30.0)]
        weekender_cap: f64,
        /// Autorise le jour de repos le week-end
        #[arg(long)]
        allow_weekend_day_off: bool,
        /// Exécutable du solveur MIP
        #[arg(long, default_value = "highs")]
        solver: String,
        /// Limite de temps solveur (secondes)
        #[arg(long)]
        time_limit: Option<u32>,
        /// Fichier JSON de résultat
        #[arg(long, default_value = "roster.json")]
        out: String,
        /// Export CSV des préparateurs (optionnel)
        #[arg(long)]
        workers_csv: Option<String>,
        /// Export CSV de la couverture (optionnel)
        #[arg(long)]
        coverage_csv: Option<String>,
        /// N'affiche pas la progression
        #[arg(long)]
        quiet: bool,
    },

    /// Afficher la matrice du requis pour une demande
    Required {
        #[arg(long)]
        demand: String,
        #[arg(long, default_value_t = 12)]
        rate: u32,
    },

    /// Émettre le modèle LP de la phase 1
    Model {
        #[arg(long)]
        demand: String,
        #[arg(long, default_value_t = 12)]
        rate: u32,
        #[arg(long, default_value_t = 50.0)]
        pt_cap: f64,
        #[arg(long, default_value_t = 30.0)]
        weekender_cap: f64,
        #[arg(long)]
        allow_weekend_day_off: bool,
        /// Fichier de sortie (stdout par défaut)
        #[arg(long)]
        out: Option<String>,
    },

    /// Résumer un résultat sauvegardé
    Show {
        #[arg(long, default_value = "roster.json")]
        result: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Solve {
            demand,
            rate,
            pt_cap,
            weekender_cap,
            allow_weekend_day_off,
            solver,
            time_limit,
            out,
            workers_csv,
            coverage_csv,
            quiet,
        } => {
            let demand = io::load_demand(&demand)?;
            let config = SolveConfig {
                productivity_rate: rate,
                pt_cap_pct: round_percentage(pt_cap),
                weekender_cap_pct: round_percentage(weekender_cap),
                allow_weekend_day_off,
            };
            let mut backend = HighsCommand::new(solver);
            if let Some(seconds) = time_limit {
                backend = backend.with_time_limit(seconds);
            }
            let progress = TextProgress;
            let engine = if quiet {
                Engine::new(&backend)
            } else {
                Engine::new(&backend).with_progress(&progress)
            };
            let result = engine.solve(&demand, &config);
            print_summary(&result);
            io::export_result_json(&out, &result)?;
            if let Some(path) = workers_csv {
                io::export_workers_csv(path, &result)?;
            }
            if let Some(path) = coverage_csv {
                io::export_matrix_csv(path, &result.coverage)?;
            }
            if result.status == SolveStatus::Optimal {
                0
            } else {
                // Code 2 = roster non produit (infaisable ou erreur)
                2
            }
        }
        Commands::Required { demand, rate } => {
            if rate == 0 {
                bail!("rate must be positive");
            }
            let demand = io::load_demand(&demand)?;
            println!("{}", required_from_demand(&demand, rate));
            0
        }
        Commands::Model {
            demand,
            rate,
            pt_cap,
            weekender_cap,
            allow_weekend_day_off,
            out,
        } => {
            let demand = io::load_demand(&demand)?;
            let config = SolveConfig {
                productivity_rate: rate,
                pt_cap_pct: round_percentage(pt_cap),
                weekender_cap_pct: round_percentage(weekender_cap),
                allow_weekend_day_off,
            };
            let model = phase_model(&demand, &config, Phase::Headcount)?;
            match out {
                Some(path) => std::fs::write(path, model)?,
                None => print!("{model}"),
            }
            0
        }
        Commands::Show { result } => {
            let result = io::import_result_json(&result)?;
            print_summary(&result);
            for worker in &result.workers {
                let day_off = worker
                    .day_off
                    .map(|day| day.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "#{} {} | {}h → {}h | repos {}",
                    worker.id, worker.kind, worker.shift_start, worker.shift_end, day_off
                );
            }
            if result.status == SolveStatus::Optimal {
                0
            } else {
                2
            }
        }
    };

    std::process::exit(code);
}

fn print_summary(result: &RosterResult) {
    println!(
        "run {} | status {} | {} préparateurs | {} ms",
        result.run_id, result.status, result.total_workers, result.solve_time_ms
    );
    println!(
        "FT {} | PT {} | WFT {} | WPT {}",
        result.counts.full_time,
        result.counts.part_time,
        result.counts.weekend_full_time,
        result.counts.weekend_part_time
    );
    println!("généré le {}", result.generated_at.to_rfc3339());
    if let Some(message) = &result.error_message {
        eprintln!("erreur : {message}");
    }
}
