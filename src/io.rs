use crate::model::{RosterResult, WeekMatrix, DAYS_PER_WEEK, HOURS_PER_DAY};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import d'une demande depuis CSV : 7 lignes × 24 colonnes d'entiers, sans
/// en-tête (ligne 0 = lundi, colonne 0 = minuit).
pub fn import_demand_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<WeekMatrix> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut rows = [[0u32; HOURS_PER_DAY]; DAYS_PER_WEEK];
    let mut day = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        if day >= DAYS_PER_WEEK {
            bail!("expected exactly 7 demand rows");
        }
        if rec.len() != HOURS_PER_DAY {
            bail!("demand row {} must hold 24 values, got {}", day, rec.len());
        }
        for (hour, field) in rec.iter().enumerate() {
            rows[day][hour] = field
                .trim()
                .parse()
                .with_context(|| format!("invalid demand value at day {day} hour {hour}"))?;
        }
        day += 1;
    }
    if day != DAYS_PER_WEEK {
        bail!("expected exactly 7 demand rows, got {day}");
    }
    Ok(WeekMatrix::from_rows(rows))
}

/// Import d'une demande depuis JSON : tableau imbriqué 7×24.
pub fn import_demand_json<P: AsRef<Path>>(path: P) -> anyhow::Result<WeekMatrix> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let matrix: WeekMatrix =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(matrix)
}

/// Dispatch sur l'extension du fichier (.csv ou .json).
pub fn load_demand<P: AsRef<Path>>(path: P) -> anyhow::Result<WeekMatrix> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => import_demand_csv(path),
        Some("json") => import_demand_json(path),
        _ => bail!("unsupported demand file extension: {}", path.display()),
    }
}

/// Export JSON du résultat (jolie mise en forme). L'écriture passe par un
/// fichier temporaire puis un renommage : un résultat déjà présent n'est
/// jamais tronqué par un export interrompu.
pub fn export_result_json<P: AsRef<Path>>(path: P, result: &RosterResult) -> anyhow::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file for {}", path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, result)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Recharge un résultat sauvegardé.
pub fn import_result_json<P: AsRef<Path>>(path: P) -> anyhow::Result<RosterResult> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let result: RosterResult =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(result)
}

/// Export CSV des préparateurs : header
/// `id,type,shift_start,shift_end,day_off,productive_hours`, heures
/// productives séparées par `;`.
pub fn export_workers_csv<P: AsRef<Path>>(path: P, result: &RosterResult) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "type",
        "shift_start",
        "shift_end",
        "day_off",
        "productive_hours",
    ])?;
    for worker in &result.workers {
        let hours = worker
            .productive_hours
            .iter()
            .map(|hour| hour.to_string())
            .collect::<Vec<_>>()
            .join(";");
        let day_off = worker
            .day_off
            .map(|day| day.to_string())
            .unwrap_or_default();
        w.write_record([
            worker.id.to_string(),
            worker.kind.code().to_string(),
            worker.shift_start.to_string(),
            worker.shift_end.to_string(),
            day_off,
            hours,
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV 7×24 d'une matrice (couverture ou requis).
pub fn export_matrix_csv<P: AsRef<Path>>(path: P, matrix: &WeekMatrix) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in matrix.rows() {
        w.write_record(row.iter().map(|value| value.to_string()))?;
    }
    w.flush()?;
    Ok(())
}
