use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lotto_db::rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;

use lotto_db::db::{fetch_all_draws, insert_draw};
use lotto_db::models::{validate_draw, Draw, PICK_COUNT};

/// Enregistrement du miroir public des résultats (`all.json`).
#[derive(Debug, Deserialize)]
struct RemoteDraw {
    draw_no: u32,
    #[serde(default)]
    date: String,
    numbers: Vec<u8>,
    bonus_no: u8,
    #[serde(default)]
    divisions: Vec<RemoteDivision>,
}

#[derive(Debug, Deserialize)]
struct RemoteDivision {
    #[serde(default)]
    prize: u64,
    #[serde(default)]
    winners: u32,
}

/// Une ligne du fichier : format du miroir, ou format exporté par `lotto export`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Record {
    Remote(RemoteDraw),
    Local(Draw),
}

/// Garde la partie calendaire d'une date éventuellement horodatée (`2024-01-06T20:45:00+09:00`).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

fn convert_remote(remote: RemoteDraw) -> Result<Draw> {
    if remote.numbers.len() != PICK_COUNT {
        bail!(
            "Tirage {} : {} numéros au lieu de {}",
            remote.draw_no,
            remote.numbers.len(),
            PICK_COUNT
        );
    }
    let mut numbers = [0u8; PICK_COUNT];
    numbers.copy_from_slice(&remote.numbers);
    numbers.sort();

    let (prize_1st, winners_1st) = remote
        .divisions
        .first()
        .map(|d| (d.prize, d.winners))
        .unwrap_or((0, 0));

    Ok(Draw {
        draw_no: remote.draw_no,
        date: parse_date(&remote.date)?,
        numbers,
        bonus: remote.bonus_no,
        prize_1st,
        winners_1st,
    })
}

fn parse_record(value: serde_json::Value) -> Result<Draw> {
    let record: Record = serde_json::from_value(value).context("Enregistrement illisible")?;
    let draw = match record {
        Record::Remote(remote) => convert_remote(remote)?,
        Record::Local(mut draw) => {
            draw.numbers.sort();
            draw
        }
    };
    validate_draw(&draw.numbers, draw.bonus)
        .with_context(|| format!("Tirage {} invalide", draw.draw_no))?;
    Ok(draw)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_json(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_str(conn, &json)
}

pub fn import_str(conn: &Connection, json: &str) -> Result<ImportResult> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)
        .context("Le fichier doit contenir un tableau JSON de tirages")?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for value in records {
        result.total_records += 1;
        match parse_record(value) {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    tracing::warn!(record = result.total_records, error = %e, "insertion impossible");
                    result.errors += 1;
                }
            },
            Err(e) => {
                tracing::warn!(record = result.total_records, error = %format!("{e:#}"), "enregistrement rejeté");
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    tracing::info!(
        total = result.total_records,
        inserted = result.inserted,
        skipped = result.skipped,
        errors = result.errors,
        "import terminé"
    );
    Ok(result)
}

/// Écrit l'historique complet (ordre croissant) au format relu par `import_json`.
pub fn export_json(conn: &Connection, path: &Path) -> Result<usize> {
    let draws = fetch_all_draws(conn)?;
    let json = serde_json::to_string_pretty(&draws)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(draws.len())
}
