use anyhow::{Context, Result};
use rusqlite::{Connection, Row};
use std::path::{Path, PathBuf};

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_no      INTEGER PRIMARY KEY,
    date         TEXT NOT NULL,
    n1           INTEGER NOT NULL,
    n2           INTEGER NOT NULL,
    n3           INTEGER NOT NULL,
    n4           INTEGER NOT NULL,
    n5           INTEGER NOT NULL,
    n6           INTEGER NOT NULL,
    bonus        INTEGER NOT NULL,
    prize_1st    INTEGER NOT NULL DEFAULT 0,
    winners_1st  INTEGER NOT NULL DEFAULT 0
);
";

const COLUMNS: &str = "draw_no, date, n1, n2, n3, n4, n5, n6, bonus, prize_1st, winners_1st";

/// Variable d'environnement permettant de déplacer la base.
pub const DB_PATH_ENV: &str = "LOTTO_DB_PATH";

pub fn db_path() -> PathBuf {
    if let Ok(custom) = std::env::var(DB_PATH_ENV) {
        if !custom.trim().is_empty() {
            return PathBuf::from(custom);
        }
    }
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    tracing::debug!(path = %path.display(), "base ouverte");
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let prize = i64::try_from(draw.prize_1st)
        .with_context(|| format!("Gain hors limites pour le tirage {}", draw.draw_no))?;
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_no, date, n1, n2, n3, n4, n5, n6, bonus, prize_1st, winners_1st)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            draw.draw_no,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
            prize,
            draw.winners_1st,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        draw_no: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
        prize_1st: row.get::<_, i64>(9)?.max(0) as u64,
        winners_1st: row.get(10)?,
    })
}

/// Historique complet, trié par numéro de tirage croissant.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM draws ORDER BY draw_no ASC"
    ))?;
    let draws = stmt
        .query_map([], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

#[derive(Debug, Clone)]
pub struct DrawPage {
    pub draws: Vec<Draw>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Filtre littéral sur le début du numéro de tirage (`_` et `%` ne sont pas des jokers).
const PREFIX_FILTER: &str = "substr(CAST(draw_no AS TEXT), 1, length(?1)) = ?1";

/// Page de l'historique (la plus récente d'abord), filtrée par préfixe de numéro de tirage.
/// Une page au-delà de la dernière revient vide.
pub fn fetch_draw_page(conn: &Connection, page: u32, per_page: u32, search: &str) -> Result<DrawPage> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let prefix = search.trim();

    let total: u32 = conn.query_row(
        &format!("SELECT COUNT(*) FROM draws WHERE {PREFIX_FILTER}"),
        [prefix],
        |row| row.get(0),
    )?;

    let offset = u64::from(page - 1).saturating_mul(u64::from(per_page));
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM draws WHERE {PREFIX_FILTER}
         ORDER BY draw_no DESC LIMIT ?2 OFFSET ?3"
    ))?;
    let draws = stmt
        .query_map(rusqlite::params![prefix, per_page, offset], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DrawPage {
        draws,
        total,
        page,
        per_page,
        total_pages: total.div_ceil(per_page).max(1),
    })
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn latest_draw_no(conn: &Connection) -> Result<Option<u32>> {
    let latest: Option<u32> = conn.query_row("SELECT MAX(draw_no) FROM draws", [], |row| row.get(0))?;
    Ok(latest)
}
