mod display;
mod import;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use lotto_analysis::config::{load_config, save_config};
use lotto_analysis::{PredictorConfig, full_analysis_with, history_stats, predict_numbers_with};
use lotto_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_draw_page, latest_draw_no, insert_draw, migrate, open_db,
};
use lotto_db::models::{Draw, PICK_COUNT, estimated_latest_draw_no, validate_draw};
use lotto_db::rusqlite::Connection;
use crate::display::{
    display_draws, display_import_summary, display_page, display_predictions, display_stats,
};

#[derive(Parser)]
#[command(name = "lotto", about = "Statistiques et grilles pondérées pour le Lotto 6/45")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier JSON (miroir public ou export)
    Import {
        /// Chemin vers le fichier JSON
        #[arg(short, long, default_value = "data/all.json")]
        file: PathBuf,
    },

    /// Exporter l'historique complet en JSON
    Export {
        /// Fichier de sortie
        #[arg(short, long, default_value = "data/lotto_cache.json")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les tirages, du plus récent au plus ancien
    List {
        /// Numéro de page (à partir de 1)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Tirages par page
        #[arg(long, default_value = "20")]
        per_page: u32,

        /// Préfixe du numéro de tirage
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Afficher les statistiques (fréquences, tranches, pair/impair, sommes)
    Stats {
        /// Fenêtre des statistiques récentes (nombre de tirages)
        #[arg(short, long, default_value = "50")]
        window: usize,
    },

    /// Suggérer des grilles pondérées
    Predict {
        /// Nombre de grilles à suggérer
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier JSON de pondérations
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rapport complet au format JSON sur la sortie standard
    Report {
        /// JSON indenté
        #[arg(long)]
        pretty: bool,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier JSON de pondérations
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Écrire les pondérations par défaut dans un fichier JSON (modèle pour --config)
    InitConfig {
        /// Fichier de sortie
        #[arg(short, long, default_value = "lotto-config.json")]
        file: PathBuf,

        /// Écraser le fichier s'il existe déjà
        #[arg(long)]
        force: bool,
    },

    /// Ajouter un tirage manuellement
    Add,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::Export { file } => cmd_export(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { page, per_page, search } => cmd_list(&conn, page, per_page, &search),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Predict { count, seed, config } => cmd_predict(&conn, count, seed, config),
        Command::Report { pretty, seed, config } => cmd_report(&conn, pretty, seed, config),
        Command::InitConfig { file, force } => cmd_init_config(&file, force),
        Command::Add => cmd_add(&conn),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn resolve_config(path: Option<PathBuf>) -> Result<PredictorConfig> {
    match path {
        Some(p) => load_config(&p),
        None => Ok(PredictorConfig::default()),
    }
}

/// Historique complet, ou `None` (avec un message) si la base est vide.
fn load_history(conn: &Connection) -> Result<Option<Vec<Draw>>> {
    if count_draws(conn)? == 0 {
        println!("Base vide. Lancez d'abord : lotto import --file <all.json>");
        return Ok(None);
    }
    let draws = fetch_all_draws(conn)?;
    tracing::debug!(draws = draws.len(), "historique chargé");
    Ok(Some(draws))
}

fn cmd_import(conn: &Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_json(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(conn: &Connection, file: &PathBuf) -> Result<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let n = import::export_json(conn, file)?;
    println!("{} tirage(s) exporté(s) vers {}", n, file.display());
    Ok(())
}

fn cmd_list(conn: &Connection, page: u32, per_page: u32, search: &str) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("Base vide. Lancez d'abord : lotto import --file <all.json>");
        return Ok(());
    }
    let page = fetch_draw_page(conn, page, per_page, search)?;
    display_page(&page);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: usize) -> Result<()> {
    let Some(draws) = load_history(conn)? else {
        return Ok(());
    };
    let config = PredictorConfig {
        recent_window: window,
        ..PredictorConfig::default()
    };
    display_stats(&history_stats(&draws, &config), window);
    Ok(())
}

fn next_draw_no(conn: &Connection, today: NaiveDate) -> Result<u32> {
    let stored = latest_draw_no(conn)?.unwrap_or(0);
    Ok(stored.max(estimated_latest_draw_no(today)) + 1)
}

fn cmd_predict(conn: &Connection, count: usize, seed: Option<u64>, config: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config)?;
    let Some(draws) = load_history(conn)? else {
        return Ok(());
    };

    let mut rng = make_rng(seed);
    let sets = predict_numbers_with(&draws, count, &config, &mut rng);

    let next = next_draw_no(conn, chrono::Local::now().date_naive())?;
    display_predictions(&sets, next);
    Ok(())
}

fn cmd_report(conn: &Connection, pretty: bool, seed: Option<u64>, config: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(config)?;
    let draws = fetch_all_draws(conn)?;
    if draws.is_empty() {
        tracing::warn!("base vide : rapport calculé sur zéro tirage");
    }

    let report = full_analysis_with(&draws, &config, &mut make_rng(seed));
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_init_config(file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        bail!("{} existe déjà (utilisez --force pour l'écraser)", file.display());
    }
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    save_config(&PredictorConfig::default(), file)?;
    println!("Pondérations par défaut écrites dans {}", file.display());
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let draw_no: u32 = prompt("Numéro du tirage (ex: 1150) : ")?
        .parse()
        .context("Numéro de tirage invalide")?;
    let raw_date = prompt("Date (JJ/MM/AAAA) : ")?;
    let date = NaiveDate::parse_from_str(&raw_date, "%d/%m/%Y")
        .with_context(|| format!("Format de date invalide: '{}'", raw_date))?;

    let numbers = prompt_numbers()?;
    let bonus = prompt_bonus(&numbers)?;

    let prize_raw = prompt("Gain 1er rang en wons (vide = 0) : ")?;
    let prize_1st: u64 = if prize_raw.is_empty() {
        0
    } else {
        prize_raw.replace([' ', ','], "").parse().context("Montant invalide")?
    };
    let winners_raw = prompt("Gagnants 1er rang (vide = 0) : ")?;
    let winners_1st: u32 = if winners_raw.is_empty() {
        0
    } else {
        winners_raw.parse().context("Nombre de gagnants invalide")?
    };

    validate_draw(&numbers, bonus)?;

    let draw = Draw {
        draw_no,
        date,
        numbers,
        bonus,
        prize_1st,
        winners_1st,
    };

    println!("\nTirage à insérer :");
    display_draws(&[draw.clone()]);

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            tracing::info!(draw_no, "tirage ajouté");
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        bail!("Entrée standard fermée");
    }
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<[u8; PICK_COUNT]> {
    loop {
        let input = prompt("6 numéros (séparés par des espaces, 1-45) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == PICK_COUNT => {
                let mut arr = [0u8; PICK_COUNT];
                arr.copy_from_slice(&v);
                arr.sort();
                // bonus fictif hors grille, seule la grille est vérifiée ici
                let spare = (1..=45).find(|b| !arr.contains(b)).unwrap_or(45);
                if validate_draw(&arr, spare).is_ok() {
                    return Ok(arr);
                }
                println!("Numéros invalides (1-45, pas de doublons). Réessayez.");
            }
            _ => println!("Entrez exactement 6 numéros. Réessayez."),
        }
    }
}

fn prompt_bonus(numbers: &[u8; PICK_COUNT]) -> Result<u8> {
    loop {
        let input = prompt("Numéro bonus (1-45) : ")?;
        match input.parse::<u8>() {
            Ok(b) if validate_draw(numbers, b).is_ok() => return Ok(b),
            _ => println!("Bonus invalide (1-45, différent des 6 numéros). Réessayez."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_db::models::first_draw_date;

    #[test]
    fn test_next_draw_uses_latest_known() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let today = first_draw_date() + chrono::Duration::weeks(10);
        assert_eq!(next_draw_no(&conn, today).unwrap(), 12);

        let draw = Draw {
            draw_no: 20,
            date: today,
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
            prize_1st: 0,
            winners_1st: 0,
        };
        insert_draw(&conn, &draw).unwrap();
        assert_eq!(next_draw_no(&conn, today).unwrap(), 21);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let draws: Vec<Draw> = Vec::new();
        let config = PredictorConfig::default();
        let a = predict_numbers_with(&draws, 3, &config, &mut make_rng(Some(5)));
        let b = predict_numbers_with(&draws, 3, &config, &mut make_rng(Some(5)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_init_config_writes_loadable_defaults() {
        let path = std::env::temp_dir().join(format!("lotto-init-config-{}.json", std::process::id()));
        std::fs::remove_file(&path).ok();

        cmd_init_config(&path, false).unwrap();
        assert_eq!(load_config(&path).unwrap(), PredictorConfig::default());

        assert!(cmd_init_config(&path, false).is_err(), "fichier existant écrasé sans --force");
        assert!(cmd_init_config(&path, true).is_ok());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["lotto", "predict", "--count", "3", "--seed", "9"]).unwrap();
        match cli.command {
            Command::Predict { count, seed, config } => {
                assert_eq!(count, 3);
                assert_eq!(seed, Some(9));
                assert!(config.is_none());
            }
            _ => panic!("sous-commande inattendue"),
        }
    }
}
