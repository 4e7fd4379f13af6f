use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use lotto_analysis::{HistoryStats, NumberCount, PredictionSet};
use lotto_db::db::DrawPage;
use lotto_db::models::Draw;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Montant en wons avec séparateur de milliers.
fn format_prize(prize: u64) -> String {
    if prize == 0 {
        return "—".to_string();
    }
    let digits = prize.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    format!("{out} ₩")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Tirage", "Date", "Numéros", "Bonus", "Gagnants R1", "Gains R1"]);

    for draw in draws {
        table.add_row(vec![
            &draw.draw_no.to_string(),
            &draw.date.to_string(),
            &format_numbers(&draw.sorted_numbers()),
            &format!("{:2}", draw.bonus),
            &draw.winners_1st.to_string(),
            &format_prize(draw.prize_1st),
        ]);
    }

    println!("{table}");
}

pub fn display_page(page: &DrawPage) {
    display_draws(&page.draws);
    println!(
        "Page {}/{} — {} tirage(s), {} par page",
        page.page, page.total_pages, page.total, page.per_page
    );
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total enregistrements : {}", result.total_records);
    println!("  Insérés               : {}", result.inserted);
    println!("  Doublons ignorés      : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs               : {}", result.errors);
    }
}

fn tag_cell(number: u8, hot: &[NumberCount], cold: &[NumberCount]) -> Cell {
    let is_hot = hot.iter().any(|c| c.number == number);
    let is_cold = cold.iter().any(|c| c.number == number);
    match (is_hot, is_cold) {
        (true, false) => Cell::new("HOT").fg(Color::Green),
        (false, true) => Cell::new("COLD").fg(Color::Red),
        (true, true) => Cell::new("HOT/COLD").fg(Color::Yellow),
        (false, false) => Cell::new("-").fg(Color::White),
    }
}

pub fn display_stats(stats: &HistoryStats, window: usize) {
    println!("\n📊 Statistiques sur {} tirages", stats.total_draws);
    if let Some(latest) = &stats.latest_draw {
        println!(
            "   Dernier tirage : n°{} du {} ({} + bonus {})",
            latest.draw_no,
            latest.date,
            format_numbers(&latest.sorted_numbers()),
            latest.bonus
        );
    }

    println!("\n── Fréquences (récente = {} derniers tirages) ──", window);
    let mut table = new_table(vec!["Numéro", "Fréquence", "Récente", "Tag"]);

    let mut rows: Vec<(u8, u32)> = stats.frequency.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    for (number, count) in rows {
        table.add_row(vec![
            Cell::new(format!("{:2}", number)),
            Cell::new(count.to_string()),
            Cell::new(stats.recent_frequency.get(number).to_string()),
            tag_cell(number, &stats.hot_numbers, &stats.cold_numbers),
        ]);
    }
    println!("{table}");

    println!("\n── Numéros chauds / froids ──");
    let mut table = new_table(vec!["Rang", "Chaud", "Sorties", "Froid", "Sorties"]);
    for (i, (hot, cold)) in stats.hot_numbers.iter().zip(stats.cold_numbers.iter()).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:2}", hot.number)).fg(Color::Green),
            Cell::new(hot.count),
            Cell::new(format!("{:2}", cold.number)).fg(Color::Red),
            Cell::new(cold.count),
        ]);
    }
    println!("{table}");

    println!("\n── Répartition par tranche ──");
    let mut table = new_table(vec!["Tranche", "Part"]);
    for (bucket, pct) in stats.range_analysis.iter() {
        table.add_row(vec![bucket.label().to_string(), format!("{:.1} %", pct)]);
    }
    println!("{table}");

    println!(
        "\n── Pair / impair (moyenne {:.2} impairs, {:.2} pairs) ──",
        stats.odd_even.avg_odd, stats.odd_even.avg_even
    );
    let mut table = new_table(vec!["Impairs:Pairs", "Tirages"]);
    for combo in &stats.odd_even.combos {
        table.add_row(vec![combo.combo.clone(), combo.count.to_string()]);
    }
    println!("{table}");

    println!(
        "\nNuméros consécutifs : {}/{} tirages ({:.1} %)",
        stats.consecutive.consecutive_draws, stats.consecutive.total_draws, stats.consecutive.percentage
    );
    println!(
        "Somme des numéros   : moyenne {:.1}, min {}, max {}, écart-type {:.1}",
        stats.sum_stats.avg, stats.sum_stats.min, stats.sum_stats.max, stats.sum_stats.std
    );
}

pub fn display_predictions(sets: &[PredictionSet], next_draw: u32) {
    println!("\n🎲 Suggestions pour le tirage n°{next_draw}\n");

    let mut table = new_table(vec!["#", "Numéros", "Tranches"]);

    for (i, set) in sets.iter().enumerate() {
        let buckets = set
            .bucket_counts()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("/");
        table.add_row(vec![
            &format!("{}", i + 1),
            &set.to_string(),
            &buckets,
        ]);
    }
    println!("{table}");
    println!("Rappel : les tirages sont uniformes, ces grilles ne sont que des statistiques descriptives.");
}
