//! Statistiques descriptives et générateur de grilles pondéré pour le Lotto 6/45.
//!
//! Toutes les fonctions prennent l'historique complet, trié par numéro de tirage
//! croissant, et ne gardent aucun état entre deux appels. Le hasard est fourni
//! par l'appelant (`rand::Rng`), ce qui rend les grilles reproductibles avec un seed.

pub mod config;
pub mod frequency;
pub mod patterns;
pub mod report;
pub mod sampler;

pub use config::PredictorConfig;
pub use frequency::{
    frequency_analysis, hot_cold_numbers, recent_frequency, FrequencyTable, HotCold, NumberCount,
};
pub use patterns::{
    consecutive_analysis, odd_even_analysis, range_analysis, sum_analysis, ConsecutiveStats, OddEvenStats,
    RangeDistribution, SumStats,
};
pub use report::{full_analysis, full_analysis_with, history_stats, FullAnalysis, HistoryStats};
pub use sampler::{predict_numbers, predict_numbers_with, PredictionSet};

/// Arrondi à `decimals` décimales, demi-valeurs loin de zéro.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
