use rand::Rng;
use serde::Serialize;

use lotto_db::models::Draw;

use crate::config::PredictorConfig;
use crate::frequency::{frequency_analysis, hot_cold_sized, recent_frequency, FrequencyTable, NumberCount};
use crate::patterns::{
    consecutive_analysis, odd_even_analysis, range_analysis, sum_analysis, ConsecutiveStats, OddEvenStats,
    RangeDistribution, SumStats,
};
use crate::sampler::{predict_numbers_with, PredictionSet};

/// Nombre de grilles jointes au rapport complet.
pub const REPORT_PREDICTIONS: usize = 5;

/// Statistiques descriptives de l'historique, sans grilles ni hasard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_draws: usize,
    pub latest_draw: Option<Draw>,
    pub frequency: FrequencyTable,
    pub recent_frequency: FrequencyTable,
    pub hot_numbers: Vec<NumberCount>,
    pub cold_numbers: Vec<NumberCount>,
    pub range_analysis: RangeDistribution,
    pub odd_even: OddEvenStats,
    pub consecutive: ConsecutiveStats,
    pub sum_stats: SumStats,
}

/// Rapport complet consommé par la couche de présentation.
/// Les statistiques sont aplaties au premier niveau du JSON, à côté de `predictions`.
#[derive(Debug, Clone, Serialize)]
pub struct FullAnalysis {
    #[serde(flatten)]
    pub stats: HistoryStats,
    pub predictions: Vec<PredictionSet>,
}

pub fn history_stats(draws: &[Draw], config: &PredictorConfig) -> HistoryStats {
    let hot_cold = hot_cold_sized(draws, config.recent_window, config.hot_cold_size);

    HistoryStats {
        total_draws: draws.len(),
        latest_draw: draws.last().cloned(),
        frequency: frequency_analysis(draws),
        recent_frequency: recent_frequency(draws, config.recent_window),
        hot_numbers: hot_cold.hot,
        cold_numbers: hot_cold.cold,
        range_analysis: range_analysis(draws),
        odd_even: odd_even_analysis(draws),
        consecutive: consecutive_analysis(draws),
        sum_stats: sum_analysis(draws),
    }
}

pub fn full_analysis<R: Rng + ?Sized>(draws: &[Draw], rng: &mut R) -> FullAnalysis {
    full_analysis_with(draws, &PredictorConfig::default(), rng)
}

pub fn full_analysis_with<R: Rng + ?Sized>(draws: &[Draw], config: &PredictorConfig, rng: &mut R) -> FullAnalysis {
    FullAnalysis {
        stats: history_stats(draws, config),
        predictions: predict_numbers_with(draws, REPORT_PREDICTIONS, config, rng),
    }
}
