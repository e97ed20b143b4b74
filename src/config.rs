use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub item_bank: Option<PathBuf>,
    pub synthetic_bank_size: usize,
    pub sim_seed: u64,
    pub sim_replications: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let item_bank = std::env::var("QUIZ_ITEM_BANK")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let synthetic_bank_size = std::env::var("QUIZ_SYNTHETIC_BANK_SIZE")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(120);

        let sim_seed = std::env::var("QUIZ_SIM_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(42);

        let sim_replications = std::env::var("QUIZ_SIM_REPLICATIONS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(50);

        Self {
            log_level,
            item_bank,
            synthetic_bank_size,
            sim_seed,
            sim_replications,
        }
    }
}
