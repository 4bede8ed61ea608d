use std::path::PathBuf;
use std::str::FromStr;

use crate::speech::Voice;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeechBackend {
    #[default]
    Festival,
    Silent,
}

impl FromStr for SpeechBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "festival" => Ok(SpeechBackend::Festival),
            "silent" | "off" | "none" => Ok(SpeechBackend::Silent),
            other => Err(format!("unknown speech backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub voice: Voice,
    pub speech: SpeechBackend,
    /// Fixed selection seed; random when unset
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./.quiz"),
            log_level: "info".to_string(),
            voice: Voice::default(),
            speech: SpeechBackend::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("DANCI_SPELL_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let log_level = lookup("RUST_LOG").unwrap_or(defaults.log_level);

        let voice = parse_or_default(&lookup, "DANCI_SPELL_VOICE", defaults.voice);
        let speech = parse_or_default(&lookup, "DANCI_SPELL_SPEECH", defaults.speech);

        let seed = lookup("DANCI_SPELL_SEED").and_then(|value| match value.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(%value, "DANCI_SPELL_SEED is not a u64, using a random seed");
                None
            }
        });

        Self {
            data_dir,
            log_level,
            voice,
            speech,
            seed,
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(value) => value.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(key, %value, ?default, "unrecognised value, using default");
            default
        }),
        None => default,
    }
}
