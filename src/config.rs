use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

use crate::scene::{BAR_COUNT_RANGE, SENSITIVITY_RANGE};

#[derive(Debug, Clone)]
pub struct Config {
    pub fft_size: usize,
    pub target_fps_ms: u64,
    pub sensitivity: u16,
    pub bar_count: usize,
}

impl Config {
    pub fn defaults() -> Self {
        Self {
            fft_size: 2048,
            target_fps_ms: 16,
            sensitivity: 50,
            bar_count: 60,
        }
    }

    pub fn load() -> Result<Self> {
        let mut cfg = Self::defaults();

        // file first, env second.
        if let Some(file_cfg) = load_file_config()? {
            cfg.apply_file(file_cfg);
        }

        cfg.apply_env();
        cfg.sanitize();

        Ok(cfg)
    }

    fn apply_file(&mut self, fc: FileConfig) {
        if let Some(v) = fc.fft_size {
            self.fft_size = v;
        }
        if let Some(v) = fc.target_fps_ms {
            self.target_fps_ms = v;
        }
        if let Some(v) = fc.sensitivity {
            self.sensitivity = v;
        }
        if let Some(v) = fc.bar_count {
            self.bar_count = v;
        }
    }

    fn apply_env(&mut self) {
        if let Some(v) = env_parse::<usize>("RONDO_FFT_SIZE") {
            self.fft_size = v;
        }
        if let Some(v) = env_parse::<u64>("RONDO_TARGET_FPS_MS") {
            self.target_fps_ms = v;
        }
        if let Some(v) = env_parse::<u16>("RONDO_SENSITIVITY") {
            self.sensitivity = v;
        }
        if let Some(v) = env_parse::<usize>("RONDO_BAR_COUNT") {
            self.bar_count = v;
        }
    }

    fn sanitize(&mut self) {
        // clamp instead of failing
        self.fft_size = self.fft_size.clamp(512, 4096);
        if !self.fft_size.is_power_of_two() {
            self.fft_size = self.fft_size.next_power_of_two().min(4096);
        }

        self.target_fps_ms = self.target_fps_ms.clamp(8, 50);

        self.sensitivity = self
            .sensitivity
            .clamp(*SENSITIVITY_RANGE.start(), *SENSITIVITY_RANGE.end());
        self.bar_count = self
            .bar_count
            .clamp(*BAR_COUNT_RANGE.start(), *BAR_COUNT_RANGE.end());
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    pub fft_size: Option<usize>,
    pub target_fps_ms: Option<u64>,
    pub sensitivity: Option<u16>,
    pub bar_count: Option<usize>,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

fn load_file_config() -> Result<Option<FileConfig>> {
    if let Ok(p) = env::var("RONDO_CONFIG") {
        let path = PathBuf::from(p);
        if !path.exists() {
            anyhow::bail!(
                "RONDO_CONFIG points to a missing file: {}",
                path.display()
            );
        }
        return Ok(Some(read_toml(&path)?));
    }

    let path = dirs::config_dir()
        .context("failed to resolve config directory")?
        .join("rondo.toml");

    if path.exists() {
        return Ok(Some(read_toml(&path)?));
    }

    Ok(None)
}

fn read_toml(path: &PathBuf) -> Result<FileConfig> {
    let s = fs::read_to_string(path).with_context(|| {
        format!("failed to read config: {}", path.display())
    })?;
    toml::from_str::<FileConfig>(&s).with_context(|| {
        format!("invalid TOML in {}", path.display())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_wild_values() {
        let mut cfg = Config {
            fft_size: 100_000,
            target_fps_ms: 1,
            sensitivity: 9999,
            bar_count: 0,
        };
        cfg.sanitize();

        assert_eq!(cfg.fft_size, 4096);
        assert_eq!(cfg.target_fps_ms, 8);
        assert_eq!(cfg.sensitivity, *SENSITIVITY_RANGE.end());
        assert_eq!(cfg.bar_count, *BAR_COUNT_RANGE.start());
    }

    #[test]
    fn sanitize_rounds_fft_size_to_power_of_two() {
        let mut cfg = Config::defaults();
        cfg.fft_size = 3000;
        cfg.sanitize();
        assert_eq!(cfg.fft_size, 4096);

        cfg.fft_size = 600;
        cfg.sanitize();
        assert_eq!(cfg.fft_size, 1024);
    }

    #[test]
    fn defaults_survive_sanitize_unchanged() {
        let mut cfg = Config::defaults();
        let before = cfg.clone();
        cfg.sanitize();

        assert_eq!(cfg.fft_size, before.fft_size);
        assert_eq!(cfg.target_fps_ms, before.target_fps_ms);
        assert_eq!(cfg.sensitivity, before.sensitivity);
        assert_eq!(cfg.bar_count, before.bar_count);
    }
}
