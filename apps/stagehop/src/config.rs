use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use client_core::{location::WatchOptions, repository::DEFAULT_PAGE_SIZE};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "stagehop.toml";
/// Longest cache lifetime accepted from settings: one week.
pub const MAX_CACHE_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub page_size: u32,
    pub page_offset: u32,
    pub cache_ttl_seconds: i64,
    pub maps_base_url: String,
    pub initial_latitude: f64,
    pub initial_longitude: f64,
    pub initial_zoom_span: f64,
    pub viewport_height: f32,
    pub upcoming_days: usize,
    pub location_interval_seconds: u64,
    pub location_min_distance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://stagehop.app".into(),
            page_size: DEFAULT_PAGE_SIZE,
            page_offset: 0,
            cache_ttl_seconds: client_core::cache::DEFAULT_CACHE_TTL_SECONDS,
            maps_base_url: client_core::directions::DEFAULT_DIRECTIONS_BASE_URL.into(),
            initial_latitude: 32.0853,
            initial_longitude: 34.7818,
            initial_zoom_span: 0.1,
            viewport_height: 800.0,
            upcoming_days: 7,
            location_interval_seconds: 10,
            location_min_distance: 10.0,
        }
    }
}

impl Settings {
    /// Rejects values the screen and the cache cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            bail!(
                "viewport_height must be a positive number, got {}",
                self.viewport_height
            );
        }
        if !(0..=MAX_CACHE_TTL_SECONDS).contains(&self.cache_ttl_seconds) {
            bail!(
                "cache_ttl_seconds must be between 0 and {MAX_CACHE_TTL_SECONDS}, got {}",
                self.cache_ttl_seconds
            );
        }
        Ok(())
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            min_interval: Duration::from_secs(self.location_interval_seconds),
            min_distance: self.location_min_distance,
        }
    }
}

/// Every key is optional; missing ones keep their default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    page_offset: Option<u32>,
    cache_ttl_seconds: Option<i64>,
    maps_base_url: Option<String>,
    initial_latitude: Option<f64>,
    initial_longitude: Option<f64>,
    initial_zoom_span: Option<f64>,
    viewport_height: Option<f32>,
    upcoming_days: Option<usize>,
    location_interval_seconds: Option<u64>,
    location_min_distance: Option<f64>,
}

/// Defaults, then the settings file, then environment variables. An
/// explicitly named file must exist; the default one is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let (file, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    match fs::read_to_string(&file) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", file.display()))?,
        Err(err) if required => {
            return Err(err).with_context(|| format!("failed to read settings file '{}'", file.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file.page_size {
        settings.page_size = v;
    }
    if let Some(v) = file.page_offset {
        settings.page_offset = v;
    }
    if let Some(v) = file.cache_ttl_seconds {
        settings.cache_ttl_seconds = v;
    }
    if let Some(v) = file.maps_base_url {
        settings.maps_base_url = v;
    }
    if let Some(v) = file.initial_latitude {
        settings.initial_latitude = v;
    }
    if let Some(v) = file.initial_longitude {
        settings.initial_longitude = v;
    }
    if let Some(v) = file.initial_zoom_span {
        settings.initial_zoom_span = v;
    }
    if let Some(v) = file.viewport_height {
        settings.viewport_height = v;
    }
    if let Some(v) = file.upcoming_days {
        settings.upcoming_days = v;
    }
    if let Some(v) = file.location_interval_seconds {
        settings.location_interval_seconds = v;
    }
    if let Some(v) = file.location_min_distance {
        settings.location_min_distance = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("STAGEHOP_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__MAPS_BASE_URL") {
        settings.maps_base_url = v;
    }

    override_parsed(&lookup, "APP__PAGE_SIZE", &mut settings.page_size);
    override_parsed(&lookup, "APP__PAGE_OFFSET", &mut settings.page_offset);
    override_parsed(&lookup, "APP__CACHE_TTL_SECONDS", &mut settings.cache_ttl_seconds);
    override_parsed(&lookup, "APP__VIEWPORT_HEIGHT", &mut settings.viewport_height);
    override_parsed(&lookup, "APP__UPCOMING_DAYS", &mut settings.upcoming_days);
}

/// Unparseable values are ignored rather than fatal.
fn override_parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, slot: &mut T) {
    if let Some(raw) = lookup(name) {
        match raw.trim().parse::<T>() {
            Ok(parsed) => *slot = parsed,
            Err(_) => tracing::warn!(variable = name, value = %raw, "ignoring unparseable setting"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
