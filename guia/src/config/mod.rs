//! Configuration for the pipeline.
//!
//! Settings are grouped per component, one struct per `[section]` of the
//! INI config file at `~/.guia/config.ini`:
//!
//! - `[gatekeeper]` - provider profile and debounce thresholds
//! - `[geocoder]` - reverse-geocoding service URL and timeout
//! - `[cache]` - address cache bound and fingerprint precision
//!
//! A missing file means defaults; a present file only needs the keys it
//! wants to override.

mod file;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CacheSettings, ConfigFile, GatekeeperSettings, GeocoderSettings};
