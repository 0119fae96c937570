use std::fs::File;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Náyade zone codes known to hold the beaches this job reports on.
pub const BEACH_IDS: RangeInclusive<u32> = 1..=9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_template")]
    pub template: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_adopted_by")]
    pub adopted_by: String,

    /// Optional second file with every measurement of every beach.
    #[serde(default = "default_history")]
    pub history: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            template: default_template(),
            output: default_output(),
            adopted_by: default_adopted_by(),
            history: default_history(),
        }
    }
}

fn default_base_url() -> String {
    String::from(
        "https://nayadeciudadano.sanidad.gob.es/Splayas/ciudadano/ciudadanoVerZonaAction.do",
    )
}

fn default_user_agent() -> String {
    String::from("calidad-aguas")
}

fn default_template() -> PathBuf {
    PathBuf::from("templates/calidad-aguas.template.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("data/calidad-aguas.csv")
}

fn default_adopted_by() -> String {
    String::from("penyaskito (scrapping)")
}

fn default_history() -> Option<PathBuf> {
    None
}

impl ScraperConfig {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Couldn't open config {}", path.display()))?;
        let conf = serde_yaml::from_reader(file)
            .with_context(|| format!("Couldn't parse config {}", path.display()))?;
        Ok(conf)
    }

    /// Location page of a zone: administrative data, name, sampling point, coordinates.
    pub fn detail_url(&self, id: u32) -> String {
        format!("{}?codZona={id}", self.base_url)
    }

    /// Samples tab of a zone, latest measurement first.
    pub fn samples_url(&self, id: u32) -> String {
        format!("{}?pestanya=3&codZona={id}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_substitute_zone_code() {
        let conf = ScraperConfig {
            base_url: "http://nayade.msc.es/Splayas/ciudadano/ciudadanoVerZonaAction.do".into(),
            ..Default::default()
        };
        assert_eq!(
            conf.detail_url(7),
            "http://nayade.msc.es/Splayas/ciudadano/ciudadanoVerZonaAction.do?codZona=7"
        );
        assert_eq!(
            conf.samples_url(7),
            "http://nayade.msc.es/Splayas/ciudadano/ciudadanoVerZonaAction.do?pestanya=3&codZona=7"
        );
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let conf: ScraperConfig =
            serde_yaml::from_str("output: out/aguas.csv\nadoptedBy: someone\n").unwrap();
        assert_eq!(conf.output, PathBuf::from("out/aguas.csv"));
        assert_eq!(conf.adopted_by, "someone");
        assert_eq!(conf.base_url, default_base_url());
        assert_eq!(conf.template, default_template());
        assert_eq!(conf.history, None);
    }

    #[test]
    fn history_path_from_yaml() {
        let conf: ScraperConfig =
            serde_yaml::from_str("history: data/calidad-aguas.historico.csv\n").unwrap();
        assert_eq!(
            conf.history,
            Some(PathBuf::from("data/calidad-aguas.historico.csv"))
        );
    }

    #[test]
    fn beach_ids_are_fixed() {
        assert_eq!(BEACH_IDS.collect::<Vec<_>>(), (1..10).collect::<Vec<_>>());
    }
}
