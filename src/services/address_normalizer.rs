//! Normalización de direcciones
//!
//! Heurística, no un parser de direcciones: si el texto no trae una ciudad
//! explícita se asume la ciudad sede. Los falsos negativos (ciudad no
//! detectada) reciben el sufijo de la ciudad sede.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref STATE_SUFFIX: Regex = Regex::new(r"\s*-\s*[A-Za-z]{2}\s*$").unwrap();
}

/// Ciudad sede y región por defecto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeRegion {
    pub city: String,
    pub region_code: String,
    pub region_name: String,
    pub country: String,
    /// Ciudades vecinas reconocidas aunque vengan sin coma
    pub known_cities: Vec<String>,
}

impl Default for HomeRegion {
    fn default() -> Self {
        Self {
            city: "Porto Alegre".to_string(),
            region_code: "RS".to_string(),
            region_name: "Rio Grande do Sul".to_string(),
            country: "Brasil".to_string(),
            known_cities: [
                "Canoas",
                "Gravataí",
                "Novo Hamburgo",
                "Cachoeirinha",
                "Viamão",
                "Alvorada",
                "São Leopoldo",
                "Esteio",
                "Sapucaia do Sul",
                "Guaíba",
            ]
            .iter()
            .map(|city| city.to_string())
            .collect(),
        }
    }
}

impl HomeRegion {
    /// Dirección canónica de la ciudad sede, ej. "Porto Alegre - RS, Brasil"
    pub fn canonical_address(&self) -> String {
        format!("{} - {}, {}", self.city, self.region_code, self.country)
    }
}

pub struct AddressNormalizer {
    home: HomeRegion,
    home_city: Regex,
    home_region: Regex,
    trailing_city: Regex,
    known_cities: Vec<String>,
}

/// "Porto Alegre" -> `porto\s*alegre`
fn flexible_words(text: &str) -> String {
    text.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*")
}

impl AddressNormalizer {
    pub fn new(home: HomeRegion) -> Result<Self, regex::Error> {
        let home_city = Regex::new(&format!("(?i){}", flexible_words(&home.city)))?;
        let home_region = Regex::new(&format!(
            r"(?i)\b{}\b|{}",
            regex::escape(&home.region_code),
            flexible_words(&home.region_name)
        ))?;
        let trailing_city = Regex::new(&format!(
            r"(?i),\s*([A-Za-zÀ-ÿ'.\-\s]{{2,}})(?:\s*-\s*[A-Za-z]{{2}})?(?:\s*,\s*{})?\s*$",
            regex::escape(&home.country)
        ))?;
        let known_cities = home
            .known_cities
            .iter()
            .map(|city| city.trim().to_lowercase())
            .collect();

        Ok(Self {
            home,
            home_city,
            home_region,
            trailing_city,
            known_cities,
        })
    }

    pub fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.home.canonical_address();
        }

        let collapsed = WHITESPACE.replace_all(trimmed, " ").into_owned();

        if self.home_city.is_match(&collapsed) {
            if self.home_region.is_match(&collapsed) {
                return collapsed;
            }
            return format!("{}, {}, {}", collapsed, self.home.region_code, self.home.country);
        }

        if self.trailing_city.is_match(&collapsed) || self.ends_with_known_city(&collapsed) {
            return collapsed;
        }

        format!("{}, {}", collapsed, self.home.canonical_address())
    }

    /// Último segmento (sin "- UF" ni país) igual a una ciudad conocida
    fn ends_with_known_city(&self, text: &str) -> bool {
        let mut segments: Vec<&str> = text.split(',').map(str::trim).collect();
        if segments.len() > 1
            && segments
                .last()
                .is_some_and(|last| last.eq_ignore_ascii_case(&self.home.country))
        {
            segments.pop();
        }

        let Some(last) = segments.last() else {
            return false;
        };
        let city = STATE_SUFFIX.replace(last, "").trim().to_lowercase();
        self.known_cities.iter().any(|known| *known == city)
    }
}
