use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Cities the dashboard knows about. The set is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityId {
    Zagreb,
    Split,
    Dubrovnik,
    Rijeka,
    Zadar,
    Osijek,
}

impl CityId {
    /// Lowercase key, also used as the API path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            CityId::Zagreb => "zagreb",
            CityId::Split => "split",
            CityId::Dubrovnik => "dubrovnik",
            CityId::Rijeka => "rijeka",
            CityId::Zadar => "zadar",
            CityId::Osijek => "osijek",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CityId::Zagreb => "Zagreb",
            CityId::Split => "Split",
            CityId::Dubrovnik => "Dubrovnik",
            CityId::Rijeka => "Rijeka",
            CityId::Zadar => "Zadar",
            CityId::Osijek => "Osijek",
        }
    }

    pub const fn all() -> &'static [CityId] {
        &[
            CityId::Zagreb,
            CityId::Split,
            CityId::Dubrovnik,
            CityId::Rijeka,
            CityId::Zadar,
            CityId::Osijek,
        ]
    }

    /// Cities shown on the dashboard when the config does not list any.
    pub const fn default_set() -> &'static [CityId] {
        &[
            CityId::Zagreb,
            CityId::Split,
            CityId::Dubrovnik,
            CityId::Rijeka,
            CityId::Zadar,
        ]
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CityId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        CityId::all()
            .iter()
            .copied()
            .find(|city| city.as_str() == lower)
            .ok_or_else(|| {
                let supported: Vec<&str> = CityId::all().iter().map(CityId::as_str).collect();
                anyhow::anyhow!(
                    "Unknown city '{value}'. Supported cities: {}.",
                    supported.join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_id_as_str_roundtrip() {
        for id in CityId::all() {
            let parsed = CityId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(CityId::try_from(" Dubrovnik ").unwrap(), CityId::Dubrovnik);
        assert_eq!(CityId::try_from("SPLIT").unwrap(), CityId::Split);
    }

    #[test]
    fn unknown_city_error_lists_supported() {
        let err = CityId::try_from("vukovar").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown city 'vukovar'"));
        assert!(msg.contains("zagreb"));
    }

    #[test]
    fn default_set_leaves_out_osijek() {
        assert_eq!(CityId::default_set().len(), 5);
        assert!(!CityId::default_set().contains(&CityId::Osijek));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CityId::Rijeka).unwrap();
        assert_eq!(json, "\"rijeka\"");
        let back: CityId = serde_json::from_str("\"zadar\"").unwrap();
        assert_eq!(back, CityId::Zadar);
    }
}
