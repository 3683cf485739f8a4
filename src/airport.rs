use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use std::sync::Arc;

pub type PortCode = Arc<str>;

/// Leading three-letter code of a displayed port label, e.g. `"del (t3)"` -> `"DEL"`.
pub fn base_code(display: &str) -> PortCode {
    let code: String = display
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    Arc::from(code)
}

/// Identity of a hub dataset, normalised through [`base_code`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HubKey(PortCode);

impl HubKey {
    pub fn new(code: &str) -> HubKey {
        HubKey(base_code(code))
    }

    pub fn code(&self) -> &PortCode {
        &self.0
    }
}

impl From<&str> for HubKey {
    fn from(value: &str) -> Self {
        HubKey::new(value)
    }
}

impl From<String> for HubKey {
    fn from(value: String) -> Self {
        HubKey::new(&value)
    }
}

impl From<HubKey> for String {
    fn from(value: HubKey) -> Self {
        value.0.to_string()
    }
}

impl Borrow<str> for HubKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HubKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    India,
    SouthAsia,
    SoutheastAsia,
    EastAsia,
    MiddleEast,
    Europe,
    Africa,
    NorthAmerica,
    SouthAmerica,
    Oceania,
    Unknown,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::India => "India",
            Region::SouthAsia => "South Asia",
            Region::SoutheastAsia => "Southeast Asia",
            Region::EastAsia => "East Asia",
            Region::MiddleEast => "Middle East",
            Region::Europe => "Europe",
            Region::Africa => "Africa",
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Oceania => "Oceania",
            Region::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "india" => Ok(Region::India),
            "southasia" => Ok(Region::SouthAsia),
            "southeastasia" | "sea" => Ok(Region::SoutheastAsia),
            "eastasia" => Ok(Region::EastAsia),
            "middleeast" | "me" => Ok(Region::MiddleEast),
            "europe" | "eu" => Ok(Region::Europe),
            "africa" => Ok(Region::Africa),
            "northamerica" | "na" => Ok(Region::NorthAmerica),
            "southamerica" | "sa" => Ok(Region::SouthAmerica),
            "oceania" => Ok(Region::Oceania),
            "unknown" => Ok(Region::Unknown),
            _ => Err(format!("unknown region: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    Domestic,
    International,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Market::Domestic => write!(f, "Domestic"),
            Market::International => write!(f, "International"),
        }
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "dom" | "domestic" => Ok(Market::Domestic),
            "i" | "intl" | "international" => Ok(Market::International),
            _ => Err(format!("unknown market: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Catchment,
    OtherDomestic,
    International,
}

const REGIONS: &[(&str, Region)] = &[
    ("BLR", Region::India),
    ("DEL", Region::India),
    ("BOM", Region::India),
    ("MAA", Region::India),
    ("HYD", Region::India),
    ("CCU", Region::India),
    ("COK", Region::India),
    ("TRV", Region::India),
    ("CCJ", Region::India),
    ("IXE", Region::India),
    ("MYQ", Region::India),
    ("CJB", Region::India),
    ("IXM", Region::India),
    ("TRZ", Region::India),
    ("GOI", Region::India),
    ("PNQ", Region::India),
    ("AMD", Region::India),
    ("JAI", Region::India),
    ("LKO", Region::India),
    ("PAT", Region::India),
    ("GAU", Region::India),
    ("BBI", Region::India),
    ("VTZ", Region::India),
    ("NAG", Region::India),
    ("IXC", Region::India),
    ("SXR", Region::India),
    ("CMB", Region::SouthAsia),
    ("MLE", Region::SouthAsia),
    ("KTM", Region::SouthAsia),
    ("DAC", Region::SouthAsia),
    ("SIN", Region::SoutheastAsia),
    ("KUL", Region::SoutheastAsia),
    ("BKK", Region::SoutheastAsia),
    ("CGK", Region::SoutheastAsia),
    ("MNL", Region::SoutheastAsia),
    ("SGN", Region::SoutheastAsia),
    ("HKG", Region::EastAsia),
    ("PVG", Region::EastAsia),
    ("PEK", Region::EastAsia),
    ("NRT", Region::EastAsia),
    ("HND", Region::EastAsia),
    ("ICN", Region::EastAsia),
    ("DXB", Region::MiddleEast),
    ("AUH", Region::MiddleEast),
    ("DOH", Region::MiddleEast),
    ("MCT", Region::MiddleEast),
    ("BAH", Region::MiddleEast),
    ("KWI", Region::MiddleEast),
    ("RUH", Region::MiddleEast),
    ("JED", Region::MiddleEast),
    ("SHJ", Region::MiddleEast),
    ("LHR", Region::Europe),
    ("CDG", Region::Europe),
    ("FRA", Region::Europe),
    ("AMS", Region::Europe),
    ("MUC", Region::Europe),
    ("ZRH", Region::Europe),
    ("IST", Region::Europe),
    ("NBO", Region::Africa),
    ("ADD", Region::Africa),
    ("JNB", Region::Africa),
    ("CAI", Region::Africa),
    ("JFK", Region::NorthAmerica),
    ("EWR", Region::NorthAmerica),
    ("SFO", Region::NorthAmerica),
    ("ORD", Region::NorthAmerica),
    ("YYZ", Region::NorthAmerica),
    ("GRU", Region::SouthAmerica),
    ("SYD", Region::Oceania),
    ("MEL", Region::Oceania),
    ("PER", Region::Oceania),
    ("AKL", Region::Oceania),
];

const CATCHMENT: &[&str] = &[
    "COK", "TRV", "CCJ", "IXE", "MYQ", "CJB", "IXM", "TRZ", "MAA", "HYD", "GOI",
];

/// Static port classification consumed by the aggregator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferenceData {
    pub regions: HashMap<PortCode, Region>,
    /// Domestic ports beyond those whose region is [`Region::India`].
    #[serde(default)]
    pub domestic: HashSet<PortCode>,
    pub catchment: HashSet<PortCode>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        ReferenceData {
            regions: REGIONS
                .iter()
                .map(|(code, region)| (Arc::from(*code), *region))
                .collect(),
            domestic: HashSet::new(),
            catchment: CATCHMENT.iter().map(|code| Arc::from(*code)).collect(),
        }
    }
}

impl ReferenceData {
    pub fn region_of(&self, port: &str) -> Region {
        self.regions
            .get(&*base_code(port))
            .copied()
            .unwrap_or(Region::Unknown)
    }

    pub fn market_of(&self, port: &str) -> Market {
        let code = base_code(port);
        if self.region_of(&code) == Region::India || self.domestic.contains(&code) {
            Market::Domestic
        } else {
            Market::International
        }
    }

    pub fn category_of(&self, port: &str) -> Category {
        if self.catchment.contains(&base_code(port)) {
            Category::Catchment
        } else if self.market_of(port) == Market::Domestic {
            Category::OtherDomestic
        } else {
            Category::International
        }
    }

    /// Folds another table into this one, later entries winning.
    pub fn extend(&mut self, other: ReferenceOverrides) {
        self.regions.extend(
            other
                .regions
                .into_iter()
                .map(|(code, region)| (base_code(&code), region)),
        );
        self.domestic
            .extend(other.domestic.iter().map(|code| base_code(code)));
        if let Some(catchment) = other.catchment {
            self.catchment = catchment.iter().map(|code| base_code(code)).collect();
        }
    }
}

/// Scenario-level additions to the built-in tables.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReferenceOverrides {
    #[serde(default)]
    pub regions: HashMap<String, Region>,
    #[serde(default)]
    pub domestic: Vec<String>,
    /// Replaces the built-in catchment set when present.
    #[serde(default)]
    pub catchment: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_code_strips_annotation() {
        assert_eq!("DEL", base_code("DEL (T3)").as_ref());
        assert_eq!("DEL", base_code(" del*").as_ref());
        assert_eq!("BOM", base_code("BOM").as_ref());
        assert_eq!("", base_code("(x)").as_ref());
        assert_eq!(HubKey::new("blr"), HubKey::from("BLR-1"));
    }

    #[test]
    fn test_classification() {
        let reference = ReferenceData::default();
        assert_eq!(Region::Europe, reference.region_of("LHR"));
        assert_eq!(Region::Unknown, reference.region_of("ZZZ"));
        assert_eq!(Market::Domestic, reference.market_of("DEL"));
        assert_eq!(Market::International, reference.market_of("ZZZ"));
        assert_eq!(Category::Catchment, reference.category_of("COK"));
        assert_eq!(Category::OtherDomestic, reference.category_of("DEL"));
        assert_eq!(Category::International, reference.category_of("DXB"));
    }

    #[test]
    fn test_overrides() {
        let mut reference = ReferenceData::default();
        reference.extend(ReferenceOverrides {
            regions: HashMap::from([("zzz".to_string(), Region::Africa)]),
            domestic: vec!["CMB".to_string()],
            catchment: Some(vec!["DEL".to_string()]),
        });
        assert_eq!(Region::Africa, reference.region_of("ZZZ"));
        assert_eq!(Market::Domestic, reference.market_of("CMB"));
        assert_eq!(Category::Catchment, reference.category_of("DEL"));
        assert_eq!(Category::OtherDomestic, reference.category_of("COK"));
    }

    #[test]
    fn test_region_and_market_parse() {
        assert_eq!(Ok(Region::MiddleEast), "middle-east".parse::<Region>());
        assert_eq!(Ok(Market::International), "intl".parse::<Market>());
        assert!("mars".parse::<Region>().is_err());
    }
}
