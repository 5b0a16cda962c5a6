//! Florida place-name gazetteer and its derived matching keys.
//!
//! The store holds seven ordered place categories plus a short `other` list of
//! state abbreviations. Two derived forms feed the hashtag classifier:
//!
//! - the *pure* form: every name lower-cased with spaces, periods and
//!   apostrophes removed (`"St. Pete Beach"` -> `"stpetebeach"`)
//! - the *categorized* form: names with a category word attached
//!   (`"Pasco"` -> `"PascoCounty"`, `"Trout"` -> `"LakeTroutLake"`)

use crate::config::FLORIDA_ABBREVIATIONS;
use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const BUNDLED_GAZETTEER: &str = include_str!("../data/gazetteer.csv");

const BEACH_SUFFIXES: [&str; 4] = ["Beach", "Key", "Island", "City"];
const CITY_SUFFIXES: [&str; 1] = ["City"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Beach,
    City,
    County,
    Lake,
    River,
    Bay,
    Town,
    Other,
}

impl Category {
    /// Place categories in gazetteer order, excluding `Other`.
    pub const PLACES: [Category; 7] = [
        Category::Beach,
        Category::City,
        Category::County,
        Category::Lake,
        Category::River,
        Category::Bay,
        Category::Town,
    ];

    pub fn parse(raw: &str) -> Result<Self, DataError> {
        match raw.trim().to_lowercase().as_str() {
            "beach" => Ok(Category::Beach),
            "city" => Ok(Category::City),
            "county" => Ok(Category::County),
            "lake" => Ok(Category::Lake),
            "river" => Ok(Category::River),
            "bay" => Ok(Category::Bay),
            "town" => Ok(Category::Town),
            "other" => Ok(Category::Other),
            _ => Err(DataError::UnknownCategory(raw.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GazetteerRow {
    category: String,
    name: String,
}

/// The seven place sequences as loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PureLocations {
    pub beaches: Vec<String>,
    pub cities: Vec<String>,
    pub counties: Vec<String>,
    pub lakes: Vec<String>,
    pub rivers: Vec<String>,
    pub bays: Vec<String>,
    pub towns: Vec<String>,
}

/// Place names with their category word attached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategorizedLocations {
    pub beaches: Vec<String>,
    pub cities: Vec<String>,
    pub counties: Vec<String>,
    pub lakes: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    places: PureLocations,
    other: Vec<String>,
}

impl Gazetteer {
    /// Gazetteer shipped with the crate.
    pub fn bundled() -> Result<Self, DataError> {
        Self::from_reader(BUNDLED_GAZETTEER.as_bytes())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let gazetteer = Self::from_reader(file)?;
        info!("Loaded gazetteer from {:?}", path);
        Ok(gazetteer)
    }

    /// Reads `category,name` rows. Row order within a category is kept.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut gazetteer = Gazetteer::default();

        for result in rdr.deserialize::<GazetteerRow>() {
            let row = result?;
            if row.name.is_empty() {
                debug!("Skipping empty gazetteer entry in category '{}'", row.category);
                continue;
            }
            let category = Category::parse(&row.category)?;
            gazetteer.push(category, row.name);
        }

        if Category::PLACES.iter().all(|c| gazetteer.names(*c).is_empty()) {
            return Err(DataError::EmptyGazetteer);
        }

        if gazetteer.other.is_empty() {
            gazetteer.other = FLORIDA_ABBREVIATIONS.iter().map(|s| s.to_string()).collect();
        }

        debug!(
            "Gazetteer: {} beaches, {} cities, {} counties, {} lakes, {} rivers, {} bays, {} towns",
            gazetteer.places.beaches.len(),
            gazetteer.places.cities.len(),
            gazetteer.places.counties.len(),
            gazetteer.places.lakes.len(),
            gazetteer.places.rivers.len(),
            gazetteer.places.bays.len(),
            gazetteer.places.towns.len(),
        );

        Ok(gazetteer)
    }

    /// Builds a gazetteer directly from category/name pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Category, S)>,
        S: Into<String>,
    {
        let mut gazetteer = Gazetteer::default();
        for (category, name) in entries {
            gazetteer.push(category, name.into());
        }
        gazetteer
    }

    fn push(&mut self, category: Category, name: String) {
        let list = match category {
            Category::Beach => &mut self.places.beaches,
            Category::City => &mut self.places.cities,
            Category::County => &mut self.places.counties,
            Category::Lake => &mut self.places.lakes,
            Category::River => &mut self.places.rivers,
            Category::Bay => &mut self.places.bays,
            Category::Town => &mut self.places.towns,
            Category::Other => &mut self.other,
        };
        list.push(name);
    }

    pub fn names(&self, category: Category) -> &[String] {
        match category {
            Category::Beach => &self.places.beaches,
            Category::City => &self.places.cities,
            Category::County => &self.places.counties,
            Category::Lake => &self.places.lakes,
            Category::River => &self.places.rivers,
            Category::Bay => &self.places.bays,
            Category::Town => &self.places.towns,
            Category::Other => &self.other,
        }
    }

    /// Raw names of the seven place categories, in gazetteer order.
    pub fn place_names(&self) -> impl Iterator<Item = &str> {
        Category::PLACES
            .into_iter()
            .flat_map(move |c| self.names(c).iter().map(String::as_str))
    }

    pub fn pure_locations(&self) -> PureLocations {
        self.places.clone()
    }

    /// Every place name plus the abbreviations, as normalized matching keys.
    pub fn pure_locations_combined(&self) -> Vec<String> {
        self.place_names()
            .chain(self.other.iter().map(String::as_str))
            .map(normalize_entry)
            .collect()
    }

    pub fn category_adder(&self) -> CategorizedLocations {
        CategorizedLocations {
            beaches: suffix_all(&self.places.beaches, suffix_beach),
            cities: suffix_all(&self.places.cities, suffix_city),
            counties: suffix_all(&self.places.counties, suffix_county),
            lakes: suffix_all(&self.places.lakes, affix_lake),
        }
    }

    /// Lower-cased, flattened form of [`Gazetteer::category_adder`].
    pub fn category_adder_combined(&self) -> Vec<String> {
        let categorized = self.category_adder();
        categorized
            .beaches
            .into_iter()
            .chain(categorized.cities)
            .chain(categorized.counties)
            .chain(categorized.lakes)
            .map(|name| name.to_lowercase())
            .collect()
    }
}

/// Lower-cases a place name and removes whitespace, periods and apostrophes.
pub fn normalize_entry(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '\'')
        .flat_map(char::to_lowercase)
        .collect()
}

fn suffix_all(names: &[String], rule: fn(&str) -> String) -> Vec<String> {
    names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| rule(name))
        .collect()
}

fn strip_spaces(name: &str) -> String {
    name.replace(' ', "")
}

fn last_word(name: &str) -> &str {
    name.rsplit(' ').next().unwrap_or(name)
}

/// Output never contains spaces, including names that keep their own suffix
/// (`"Siesta Key"` -> `"SiestaKey"`).
pub fn suffix_beach(name: &str) -> String {
    if BEACH_SUFFIXES.contains(&last_word(name)) {
        strip_spaces(name)
    } else {
        format!("{}Beach", strip_spaces(name))
    }
}

pub fn suffix_city(name: &str) -> String {
    if CITY_SUFFIXES.contains(&last_word(name)) {
        strip_spaces(name)
    } else {
        format!("{}City", strip_spaces(name))
    }
}

pub fn suffix_county(name: &str) -> String {
    format!("{}County", strip_spaces(name))
}

/// Lakes not already named "Lake ..." get the word on both ends.
pub fn affix_lake(name: &str) -> String {
    let first = name.split(' ').next().unwrap_or(name);
    if first.to_lowercase() == "lake" {
        strip_spaces(name)
    } else {
        format!("Lake{}Lake", strip_spaces(name))
    }
}
