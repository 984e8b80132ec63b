//! Person module - the people recorded in the family tree

use std::fmt;
use std::str::FromStr;

/// Stable identifier for a person
///
/// Ids are assigned as `max(existing) + 1` and never reused. They are numeric
/// in memory and only become strings at the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(u64);

impl PersonId {
    /// The id handed out when no people exist yet
    pub const FIRST: PersonId = PersonId(1);

    /// Create a PersonId from a raw value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse a PersonId from its decimal string form
    ///
    /// # Examples
    ///
    /// ```
    /// use kinship_domain::PersonId;
    ///
    /// assert_eq!(PersonId::from_string("7").unwrap().value(), 7);
    /// assert!(PersonId::from_string("abc").is_err());
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid person id: '{}'", s));
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid person id '{}': {}", s, e))
    }

    /// Next id after the largest of `ids`, or [`PersonId::FIRST`] when empty
    ///
    /// Max+1 rather than gap-filling: ids of removed or skipped records are
    /// never handed out again. Returns `None` when the largest id is
    /// `u64::MAX`.
    pub fn next_after<I>(ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = PersonId>,
    {
        match ids.into_iter().max() {
            Some(max) => max.0.checked_add(1).map(Self),
            None => Some(Self::FIRST),
        }
    }
}

/// No id is left above the largest one in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdsExhausted;

impl fmt::Display for IdsExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no person id left: the largest id in use is {}",
            u64::MAX
        )
    }
}

impl std::error::Error for IdsExhausted {}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PersonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Gender of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Any other gender
    Other,
}

impl Gender {
    /// All genders, in form display order
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Parse a gender case-insensitively
    ///
    /// Returns `None` for anything unrecognized, including empty strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person in the family tree
///
/// Optional text fields are empty strings when unknown, matching the
/// persisted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Given name
    pub firstname: String,

    /// Family name (may be empty)
    pub surname: String,

    /// Gender, if recorded
    pub gender: Option<Gender>,

    /// Year of birth, free-form
    pub birth_year: String,

    /// Year of death, free-form
    pub death_year: String,

    /// Year of marriage; empty or exactly four digits
    pub marriage_year: String,
}

impl Person {
    /// Create a person with only an id and a first name
    pub fn new(id: PersonId, firstname: impl Into<String>) -> Self {
        Self {
            id,
            firstname: firstname.into(),
            surname: String::new(),
            gender: None,
            birth_year: String::new(),
            death_year: String::new(),
            marriage_year: String::new(),
        }
    }

    /// First name and surname joined by a space, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.surname).trim().to_string()
    }

    /// Key used to detect the same person submitted twice
    pub fn name_key(&self) -> (String, String) {
        name_key(&self.firstname, &self.surname)
    }

    /// Gender as display text, empty when unknown
    pub fn gender_str(&self) -> &'static str {
        self.gender.map(|g| g.as_str()).unwrap_or("")
    }

    /// Clear the marriage year unless it is a four-digit numeral
    ///
    /// Returns `true` if a value was cleared.
    pub fn sanitize_marriage_year(&mut self) -> bool {
        if is_valid_marriage_year(&self.marriage_year) {
            return false;
        }
        self.marriage_year.clear();
        true
    }
}

/// Details of a person who has not been assigned an id yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPerson {
    /// Given name
    pub firstname: String,
    /// Family name
    pub surname: String,
    /// Gender, if known
    pub gender: Option<Gender>,
    /// Year of birth
    pub birth_year: String,
    /// Year of death
    pub death_year: String,
    /// Year of marriage
    pub marriage_year: String,
}

impl NewPerson {
    /// Start a new person with just a first name
    pub fn named(firstname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            ..Self::default()
        }
    }

    /// Key used to detect the same person submitted twice
    pub fn name_key(&self) -> (String, String) {
        name_key(&self.firstname, &self.surname)
    }

    /// Attach an id, producing a full [`Person`]
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            firstname: self.firstname,
            surname: self.surname,
            gender: self.gender,
            birth_year: self.birth_year,
            death_year: self.death_year,
            marriage_year: self.marriage_year,
        }
    }
}

/// Lower-cased, trimmed `(firstname, surname)` pair
pub fn name_key(firstname: &str, surname: &str) -> (String, String) {
    (
        firstname.trim().to_lowercase(),
        surname.trim().to_lowercase(),
    )
}

/// Whether `year` is acceptable as a marriage year (empty or four digits)
pub fn is_valid_marriage_year(year: &str) -> bool {
    year.is_empty() || (year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}
