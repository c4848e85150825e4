//! Schedule data model: weekday codes, periods, weekly hours, date overrides
//! and the absolute (date-keyed) week.
//!
//! Times of day are plain milliseconds elapsed since local midnight, the unit
//! Waitwhile uses for its `periods`. Calendar dates are carried as `YYYYMMDD`
//! integers ([`DateKey`]) so they can be compared with the override keys the
//! service sends.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{HoursError, Result};

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// Weekday code as used by the Waitwhile hours payload.
///
/// Declaration order is Monday first, so the derived `Ord` matches the
/// display order and [`DayCode::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayCode {
    /// All codes, Monday first.
    pub const ALL: [DayCode; 7] = [
        DayCode::Mon,
        DayCode::Tue,
        DayCode::Wed,
        DayCode::Thu,
        DayCode::Fri,
        DayCode::Sat,
        DayCode::Sun,
    ];

    /// Display index, Monday = 0 through Sunday = 6.
    pub fn index(self) -> u8 {
        match self {
            DayCode::Mon => 0,
            DayCode::Tue => 1,
            DayCode::Wed => 2,
            DayCode::Thu => 3,
            DayCode::Fri => 4,
            DayCode::Sat => 5,
            DayCode::Sun => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayCode::Mon => "mon",
            DayCode::Tue => "tue",
            DayCode::Wed => "wed",
            DayCode::Thu => "thu",
            DayCode::Fri => "fri",
            DayCode::Sat => "sat",
            DayCode::Sun => "sun",
        }
    }

    /// Code of the weekday `date` falls on.
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayCode {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayCode::Mon,
            Weekday::Tue => DayCode::Tue,
            Weekday::Wed => DayCode::Wed,
            Weekday::Thu => DayCode::Thu,
            Weekday::Fri => DayCode::Fri,
            Weekday::Sat => DayCode::Sat,
            Weekday::Sun => DayCode::Sun,
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayCode {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self> {
        DayCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| HoursError::MalformedPayload(format!("unknown day code '{}'", s)))
    }
}

/// A contiguous open interval within a day, in milliseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: i64,
    pub to: i64,
}

impl Period {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }
}

/// Opening state and periods for one day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub is_open: bool,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl DaySchedule {
    pub fn open(periods: Vec<Period>) -> Self {
        Self {
            is_open: true,
            periods,
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }
}

/// `YYYYMMDD` calendar date key, e.g. `20261019`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DateKey(u32);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date.year() as u32 * 10_000 + date.month() * 100 + date.day())
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt((self.0 / 10_000) as i32, (self.0 / 100) % 100, self.0 % 100)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey::from_date(date)
    }
}

impl TryFrom<u32> for DateKey {
    type Error = HoursError;

    fn try_from(value: u32) -> Result<Self> {
        let key = DateKey(value);
        match key.to_date() {
            Some(_) => Ok(key),
            None => Err(HoursError::MalformedPayload(format!(
                "'{}' is not a valid YYYYMMDD date",
                value
            ))),
        }
    }
}

impl FromStr for DateKey {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 8 {
            return Err(HoursError::MalformedPayload(format!(
                "'{}' is not a valid YYYYMMDD date",
                s
            )));
        }
        let value: u32 = s.parse().map_err(|_| {
            HoursError::MalformedPayload(format!("'{}' is not a valid YYYYMMDD date", s))
        })?;
        DateKey::try_from(value)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

/// Writes a keyed schedule map as a JSON-style object with string keys.
fn serialize_keyed<'a, S, K>(
    entries: impl ExactSizeIterator<Item = (K, &'a DaySchedule)>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    K: fmt::Display,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, schedule) in entries {
        map.serialize_entry(&key.to_string(), schedule)?;
    }
    map.end()
}

/// Recurring weekly hours keyed by weekday code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, DaySchedule>")]
pub struct WeeklyHours {
    days: BTreeMap<DayCode, DaySchedule>,
}

impl WeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: DayCode, schedule: DaySchedule) -> Option<DaySchedule> {
        self.days.insert(day, schedule)
    }

    pub fn get(&self, day: DayCode) -> Option<&DaySchedule> {
        self.days.get(&day)
    }

    /// Like [`WeeklyHours::get`], but a missing day is an error.
    pub fn day(&self, day: DayCode) -> Result<&DaySchedule> {
        self.days.get(&day).ok_or(HoursError::MissingScheduleDay(day))
    }

    /// Entries in Monday-first order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DayCode, &DaySchedule)> {
        self.days.iter().map(|(day, schedule)| (*day, schedule))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(DayCode, DaySchedule)> for WeeklyHours {
    fn from_iter<I: IntoIterator<Item = (DayCode, DaySchedule)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, DaySchedule>> for WeeklyHours {
    type Error = HoursError;

    fn try_from(raw: BTreeMap<String, DaySchedule>) -> Result<Self> {
        raw.into_iter()
            .map(|(code, schedule)| -> Result<(DayCode, DaySchedule)> {
                Ok((code.parse()?, schedule))
            })
            .collect()
    }
}

impl Serialize for WeeklyHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_keyed(self.iter(), serializer)
    }
}

/// Date-specific schedules that replace the weekly pattern (holidays,
/// special hours).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, DaySchedule>")]
pub struct DateOverrideMap {
    dates: BTreeMap<DateKey, DaySchedule>,
}

impl DateOverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: DateKey, schedule: DaySchedule) -> Option<DaySchedule> {
        self.dates.insert(date, schedule)
    }

    pub fn get(&self, date: DateKey) -> Option<&DaySchedule> {
        self.dates.get(&date)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DateKey, &DaySchedule)> {
        self.dates.iter().map(|(date, schedule)| (*date, schedule))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<(DateKey, DaySchedule)> for DateOverrideMap {
    fn from_iter<I: IntoIterator<Item = (DateKey, DaySchedule)>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, DaySchedule>> for DateOverrideMap {
    type Error = HoursError;

    fn try_from(raw: BTreeMap<String, DaySchedule>) -> Result<Self> {
        raw.into_iter()
            .map(|(key, schedule)| -> Result<(DateKey, DaySchedule)> {
                Ok((key.parse()?, schedule))
            })
            .collect()
    }
}

impl Serialize for DateOverrideMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_keyed(self.iter(), serializer)
    }
}

/// Schedule keyed by concrete calendar date, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsoluteWeek {
    dates: BTreeMap<DateKey, DaySchedule>,
}

impl AbsoluteWeek {
    pub(crate) fn from_map(dates: BTreeMap<DateKey, DaySchedule>) -> Self {
        Self { dates }
    }

    pub fn get(&self, date: DateKey) -> Option<&DaySchedule> {
        self.dates.get(&date)
    }

    pub fn get_date(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.get(DateKey::from_date(date))
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.dates.contains_key(&date)
    }

    pub fn keys(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.dates.keys().copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DateKey, &DaySchedule)> {
        self.dates.iter().map(|(date, schedule)| (*date, schedule))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Serialize for AbsoluteWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_keyed(self.iter(), serializer)
    }
}

/// Which set of hours on the waitlist is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursKind {
    #[default]
    Business,
    Waitlist,
    Booking,
}

impl HoursKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HoursKind::Business => "business",
            HoursKind::Waitlist => "waitlist",
            HoursKind::Booking => "booking",
        }
    }
}

impl fmt::Display for HoursKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HoursKind {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "business" => Ok(HoursKind::Business),
            "waitlist" => Ok(HoursKind::Waitlist),
            "booking" => Ok(HoursKind::Booking),
            _ => Err(HoursError::InvalidHoursKind(s.to_string())),
        }
    }
}
