//! Version ordering
//!
//! Two orderings exist side by side:
//! - [`Version::compare_maturity`]: general purpose total order
//! - [`Version::compare_train_identity`]: ordering of release train versions
//!   across the legacy named scheme (`Hoxton.SR1`) and the calendar scheme
//!   (`2020.0.0`). The cross-scheme rules are asymmetric.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::parse::Version;

/// First calendar year used as a release train major
pub const CALVER_MIN_MAJOR: u64 = 2020;

/// Last train released under the alphabetical naming scheme. Named trains
/// sorting after it belong to the calendar era (`Ilford` is `2020.0`).
pub const LAST_LEGACY_TRAIN: &str = "Hoxton";

static TRAILING_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)$").expect("valid trailing digits regex"));

/// Leading-character bucket of a legacy train suffix: `B < M < RC < R < S`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SuffixBucket {
    Unknown,
    Build,
    Milestone,
    ReleaseCandidate,
    Release,
    ServiceRelease,
}

impl SuffixBucket {
    fn of(suffix: &str) -> Self {
        if suffix.starts_with("RC") {
            return SuffixBucket::ReleaseCandidate;
        }
        match suffix.chars().next() {
            Some('B') => SuffixBucket::Build,
            Some('M') => SuffixBucket::Milestone,
            Some('R') => SuffixBucket::Release,
            Some('S') => SuffixBucket::ServiceRelease,
            _ => SuffixBucket::Unknown,
        }
    }
}

fn trailing_number(suffix: &str) -> u64 {
    TRAILING_DIGITS_RE
        .captures(suffix)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Numeric comparison when both sides are numbers, lexical otherwise
fn compare_component(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

impl Version {
    /// Total order over versions by maturity.
    ///
    /// Differing release types decide outright unless both are GA; otherwise
    /// major/minor/patch decide, with the release type as tie-breaker.
    pub fn compare_maturity(&self, other: &Version) -> Ordering {
        let (this_type, other_type) = (self.release_type(), other.release_type());
        if this_type != other_type && !(this_type.is_ga() && other_type.is_ga()) {
            return this_type.cmp(&other_type);
        }

        compare_component(self.major(), other.major())
            .then_with(|| compare_component(self.minor(), other.minor()))
            .then_with(|| compare_component(self.patch(), other.patch()))
            .then_with(|| this_type.cmp(&other_type))
    }

    /// True for `2020.0.0`-style versions and for named trains after the
    /// last legacy train
    pub fn is_calver(&self) -> bool {
        self.era() != Era::Legacy
    }

    fn era(&self) -> Era {
        match self.numeric_major() {
            Some(major) if major >= CALVER_MIN_MAJOR => Era::Calendar,
            Some(_) => Era::Legacy,
            None if self.major() > LAST_LEGACY_TRAIN => Era::NamedCalendar,
            None => Era::Legacy,
        }
    }

    /// Order two release train versions.
    ///
    /// - both legacy named trains: train name, then suffix bucket, then the
    ///   suffix's trailing number
    /// - both calendar era: [`Version::compare_maturity`]
    /// - legacy against `2020.0.0`-style: a GA legacy train outranks a non-GA
    ///   calendar train; otherwise the calendar train wins
    /// - legacy against a named calendar train (`Iexample.RELEASE`): a non-GA
    ///   side loses; between two GA trains the higher release type wins and
    ///   the calendar train wins ties
    ///
    /// Named calendar trains rank below every GA `2020.0.0`-style train, so
    /// the order stays transitive across the three eras.
    pub fn compare_train_identity(&self, other: &Version) -> Ordering {
        match (self.era(), other.era()) {
            (Era::Legacy, Era::Legacy) if self.is_train() && other.is_train() => {
                self.compare_legacy_trains(other)
            }
            (Era::NamedCalendar, Era::NamedCalendar) => self.compare_legacy_trains(other),
            (Era::Legacy, Era::Legacy) | (Era::Calendar, Era::Calendar) => {
                self.compare_maturity(other)
            }
            (Era::Legacy | Era::NamedCalendar, Era::Calendar) => against_calendar(self, other),
            (Era::Calendar, Era::Legacy | Era::NamedCalendar) => {
                against_calendar(other, self).reverse()
            }
            (Era::Legacy, Era::NamedCalendar) => against_named_calendar(self, other),
            (Era::NamedCalendar, Era::Legacy) => against_named_calendar(other, self).reverse(),
        }
    }

    fn compare_legacy_trains(&self, other: &Version) -> Ordering {
        self.major()
            .cmp(other.major())
            .then_with(|| SuffixBucket::of(self.suffix()).cmp(&SuffixBucket::of(other.suffix())))
            .then_with(|| trailing_number(self.suffix()).cmp(&trailing_number(other.suffix())))
    }
}

/// Release train naming era
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Era {
    /// `Hoxton.SR1`, `1.0.0.RELEASE`
    Legacy,
    /// Named train after the last legacy one
    NamedCalendar,
    /// `2020.0.0`
    Calendar,
}

fn against_calendar(older: &Version, calver: &Version) -> Ordering {
    if older.release_type().is_ga() && !calver.release_type().is_ga() {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

fn against_named_calendar(legacy: &Version, named: &Version) -> Ordering {
    let (legacy_type, named_type) = (legacy.release_type(), named.release_type());
    if !legacy_type.is_ga() {
        return Ordering::Less;
    }
    if !named_type.is_ga() {
        return Ordering::Greater;
    }
    match legacy_type.cmp(&named_type) {
        Ordering::Greater => Ordering::Greater,
        _ => Ordering::Less,
    }
}
