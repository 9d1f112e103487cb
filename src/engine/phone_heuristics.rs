//! Phone heuristics - normalization and the offline risk estimate.
//!
//! Normalization turns free-form user input into a `+<digits>` number using
//! a small set of prefix rules. The offline estimate infers the country from
//! the calling code and draws carrier and base risk from an injected
//! [`RandomSource`] so callers can pin the draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::domain::{PhoneDetails, PhoneVerdict};
use crate::error::{CheckError, CheckResult};

/// Minimum digit count for a checkable number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Source of uniform random draws.
pub trait RandomSource: Send + Sync {
    /// Draw uniformly from `0..upper`. `upper` is never zero.
    fn below(&self, upper: u32) -> u32;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&self, upper: u32) -> u32 {
        rand::rng().random_range(0..upper)
    }
}

/// Reproducible RNG seeded once at startup.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&self, upper: u32) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..upper)
    }
}

/// A phone number in `+<digits>` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPhone {
    /// Full number including the leading `+`.
    pub number: String,
    /// Digits of `number` without the `+`.
    pub digits: String,
}

/// Validate and normalize user input.
///
/// Input without a leading `+` gets a prefix inferred from its shape:
/// - `0` followed by ten more digits is a Nigerian national number (`+234`)
/// - ten digits not starting with `0` are North American (`+1`)
/// - anything else is taken as already international
///
/// Input is not trimmed: only a `+` in the first position marks it as
/// international.
pub fn normalize_phone(raw: &str) -> CheckResult<NormalizedPhone> {
    if raw.is_empty() {
        return Err(CheckError::InvalidInput(
            "Phone number is required".to_string(),
        ));
    }

    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if cleaned.len() < MIN_PHONE_DIGITS {
        return Err(CheckError::InvalidInput(
            "Invalid phone number format".to_string(),
        ));
    }

    let digits = if raw.starts_with('+') {
        cleaned
    } else if cleaned.starts_with('0') && cleaned.len() == 11 {
        format!("234{}", &cleaned[1..])
    } else if cleaned.len() == 10 && !cleaned.starts_with('0') {
        format!("1{}", cleaned)
    } else {
        cleaned
    };

    Ok(NormalizedPhone {
        number: format!("+{}", digits),
        digits,
    })
}

/// A calling code with its country and known carriers.
struct CallingCode {
    code: &'static str,
    country: &'static str,
    carriers: &'static [&'static str],
}

/// Checked in order; the first entry is also the default.
const CALLING_CODES: &[CallingCode] = &[
    CallingCode {
        code: "1",
        country: "United States",
        carriers: &["AT&T", "Verizon", "T-Mobile", "Sprint"],
    },
    CallingCode {
        code: "44",
        country: "United Kingdom",
        carriers: &["Vodafone", "EE", "O2", "Three"],
    },
    CallingCode {
        code: "61",
        country: "Australia",
        carriers: &["Telstra", "Optus", "Vodafone"],
    },
    CallingCode {
        code: "33",
        country: "France",
        carriers: &["Orange", "SFR", "Free Mobile"],
    },
    CallingCode {
        code: "49",
        country: "Germany",
        carriers: &["T-Mobile", "Vodafone", "O2"],
    },
    CallingCode {
        code: "81",
        country: "Japan",
        carriers: &["NTT DoCoMo", "au", "SoftBank"],
    },
    CallingCode {
        code: "86",
        country: "China",
        carriers: &["China Mobile", "China Unicom", "China Telecom"],
    },
    CallingCode {
        code: "91",
        country: "India",
        carriers: &["Jio", "Airtel", "Vodafone Idea"],
    },
];

fn calling_code_for(digits: &str) -> &'static CallingCode {
    CALLING_CODES
        .iter()
        .find(|entry| digits.starts_with(entry.code))
        .unwrap_or(&CALLING_CODES[0])
}

/// Byte slice of an ASCII string, clamped to its length.
fn clamped(s: &str, start: usize, end: usize) -> &str {
    let end = end.min(s.len());
    &s[start.min(end)..end]
}

/// Display form: `+1 (NXX) NXX-XXXX` for North America, `+<code> <rest>` otherwise.
pub fn format_display(digits: &str, code: &str) -> String {
    if code == "1" {
        format!(
            "+1 ({}) {}-{}",
            clamped(digits, 1, 4),
            clamped(digits, 4, 7),
            clamped(digits, 7, 11)
        )
    } else {
        format!("+{} {}", code, clamped(digits, code.len(), digits.len()))
    }
}

/// True when any single digit occurs more than four times.
fn has_repeated_digits(digits: &str) -> bool {
    let mut counts = [0u32; 10];
    for b in digits.bytes().filter(u8::is_ascii_digit) {
        counts[(b - b'0') as usize] += 1;
    }
    counts.iter().any(|&n| n > 4)
}

/// Offline phone assessment.
pub struct PhoneHeuristics {
    random: Box<dyn RandomSource>,
}

impl PhoneHeuristics {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Estimate a verdict without any remote lookup.
    pub fn assess(&self, phone: &NormalizedPhone) -> PhoneVerdict {
        let entry = calling_code_for(&phone.digits);
        let carrier = entry.carriers[self.random.below(entry.carriers.len() as u32) as usize];

        let mut risk = self.random.below(100);
        if has_repeated_digits(&phone.digits) {
            risk += 20;
        }
        let risk_score = risk.min(100) as u8;

        let spam_reports = if risk_score > 50 {
            self.random.below(50) + 5
        } else {
            0
        };

        PhoneVerdict {
            phone_number: phone.number.clone(),
            country: entry.country.to_string(),
            carrier: carrier.to_string(),
            line_type: "Mobile".to_string(),
            risk_score,
            details: PhoneDetails {
                valid: true,
                formatted: format_display(&phone.digits, entry.code),
                location: None,
                spam_reports,
            },
        }
    }
}

/// Replays fixed draws, for tests.
#[cfg(test)]
pub(crate) struct ScriptedRandom {
    draws: Mutex<std::collections::VecDeque<u32>>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(draws: &[u32]) -> Self {
        Self {
            draws: Mutex::new(draws.iter().copied().collect()),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn below(&self, upper: u32) -> u32 {
        let next = self.draws.lock().unwrap().pop_front().unwrap_or(0);
        next % upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> NormalizedPhone {
        normalize_phone(raw).unwrap()
    }

    fn heuristics(draws: &[u32]) -> PhoneHeuristics {
        PhoneHeuristics::new(Box::new(ScriptedRandom::new(draws)))
    }

    #[test]
    fn test_nigerian_national_number() {
        let phone = normalized("08031234567");
        assert_eq!(phone.number, "+2348031234567");
        assert_eq!(phone.digits, "2348031234567");
    }

    #[test]
    fn test_north_american_ten_digits() {
        assert_eq!(normalized("4155551234").number, "+14155551234");
        assert_eq!(normalized("(415) 555-1234").number, "+14155551234");
    }

    #[test]
    fn test_other_shapes_get_plain_prefix() {
        assert_eq!(normalized("442079460958").number, "+442079460958");
        // Ten digits with a leading zero are neither Nigerian nor North American
        assert_eq!(normalized("0803123456").number, "+0803123456");
    }

    #[test]
    fn test_international_input_keeps_its_code() {
        assert_eq!(normalized("+44 20 7946 0958").number, "+442079460958");
        assert_eq!(normalized("+1 415-555-1234 ").number, "+14155551234");
    }

    #[test]
    fn test_leading_whitespace_hides_the_plus() {
        // The prefix is inferred from the digits as for any national number
        assert_eq!(normalized(" +4155551234").number, "+14155551234");
        assert_eq!(normalized(" 08031234567").number, "+2348031234567");
    }

    #[test]
    fn test_ten_digits_with_leading_zero_are_not_north_american() {
        let phone = normalized("0803123456");
        assert_eq!(phone.number, "+0803123456");
        assert_eq!(phone.digits, "0803123456");
        assert_eq!(normalized("080-312-3456").number, "+0803123456");
    }

    #[test]
    fn test_rejects_missing_and_short_numbers() {
        for (raw, message) in [
            ("", "Phone number is required"),
            ("   ", "Invalid phone number format"),
            ("123456789", "Invalid phone number format"),
            ("+1 (555) 12-34", "Invalid phone number format"),
        ] {
            match normalize_phone(raw) {
                Err(CheckError::InvalidInput(msg)) => assert_eq!(msg, message),
                other => panic!("unexpected for {raw:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_calling_code_order_and_default() {
        assert_eq!(calling_code_for("14155551234").country, "United States");
        assert_eq!(calling_code_for("442079460958").country, "United Kingdom");
        assert_eq!(calling_code_for("919876543210").country, "India");
        assert_eq!(calling_code_for("2348031234567").code, "1");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display("14155551234", "1"), "+1 (415) 555-1234");
        assert_eq!(format_display("442079460958", "44"), "+44 2079460958");
        // Short North American digits do not panic
        assert_eq!(format_display("4155551234", "1"), "+1 (155) 551-234");
    }

    #[test]
    fn test_assess_low_risk_us_number() {
        let verdict = heuristics(&[1, 30]).assess(&normalized("4155551234"));

        assert_eq!(verdict.phone_number, "+14155551234");
        assert_eq!(verdict.country, "United States");
        assert_eq!(verdict.carrier, "Verizon");
        assert_eq!(verdict.line_type, "Mobile");
        assert_eq!(verdict.risk_score, 30);
        assert!(verdict.is_safe());
        assert!(verdict.details.valid);
        assert_eq!(verdict.details.formatted, "+1 (415) 555-1234");
        assert_eq!(verdict.details.spam_reports, 0);
    }

    #[test]
    fn test_repeated_digits_raise_risk_and_spam_reports() {
        let verdict = heuristics(&[0, 40, 10]).assess(&normalized("+15555555555"));

        assert_eq!(verdict.carrier, "AT&T");
        assert_eq!(verdict.risk_score, 60);
        assert!(!verdict.is_safe());
        assert_eq!(verdict.details.spam_reports, 15);
    }

    #[test]
    fn test_risk_is_capped() {
        let verdict = heuristics(&[0, 95, 0]).assess(&normalized("+15555555555"));
        assert_eq!(verdict.risk_score, 100);
        assert_eq!(verdict.details.spam_reports, 5);
    }

    #[test]
    fn test_uk_number() {
        let verdict = heuristics(&[2, 10]).assess(&normalized("+44 20 7946 0958"));
        assert_eq!(verdict.country, "United Kingdom");
        assert_eq!(verdict.carrier, "O2");
        assert_eq!(verdict.details.formatted, "+44 2079460958");
    }

    #[test]
    fn test_unlisted_code_defaults_to_north_america() {
        let verdict = heuristics(&[3, 0]).assess(&normalized("08031234567"));
        assert_eq!(verdict.phone_number, "+2348031234567");
        assert_eq!(verdict.country, "United States");
        assert_eq!(verdict.carrier, "Sprint");
    }

    #[test]
    fn test_repeated_digit_detection() {
        assert!(has_repeated_digits("15555512345"));
        assert!(!has_repeated_digits("14155551234"));
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        let draws_a: Vec<u32> = (0..16).map(|_| a.below(100)).collect();
        let draws_b: Vec<u32> = (0..16).map(|_| b.below(100)).collect();
        assert_eq!(draws_a, draws_b);
        assert!(draws_a.iter().all(|&d| d < 100));
    }

    #[test]
    fn test_thread_random_stays_in_range() {
        let random = ThreadRandom;
        assert!((0..100).all(|_| random.below(4) < 4));
    }
}
