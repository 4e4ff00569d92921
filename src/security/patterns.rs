//! Sensitive-data patterns for rule-based detection.
//!
//! Contains regex patterns for detecting personal and secret data:
//! - Contact details (emails, phone numbers)
//! - Identity and financial numbers
//! - Credentials (API keys, cloud keys, passwords)
//! - Locations and technical identifiers
//!
//! Bare digit runs are ambiguous, so several patterns only count when one
//! of their context keywords appears near the match.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How damaging a leak of the matched data would be
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Technical details, usually harmless
    Low,
    /// Contact details and personal information
    Medium,
    /// Identity, financial and medical identifiers
    High,
    /// Credentials and payment cards
    Critical,
}

impl Severity {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCategory {
    /// Emails, phone numbers
    Contact,
    /// SSNs, passports, driver licenses
    Identity,
    /// Cards, bank accounts, routing numbers
    Financial,
    /// IP addresses
    Technical,
    /// Keys, tokens, passwords
    Security,
    /// Medical record numbers
    Medical,
    /// Street addresses
    Location,
    /// User-configured keywords
    Custom,
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataCategory::Contact => "contact",
            DataCategory::Identity => "identity",
            DataCategory::Financial => "financial",
            DataCategory::Technical => "technical",
            DataCategory::Security => "security",
            DataCategory::Medical => "medical",
            DataCategory::Location => "location",
            DataCategory::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A sensitive-data detection pattern
#[derive(Debug, Clone)]
pub struct SensitivePattern {
    /// Pattern name, also the finding kind
    pub name: &'static str,
    /// Regex pattern
    pub pattern: &'static str,
    /// Severity
    pub severity: Severity,
    /// Data category
    pub category: DataCategory,
    /// Description
    pub description: &'static str,
    /// Keywords, one of which must appear near the match (empty = none needed)
    pub context: &'static [&'static str],
    /// Extra check on the matched text
    pub validate: Option<fn(&str) -> bool>,
}

/// Built-in patterns, in reporting order
pub static SENSITIVE_PATTERNS: &[SensitivePattern] = &[
    SensitivePattern {
        name: "email",
        pattern: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        severity: Severity::Medium,
        category: DataCategory::Contact,
        description: "Email addresses",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "phone",
        pattern: r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}",
        severity: Severity::Medium,
        category: DataCategory::Contact,
        description: "Phone numbers",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "ssn",
        pattern: r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b|\b[0-9]{9}\b",
        severity: Severity::High,
        category: DataCategory::Identity,
        description: "Social Security Numbers",
        context: &[],
        validate: Some(is_plausible_ssn),
    },
    SensitivePattern {
        name: "credit_card",
        pattern: r"\b(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|3[0-9]{13}|6(?:011|5[0-9]{2})[0-9]{12})\b",
        severity: Severity::Critical,
        category: DataCategory::Financial,
        description: "Credit card numbers",
        context: &[],
        validate: Some(passes_luhn),
    },
    SensitivePattern {
        name: "bank_account",
        pattern: r"\b[0-9]{8,17}\b",
        severity: Severity::High,
        category: DataCategory::Financial,
        description: "Bank account numbers",
        context: &["account", "routing", "bank"],
        validate: None,
    },
    SensitivePattern {
        name: "routing_number",
        pattern: r"\b[0-9]{9}\b",
        severity: Severity::High,
        category: DataCategory::Financial,
        description: "Bank routing numbers",
        context: &["routing", "bank", "aba"],
        validate: None,
    },
    SensitivePattern {
        name: "passport",
        pattern: r"\b[A-Z]{1,2}[0-9]{6,9}\b",
        severity: Severity::High,
        category: DataCategory::Identity,
        description: "Passport numbers",
        context: &["passport"],
        validate: None,
    },
    SensitivePattern {
        name: "driver_license",
        pattern: r"\b[A-Z]{1,2}[0-9]{6,12}\b",
        severity: Severity::High,
        category: DataCategory::Identity,
        description: "Driver license numbers",
        context: &["license", "dl", "driver"],
        validate: None,
    },
    SensitivePattern {
        name: "ip_address",
        pattern: r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
        severity: Severity::Low,
        category: DataCategory::Technical,
        description: "IP addresses",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "api_key",
        pattern: r#"(?i)(?:api[_-]?key|token|secret)["\s:=]+["']?[a-zA-Z0-9_-]{16,}"#,
        severity: Severity::Critical,
        category: DataCategory::Security,
        description: "API keys or tokens",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "aws_key",
        pattern: r"AKIA[0-9A-Z]{16}",
        severity: Severity::Critical,
        category: DataCategory::Security,
        description: "AWS access keys",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "github_token",
        pattern: r"gh[ps]_[A-Za-z0-9_]{36}",
        severity: Severity::Critical,
        category: DataCategory::Security,
        description: "GitHub personal access tokens",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "password",
        pattern: r#"(?i)(?:password|pwd|pass)["\s:=]+["']?[^\s"']{6,}"#,
        severity: Severity::Critical,
        category: DataCategory::Security,
        description: "Passwords",
        context: &[],
        validate: None,
    },
    SensitivePattern {
        name: "medical_id",
        pattern: r"\b[0-9]{10,15}\b",
        severity: Severity::High,
        category: DataCategory::Medical,
        description: "Medical ID numbers",
        context: &["medical", "patient", "mrn", "health"],
        validate: None,
    },
    SensitivePattern {
        name: "address",
        pattern: r"(?i)\b[0-9]+\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Court|Ct)\b",
        severity: Severity::Medium,
        category: DataCategory::Location,
        description: "Physical addresses",
        context: &[],
        validate: None,
    },
];

lazy_static! {
    /// Compiled sensitive-data patterns
    pub static ref SENSITIVE_REGEX: Vec<(Regex, &'static SensitivePattern)> = {
        SENSITIVE_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p.pattern).ok().map(|r| (r, p)))
            .collect()
    };
}

/// Luhn checksum over the digits of a card number (13 to 19 digits)
pub fn passes_luhn(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Reject SSN-shaped numbers that are placeholders rather than real SSNs
pub fn is_plausible_ssn(ssn: &str) -> bool {
    let digits: String = ssn.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 || digits == "123456789" {
        return false;
    }
    let first = digits.as_bytes()[0];
    !digits.bytes().all(|b| b == first)
}
