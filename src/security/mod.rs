//! Sensitive-data detection for prompts.
//!
//! This module scans prompt text for personal data and secrets before it
//! is sent to a chat service, and can redact what it finds.
//!
//! # Categories
//!
//! | Category    | Examples                                   | Severity        |
//! |-------------|--------------------------------------------|-----------------|
//! | `contact`   | Email addresses, phone numbers             | Medium          |
//! | `identity`  | SSNs, passports, driver licenses           | High            |
//! | `financial` | Credit cards (Luhn-checked), bank accounts | High / Critical |
//! | `security`  | API keys, AWS keys, GitHub tokens, passwords| Critical       |
//! | `medical`   | Medical record numbers                     | High            |
//! | `location`  | Street addresses                           | Medium          |
//! | `technical` | IP addresses                               | Low             |
//! | `custom`    | Configured keywords                        | Medium          |
//!
//! Ambiguous digit runs (bank accounts, routing numbers, medical IDs,
//! passports, licenses) only count when a context keyword such as "bank"
//! or "patient" appears within the context window around the match.
//!
//! # Usage
//!
//! ```
//! use tokentrim::security::{RiskLevel, SensitiveDataScanner};
//!
//! let scanner = SensitiveDataScanner::new().with_custom_keywords(&["project falcon"]);
//!
//! let result = scanner.scan("Deploy Project Falcon with api_key=abcd1234efgh5678ijkl").unwrap();
//! assert_eq!(result.risk_level, RiskLevel::Critical);
//! assert!(!result.safe);
//!
//! let redacted = scanner.redact("Mail me at jane@example.com").unwrap();
//! assert_eq!(redacted, "Mail me at [EMAIL]");
//! ```

mod patterns;
mod scanner;

pub use patterns::{
    is_plausible_ssn, passes_luhn, DataCategory, SensitivePattern, Severity, SENSITIVE_PATTERNS,
};
pub use scanner::{Finding, RiskLevel, ScanResult, ScanStats, SensitiveDataScanner};
