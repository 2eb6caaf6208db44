// crates/runproof-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The RunProof CLI stores user-facing strings in a small translation catalog
//! to enforce consistent messaging and to prepare for future locales. All
//! runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "runproof {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.artifact.serialize_failed", "Failed to serialize {kind}: {error}"),
    ("output.artifact.write_failed", "Failed to write {kind} to {path}: {error}"),
    ("artifact.kind.manifest", "evidence manifest"),
    ("artifact.kind.report", "validation report"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    ("input.parse_failed", "Failed to parse {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("config.load_failed", "Failed to load configuration: {error}"),
    ("time.invalid_rfc3339", "Invalid RFC 3339 timestamp: {value}"),
    ("time.now_failed", "Failed to format the current time: {error}"),
    ("manifest.build.failed", "Failed to build manifest for {root}: {error}"),
    ("manifest.build.ok", "Manifest written to {path} ({count} entries)"),
    ("validate.status", "Validation status: {status} ({checked} entries checked)"),
    ("validate.status.pass", "pass"),
    ("validate.status.fail", "fail"),
    ("validate.error_line", "- {error}"),
    ("sidecar.check.ok", "Sidecar OK: {path} is bound to {name}"),
    ("sidecar.check.failed", "Sidecar check failed: {error}"),
    ("pack.created_at.required", "--deterministic requires --created-at."),
    ("pack.generate.failed", "Failed to generate pack: {error}"),
    ("pack.generate.ok", "Pack manifest written to {path}"),
    ("pack.generate.sidecar_ok", "Pack sidecar written to {path}"),
    ("pack.validate.failed", "Failed to validate pack: {error}"),
    ("index.update.failed", "Failed to update evidence index: {error}"),
    ("index.update.ok", "Evidence index written to {path} ({count} packs)"),
    ("compare.kind.baseline", "baseline report"),
    ("compare.kind.candidate", "candidate report"),
    ("compare.contract_failed", "Invalid determinism contract: {error}"),
    ("compare.failed", "Failed to compare reports: {error}"),
    ("compare.match", "Reports match under the contract."),
    (
        "compare.divergence",
        "First divergence at {path}: baseline {baseline}, candidate {candidate}",
    ),
    ("compare.value.absent", "absent"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
];

/// Static Catalan catalog entries loaded into the localized message bundle.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "runproof {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("output.artifact.serialize_failed", "No s'ha pogut serialitzar {kind}: {error}"),
    ("output.artifact.write_failed", "No s'ha pogut escriure {kind} a {path}: {error}"),
    ("artifact.kind.manifest", "el manifest d'evid\u{e8}ncies"),
    ("artifact.kind.report", "l'informe de validaci\u{f3}"),
    ("input.read_failed", "No s'ha pogut llegir {kind} a {path}: {error}"),
    ("input.parse_failed", "No s'ha pogut analitzar {kind} a {path}: {error}"),
    (
        "input.read_too_large",
        "Es rebutja llegir {kind} a {path} perqu\u{e8} fa {size} bytes (l\u{ed}mit {limit}).",
    ),
    ("config.load_failed", "No s'ha pogut carregar la configuraci\u{f3}: {error}"),
    ("time.invalid_rfc3339", "Marca de temps RFC 3339 no v\u{e0}lida: {value}"),
    ("time.now_failed", "No s'ha pogut formatar l'hora actual: {error}"),
    ("manifest.build.failed", "No s'ha pogut construir el manifest per a {root}: {error}"),
    ("manifest.build.ok", "Manifest escrit a {path} ({count} entrades)"),
    ("validate.status", "Estat de validaci\u{f3}: {status} ({checked} entrades comprovades)"),
    ("validate.status.pass", "aprovat"),
    ("validate.status.fail", "fallat"),
    ("validate.error_line", "- {error}"),
    ("sidecar.check.ok", "Sidecar correcte: {path} est\u{e0} lligat a {name}"),
    ("sidecar.check.failed", "La comprovaci\u{f3} del sidecar ha fallat: {error}"),
    ("pack.created_at.required", "--deterministic requereix --created-at."),
    ("pack.generate.failed", "No s'ha pogut generar el paquet: {error}"),
    ("pack.generate.ok", "Manifest del paquet escrit a {path}"),
    ("pack.generate.sidecar_ok", "Sidecar del paquet escrit a {path}"),
    ("pack.validate.failed", "No s'ha pogut validar el paquet: {error}"),
    ("index.update.failed", "No s'ha pogut actualitzar l'\u{ed}ndex d'evid\u{e8}ncies: {error}"),
    ("index.update.ok", "\u{cd}ndex d'evid\u{e8}ncies escrit a {path} ({count} paquets)"),
    ("compare.kind.baseline", "l'informe de refer\u{e8}ncia"),
    ("compare.kind.candidate", "l'informe candidat"),
    ("compare.contract_failed", "Contracte de determinisme no v\u{e0}lid: {error}"),
    ("compare.failed", "No s'han pogut comparar els informes: {error}"),
    ("compare.match", "Els informes coincideixen sota el contracte."),
    (
        "compare.divergence",
        "Primera diverg\u{e8}ncia a {path}: refer\u{e8}ncia {baseline}, candidat {candidate}",
    ),
    ("compare.value.absent", "absent"),
    ("i18n.lang.invalid_env", "Valor no v\u{e0}lid per a {env}: {value}. S'esperava 'en' o 'ca'."),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
