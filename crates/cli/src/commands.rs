use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tabula_core::ImportPreviewResult;
use tabula_import::{
    detect_recurring_json, ConfigError, EncodingRsDecoder, ImportError, ImportOptions, Importer,
    TabulaConfig,
};

/// Batch failure as printed on stdout: `{"error": code, "message": ...}`.
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub error: &'static str,
    pub message: String,
}

impl CommandError {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.message.clone())
    }
}

impl From<ImportError> for CommandError {
    fn from(e: ImportError) -> Self {
        CommandError {
            error: e.code(),
            message: e.to_string(),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError {
            error: "invalid-config",
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError {
            error: "io",
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError {
            error: "invalid-argument",
            message: e.to_string(),
        }
    }
}

type CommandResult = Result<String, CommandError>;

/// `IBAN=ID` → `(IBAN, ID)`.
pub fn parse_account_mapping(raw: &str) -> anyhow::Result<(String, String)> {
    let (iban, account) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected IBAN=ACCOUNT_ID, got '{raw}'"))?;
    let (iban, account) = (iban.trim(), account.trim());
    anyhow::ensure!(
        !iban.is_empty() && !account.is_empty(),
        "expected IBAN=ACCOUNT_ID, got '{raw}'"
    );
    Ok((iban.to_string(), account.to_string()))
}

pub fn load_config(path: Option<&Path>) -> Result<TabulaConfig, CommandError> {
    match path {
        Some(path) => {
            let config = TabulaConfig::load(path)?;
            tracing::debug!(
                path = %path.display(),
                rules = config.category_rules.len(),
                accounts = config.accounts.len(),
                "loaded config"
            );
            Ok(config)
        }
        None => Ok(TabulaConfig::default()),
    }
}

fn importer(config: &TabulaConfig) -> Importer {
    let importer =
        Importer::new(EncodingRsDecoder).with_category_rules(config.category_rules.clone());
    #[cfg(feature = "xlsx")]
    let importer = importer.with_table_reader(tabula_import::CalamineReader);
    importer
}

/// Config accounts first, command-line pairs override.
fn account_mapping(config: &TabulaConfig, cli: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut mapping = config.accounts.clone();
    mapping.extend(cli);
    mapping
}

fn render(result: &ImportPreviewResult) -> CommandResult {
    for warning in &result.warnings {
        tracing::info!("{warning}");
    }
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn formats() -> CommandResult {
    Ok(serde_json::to_string_pretty(&tabula_import::list_formats())?)
}

pub fn csv(
    config: &TabulaConfig,
    file: &Path,
    format: Option<String>,
    delimiter: Option<char>,
    encoding: Option<String>,
    accounts: Vec<(String, String)>,
) -> CommandResult {
    let bytes = std::fs::read(file)?;
    let options = ImportOptions {
        format_id: format,
        delimiter,
        encoding,
        account_mapping: account_mapping(config, accounts),
    };
    render(&importer(config).import_csv(&bytes, &options)?)
}

pub fn xlsx(config: &TabulaConfig, file: &Path, accounts: Vec<(String, String)>) -> CommandResult {
    let bytes = std::fs::read(file)?;
    let options = ImportOptions {
        account_mapping: account_mapping(config, accounts),
        ..ImportOptions::default()
    };
    render(&importer(config).import_spreadsheet(&bytes, &options)?)
}

pub fn recurring(config: &TabulaConfig, file: &Path) -> CommandResult {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let report = detect_recurring_json(&value, &config.recurring)?;
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn account_mapping_argument() {
        assert_eq!(
            parse_account_mapping("DE89 3704 0044 0532 0130 00=checking").unwrap(),
            ("DE89 3704 0044 0532 0130 00".to_string(), "checking".to_string())
        );
        assert!(parse_account_mapping("DE89370400440532013000").is_err());
        assert!(parse_account_mapping("=checking").is_err());
    }

    #[test]
    fn cli_accounts_override_config() {
        let config = TabulaConfig {
            accounts: BTreeMap::from([
                ("DE01".to_string(), "old".to_string()),
                ("DE02".to_string(), "kept".to_string()),
            ]),
            ..TabulaConfig::default()
        };
        let mapping = account_mapping(&config, vec![("DE01".to_string(), "new".to_string())]);
        assert_eq!(mapping["DE01"], "new");
        assert_eq!(mapping["DE02"], "kept");
    }

    #[test]
    fn import_error_json_shape() {
        let json = CommandError::from(ImportError::TooFewRows).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"], "too-few-rows");
        assert_eq!(value["message"], "File contains fewer than 2 rows");
    }

    #[test]
    fn csv_command_prints_preview() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Datum;Empf\xe4nger;Betrag;IBAN\n01.02.2025;M\xfcller;-1,50;DE01\n")
            .unwrap();
        let output = csv(
            &TabulaConfig::default(),
            file.path(),
            None,
            None,
            None,
            vec![("DE01".to_string(), "checking".to_string())],
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["rows"][0]["payee"], "Müller");
        assert_eq!(value["rows"][0]["amount"], -150);
        assert_eq!(value["rows"][0]["account_id"], "checking");
        assert_eq!(value["rows"][0]["date"], "2025-02-01");
    }

    #[test]
    fn recurring_command_rejects_objects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"payee": "Netflix"}"#).unwrap();
        let err = recurring(&TabulaConfig::default(), file.path()).unwrap_err();
        assert_eq!(err.error, "invalid-argument");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = csv(
            &TabulaConfig::default(),
            Path::new("/nonexistent/export.csv"),
            None,
            None,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err.error, "io");
    }
}
