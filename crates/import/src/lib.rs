pub mod amount;
pub mod api;
pub mod config;
pub mod date;
pub mod decode;
pub mod delimited;
pub mod detect;
pub mod error;
pub mod hash;
pub mod header;
pub mod mapper;
pub mod pipeline;
pub mod recurring;
pub mod registry;
pub mod rules;
pub mod sheet;
pub(crate) mod util;

pub use api::{
    detect_recurring, detect_recurring_json, import_csv, import_spreadsheet, list_formats,
};
pub use config::{ConfigError, TabulaConfig};
pub use decode::{DecodeError, Decoder, EncodingRsDecoder};
pub use error::ImportError;
pub use pipeline::{ImportOptions, Importer, DEFAULT_ENCODING};
pub use recurring::{DetectorConfig, GapRange, RecurringDetector};
pub use rules::{CategoryRule, CategoryRuleEngine, MatchType};
#[cfg(feature = "xlsx")]
pub use sheet::CalamineReader;
pub use sheet::{Sheet, TableReadError, TableReader};
