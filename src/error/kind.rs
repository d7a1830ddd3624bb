//! Error classification by pipeline stage.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which stage of the request pipeline an error came from.
///
/// Callers see a single 500 shape for every kind except `Validation`;
/// the kind is carried in logs so failures can still be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    Decode,
    Invoke,
    ResponseParse,
    Encode,
}
