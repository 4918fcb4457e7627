//! Loader: read a local JSON category declaration, validate it, normalize
//! ordering, and return a typed `LoadedDeclaration`. No network I/O.
//!
//! Wire shape:
//! ```json
//! { "target_total": 10,
//!   "categories": [ { "id": "Heavy", "weight": 9 }, { "id": "Light", "weight": 1 } ] }
//! ```
//! `target_total` is optional (the caller may supply it separately).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use wa_core::{
    determinism::{first_duplicate, sort_categories_canonical},
    entities::{is_valid_weight, Category},
    ids::{CategoryId, Sha256},
};

use crate::{hasher, IoError, IoResult};

/// Declarations larger than this are rejected before parsing.
pub const MAX_DECLARATION_BYTES: u64 = 4 * 1024 * 1024;

// ----------------------------- Public types -----------------------------

/// Validated declaration; categories sorted ↑ id.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub target_total: Option<u32>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone)]
pub struct LoadedDeclaration {
    pub declaration: Declaration,
    /// SHA-256 of the canonical JSON of the normalized declaration.
    pub input_sha256: Sha256,
}

// ----------------------------- Wire types -----------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    id: String,
    weight: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeclaration {
    #[serde(default)]
    target_total: Option<i64>,
    categories: Vec<RawCategory>,
}

#[derive(Serialize)]
struct OnWireCategory<'a> {
    id: &'a CategoryId,
    weight: f64,
}

#[derive(Serialize)]
struct OnWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    target_total: Option<u32>,
    categories: Vec<OnWireCategory<'a>>,
}

// ----------------------------- Loading -----------------------------

/// Load, validate and fingerprint a declaration file.
pub fn load_declaration(path: &Path) -> IoResult<LoadedDeclaration> {
    let v = read_json_value_with_limits(path)?;
    let loaded = declaration_from_value(v)?;
    debug!(
        path = %path.display(),
        categories = loaded.declaration.categories.len(),
        target_total = ?loaded.declaration.target_total,
        "loaded declaration"
    );
    Ok(loaded)
}

/// Validate an already-parsed JSON value.
pub fn declaration_from_value(v: Value) -> IoResult<LoadedDeclaration> {
    let raw: RawDeclaration = serde_json::from_value(v)?;

    let target_total = match raw.target_total {
        None => None,
        Some(n) if n < 0 => {
            return Err(IoError::Json {
                pointer: "/target_total".into(),
                msg: format!("target total {n} is negative"),
            })
        }
        Some(n) => Some(u32::try_from(n).map_err(|_| IoError::Json {
            pointer: "/target_total".into(),
            msg: format!("target total {n} exceeds {}", u32::MAX),
        })?),
    };

    let mut categories = Vec::with_capacity(raw.categories.len());
    for (i, rc) in raw.categories.into_iter().enumerate() {
        let id: CategoryId = rc.id.parse().map_err(|e| IoError::Json {
            pointer: format!("/categories/{i}/id"),
            msg: format!("{e}: {:?}", rc.id),
        })?;
        if !is_valid_weight(rc.weight) {
            return Err(IoError::Json {
                pointer: format!("/categories/{i}/weight"),
                msg: format!("weight {} must be finite and > 0", rc.weight),
            });
        }
        categories.push(Category { id, weight: rc.weight });
    }

    sort_categories_canonical(&mut categories);
    if let Some(dup) = first_duplicate(&categories) {
        return Err(IoError::Invalid(format!("category {dup} declared more than once")));
    }

    let declaration = Declaration { target_total, categories };
    let input_sha256 = hasher::sha256_canonical(&OnWire {
        target_total: declaration.target_total,
        categories: declaration
            .categories
            .iter()
            .map(|c| OnWireCategory { id: &c.id, weight: c.weight })
            .collect(),
    })?;

    Ok(LoadedDeclaration { declaration, input_sha256 })
}

fn read_json_value_with_limits(path: &Path) -> IoResult<Value> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let meta = f.metadata()?;
    if meta.len() > MAX_DECLARATION_BYTES {
        return Err(IoError::Limit(format!(
            "{} is {} bytes; limit is {MAX_DECLARATION_BYTES}",
            path.display(),
            meta.len()
        )));
    }
    let mut buf = Vec::with_capacity(meta.len() as usize);
    f.take(MAX_DECLARATION_BYTES + 1).read_to_end(&mut buf)?;
    Ok(serde_json::from_slice(&buf)?)
}
