//! Metadata resolver.
//!
//! Maps a (class, product) request onto a draw container's stored
//! metadata block: the ordered date axis, the class's variable list in
//! stored-column order, the per-variable transform assignments, and (for
//! decomposition products) the ordered shock list. The raw index maps
//! slice the container; the resolved, ordered views label and align the
//! final result.

use std::collections::HashMap;

use fanchart_core::types::{Product, Quarter, VariableClass};

use crate::error::DataError;
use crate::store::DrawFile;

/// Resolved, reporting-oriented metadata for one (class, product) request.
#[derive(Clone, Debug, Default)]
pub struct ResolvedMeta {
    /// Date axis in stored-index order; empty for impulse responses.
    pub dates: Vec<Quarter>,
    /// Variable names in stored-column order.
    pub variables: Vec<String>,
    /// Variable name → transform kind string.
    pub transforms: HashMap<String, String>,
    /// Shock names in stored-index order; empty unless a decomposition
    /// product.
    pub shocks: Vec<String>,
}

/// Orders map keys by their stored index.
fn ordered_names(indices: &HashMap<String, usize>) -> Vec<String> {
    let mut pairs: Vec<(&String, &usize)> = indices.iter().collect();
    pairs.sort_by_key(|(_, &idx)| idx);
    pairs.into_iter().map(|(name, _)| name.clone()).collect()
}

/// Resolves a container's metadata block for one (class, product) request.
///
/// # Errors
///
/// - the container has no date index block but the product carries a
///   date axis
/// - the product fans out over shocks but the shock index block is absent
/// - a variable in the class index map has no transform assignment
///   (inconsistent container)
pub fn resolve(
    class: VariableClass,
    product: Product,
    file: &DrawFile,
) -> Result<ResolvedMeta, DataError> {
    let meta = &file.metadata;

    let dates = if product.has_date_axis() {
        if meta.date_indices.is_empty() {
            return Err(DataError::MissingDates {
                product: product.to_string(),
            });
        }
        let mut pairs: Vec<(&String, &usize)> = meta.date_indices.iter().collect();
        pairs.sort_by_key(|(_, &idx)| idx);
        pairs
            .into_iter()
            .map(|(s, _)| s.parse::<Quarter>())
            .collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    let variables = ordered_names(meta.indices(class));
    let revtransforms = meta.revtransforms(class);
    let mut transforms = HashMap::with_capacity(variables.len());
    for name in &variables {
        let kind = revtransforms
            .get(name)
            .ok_or_else(|| DataError::MissingTransform {
                variable: name.clone(),
                class,
            })?;
        transforms.insert(name.clone(), kind.clone());
    }

    let shocks = if product.is_decomposition() {
        if meta.shock_indices.is_empty() {
            return Err(DataError::MissingShocks {
                product: product.to_string(),
            });
        }
        ordered_names(&meta.shock_indices)
    } else {
        Vec::new()
    };

    Ok(ResolvedMeta {
        dates,
        variables,
        transforms,
        shocks,
    })
}

/// Confirms one variable is present in its class index map.
///
/// Absence indicates an inconsistent draw container and is not
/// recoverable.
pub fn require_variable(
    class: VariableClass,
    variable: &str,
    file: &DrawFile,
) -> Result<usize, DataError> {
    file.metadata
        .indices(class)
        .get(variable)
        .copied()
        .ok_or_else(|| DataError::MissingVariable {
            variable: variable.to_string(),
            class,
        })
}
