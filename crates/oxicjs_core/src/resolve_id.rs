use anyhow::Result;
use log::trace;
use std::path::Path;

use crate::{
    resolver::{Resolver, normalize_slashes, resolve_extensions},
    types::ResolvedId,
    virtual_id::{
        DYNAMIC_JSON_PREFIX, DYNAMIC_PACKAGES_ID, DYNAMIC_REGISTER_SUFFIX, EXPORTS_SUFFIX,
        EXTERNAL_SUFFIX, HELPERS_ID, MODULE_SUFFIX, PROXY_SUFFIX, is_virtual, is_wrapped_id,
        unwrap_id, wrap_id,
    },
};

/// Resolves an import request emitted by the require rewriter.
///
/// Virtual ids produced by the rewriter pass through untouched, dynamic
/// registration wrappers are peeled off before resolution and re-applied to
/// the result. Returns `Ok(None)` when the request cannot be resolved here;
/// the caller decides whether that means "external" or "error".
pub fn resolve_id(
    importee: &str,
    importer: Option<&str>,
    resolver: &Resolver,
) -> Result<Option<ResolvedId>> {
    if [MODULE_SUFFIX, EXPORTS_SUFFIX, PROXY_SUFFIX, EXTERNAL_SUFFIX]
        .iter()
        .any(|suffix| is_wrapped_id(importee, suffix))
    {
        return Ok(Some(ResolvedId::internal(importee)));
    }

    let importer =
        importer.map(|raw| unwrap_id(raw, DYNAMIC_REGISTER_SUFFIX).unwrap_or(raw));

    // Proxies only import ids that were already resolved.
    if importer.is_some_and(|i| is_wrapped_id(i, PROXY_SUFFIX)) {
        return Ok(Some(ResolvedId::internal(importee)));
    }

    let (importee, is_registration) = match unwrap_id(importee, DYNAMIC_REGISTER_SUFFIX) {
        Some(inner) => (inner, true),
        None => (importee, false),
    };

    if importee.starts_with(HELPERS_ID)
        || importee == DYNAMIC_PACKAGES_ID
        || importee.starts_with(DYNAMIC_JSON_PREFIX)
    {
        return Ok(Some(ResolvedId::internal(importee)));
    }

    if is_virtual(importee) {
        return Ok(None);
    }

    let resolved = match importer {
        Some(from) => resolver.resolve(Path::new(from), importee),
        None => resolver.resolve(&resolver.root().join("index.js"), importee),
    }
    .or_else(|| resolve_extensions(importee, importer.map(Path::new), resolver.extensions()));

    let Some(path) = resolved else {
        trace!("resolve_id: no match for '{}' from {:?}", importee, importer);
        return Ok(None);
    };

    let id = normalize_slashes(&path.to_string_lossy());
    if is_registration {
        return Ok(Some(ResolvedId::internal(wrap_id(&id, DYNAMIC_REGISTER_SUFFIX))));
    }
    Ok(Some(ResolvedId::internal(id)))
}
