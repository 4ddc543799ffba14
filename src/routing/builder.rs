//! Route key normalization and table assembly.
//!
//! # Responsibilities
//! - Normalize raw route keys (trailing slash, domain split)
//! - Substitute the `"_"` sentinel for domain-less keys
//! - Prefix descriptor `views` with the owning domain
//! - Assemble the path → domain → descriptor table
//!
//! # Design Decisions
//! - Owning, pure build: entries are consumed and fresh descriptors are
//!   returned, so the `views` rewrite cannot alias caller state
//! - Entry order is the only ordering the algorithm depends on, and only
//!   for last-write-wins on duplicate (path, domain) pairs
//! - Malformed keys fail the whole build; no partial table is returned

use crate::routing::types::{Descriptor, RawRouteMap, RouteError, RouteTable, DOMAIN_ANY};

/// Build the normalized route table from raw route entries.
///
/// Each key is `[domain]path`: an optional leading domain segment followed
/// by a `/`-prefixed path. A missing trailing `/` is appended. Keys with a
/// domain get their descriptor's `views` field prefixed with that domain
/// (unless it already is). A non-empty key with no `/` at all is rejected
/// with [`RouteError::MalformedKey`].
///
/// Duplicate `(path, domain)` pairs resolve last-write-wins in entry order.
pub fn build<I>(entries: I) -> Result<RouteTable, RouteError>
where
    I: IntoIterator<Item = (String, Descriptor)>,
{
    let mut table = RouteTable::default();

    for (raw_key, mut descriptor) in entries {
        // "foo" has no '/' to split on; the empty key is the one exception
        // (it normalizes to "/").
        if !raw_key.is_empty() && !raw_key.contains('/') {
            return Err(RouteError::MalformedKey { key: raw_key });
        }

        let mut key = raw_key;
        if !key.ends_with('/') {
            key.push('/');
        }

        let (path, domain) = match key.find('/') {
            // Leading '/': no domain configured, match any host.
            Some(0) | None => (key, DOMAIN_ANY.to_string()),
            Some(pos) => {
                let domain = key[..pos].to_string();
                let path = key[pos..].to_string();

                if let Some(views) = descriptor.views.as_mut() {
                    if !views.is_empty()
                        && !views.starts_with(&format!("/{domain}"))
                        && !views.starts_with(domain.as_str())
                    {
                        *views = format!("{domain}{views}");
                    }
                }

                (path, domain)
            }
        };

        table.insert(path, domain, descriptor);
    }

    Ok(table)
}

/// Build the table straight from a parsed routermap file.
///
/// Values that are not descriptor objects fail with
/// [`RouteError::InvalidDescriptor`].
pub fn build_from_raw(raw: &RawRouteMap) -> Result<RouteTable, RouteError> {
    let mut entries = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let descriptor = serde_json::from_value(value.clone()).map_err(|source| {
            RouteError::InvalidDescriptor {
                key: key.clone(),
                source,
            }
        })?;
        entries.push((key.clone(), descriptor));
    }
    build(entries)
}
