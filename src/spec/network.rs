use std::path::{Path, PathBuf};

use super::Kwargs;
use crate::{
    error::{Result, SpecError},
    layout::Layout,
};

/// Where a consumer should get a network from.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkSource<'a> {
    /// A constructor registered under `name`, called with `kwargs`.
    Registered { name: &'a str, kwargs: &'a Kwargs },
    /// A serialized network description on disk. Its kwargs are unused.
    SpecFile(PathBuf),
}

/// Whether `name` points to a network spec file rather than a constructor.
pub(crate) fn is_spec_file(name: &str) -> bool {
    name.contains("json")
}

/// Spec files are looked up under the specs directory, so their names must
/// be relative to it.
pub(crate) fn check_name(field: &str, name: &str) -> Result<()> {
    if is_spec_file(name) && Path::new(name).has_root() {
        return Err(SpecError::schema(
            field,
            format!("network spec `{name}` must be relative to the specs directory"),
        ));
    }
    Ok(())
}

pub(crate) fn resolve<'a>(name: &'a str, kwargs: &'a Kwargs, layout: &Layout) -> NetworkSource<'a> {
    if is_spec_file(name) {
        NetworkSource::SpecFile(layout.network_spec_path(name))
    } else {
        NetworkSource::Registered { name, kwargs }
    }
}
