//! Virtual module ids.
//!
//! Synthetic modules created while bridging CommonJS into the static import
//! graph never exist on disk. They are told apart from real files by a
//! leading NUL byte and, for per-file bridges, a `?commonjs-*` suffix. The
//! wire forms below must stay byte-compatible with the bundler ecosystem
//! that consumes the generated imports.

use std::fmt;

pub const VIRTUAL_PREFIX: char = '\0';
pub const HELPERS_ID: &str = "\0commonjsHelpers.js";
pub const DYNAMIC_PACKAGES_ID: &str = "\0commonjs-dynamic-packages";
pub const DYNAMIC_JSON_PREFIX: &str = "\0commonjs-dynamic-json:";

pub const MODULE_SUFFIX: &str = "?commonjs-module";
pub const EXPORTS_SUFFIX: &str = "?commonjs-exports";
pub const PROXY_SUFFIX: &str = "?commonjs-proxy";
pub const EXTERNAL_SUFFIX: &str = "?commonjs-external";
pub const DYNAMIC_REGISTER_SUFFIX: &str = "?commonjs-dynamic-register";

pub fn wrap_id(id: &str, suffix: &str) -> String {
    format!("{VIRTUAL_PREFIX}{id}{suffix}")
}

/// Strips the virtual prefix and `suffix`, or returns `None` when `id` is not
/// wrapped with that suffix.
pub fn unwrap_id<'a>(id: &'a str, suffix: &str) -> Option<&'a str> {
    id.strip_prefix(VIRTUAL_PREFIX)?.strip_suffix(suffix)
}

pub fn is_wrapped_id(id: &str, suffix: &str) -> bool {
    unwrap_id(id, suffix).is_some()
}

pub fn is_virtual(id: &str) -> bool {
    id.starts_with(VIRTUAL_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VirtualId {
    /// A plain file path or bare specifier.
    File(String),
    /// The shared runtime helpers module.
    Helpers,
    /// Synthetic `module` object of a wrapped CommonJS file.
    Module(String),
    /// Synthetic `exports` object of a wrapped CommonJS file.
    Exports(String),
    /// Default-export proxy in front of a required file.
    Proxy(String),
    /// Proxy for a specifier that resolved outside the build.
    External(String),
    /// Side-effect module registering a file in the dynamic require table.
    DynamicRegister(String),
    DynamicPackages,
    DynamicJson(String),
}

impl VirtualId {
    pub fn parse(id: &str) -> Self {
        if id == HELPERS_ID {
            return VirtualId::Helpers;
        }
        if id == DYNAMIC_PACKAGES_ID {
            return VirtualId::DynamicPackages;
        }
        if let Some(path) = id.strip_prefix(DYNAMIC_JSON_PREFIX) {
            return VirtualId::DynamicJson(path.to_string());
        }

        let wrapped: [(&str, fn(String) -> VirtualId); 5] = [
            (DYNAMIC_REGISTER_SUFFIX, VirtualId::DynamicRegister),
            (MODULE_SUFFIX, VirtualId::Module),
            (EXPORTS_SUFFIX, VirtualId::Exports),
            (PROXY_SUFFIX, VirtualId::Proxy),
            (EXTERNAL_SUFFIX, VirtualId::External),
        ];
        for (suffix, build) in wrapped {
            if let Some(inner) = unwrap_id(id, suffix) {
                return build(inner.to_string());
            }
        }

        VirtualId::File(id.to_string())
    }

    pub fn is_virtual(&self) -> bool {
        !matches!(self, VirtualId::File(_))
    }
}

impl fmt::Display for VirtualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VirtualId::File(path) => f.write_str(path),
            VirtualId::Helpers => f.write_str(HELPERS_ID),
            VirtualId::Module(path) => f.write_str(&wrap_id(path, MODULE_SUFFIX)),
            VirtualId::Exports(path) => f.write_str(&wrap_id(path, EXPORTS_SUFFIX)),
            VirtualId::Proxy(path) => f.write_str(&wrap_id(path, PROXY_SUFFIX)),
            VirtualId::External(spec) => f.write_str(&wrap_id(spec, EXTERNAL_SUFFIX)),
            VirtualId::DynamicRegister(path) => {
                f.write_str(&wrap_id(path, DYNAMIC_REGISTER_SUFFIX))
            }
            VirtualId::DynamicPackages => f.write_str(DYNAMIC_PACKAGES_ID),
            VirtualId::DynamicJson(path) => write!(f, "{DYNAMIC_JSON_PREFIX}{path}"),
        }
    }
}
