//! Configuration resolution.
//!
//! Resolves an ordered list of configuration fragments against an
//! [`AxisQuery`]. Two selection rules exist:
//!
//! - **loose** ([`Resolver::matches`]): used to enumerate everything that
//!   could apply to a partially known tuple, e.g. every file for this compiler
//!   regardless of configuration type.
//! - **strict** ([`Resolver::strict_matches`]): a fragment is only selected
//!   when every constraint it declares is satisfied by a concrete value.
//!
//! [`Resolver::merge`] folds the strict selection into one effective fragment.

mod query;

pub use query::AxisQuery;

use std::path::PathBuf;

use crate::core::{AxisFilter, Configuration};

/// Resolves configuration fragments.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    fragments: &'a [Configuration],
}

impl<'a> Resolver<'a> {
    pub fn new(fragments: &'a [Configuration]) -> Self {
        Resolver { fragments }
    }

    /// Fragments passing the loose test, in order.
    pub fn matches(&self, query: &AxisQuery) -> Vec<&'a Configuration> {
        self.fragments
            .iter()
            .filter(|c| query.loosely_matches(c))
            .collect()
    }

    /// Fragments passing the strict test, in order.
    pub fn strict_matches(&self, query: &AxisQuery) -> Vec<&'a Configuration> {
        self.fragments
            .iter()
            .filter(|c| query.strictly_matches(c))
            .collect()
    }

    /// Fold the strictly matching fragments into one configuration.
    ///
    /// Algorithm:
    /// 1. Every axis the query pins becomes a single-value filter in the
    ///    result; unknown axes become wildcards.
    /// 2. Include directories, library directories and libraries are
    ///    concatenated in fragment order, keeping the first occurrence of
    ///    each value.
    /// 3. Defines, flags and files are concatenated as-is.
    /// 4. Options are applied in order, later keys replacing earlier ones.
    /// 5. The last non-empty output directory wins.
    ///
    /// Fragments constraining an axis the query leaves unknown are skipped
    /// without error; callers use this to compute settings that do not depend
    /// on that axis.
    pub fn merge(&self, query: &AxisQuery) -> Configuration {
        let selected = self.strict_matches(query);
        tracing::debug!(
            "merging {} of {} fragments for {}",
            selected.len(),
            self.fragments.len(),
            query
        );

        let mut merged = Configuration {
            matching_target_types: pin(query.target_type),
            matching_toolchains: pin(query.toolchain),
            matching_compilers: pin(query.compiler),
            matching_host_operating_systems: pin(query.host_os),
            matching_host_architectures: pin(query.host_arch),
            matching_target_operating_systems: pin(query.target_os),
            matching_target_architectures: pin(query.target_arch),
            matching_configuration_types: pin(query.configuration_type),
            ..Default::default()
        };

        for conf in selected {
            extend_unique(&mut merged.include_directories, &conf.include_directories);
            merged.defines.extend(conf.defines.iter().cloned());
            merged.common_flags.extend(conf.common_flags.iter().cloned());
            merged.c_flags.extend(conf.c_flags.iter().cloned());
            merged.cpp_flags.extend(conf.cpp_flags.iter().cloned());
            merged.linker_flags.extend(conf.linker_flags.iter().cloned());
            for (key, value) in &conf.options {
                merged.options.insert(key.clone(), value.clone());
            }
            extend_unique(&mut merged.lib_directories, &conf.lib_directories);
            extend_unique(&mut merged.libs, &conf.libs);
            merged.files.extend(conf.files.iter().cloned());
            if let Some(dir) = &conf.output_directory {
                merged.output_directory = Some(dir.clone());
            }
        }

        merged
    }
}

fn pin<T: Copy + PartialEq>(value: Option<T>) -> AxisFilter<T> {
    value.map(AxisFilter::only).unwrap_or_default()
}

fn extend_unique(into: &mut Vec<PathBuf>, items: &[PathBuf]) {
    for item in items {
        if !into.contains(item) {
            into.push(item.clone());
        }
    }
}
