//! Axis queries.

use std::fmt;

use crate::core::{
    Architecture, Compiler, Configuration, ConfigurationType, OperatingSystem, TargetType,
    Toolchain,
};

/// A partially or fully pinned point in axis space.
///
/// Each axis is either a concrete value or unknown (`None`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AxisQuery {
    pub target_type: Option<TargetType>,
    pub toolchain: Option<Toolchain>,
    pub compiler: Option<Compiler>,
    pub host_os: Option<OperatingSystem>,
    pub host_arch: Option<Architecture>,
    pub target_os: Option<OperatingSystem>,
    pub target_arch: Option<Architecture>,
    pub configuration_type: Option<ConfigurationType>,
}

impl AxisQuery {
    /// A query with every axis unknown.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_type(mut self, value: TargetType) -> Self {
        self.target_type = Some(value);
        self
    }

    pub fn toolchain(mut self, value: Toolchain) -> Self {
        self.toolchain = Some(value);
        self
    }

    pub fn compiler(mut self, value: Compiler) -> Self {
        self.compiler = Some(value);
        self
    }

    pub fn host(mut self, os: OperatingSystem, arch: Architecture) -> Self {
        self.host_os = Some(os);
        self.host_arch = Some(arch);
        self
    }

    pub fn target_os(mut self, value: OperatingSystem) -> Self {
        self.target_os = Some(value);
        self
    }

    pub fn target_arch(mut self, value: Architecture) -> Self {
        self.target_arch = Some(value);
        self
    }

    /// Set or clear the configuration type.
    pub fn configuration_type(mut self, value: impl Into<Option<ConfigurationType>>) -> Self {
        self.configuration_type = value.into();
        self
    }

    /// Set or clear the target architecture.
    pub fn with_target_arch(mut self, value: impl Into<Option<Architecture>>) -> Self {
        self.target_arch = value.into();
        self
    }

    /// Whether every axis has a concrete value.
    pub fn is_fully_pinned(&self) -> bool {
        self.target_type.is_some()
            && self.toolchain.is_some()
            && self.compiler.is_some()
            && self.host_os.is_some()
            && self.host_arch.is_some()
            && self.target_os.is_some()
            && self.target_arch.is_some()
            && self.configuration_type.is_some()
    }

    /// Loose match: an axis rejects only when both the query and the fragment
    /// name it and the fragment does not permit the query's value.
    pub fn loosely_matches(&self, conf: &Configuration) -> bool {
        conf.matching_target_types.loose_match(self.target_type)
            && conf.matching_toolchains.loose_match(self.toolchain)
            && conf.matching_compilers.loose_match(self.compiler)
            && conf.matching_host_operating_systems.loose_match(self.host_os)
            && conf.matching_host_architectures.loose_match(self.host_arch)
            && conf.matching_target_operating_systems.loose_match(self.target_os)
            && conf.matching_target_architectures.loose_match(self.target_arch)
            && conf.matching_configuration_types.loose_match(self.configuration_type)
    }

    /// Strict match: every constraint the fragment declares must be met by a
    /// concrete query value. A constraint on an axis the query leaves unknown
    /// rejects the fragment.
    pub fn strictly_matches(&self, conf: &Configuration) -> bool {
        conf.matching_target_types.strict_match(self.target_type)
            && conf.matching_toolchains.strict_match(self.toolchain)
            && conf.matching_compilers.strict_match(self.compiler)
            && conf.matching_host_operating_systems.strict_match(self.host_os)
            && conf.matching_host_architectures.strict_match(self.host_arch)
            && conf.matching_target_operating_systems.strict_match(self.target_os)
            && conf.matching_target_architectures.strict_match(self.target_arch)
            && conf.matching_configuration_types.strict_match(self.configuration_type)
    }
}

impl fmt::Display for AxisQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn axis<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "*".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "{}/{}/{}/host {}-{}/target {}-{}/{}",
            axis(&self.target_type),
            axis(&self.toolchain),
            axis(&self.compiler),
            axis(&self.host_os),
            axis(&self.host_arch),
            axis(&self.target_os),
            axis(&self.target_arch),
            axis(&self.configuration_type),
        )
    }
}
