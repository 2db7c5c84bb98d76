//! Build axes and per-axis filters.
//!
//! An axis is one independent dimension of build variability. Every axis is
//! a closed enum; configuration fragments restrict themselves to a subset of
//! an axis with an [`AxisFilter`].

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown axis member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {axis} '{value}', valid values: {expected}")]
pub struct ParseAxisError {
    pub axis: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! axis_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $axis:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Canonical textual name.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ParseAxisError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseAxisError {
                        axis: $axis,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.name())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

axis_enum! {
    /// The kind of artifact a project produces.
    TargetType, "target type" {
        Executable => "Executable",
        StaticLibrary => "StaticLibrary",
        DynamicLibrary => "DynamicLibrary",
    }
}

axis_enum! {
    /// The build tool a project file is generated for.
    Toolchain, "toolchain" {
        VisualStudio => "VisualStudio",
        XCode => "XCode",
        Ninja => "Ninja",
    }
}

axis_enum! {
    /// Compiler family.
    Compiler, "compiler" {
        VisualCpp => "VisualCpp",
        Gcc => "gcc",
        Clang => "clang",
    }
}

axis_enum! {
    /// Operating system, used for both the host and the target axis.
    OperatingSystem, "operating system" {
        Windows => "Windows",
        Linux => "Linux",
        Mac => "Mac",
        Android => "Android",
        Ios => "iOS",
    }
}

axis_enum! {
    /// CPU architecture, used for both the host and the target axis.
    Architecture, "architecture" {
        X86 => "x86",
        X86_64 => "x86_64",
        ArmeabiV7a => "armeabi_v7a",
        Arm64V8a => "arm64_v8a",
    }
}

axis_enum! {
    /// Build configuration.
    ConfigurationType, "configuration type" {
        Debug => "Debug",
        Release => "Release",
    }
}

impl TargetType {
    /// Whether a linker produces this target (executables and dynamic libraries).
    ///
    /// Only linked targets receive library search paths, libraries and
    /// linker flags; static libraries are archived.
    pub fn is_linked(self) -> bool {
        matches!(self, TargetType::Executable | TargetType::DynamicLibrary)
    }
}

impl OperatingSystem {
    /// The operating system typeforge itself runs on, if it has a name on
    /// this axis.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "windows" => Some(OperatingSystem::Windows),
            "linux" => Some(OperatingSystem::Linux),
            "macos" => Some(OperatingSystem::Mac),
            "android" => Some(OperatingSystem::Android),
            "ios" => Some(OperatingSystem::Ios),
            _ => None,
        }
    }
}

impl Architecture {
    /// The architecture typeforge itself runs on, if it has a name on this axis.
    pub fn current() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86" => Some(Architecture::X86),
            "x86_64" => Some(Architecture::X86_64),
            "arm" => Some(Architecture::ArmeabiV7a),
            "aarch64" => Some(Architecture::Arm64V8a),
            _ => None,
        }
    }
}

/// Restriction of a fragment along one axis.
///
/// `Any` applies regardless of the axis value. `OneOf` lists the permitted
/// values and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisFilter<T> {
    Any,
    OneOf(Vec<T>),
}

impl<T> Default for AxisFilter<T> {
    fn default() -> Self {
        AxisFilter::Any
    }
}

impl<T: Copy + PartialEq> AxisFilter<T> {
    /// A filter permitting exactly one value.
    pub fn only(value: T) -> Self {
        AxisFilter::OneOf(vec![value])
    }

    /// Build a filter from a list; an empty list means `Any`.
    pub fn from_values(values: Vec<T>) -> Self {
        if values.is_empty() {
            AxisFilter::Any
        } else {
            AxisFilter::OneOf(values)
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, AxisFilter::Any)
    }

    /// Permitted values, or `None` for `Any`.
    pub fn values(&self) -> Option<&[T]> {
        match self {
            AxisFilter::Any => None,
            AxisFilter::OneOf(values) => Some(values),
        }
    }

    /// Whether a concrete value passes the filter.
    pub fn permits(&self, value: T) -> bool {
        match self {
            AxisFilter::Any => true,
            AxisFilter::OneOf(values) => values.contains(&value),
        }
    }

    /// Loose test: an unknown query value never rejects.
    pub fn loose_match(&self, query: Option<T>) -> bool {
        match query {
            None => true,
            Some(value) => self.permits(value),
        }
    }

    /// Strict test: a constraint is only satisfied by a concrete value.
    pub fn strict_match(&self, query: Option<T>) -> bool {
        match self {
            AxisFilter::Any => true,
            AxisFilter::OneOf(values) => query.is_some_and(|q| values.contains(&q)),
        }
    }
}

impl<T: Serialize> Serialize for AxisFilter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AxisFilter::Any => serializer.serialize_none(),
            AxisFilter::OneOf(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for AxisFilter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FilterVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for FilterVisitor<T> {
            type Value = AxisFilter<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-empty list of axis values")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(v) = seq.next_element()? {
                    values.push(v);
                }
                if values.is_empty() {
                    return Err(de::Error::custom(
                        "axis filter list must not be empty; omit the field to match any value",
                    ));
                }
                Ok(AxisFilter::OneOf(values))
            }
        }

        deserializer.deserialize_seq(FilterVisitor(std::marker::PhantomData))
    }
}
