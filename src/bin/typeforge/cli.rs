//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use typeforge::core::{
    Architecture, Compiler, ConfigurationType, OperatingSystem, TargetType, Toolchain,
};

/// typeforge - generate Ninja, Xcode and Visual Studio project files
#[derive(Parser)]
#[command(name = "typeforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a Ninja build script for one configuration
    Ninja(NinjaArgs),

    /// Write an Xcode project from a template
    Xcode(XcodeArgs),

    /// Write a Visual Studio project and its filters file from templates
    Vcxproj(VcxprojArgs),

    /// Write a Visual Studio solution for the project and its references
    Sln(SlnArgs),

    /// Write every IDE project whose template is configured
    Generate(GenerateArgs),

    /// Print the merged configuration for one axis tuple as JSON
    Resolve(ResolveArgs),

    /// Print the identifier derived from a string
    Id(IdArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by every command that reads a manifest.
#[derive(Args, Clone)]
pub struct ProjectArgs {
    /// Path to typeforge.toml (defaults to searching upward from the cwd)
    #[arg(long, short)]
    pub manifest: Option<PathBuf>,

    /// Output directory (defaults to `build` next to the manifest)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Host operating system (defaults to config, then this machine)
    #[arg(long)]
    pub host_os: Option<OperatingSystem>,

    /// Host architecture (defaults to config, then this machine)
    #[arg(long)]
    pub host_arch: Option<Architecture>,

    /// Rewrite outputs even when their content is unchanged
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Args)]
pub struct NinjaArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Toolchain axis value
    #[arg(long, default_value = "Ninja")]
    pub toolchain: Toolchain,

    /// Compiler
    #[arg(long)]
    pub compiler: Compiler,

    /// Target operating system (defaults to the host)
    #[arg(long)]
    pub target_os: Option<OperatingSystem>,

    /// Target architecture (defaults to the host)
    #[arg(long)]
    pub arch: Option<Architecture>,

    /// Configuration type
    #[arg(long, default_value = "Debug")]
    pub config: ConfigurationType,
}

#[derive(Args)]
pub struct XcodeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Target operating system
    #[arg(long, default_value = "Mac")]
    pub target_os: OperatingSystem,

    /// project.pbxproj template (defaults to `[templates] xcode`)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Apple development team for iOS signing
    #[arg(long)]
    pub development_team: Option<String>,
}

#[derive(Args)]
pub struct VcxprojArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Target operating system
    #[arg(long, default_value = "Windows")]
    pub target_os: OperatingSystem,

    /// .vcxproj template (defaults to `[templates] vcxproj`)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// .vcxproj.filters template (defaults to `[templates] vcxproj-filters`)
    #[arg(long)]
    pub filters_template: Option<PathBuf>,
}

#[derive(Args)]
pub struct SlnArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Solution name (defaults to the project name)
    #[arg(long)]
    pub name: Option<String>,

    /// Solution GUID (defaults to one derived from the name)
    #[arg(long)]
    pub id: Option<String>,

    /// .sln template (defaults to `[templates] sln`)
    #[arg(long)]
    pub template: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Path to typeforge.toml (defaults to searching upward from the cwd)
    #[arg(long, short)]
    pub manifest: Option<PathBuf>,

    /// Target type (defaults to the project's)
    #[arg(long)]
    pub target_type: Option<TargetType>,

    #[arg(long)]
    pub toolchain: Toolchain,

    #[arg(long)]
    pub compiler: Compiler,

    #[arg(long)]
    pub host_os: Option<OperatingSystem>,

    #[arg(long)]
    pub host_arch: Option<Architecture>,

    #[arg(long)]
    pub target_os: OperatingSystem,

    #[arg(long)]
    pub arch: Architecture,

    #[arg(long)]
    pub config: ConfigurationType,
}

#[derive(Args)]
pub struct IdArgs {
    /// Text to derive the identifier from
    pub text: String,

    /// Identifier length in hex digits
    #[arg(long, short, default_value_t = 24, conflicts_with = "guid")]
    pub length: usize,

    /// Print a GUID instead
    #[arg(long)]
    pub guid: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
