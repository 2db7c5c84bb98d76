//! Command implementations

pub mod completions;
pub mod generate;
pub mod id;
pub mod ninja;
pub mod resolve;
pub mod sln;
pub mod vcxproj;
pub mod xcode;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;
use typeforge::core::{Architecture, OperatingSystem, ProjectReference};
use typeforge::generator::GenerateReport;
use typeforge::util::config::Config;
use typeforge::util::fs::read_to_string;
use typeforge::util::hash::derive_guid;
use typeforge::util::path::normalize;
use typeforge::{GlobalContext, Manifest};

/// A loaded manifest with everything a generator needs around it.
pub struct Session {
    pub ctx: GlobalContext,
    pub manifest: Manifest,
    pub config: Config,
    pub output_dir: PathBuf,
    pub host_os: OperatingSystem,
    pub host_arch: Architecture,
    pub force: bool,
}

impl Session {
    pub fn open(args: &ProjectArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let manifest = load_manifest(&ctx, args.manifest.as_deref())?;
        let config = ctx.load_config(&manifest.manifest_dir);

        let host_os = host_os(args.host_os, &config)?;
        let host_arch = host_arch(args.host_arch, &config)?;

        let output_dir = match &args.output {
            Some(dir) => normalize(&ctx.absolute(dir)),
            None => manifest.manifest_dir.join("build"),
        };

        Ok(Session {
            force: args.force || config.generate.force,
            ctx,
            manifest,
            config,
            output_dir,
            host_os,
            host_arch,
        })
    }

    /// Read a template given on the command line (relative to the cwd) or in
    /// the config (relative to the project root).
    pub fn template(
        &self,
        flag: Option<&Path>,
        configured: Option<&Path>,
        key: &str,
    ) -> Result<String> {
        let path = match (flag, configured) {
            (Some(path), _) => self.ctx.absolute(path),
            (None, Some(path)) => self.manifest.manifest_dir.join(path),
            (None, None) => anyhow::bail!(
                "no {} template given\n\
                 help: pass `--template <path>` or set `[templates] {}` in .typeforge/config.toml",
                key,
                key
            ),
        };
        tracing::debug!("reading {} template {}", key, path.display());
        read_to_string(&path).with_context(|| format!("failed to load the {} template", key))
    }

    /// The project itself as a solution entry, followed by its references.
    pub fn solution_projects(&self) -> Vec<ProjectReference> {
        let project = &self.manifest.project;
        let mut projects = vec![ProjectReference {
            id: self.manifest.id.clone(),
            name: project.name.clone(),
            file_path: self.output_dir.join(format!("{}.vcxproj", project.name)),
            virtual_dir: String::new(),
        }];
        projects.extend(self.manifest.references.iter().cloned());
        projects
    }
}

pub fn load_manifest(ctx: &GlobalContext, path: Option<&Path>) -> Result<Manifest> {
    let path = match path {
        Some(path) => ctx.absolute(path),
        None => ctx.find_manifest()?,
    };
    Manifest::load(&path)
}

pub fn host_os(flag: Option<OperatingSystem>, config: &Config) -> Result<OperatingSystem> {
    match flag.or(config.host_os()?) {
        Some(os) => Ok(os),
        None => OperatingSystem::current().with_context(|| {
            format!(
                "`{}` is not a known host operating system\n\
                 help: pass `--host-os` or set `generate.host-os` in config",
                std::env::consts::OS
            )
        }),
    }
}

pub fn host_arch(flag: Option<Architecture>, config: &Config) -> Result<Architecture> {
    match flag.or(config.host_arch()?) {
        Some(arch) => Ok(arch),
        None => Architecture::current().with_context(|| {
            format!(
                "`{}` is not a known host architecture\n\
                 help: pass `--host-arch` or set `generate.host-arch` in config",
                std::env::consts::ARCH
            )
        }),
    }
}

/// Default solution GUID for a solution name.
pub fn solution_id(name: &str) -> String {
    derive_guid(&format!("solution:{}", name))
}

pub fn print_report(backend: &str, report: &GenerateReport) {
    for (path, _) in &report.outputs {
        eprintln!("   Generated {} -> {}", backend, path.display());
    }
    eprintln!(
        "    Finished {} ({} written, {} up to date)",
        backend,
        report.written(),
        report.outputs.len() - report.written()
    );
}
