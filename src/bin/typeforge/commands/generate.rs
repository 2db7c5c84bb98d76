//! `typeforge generate` command
//!
//! Runs every IDE backend that has templates configured. Backends write
//! disjoint files, so they run in parallel.

use anyhow::Result;
use rayon::prelude::*;

use super::{print_report, solution_id, Session};
use crate::cli::GenerateArgs;
use typeforge::core::OperatingSystem;
use typeforge::generator::msbuild::VcxprojGenerator;
use typeforge::generator::sln::SlnGenerator;
use typeforge::generator::xcode::XcodeGenerator;
use typeforge::generator::{GenerateReport, Generator};

pub fn execute(args: GenerateArgs) -> Result<()> {
    let session = Session::open(&args.project)?;
    let templates = &session.config.templates;
    let manifest = &session.manifest;

    let xcode = templates
        .xcode
        .as_deref()
        .map(|path| session.template(None, Some(path), "xcode"))
        .transpose()?;
    let vcxproj = match (&templates.vcxproj, &templates.vcxproj_filters) {
        (Some(project), Some(filters)) => Some((
            session.template(None, Some(project.as_path()), "vcxproj")?,
            session.template(None, Some(filters.as_path()), "vcxproj-filters")?,
        )),
        _ => None,
    };
    let sln = templates
        .sln
        .as_deref()
        .map(|path| session.template(None, Some(path), "sln"))
        .transpose()?;

    let projects = session.solution_projects();
    let name = manifest.project.name.clone();
    let id = solution_id(&name);

    let mut generators: Vec<Box<dyn Generator + Send + Sync + '_>> = Vec::new();
    if let Some(template) = &xcode {
        generators.push(Box::new(
            XcodeGenerator::new(
                &manifest.project,
                &manifest.references,
                &manifest.manifest_dir,
                &session.output_dir,
                template,
                session.host_os,
                session.host_arch,
                OperatingSystem::Mac,
            )
            .with_development_team(session.config.generate.development_team.clone()),
        ));
    }
    if let Some((project_template, filters_template)) = &vcxproj {
        generators.push(Box::new(VcxprojGenerator::new(
            &manifest.project,
            &manifest.id,
            &manifest.references,
            &manifest.manifest_dir,
            &session.output_dir,
            project_template,
            filters_template,
            session.host_os,
            session.host_arch,
            OperatingSystem::Windows,
        )));
    }
    if let Some(template) = &sln {
        generators.push(Box::new(SlnGenerator::new(
            &name,
            &id,
            &projects,
            &session.output_dir,
            template,
        )));
    }

    if generators.is_empty() {
        anyhow::bail!(
            "no templates configured\n\
             help: set `[templates]` entries in .typeforge/config.toml"
        );
    }

    let results: Vec<(&'static str, Result<GenerateReport>)> = generators
        .par_iter()
        .map(|g| (g.name(), g.generate(session.force)))
        .collect();

    let mut failed = 0;
    for (backend, result) in results {
        match result {
            Ok(report) => print_report(backend, &report),
            Err(e) => {
                eprintln!("error: {} backend failed: {:#}", backend, e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} of {} backends failed", failed, generators.len());
    }

    Ok(())
}
