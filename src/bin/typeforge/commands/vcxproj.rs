//! `typeforge vcxproj` command

use anyhow::Result;

use super::{print_report, Session};
use crate::cli::VcxprojArgs;
use typeforge::generator::msbuild::VcxprojGenerator;
use typeforge::generator::Generator;

pub fn execute(args: VcxprojArgs) -> Result<()> {
    let session = Session::open(&args.project)?;
    let templates = &session.config.templates;
    let project_template = session.template(
        args.template.as_deref(),
        templates.vcxproj.as_deref(),
        "vcxproj",
    )?;
    let filters_template = session.template(
        args.filters_template.as_deref(),
        templates.vcxproj_filters.as_deref(),
        "vcxproj-filters",
    )?;

    let manifest = &session.manifest;
    let generator = VcxprojGenerator::new(
        &manifest.project,
        &manifest.id,
        &manifest.references,
        &manifest.manifest_dir,
        &session.output_dir,
        &project_template,
        &filters_template,
        session.host_os,
        session.host_arch,
        args.target_os,
    );
    let report = generator.generate(session.force)?;
    print_report(generator.name(), &report);

    Ok(())
}
