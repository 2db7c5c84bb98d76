//! `typeforge xcode` command

use anyhow::Result;

use super::{print_report, Session};
use crate::cli::XcodeArgs;
use typeforge::generator::xcode::XcodeGenerator;
use typeforge::generator::Generator;

pub fn execute(args: XcodeArgs) -> Result<()> {
    let session = Session::open(&args.project)?;
    let template = session.template(
        args.template.as_deref(),
        session.config.templates.xcode.as_deref(),
        "xcode",
    )?;
    let development_team = args
        .development_team
        .or_else(|| session.config.generate.development_team.clone());

    let manifest = &session.manifest;
    let generator = XcodeGenerator::new(
        &manifest.project,
        &manifest.references,
        &manifest.manifest_dir,
        &session.output_dir,
        &template,
        session.host_os,
        session.host_arch,
        args.target_os,
    )
    .with_development_team(development_team);
    let report = generator.generate(session.force)?;
    print_report(generator.name(), &report);

    Ok(())
}
