//! `typeforge ninja` command

use anyhow::Result;

use super::{print_report, Session};
use crate::cli::NinjaArgs;
use typeforge::generator::ninja::NinjaGenerator;
use typeforge::generator::Generator;
use typeforge::resolver::AxisQuery;

pub fn execute(args: NinjaArgs) -> Result<()> {
    let session = Session::open(&args.project)?;

    let query = AxisQuery::new()
        .toolchain(args.toolchain)
        .compiler(args.compiler)
        .host(session.host_os, session.host_arch)
        .target_os(args.target_os.unwrap_or(session.host_os))
        .target_arch(args.arch.unwrap_or(session.host_arch))
        .configuration_type(args.config);

    let manifest = &session.manifest;
    let generator = NinjaGenerator::new(
        &manifest.project,
        &manifest.references,
        &manifest.manifest_dir,
        &session.output_dir,
        query,
    );
    let report = generator.generate(session.force)?;
    print_report(generator.name(), &report);

    Ok(())
}
