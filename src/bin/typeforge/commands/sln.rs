//! `typeforge sln` command

use anyhow::Result;

use super::{print_report, solution_id, Session};
use crate::cli::SlnArgs;
use typeforge::generator::sln::SlnGenerator;
use typeforge::generator::Generator;

pub fn execute(args: SlnArgs) -> Result<()> {
    let session = Session::open(&args.project)?;
    let template = session.template(
        args.template.as_deref(),
        session.config.templates.sln.as_deref(),
        "sln",
    )?;

    let name = args
        .name
        .unwrap_or_else(|| session.manifest.project.name.clone());
    let id = args.id.unwrap_or_else(|| solution_id(&name));
    let projects = session.solution_projects();

    let generator = SlnGenerator::new(&name, &id, &projects, &session.output_dir, &template);
    let report = generator.generate(session.force)?;
    print_report(generator.name(), &report);

    Ok(())
}
