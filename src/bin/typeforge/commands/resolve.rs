//! `typeforge resolve` command

use anyhow::{Context, Result};

use super::{host_arch, host_os, load_manifest};
use crate::cli::ResolveArgs;
use typeforge::resolver::{AxisQuery, Resolver};
use typeforge::GlobalContext;

pub fn execute(args: ResolveArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest = load_manifest(&ctx, args.manifest.as_deref())?;
    let config = ctx.load_config(&manifest.manifest_dir);

    let query = AxisQuery::new()
        .target_type(args.target_type.unwrap_or(manifest.project.target_type))
        .toolchain(args.toolchain)
        .compiler(args.compiler)
        .host(host_os(args.host_os, &config)?, host_arch(args.host_arch, &config)?)
        .target_os(args.target_os)
        .target_arch(args.arch)
        .configuration_type(args.config);

    let merged = Resolver::new(&manifest.project.configurations).merge(&query);
    let json = serde_json::to_string_pretty(&merged).context("failed to serialize configuration")?;
    println!("{}", json);

    Ok(())
}
