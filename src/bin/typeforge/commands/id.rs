//! `typeforge id` command

use anyhow::Result;

use crate::cli::IdArgs;
use typeforge::util::hash::{derive_guid, hash_for_path};

pub fn execute(args: IdArgs) -> Result<()> {
    if args.length == 0 {
        anyhow::bail!("identifier length must be at least 1");
    }
    let id = if args.guid {
        derive_guid(&args.text)
    } else {
        hash_for_path(&args.text, args.length)
    };
    println!("{}", id);
    Ok(())
}
