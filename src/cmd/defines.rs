//! Print the packaging define map for a blueprint.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::blueprint::Blueprint;
use crate::core::defines::{DefineMap, PackagerFlavor};
use crate::core::platform::Platform;

pub fn run(
    path: &Path,
    platform: Platform,
    assignments: &[String],
    build_dir: &Path,
    version: Option<String>,
    nullsoft: bool,
) -> Result<()> {
    let blueprint = Blueprint::from_file(path)
        .with_context(|| format!("Loading blueprint {}", path.display()))?;
    blueprint.validate()?;

    let mut options = blueprint.default_options();
    options.apply_env()?;
    for assignment in assignments {
        options.set_assignment(assignment)?;
    }

    let flavor = if nullsoft {
        PackagerFlavor::Nullsoft
    } else {
        PackagerFlavor::Other
    };
    let blueprint_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let defines = DefineMap::assemble(
        &blueprint,
        &options,
        platform,
        flavor,
        build_dir,
        blueprint_dir,
        version,
    );
    println!("{}", defines.to_json()?);
    Ok(())
}
