//! Show a blueprint as the orchestrator would evaluate it.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::blueprint::Blueprint;
use crate::core::options::Options;
use crate::core::platform::Platform;

pub fn run(path: &Path, platform: Platform, assignments: &[String]) -> Result<()> {
    let blueprint = Blueprint::from_file(path)
        .with_context(|| format!("Loading blueprint {}", path.display()))?;
    blueprint.validate()?;

    let mut options = blueprint.default_options();
    options.apply_env()?;
    for assignment in assignments {
        options.set_assignment(assignment)?;
    }

    print_blueprint(&blueprint, platform, &options);
    Ok(())
}

fn print_blueprint(blueprint: &Blueprint, platform: Platform, options: &Options) {
    let info = &blueprint.package;
    println!("{} ({})", info.display(), info.name);
    if !info.description.is_empty() {
        println!("  {}", info.description);
    }
    if !info.webpage.is_empty() {
        println!("  {}", info.webpage);
    }
    println!("  platform: {platform}");

    if !blueprint.targets.tarball_url.is_empty() {
        println!("\ntarball: {}", blueprint.targets.tarball_url);
    }
    if !blueprint.targets.git_url.is_empty() {
        println!("git: {}", blueprint.targets.git_url);
    }
    if !blueprint.targets.default_target.is_empty() {
        println!("default target: {}", blueprint.targets.default_target);
    }

    let mut any_option = false;
    for (name, value) in options.iter() {
        if !any_option {
            println!("\noptions:");
            any_option = true;
        }
        println!("  {name} = {value}");
    }

    let deps = blueprint.dependencies.resolved(platform, options);
    if !deps.build.is_empty() {
        println!("\nbuild dependencies:");
        for name in &deps.build {
            println!("  {name}");
        }
    }
    if !deps.runtime.is_empty() {
        println!("\nruntime dependencies:");
        for name in &deps.runtime {
            println!("  {name}");
        }
    }

    let args = blueprint.configure.args(platform, options);
    if !args.is_empty() {
        println!("\nconfigure args:");
        for arg in &args {
            println!("  {arg}");
        }
    }

    let ignored = blueprint.packaging.ignored_packages(platform, options);
    if !ignored.is_empty() {
        println!("\nignored packages:");
        for name in &ignored {
            println!("  {name}");
        }
    }
}
