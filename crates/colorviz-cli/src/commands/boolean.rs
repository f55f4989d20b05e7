//! Gamut union / intersection command.

use crate::BooleanArgs;
use anyhow::{Context, Result};
use colorviz_gamut::{IdGenerator, ParseMode, mesh_boolean, save_gamut};
use colorviz_view::ViewerConfig;
use tracing::info;

pub fn run(args: BooleanArgs, config: &ViewerConfig) -> Result<()> {
    let mut ids = IdGenerator::new();
    let a = super::load_gamut(&args.a, ParseMode::Lenient, config, &mut ids)?;
    let b = super::load_gamut(&args.b, ParseMode::Lenient, config, &mut ids)?;

    let result = mesh_boolean(&a, &b, args.op, &mut ids)
        .with_context(|| format!("{} of {} and {} failed", args.op, a.label(), b.label()))?;

    let bounds = result.bounds();
    println!("{}", result.label());
    println!("  Vertices:  {}", result.vertices().len());
    println!("  Triangles: {}", result.triangles().len());
    println!("  Min Lab:   {}", super::format_vec3(bounds.min));
    println!("  Max Lab:   {}", super::format_vec3(bounds.max));

    if let Some(output) = &args.output {
        save_gamut(output, &result.to_data())
            .with_context(|| format!("Failed to save: {}", output.display()))?;
        info!(path = %output.display(), "result written");
    }
    Ok(())
}
