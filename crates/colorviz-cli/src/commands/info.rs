//! Gamut info command.
//!
//! Prints counts, the Lab bounding box and whatever header keywords the file
//! carried.

use super::format_vec3;
use crate::InfoArgs;
use anyhow::Result;
use colorviz_gamut::{GamutHeader, IdGenerator, ParseMode};
use colorviz_view::ViewerConfig;
use tracing::debug;

pub fn run(args: InfoArgs, config: &ViewerConfig, verbose: bool) -> Result<()> {
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let mut ids = IdGenerator::new();

    for path in &args.input {
        let mesh = super::load_gamut(path, mode, config, &mut ids)?;
        debug!(path = %path.display(), id = %mesh.id(), "loaded");

        println!("{}", path.display());
        println!("  Label:      {}", mesh.label());
        println!("  Vertices:   {}", mesh.vertices().len());
        println!("  Triangles:  {}", mesh.triangles().len());
        let bounds = mesh.bounds();
        if !bounds.is_empty() {
            println!("  Min Lab:    {}", format_vec3(bounds.min));
            println!("  Max Lab:    {}", format_vec3(bounds.max));
        }
        println!("  Illuminant: {}", mesh.illuminant());

        print_header(mesh.header(), verbose);

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}

fn print_header(header: &GamutHeader, verbose: bool) {
    let text = [
        ("Descriptor", &header.descriptor),
        ("Originator", &header.originator),
        ("Created", &header.created),
        ("Color rep", &header.color_rep),
    ];
    for (name, value) in text {
        if let Some(v) = value {
            println!("  {:<11} {}", format!("{name}:"), v);
        }
    }

    let points = [
        ("Center", header.gamut_center),
        ("Cspace white", header.cspace_white),
        ("Gamut white", header.gamut_white),
        ("Cspace black", header.cspace_black),
        ("Gamut black", header.gamut_black),
    ];
    for (name, value) in points {
        if let Some(v) = value {
            println!("  {:<13} {}", format!("{name}:"), format_vec3(v));
        }
    }

    if header.cusps.is_empty() {
        return;
    }
    if verbose {
        println!("  Cusps:");
        for (key, lab) in &header.cusps {
            println!("    {:<12} {}", key, format_vec3(*lab));
        }
    } else {
        println!("  Cusps:      {}", header.cusps.len());
    }
}
