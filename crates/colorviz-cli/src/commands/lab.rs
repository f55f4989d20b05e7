//! Single Lab sample conversion.

use super::format_vec3;
use crate::LabArgs;
use anyhow::Result;
use colorviz_color::{LabConverter, lab_to_xyz};
use colorviz_math::Vec3;
use colorviz_view::ViewerConfig;

pub fn run(args: LabArgs, config: &ViewerConfig) -> Result<()> {
    let illuminant = args.illuminant.unwrap_or(config.illuminant);
    let lab = Vec3::new(args.l, args.a, args.b);
    let converter = LabConverter::new(illuminant);

    let xyz = lab_to_xyz(lab, illuminant.white());
    let rgb = converter.lab_to_rgb(lab);
    let rgb8 = (rgb * 255.0).round();

    println!("Lab  {}  ({illuminant})", format_vec3(lab));
    println!("XYZ  {}", format_vec3(xyz));
    println!("sRGB {}", format_vec3(rgb));
    println!(
        "Hex  #{:02X}{:02X}{:02X}",
        rgb8.x as u8, rgb8.y as u8, rgb8.z as u8
    );
    Ok(())
}
