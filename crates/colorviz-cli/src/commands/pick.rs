//! Ray pick against a gamut through an orbit camera.

use crate::PickArgs;
use anyhow::{Result, bail};
use colorviz_camera::{Camera, CameraControl, Mode};
use colorviz_gamut::{IdGenerator, ParseMode};
use colorviz_math::Vec2;
use colorviz_view::ViewerConfig;
use tracing::debug;

pub fn run(args: PickArgs, config: &ViewerConfig) -> Result<()> {
    if args.width <= 0.0 || args.height <= 0.0 {
        bail!("viewport must be positive, got {}x{}", args.width, args.height);
    }

    let mut ids = IdGenerator::new();
    let mesh = super::load_gamut(&args.input, ParseMode::Lenient, config, &mut ids)?;
    let bounds = mesh.bounds();
    if bounds.is_empty() {
        bail!("{} has no vertices", args.input.display());
    }

    // far enough that the whole box fits the vertical fov
    let radius = bounds.size().length() * 0.5;
    let distance = args
        .distance
        .unwrap_or_else(|| (radius / (config.fov * 0.5).tan()).max(radius * 1.5));

    let mut control = CameraControl::default();
    control.set_mode(Mode::Orbit);
    control.set_orbit_target(bounds.center());
    control.set_orbit_dist(distance);
    control.set_orbit_theta(args.theta);
    control.set_orbit_phi(args.phi);

    let mut camera = Camera {
        fov: config.fov,
        near: config.near,
        far: config.far.max(distance * 4.0),
        projection: config.projection,
        ..Default::default()
    };
    control.update(&mut camera, Vec2::new(args.width, args.height));
    debug!(pos = ?camera.pos, target = ?camera.target, distance, "pick camera");

    let ray = camera.ray(Vec2::new(args.x, args.y));
    match mesh.pick(&ray) {
        Some(hit) => {
            println!("Triangle {}", hit.triangle);
            println!("  Lab:      {}", super::format_vec3(hit.hit.point));
            println!("  Normal:   {}", super::format_vec3(hit.hit.normal));
            println!("  Distance: {:.3}", hit.hit.distance);
        }
        None => println!("No hit"),
    }
    Ok(())
}
