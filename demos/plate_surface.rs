use wavesynth::dispersion::models::NonDispersive;
use wavesynth::prelude::*;

use std::sync::Arc;

fn main() {
    // two-tone excitation on a membrane with wave speed 50 m/s
    let spectrum = Spectrum::new(vec![
        SpectralComponent {
            omega: 2.0 * std::f64::consts::PI * 50.0,
            amplitude: num_complex::Complex64::new(1.0, 0.0),
        },
        SpectralComponent {
            omega: 2.0 * std::f64::consts::PI * 80.0,
            amplitude: num_complex::Complex64::new(0.5, 0.0),
        },
    ])
    .unwrap();

    let packet = Arc::new(
        Wavepacket::new(WavepacketDescriptor {
            dispersion: Arc::new(NonDispersive { speed: 50.0 }),
            spectrum: Arc::new(spectrum),
            causal: true,
            envelope: None,
        })
        .unwrap(),
    );

    let dx = 0.01; // [m]
    let surface = Surface::new(SurfaceDescriptor {
        wavepacket: packet,
        source: (0.1, -0.05),
        spreading_exponent: 0.5,
        singularity: SingularityPolicy::Clamp { min_radius: dx },
        radial_step: Some(dx / 4.0),
    })
    .unwrap();

    let (grid_x, grid_y) = Surface::grid(0.5, 0.5, dx);
    let times = ndarray::Array1::linspace(0.0, 0.02, 40);

    let field = surface
        .displacement_field(FieldDescriptor {
            grid_x: grid_x.view(),
            grid_y: grid_y.view(),
            times: times.view(),
            verbose: true,
        })
        .unwrap();

    let xs = grid_x.row(0).to_owned();
    let ys = grid_y.column(0).to_owned();

    std::fs::create_dir_all("data").unwrap();
    FieldRecord::from_surface("membrane", &surface, xs, ys, times, field)
        .save("data/plate_surface.h5")
        .unwrap();
    println!("saved to data/plate_surface.h5");
}
