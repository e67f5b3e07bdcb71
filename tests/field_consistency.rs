//! End-to-end checks across the synthesis pipeline: spectrum from a
//! sampled signal, 1-D packet, 2-D surface, HDF5 record.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::Array1;
use num_complex::Complex64;
use wavesynth::dispersion::models::NonDispersive;
use wavesynth::prelude::*;

#[test]
fn signal_spectrum_reproduces_the_signal_at_the_source() {
    let fs = 100.0;
    let signal: Vec<f64> = (0..200)
        .map(|i| {
            let t = i as f64 / fs;
            0.3 + (2.0 * std::f64::consts::PI * 7.0 * t).cos()
                - 0.5 * (2.0 * std::f64::consts::PI * 13.0 * t).sin()
        })
        .collect();

    let packet = Wavepacket::new(WavepacketDescriptor {
        dispersion: Arc::new(NonDispersive { speed: 1.0 }),
        spectrum: Arc::new(Spectrum::from_signal(&signal, 1.0 / fs).unwrap()),
        causal: false,
        envelope: None,
    })
    .unwrap();

    for (i, &sample) in signal.iter().enumerate() {
        let t = i as f64 / fs;
        assert_abs_diff_eq!(packet.displacement_at(0.0, t), sample, epsilon = 1e-9);
    }
}

#[test]
fn surface_field_survives_a_record_round_trip() {
    let spectrum = Spectrum::new(vec![SpectralComponent {
        omega: 3.0,
        amplitude: Complex64::new(1.0, 0.5),
    }])
    .unwrap();
    let packet = Arc::new(
        Wavepacket::new(WavepacketDescriptor {
            dispersion: Arc::new(NonDispersive { speed: 2.0 }),
            spectrum: Arc::new(spectrum),
            causal: false,
            envelope: None,
        })
        .unwrap(),
    );
    let surface = Surface::new(SurfaceDescriptor {
        wavepacket: packet,
        source: (0.0, 0.0),
        spreading_exponent: 0.5,
        singularity: SingularityPolicy::Clamp { min_radius: 0.25 },
        radial_step: None,
    })
    .unwrap();

    let (grid_x, grid_y) = Surface::grid(1.0, 1.0, 0.25);
    let times = Array1::linspace(0.0, 1.0, 5);
    let field = surface
        .displacement_field(FieldDescriptor {
            grid_x: grid_x.view(),
            grid_y: grid_y.view(),
            times: times.view(),
            verbose: false,
        })
        .unwrap();

    let record = FieldRecord::from_surface(
        "round-trip",
        &surface,
        grid_x.row(0).to_owned(),
        grid_y.column(0).to_owned(),
        times,
        field.clone(),
    );

    let path = std::env::temp_dir().join(format!(
        "wavesynth_consistency_{}.h5",
        std::process::id()
    ));
    record.save(&path).unwrap();
    let loaded = FieldRecord::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.model, "round-trip");
    assert_eq!(loaded.source, Some((0.0, 0.0)));
    assert_eq!(loaded.spreading_exponent, Some(0.5));
    assert_eq!(loaded.field, field.into_dyn());
}

#[test]
fn shared_wavepacket_feeds_independent_surfaces() {
    let spectrum = Spectrum::new(vec![SpectralComponent {
        omega: 1.0,
        amplitude: Complex64::new(1.0, 0.0),
    }])
    .unwrap();
    let packet = Arc::new(
        Wavepacket::new(WavepacketDescriptor {
            dispersion: Arc::new(NonDispersive { speed: 1.0 }),
            spectrum: Arc::new(spectrum),
            causal: false,
            envelope: None,
        })
        .unwrap(),
    );

    let surface_at = |source| {
        Surface::new(SurfaceDescriptor {
            wavepacket: packet.clone(),
            source,
            spreading_exponent: 0.5,
            singularity: SingularityPolicy::Clamp { min_radius: 0.1 },
            radial_step: None,
        })
        .unwrap()
    };
    let centered = surface_at((0.0, 0.0));
    let shifted = surface_at((1.0, 0.0));

    // the shifted surface sees the same radial profile, one unit away
    let (grid_x, grid_y) = Surface::grid(2.0, 2.0, 0.5);
    let a = centered
        .displacement_at_time(grid_x.view(), grid_y.view(), 0.3)
        .unwrap();
    let b = shifted
        .displacement_at_time((&grid_x + 1.0).view(), grid_y.view(), 0.3)
        .unwrap();

    for (&u, &v) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(u, v, epsilon = 1e-12);
    }
}
