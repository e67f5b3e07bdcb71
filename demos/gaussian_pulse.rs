use wavesynth::dispersion::models::PowerLaw;
use wavesynth::prelude::*;

use std::sync::Arc;

fn main() {
    let fs = 1e6; // [Hz]
    let nsamples = 512;

    // a Gaussian-windowed tone burst, 100 kHz carrier
    let carrier = 2.0 * std::f64::consts::PI * 1e5; // [rad/s]
    let center = 128.0 / fs;
    let width = 2e-5;
    let signal: Vec<f64> = (0..nsamples)
        .map(|i| {
            let t = i as f64 / fs;
            let window = (-((t - center) / width).powi(2)).exp();
            window * (carrier * t).sin()
        })
        .collect();

    let spectrum = Spectrum::from_signal(&signal, 1.0 / fs).unwrap();

    // flexural-plate dispersion, k ∝ √ω
    let packet = Wavepacket::new(WavepacketDescriptor {
        dispersion: Arc::new(PowerLaw {
            coefficient: 0.05,
            exponent: 0.5,
        }),
        spectrum: Arc::new(spectrum),
        causal: true,
        envelope: None,
    })
    .unwrap();

    let xs = ndarray::Array1::linspace(0.0, 0.5, 500); // [m]
    let ts = ndarray::Array1::linspace(0.0, 5e-4, 500); // [s]

    println!(
        "\n-- Wavepacket Info --\n\
        # of components: {}\n\
        # of positions:  {}\n\
        # of times:      {}\n",
        packet.spectrum().len(),
        xs.len(),
        ts.len(),
    );

    let field = packet.field(&xs, &ts, true);

    std::fs::create_dir_all("data").unwrap();
    FieldRecord::from_wavepacket("flexural-plate", xs, ts, field)
        .save("data/gaussian_pulse.h5")
        .unwrap();
    println!("saved to data/gaussian_pulse.h5");
}
