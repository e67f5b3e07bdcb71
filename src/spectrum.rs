use std::f64::consts::PI;

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::Error;

/// One harmonic component of a spectrum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpectralComponent {
    /// Angular frequency in [rad/s].
    pub omega: f64,
    /// Complex amplitude, magnitude and phase of the component.
    pub amplitude: Complex64,
}

/// The frequency-domain content of an excitation.
///
/// An immutable, ascending-ordered sequence of [`SpectralComponent`]s with
/// unique frequencies. An empty spectrum synthesizes an identically-zero
/// field downstream.
#[derive(Clone, Debug, Default)]
pub struct Spectrum {
    components: Vec<SpectralComponent>,
}

impl Spectrum {
    /// Builds a spectrum from (frequency, amplitude) components.
    ///
    /// Components are sorted by ascending frequency; amplitudes given for
    /// the same frequency are summed coherently.
    pub fn new(mut components: Vec<SpectralComponent>) -> Result<Self, Error> {
        for c in &components {
            if !c.omega.is_finite() || c.omega < 0.0 {
                return Err(Error::InvalidDomain {
                    quantity: "frequency",
                    value: c.omega,
                });
            }
        }
        components.sort_by(|a, b| a.omega.total_cmp(&b.omega));

        let mut merged: Vec<SpectralComponent> = Vec::with_capacity(components.len());
        for c in components {
            match merged.last_mut() {
                Some(last) if last.omega == c.omega => last.amplitude += c.amplitude,
                _ => merged.push(c),
            }
        }

        Ok(Self { components: merged })
    }

    /// A spectrum with no components.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Derives a spectrum from a uniformly sampled real signal.
    ///
    /// Takes the one-sided discrete transform of the signal: the frequency
    /// grid is the one implied by the record length and the sampling
    /// interval `dt`, from the DC bin (retained explicitly) up to Nyquist.
    /// Amplitudes are scaled so that a wavepacket built from this spectrum
    /// reproduces the signal at `x = 0`.
    pub fn from_signal(samples: &[f64], dt: f64) -> Result<Self, Error> {
        if samples.len() < 2 {
            return Err(Error::InsufficientData {
                needed: 2,
                got: samples.len(),
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidDomain {
                quantity: "sampling interval",
                value: dt,
            });
        }

        let n = samples.len();
        let mut bins: Vec<Complex64> = samples.iter().map(|&s| Complex64::new(s, 0.0)).collect();
        FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut bins);

        let domega = 2.0 * PI / (n as f64 * dt);
        let nyquist = n / 2;
        let components = (0..=nyquist)
            .map(|i| {
                // one-sided scaling: interior bins carry their conjugate
                // mirror's energy as well
                let factor = if i == 0 || (n % 2 == 0 && i == nyquist) {
                    1.0
                } else {
                    2.0
                };
                SpectralComponent {
                    omega: i as f64 * domega,
                    // conjugated so that exp(-jωt) synthesis matches the
                    // forward-transform convention
                    amplitude: bins[i].conj() * factor / n as f64,
                }
            })
            .collect();

        Ok(Self { components })
    }

    /// Returns a copy with every amplitude multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            components: self
                .components
                .iter()
                .map(|c| SpectralComponent {
                    omega: c.omega,
                    amplitude: c.amplitude * factor,
                })
                .collect(),
        }
    }

    /// Merges the components of two spectra into a new one.
    ///
    /// Amplitudes at frequencies present in both spectra are summed.
    pub fn merge(&self, other: &Spectrum) -> Self {
        let mut components = self.components.clone();
        components.extend_from_slice(&other.components);
        // inputs are already validated, re-sorting cannot fail
        Self::new(components).unwrap_or_else(|_| Self::empty())
    }

    pub fn components(&self) -> &[SpectralComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
