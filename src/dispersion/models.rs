//! Dispersion relations for common media.

use num_complex::Complex64;

use crate::dispersion::{check_frequency, Dispersion};
use crate::Error;

/// A medium where every frequency travels at the same phase speed.
///
/// k = ω / c, so phase and group velocity both equal `speed`.
pub struct NonDispersive {
    /// The wave speed of the medium in consistent length/time units.
    pub speed: f64,
}
impl Dispersion for NonDispersive {
    fn wavenumber(&self, omega: f64) -> Result<Complex64, Error> {
        Ok(Complex64::new(check_frequency(omega)? / self.speed, 0.0))
    }

    fn frequency(&self, wavenumber: f64) -> Result<f64, Error> {
        if !wavenumber.is_finite() || wavenumber < 0.0 {
            return Err(Error::InvalidDomain {
                quantity: "wavenumber",
                value: wavenumber,
            });
        }
        Ok(wavenumber * self.speed)
    }

    fn group_velocity(&self, omega: f64) -> Result<f64, Error> {
        check_frequency(omega)?;
        Ok(self.speed)
    }
}

/// A power-law relation k = a·ω^b.
///
/// With `exponent = 0.5` this reproduces the flexural behavior of thin
/// plates, where higher frequencies travel faster.
pub struct PowerLaw {
    pub coefficient: f64,
    pub exponent: f64,
}
impl Dispersion for PowerLaw {
    fn wavenumber(&self, omega: f64) -> Result<Complex64, Error> {
        let omega = check_frequency(omega)?;
        Ok(Complex64::new(
            self.coefficient * omega.powf(self.exponent),
            0.0,
        ))
    }

    /// Resolves the positive real branch, ω = (k / a)^(1/b).
    fn frequency(&self, wavenumber: f64) -> Result<f64, Error> {
        if !wavenumber.is_finite() || wavenumber < 0.0 {
            return Err(Error::InvalidDomain {
                quantity: "wavenumber",
                value: wavenumber,
            });
        }
        Ok((wavenumber / self.coefficient).powf(self.exponent.recip()))
    }

    fn group_velocity(&self, omega: f64) -> Result<f64, Error> {
        let omega = check_frequency(omega)?;
        // dk/dω = a·b·ω^(b−1)
        let dk_domega = self.coefficient * self.exponent * omega.powf(self.exponent - 1.0);
        if dk_domega == 0.0 {
            return Err(Error::InvalidDomain {
                quantity: "frequency",
                value: omega,
            });
        }
        Ok(dk_domega.recip())
    }
}

/// A medium with a cutoff frequency, k = √(ω² − ω_c²) / c.
///
/// Below the cutoff the wavenumber is purely imaginary and the component
/// becomes evanescent, decaying exponentially with distance.
pub struct Waveguide {
    pub speed: f64,
    pub cutoff: f64,
}
impl Dispersion for Waveguide {
    fn wavenumber(&self, omega: f64) -> Result<Complex64, Error> {
        let omega = check_frequency(omega)?;
        let radicand = omega * omega - self.cutoff * self.cutoff;

        if radicand >= 0.0 {
            Ok(Complex64::new(radicand.sqrt() / self.speed, 0.0))
        } else {
            Ok(Complex64::new(0.0, (-radicand).sqrt() / self.speed))
        }
    }

    /// Resolves the propagating branch, ω = √((c·k)² + ω_c²).
    fn frequency(&self, wavenumber: f64) -> Result<f64, Error> {
        if !wavenumber.is_finite() || wavenumber < 0.0 {
            return Err(Error::InvalidDomain {
                quantity: "wavenumber",
                value: wavenumber,
            });
        }
        let ck = self.speed * wavenumber;
        Ok((ck * ck + self.cutoff * self.cutoff).sqrt())
    }

    fn group_velocity(&self, omega: f64) -> Result<f64, Error> {
        let omega = check_frequency(omega)?;
        let k = self.wavenumber(omega)?;
        if k.re == 0.0 {
            // no propagating energy below the cutoff
            return Err(Error::InvalidDomain {
                quantity: "frequency",
                value: omega,
            });
        }
        Ok(self.speed * self.speed * k.re / omega)
    }
}

/// A relation given by a table of (ω, k) samples, linearly interpolated.
///
/// Queries outside the tabulated range are never extrapolated. The inverse
/// mapping interpolates on the real part of the tabulated wavenumbers and
/// assumes the table describes a single monotonic branch.
pub struct Tabulated {
    omegas: Vec<f64>,
    wavenumbers: Vec<Complex64>,
}
impl Tabulated {
    /// Builds a table from (ω, k) samples, sorted by frequency.
    pub fn new(mut points: Vec<(f64, Complex64)>) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::InsufficientData {
                needed: 2,
                got: points.len(),
            });
        }
        for &(omega, _) in &points {
            check_frequency(omega)?;
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in points.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(Error::InvalidDomain {
                    quantity: "frequency",
                    value: pair[0].0,
                });
            }
        }

        Ok(Self {
            omegas: points.iter().map(|p| p.0).collect(),
            wavenumbers: points.iter().map(|p| p.1).collect(),
        })
    }

    fn segment(samples: &[f64], value: f64) -> Option<usize> {
        if value < samples[0] || value > samples[samples.len() - 1] {
            return None;
        }
        // index of the segment [i, i+1] containing `value`
        let i = samples.partition_point(|&s| s <= value);
        Some(i.saturating_sub(1).min(samples.len() - 2))
    }
}
impl Dispersion for Tabulated {
    fn wavenumber(&self, omega: f64) -> Result<Complex64, Error> {
        let omega = check_frequency(omega)?;
        let i = Self::segment(&self.omegas, omega).ok_or(Error::InvalidDomain {
            quantity: "frequency",
            value: omega,
        })?;

        let frac = (omega - self.omegas[i]) / (self.omegas[i + 1] - self.omegas[i]);
        Ok(self.wavenumbers[i] + (self.wavenumbers[i + 1] - self.wavenumbers[i]) * frac)
    }

    fn frequency(&self, wavenumber: f64) -> Result<f64, Error> {
        let ks: Vec<f64> = self.wavenumbers.iter().map(|k| k.re).collect();
        let i = Self::segment(&ks, wavenumber).ok_or(Error::InvalidDomain {
            quantity: "wavenumber",
            value: wavenumber,
        })?;

        let frac = (wavenumber - ks[i]) / (ks[i + 1] - ks[i]);
        Ok(self.omegas[i] + (self.omegas[i + 1] - self.omegas[i]) * frac)
    }
}
