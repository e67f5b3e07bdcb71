pub mod models;

use num_complex::Complex64;

use crate::Error;

/// Describes the dispersion relation of a medium.
///
/// Maps angular frequency [rad/s] to angular wavenumber [rad/m] and back.
/// A wavenumber with a non-zero imaginary part represents an evanescent
/// component that decays with distance instead of propagating; it is a
/// legitimate result, not an error condition.
///
/// The forward and inverse mappings must be consistent over the domain the
/// caller exercises; the trait does not validate this itself.
pub trait Dispersion {
    /// Returns the angular wavenumber for an angular frequency.
    ///
    /// A frequency outside the valid domain of the relation (negative or
    /// non-finite for the built-in models, outside the table for
    /// [`models::Tabulated`]) is an [`Error::InvalidDomain`]; the model
    /// never clamps silently.
    fn wavenumber(&self, omega: f64) -> Result<Complex64, Error>;

    /// Returns the angular frequency for a real angular wavenumber.
    ///
    /// The inverse may be multi-valued; each implementation documents the
    /// branch it resolves.
    fn frequency(&self, wavenumber: f64) -> Result<f64, Error>;

    /// Returns the group velocity dω/dk at an angular frequency.
    ///
    /// The default implementation differentiates the real part of
    /// `wavenumber` with a central finite difference.
    fn group_velocity(&self, omega: f64) -> Result<f64, Error> {
        let h = (omega.abs() * 1e-6).max(1e-9);
        let below = self.wavenumber(omega - h)?;
        let above = self.wavenumber(omega + h)?;

        let dk_domega = (above.re - below.re) / (2.0 * h);
        if dk_domega == 0.0 {
            return Err(Error::InvalidDomain {
                quantity: "frequency",
                value: omega,
            });
        }
        Ok(dk_domega.recip())
    }

    /// Evaluates the relation over a whole vector of frequencies.
    fn wavenumbers(
        &self,
        omegas: ndarray::ArrayView1<f64>,
    ) -> Result<ndarray::Array1<Complex64>, Error> {
        let mut ks = ndarray::Array1::<Complex64>::zeros(omegas.len());
        for (k, &omega) in ks.iter_mut().zip(omegas.iter()) {
            *k = self.wavenumber(omega)?;
        }
        Ok(ks)
    }
}

/// Rejects frequencies the built-in closed-form models are not defined for.
pub(crate) fn check_frequency(omega: f64) -> Result<f64, Error> {
    if !omega.is_finite() || omega < 0.0 {
        return Err(Error::InvalidDomain {
            quantity: "frequency",
            value: omega,
        });
    }
    Ok(omega)
}
