use std::sync::Arc;

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use num_complex::Complex64;

use crate::dispersion::Dispersion;
use crate::spectrum::Spectrum;
use crate::Error;

/// Describes the composition of a `Wavepacket`.
pub struct WavepacketDescriptor {
    /// The dispersion relation of the medium.
    pub dispersion: Arc<dyn Dispersion + Send + Sync>,
    /// The frequency content of the excitation.
    pub spectrum: Arc<Spectrum>,
    /// Zero every component ahead of its own wavefront (k·x − ω·t > 0),
    /// so no displacement appears before the wave could have arrived.
    pub causal: bool,
    /// A positional amplitude profile multiplied onto the result.
    pub envelope: Option<Arc<dyn Fn(f64) -> f64 + Send + Sync>>,
}

/// A wavepacket traveling through a 1-D dispersive medium.
///
/// The displacement at position `x` and time `t` is the coherent sum over
/// all spectral components,
///
/// ```text
/// u(x, t) = Re[ Σ_i  A_i · exp( j (k_i·x − ω_i·t) ) ]
/// ```
///
/// with `k_i` obtained from the dispersion relation once at construction
/// and reused for every query. Components are summed in ascending frequency
/// order, so repeated queries with identical inputs are bit-identical.
/// Queries never mutate the packet; one packet can be shared read-only
/// across threads.
pub struct Wavepacket {
    dispersion: Arc<dyn Dispersion + Send + Sync>,
    spectrum: Arc<Spectrum>,
    // per-component wavenumbers, resolved once from the immutable pair
    wavenumbers: Vec<Complex64>,
    causal: bool,
    envelope: Option<Arc<dyn Fn(f64) -> f64 + Send + Sync>>,
}

impl Wavepacket {
    /// Creates a new `Wavepacket` instance.
    ///
    /// Resolves the wavenumber of every spectral component up front, so an
    /// out-of-domain frequency fails here rather than mid-query.
    pub fn new(desc: WavepacketDescriptor) -> Result<Self, Error> {
        let wavenumbers = desc
            .spectrum
            .components()
            .iter()
            .map(|c| desc.dispersion.wavenumber(c.omega))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dispersion: desc.dispersion,
            spectrum: desc.spectrum,
            wavenumbers,
            causal: desc.causal,
            envelope: desc.envelope,
        })
    }

    /// The displacement at a single position and time.
    pub fn displacement_at(&self, x: f64, t: f64) -> f64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for (component, &k) in self.spectrum.components().iter().zip(&self.wavenumbers) {
            let phase = k.re * x - component.omega * t;
            if self.causal && phase > 0.0 {
                continue;
            }
            // exp(j(k·x − ω·t)); a complex k contributes exp(−Im(k)·x)
            let exponent = Complex64::new(-k.im * x, phase);
            sum += component.amplitude * exponent.exp();
        }

        let u = sum.re;
        match &self.envelope {
            Some(envelope) => u * envelope(x),
            None => u,
        }
    }

    /// The displacement over broadcast position and time arrays.
    ///
    /// `x` and `t` follow the usual broadcasting rules; the output takes
    /// their common shape. Non-broadcastable shapes are a
    /// [`Error::ShapeMismatch`]. An empty spectrum yields a zero field of
    /// the broadcast shape.
    pub fn displacement(
        &self,
        x: ArrayViewD<'_, f64>,
        t: ArrayViewD<'_, f64>,
    ) -> Result<ArrayD<f64>, Error> {
        let shape = broadcast_shape(x.shape(), t.shape())?;
        let xb = x
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| shape_mismatch(x.shape(), t.shape()))?;
        let tb = t
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| shape_mismatch(x.shape(), t.shape()))?;

        let mut field = ArrayD::<f64>::zeros(IxDyn(&shape));
        ndarray::Zip::from(&mut field)
            .and(&xb)
            .and(&tb)
            .for_each(|u, &x, &t| {
                *u = self.displacement_at(x, t);
            });

        Ok(field)
    }

    /// The space-time history of the packet as a (time × space) matrix.
    ///
    /// Row `i` is the displacement of the whole domain at `ts[i]`; column
    /// `j` is the time history of the point `xs[j]`. With `normalize` the
    /// peak magnitude is scaled to 1, unless the field is numerically zero
    /// (peak below 1e-24).
    pub fn field(
        &self,
        xs: &ndarray::Array1<f64>,
        ts: &ndarray::Array1<f64>,
        normalize: bool,
    ) -> ndarray::Array2<f64> {
        let mut field = ndarray::Array2::<f64>::zeros((ts.len(), xs.len()));
        for (i, &t) in ts.iter().enumerate() {
            for (j, &x) in xs.iter().enumerate() {
                field[[i, j]] = self.displacement_at(x, t);
            }
        }

        if normalize {
            let peak = field.iter().fold(0.0_f64, |max, &u| max.max(u.abs()));
            if peak >= 1e-24 {
                field /= peak;
            }
        }

        field
    }

    pub fn dispersion(&self) -> &Arc<dyn Dispersion + Send + Sync> {
        &self.dispersion
    }

    pub fn spectrum(&self) -> &Arc<Spectrum> {
        &self.spectrum
    }
}

fn shape_mismatch(lhs: &[usize], rhs: &[usize]) -> Error {
    Error::ShapeMismatch {
        lhs: lhs.to_vec(),
        rhs: rhs.to_vec(),
    }
}

/// The common broadcast shape of two array shapes, aligned at the
/// trailing axes.
fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>, Error> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = vec![0; ndim];

    for i in 0..ndim {
        let l = if i < lhs.len() { lhs[lhs.len() - 1 - i] } else { 1 };
        let r = if i < rhs.len() { rhs[rhs.len() - 1 - i] } else { 1 };

        shape[ndim - 1 - i] = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => return Err(shape_mismatch(lhs, rhs)),
        };
    }

    Ok(shape)
}
