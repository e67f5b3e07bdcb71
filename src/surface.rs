use std::sync::Arc;

use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2};

use crate::wavepacket::Wavepacket;
use crate::Error;

/// How to evaluate the spreading factor when a grid point coincides with
/// the source.
///
/// The cylindrical correction r^(−s) diverges at r = 0, so the behavior
/// there is a policy, not an error by default.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SingularityPolicy {
    /// Clamp every radius below `min_radius` to `min_radius`; pick the grid
    /// spacing for a field that stays bounded by the neighboring points.
    Clamp { min_radius: f64 },
    /// Raise [`Error::InvalidDomain`] when a grid point lies exactly on
    /// the source.
    Strict,
}

/// Describes the composition of a `Surface`.
pub struct SurfaceDescriptor {
    /// The radial 1-D solution to spread over the plane.
    pub wavepacket: Arc<Wavepacket>,
    /// The (x, y) position of the point source.
    pub source: (f64, f64),
    /// Exponent `s` of the spreading correction r^(−s). Cylindrical
    /// spreading is 0.5; other source types may call for a different law.
    pub spreading_exponent: f64,
    /// Behavior at the source singularity.
    pub singularity: SingularityPolicy,
    /// When set, the radial solution is sampled once with this step and
    /// grid points are linearly interpolated from it instead of each
    /// querying the wavepacket directly.
    pub radial_step: Option<f64>,
}

/// Describes one field evaluation over a 2-D grid.
pub struct FieldDescriptor<'a> {
    /// Mesh of x coordinates, same shape as `grid_y`.
    pub grid_x: ArrayView2<'a, f64>,
    /// Mesh of y coordinates, same shape as `grid_x`.
    pub grid_y: ArrayView2<'a, f64>,
    /// The times to evaluate at; becomes the trailing output axis.
    pub times: ArrayView1<'a, f64>,
    /// Whether or not to print progress information to the console.
    pub verbose: bool,
}

/// The displacement field of a plane driven by a point source.
///
/// Every grid point takes the underlying [`Wavepacket`]'s displacement at
/// its radial distance from the source, scaled by the spreading correction.
/// Queries never mutate the surface or the shared wavepacket.
pub struct Surface {
    wavepacket: Arc<Wavepacket>,
    source: (f64, f64),
    spreading_exponent: f64,
    singularity: SingularityPolicy,
    radial_step: Option<f64>,
}

impl Surface {
    /// Creates a new `Surface` instance.
    pub fn new(desc: SurfaceDescriptor) -> Result<Self, Error> {
        if let SingularityPolicy::Clamp { min_radius } = desc.singularity {
            if !min_radius.is_finite() || min_radius <= 0.0 {
                return Err(Error::InvalidDomain {
                    quantity: "minimum radius",
                    value: min_radius,
                });
            }
        }
        if let Some(step) = desc.radial_step {
            if !step.is_finite() || step <= 0.0 {
                return Err(Error::InvalidDomain {
                    quantity: "radial step",
                    value: step,
                });
            }
        }

        Ok(Self {
            wavepacket: desc.wavepacket,
            source: desc.source,
            spreading_exponent: desc.spreading_exponent,
            singularity: desc.singularity,
            radial_step: desc.radial_step,
        })
    }

    /// A centered coordinate mesh covering [−half_x, half_x] × [−half_y, half_y]
    /// with spacing `dx`, symmetric about the origin.
    pub fn grid(half_x: f64, half_y: f64, dx: f64) -> (Array2<f64>, Array2<f64>) {
        let axis = |half: f64| {
            let n = (half / dx).floor() as usize;
            let mut values: Vec<f64> = (1..=n).rev().map(|i| -(i as f64) * dx).collect();
            values.extend((0..=n).map(|i| i as f64 * dx));
            values
        };
        let xs = axis(half_x);
        let ys = axis(half_y);

        let mut grid_x = Array2::<f64>::zeros((ys.len(), xs.len()));
        let mut grid_y = Array2::<f64>::zeros((ys.len(), xs.len()));
        for (i, &y) in ys.iter().enumerate() {
            for (j, &x) in xs.iter().enumerate() {
                grid_x[[i, j]] = x;
                grid_y[[i, j]] = y;
            }
        }
        (grid_x, grid_y)
    }

    /// The displacement field over a grid and a set of times.
    ///
    /// The output has the grid's shape with the time axis appended:
    /// `field[[i, j, n]]` is the displacement of the point
    /// `(grid_x[[i, j]], grid_y[[i, j]])` at `times[n]`.
    pub fn displacement_field(&self, desc: FieldDescriptor) -> Result<Array3<f64>, Error> {
        if desc.grid_x.dim() != desc.grid_y.dim() {
            return Err(Error::ShapeMismatch {
                lhs: desc.grid_x.shape().to_vec(),
                rhs: desc.grid_y.shape().to_vec(),
            });
        }

        let (rows, cols) = desc.grid_x.dim();
        let radii = self.radii(desc.grid_x, desc.grid_y)?;

        // setup output if verbose
        let bar = if desc.verbose {
            println!("# of grid points: {}", rows * cols);
            Some(indicatif::ProgressBar::new((rows * cols) as u64))
        } else {
            None
        };

        let mut field = Array3::<f64>::zeros((rows, cols, desc.times.len()));
        match self.radial_step {
            None => {
                for i in 0..rows {
                    for j in 0..cols {
                        let r = radii[[i, j]];
                        let spread = r.powf(-self.spreading_exponent);
                        for (n, &t) in desc.times.iter().enumerate() {
                            field[[i, j, n]] = spread * self.wavepacket.displacement_at(r, t);
                        }
                        if let Some(ref bar) = bar {
                            bar.inc(1);
                        }
                    }
                }
            }
            Some(step) => {
                let profile = self.radial_profile(&radii, step, desc.times);
                for i in 0..rows {
                    for j in 0..cols {
                        let r = radii[[i, j]];
                        let spread = r.powf(-self.spreading_exponent);
                        for (n, &t) in desc.times.iter().enumerate() {
                            field[[i, j, n]] = spread * profile.sample(r, n);
                        }
                        if let Some(ref bar) = bar {
                            bar.inc(1);
                        }
                    }
                }
            }
        }

        if let Some(ref bar) = bar {
            bar.finish();
        }

        Ok(field)
    }

    /// A single snapshot of the field at time `t`.
    pub fn displacement_at_time(
        &self,
        grid_x: ArrayView2<'_, f64>,
        grid_y: ArrayView2<'_, f64>,
        t: f64,
    ) -> Result<Array2<f64>, Error> {
        let times = ndarray::arr1(&[t]);
        let field = self.displacement_field(FieldDescriptor {
            grid_x,
            grid_y,
            times: times.view(),
            verbose: false,
        })?;

        Ok(field.index_axis(ndarray::Axis(2), 0).to_owned())
    }

    pub fn wavepacket(&self) -> &Arc<Wavepacket> {
        &self.wavepacket
    }

    pub fn source(&self) -> (f64, f64) {
        self.source
    }

    pub fn spreading_exponent(&self) -> f64 {
        self.spreading_exponent
    }

    /// Radial distances from the source, with the singularity policy applied.
    fn radii(
        &self,
        grid_x: ArrayView2<'_, f64>,
        grid_y: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, Error> {
        let mut radii = Array2::<f64>::zeros(grid_x.dim());
        for (r, (&x, &y)) in radii.iter_mut().zip(grid_x.iter().zip(grid_y.iter())) {
            let distance = f64::hypot(x - self.source.0, y - self.source.1);
            *r = match self.singularity {
                SingularityPolicy::Clamp { min_radius } => distance.max(min_radius),
                SingularityPolicy::Strict if distance == 0.0 => {
                    return Err(Error::InvalidDomain {
                        quantity: "radius",
                        value: 0.0,
                    });
                }
                SingularityPolicy::Strict => distance,
            };
        }
        Ok(radii)
    }

    /// Samples the wavepacket once along the radius covered by the grid.
    fn radial_profile(
        &self,
        radii: &Array2<f64>,
        step: f64,
        times: ArrayView1<'_, f64>,
    ) -> RadialProfile {
        let r_min = radii.iter().fold(f64::INFINITY, |min, &r| min.min(r));
        let r_max = radii.iter().fold(0.0_f64, |max, &r| max.max(r));
        // pad the upper limit so rounding never lands a query past the
        // last sample
        let n = ((r_max - r_min) / step).ceil() as usize + 2;

        let rs = Array1::from_iter((0..n).map(|i| r_min + i as f64 * step));
        let values = self.wavepacket.field(&rs, &times.to_owned(), false);

        RadialProfile { rs, values }
    }
}

/// The 1-D solution sampled on a uniform radial grid, one row per time.
struct RadialProfile {
    rs: Array1<f64>,
    values: Array2<f64>,
}

impl RadialProfile {
    /// Linear interpolation of the time-`n` row at radius `r`.
    fn sample(&self, r: f64, n: usize) -> f64 {
        let step = self.rs[1] - self.rs[0];
        let offset = (r - self.rs[0]) / step;
        let i = (offset.floor() as usize).min(self.rs.len() - 2);
        let frac = offset - i as f64;

        self.values[[n, i]] * (1.0 - frac) + self.values[[n, i + 1]] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispersion::models::NonDispersive;
    use crate::spectrum::{SpectralComponent, Spectrum};
    use crate::wavepacket::WavepacketDescriptor;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use num_complex::Complex64;

    fn tone_packet() -> Arc<Wavepacket> {
        let spectrum = Spectrum::new(vec![SpectralComponent {
            omega: 1.0,
            amplitude: Complex64::new(1.0, 0.0),
        }])
        .unwrap();

        Arc::new(
            Wavepacket::new(WavepacketDescriptor {
                dispersion: Arc::new(NonDispersive { speed: 1.0 }),
                spectrum: Arc::new(spectrum),
                causal: false,
                envelope: None,
            })
            .unwrap(),
        )
    }

    fn surface(packet: Arc<Wavepacket>, policy: SingularityPolicy) -> Surface {
        Surface::new(SurfaceDescriptor {
            wavepacket: packet,
            source: (0.0, 0.0),
            spreading_exponent: 0.5,
            singularity: policy,
            radial_step: None,
        })
        .unwrap()
    }

    #[test]
    fn matches_wavepacket_along_a_radial_line() {
        let packet = tone_packet();
        let surface = surface(
            packet.clone(),
            SingularityPolicy::Clamp { min_radius: 1e-3 },
        );

        // points on the positive x axis, radius equals the x coordinate
        let grid_x = array![[1.0, 2.0, 3.5]];
        let grid_y = array![[0.0, 0.0, 0.0]];
        let t = 0.4;

        let field = surface
            .displacement_at_time(grid_x.view(), grid_y.view(), t)
            .unwrap();

        for (j, &r) in [1.0, 2.0, 3.5].iter().enumerate() {
            let expected = packet.displacement_at(r, t) / r.sqrt();
            assert_abs_diff_eq!(field[[0, j]], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn clamped_singularity_stays_finite() {
        let packet = tone_packet();
        let h = 0.25;
        let surface = surface(packet.clone(), SingularityPolicy::Clamp { min_radius: h });

        // the grid point sits exactly on the source
        let field = surface
            .displacement_at_time(array![[0.0]].view(), array![[0.0]].view(), 0.3)
            .unwrap();

        let expected = packet.displacement_at(h, 0.3) / h.sqrt();
        assert_abs_diff_eq!(field[[0, 0]], expected, epsilon = 1e-12);
        assert!(field[[0, 0]].is_finite());
    }

    #[test]
    fn strict_singularity_is_an_error() {
        let surface = surface(tone_packet(), SingularityPolicy::Strict);
        let result = surface.displacement_at_time(array![[0.0]].view(), array![[0.0]].view(), 0.0);
        assert!(matches!(result, Err(Error::InvalidDomain { .. })));

        // off-source points still evaluate
        let field = surface
            .displacement_at_time(array![[1.0]].view(), array![[0.0]].view(), 0.0)
            .unwrap();
        assert!(field[[0, 0]].is_finite());
    }

    #[test]
    fn mismatched_grids_are_rejected() {
        let surface = surface(tone_packet(), SingularityPolicy::Strict);
        let grid_x = Array2::<f64>::zeros((2, 3));
        let grid_y = Array2::<f64>::zeros((3, 2));

        let result = surface.displacement_at_time(grid_x.view(), grid_y.view(), 0.0);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn time_axis_is_appended_to_the_grid_shape() {
        let surface = surface(
            tone_packet(),
            SingularityPolicy::Clamp { min_radius: 0.1 },
        );
        let (grid_x, grid_y) = Surface::grid(1.0, 0.5, 0.5);
        let times = array![0.0, 0.1, 0.2];

        let field = surface
            .displacement_field(FieldDescriptor {
                grid_x: grid_x.view(),
                grid_y: grid_y.view(),
                times: times.view(),
                verbose: false,
            })
            .unwrap();

        assert_eq!(field.dim(), (grid_y.dim().0, grid_x.dim().1, 3));
    }

    #[test]
    fn centered_grid_is_symmetric() {
        let (grid_x, grid_y) = Surface::grid(1.0, 1.0, 0.5);

        assert_eq!(grid_x.dim(), (5, 5));
        assert_eq!(grid_x[[0, 0]], -1.0);
        assert_eq!(grid_x[[0, 4]], 1.0);
        assert_eq!(grid_y[[0, 0]], -1.0);
        assert_eq!(grid_y[[4, 0]], 1.0);
        assert_eq!(grid_x[[2, 2]], 0.0);
        assert_eq!(grid_y[[2, 2]], 0.0);
    }

    #[test]
    fn interpolated_path_tracks_the_direct_path() {
        let packet = tone_packet();
        let direct = surface(
            packet.clone(),
            SingularityPolicy::Clamp { min_radius: 0.1 },
        );
        let interpolated = Surface::new(SurfaceDescriptor {
            wavepacket: packet,
            source: (0.0, 0.0),
            spreading_exponent: 0.5,
            singularity: SingularityPolicy::Clamp { min_radius: 0.1 },
            radial_step: Some(0.01),
        })
        .unwrap();

        let (grid_x, grid_y) = Surface::grid(2.0, 2.0, 0.5);
        let a = direct
            .displacement_at_time(grid_x.view(), grid_y.view(), 0.7)
            .unwrap();
        let b = interpolated
            .displacement_at_time(grid_x.view(), grid_y.view(), 0.7)
            .unwrap();

        for (&u, &v) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(u, v, epsilon = 1e-3);
        }
    }

    #[test]
    fn configurable_spreading_exponent() {
        let packet = tone_packet();
        let spherical = Surface::new(SurfaceDescriptor {
            wavepacket: packet.clone(),
            source: (0.0, 0.0),
            spreading_exponent: 1.0,
            singularity: SingularityPolicy::Strict,
            radial_step: None,
        })
        .unwrap();

        let field = spherical
            .displacement_at_time(array![[2.0]].view(), array![[0.0]].view(), 0.0)
            .unwrap();
        let expected = packet.displacement_at(2.0, 0.0) / 2.0;
        assert_abs_diff_eq!(field[[0, 0]], expected, epsilon = 1e-12);
    }
}
