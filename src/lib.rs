//! A framework for synthesizing dispersive mechanical wave fields in
//! 1- and 2-dimensional media.
//!
//! A [`Wavepacket`] superposes complex harmonic traveling waves, one per
//! component of a frequency [`Spectrum`], each phase-advanced according to
//! a [`Dispersion`](dispersion::Dispersion) relation. A [`Surface`] extends
//! the radial 1-D solution to a plane around a point source.
//!
//! To get started, refer to the `\demos` directory in the main repository.

pub mod dispersion;
pub mod prelude;

mod record;
mod spectrum;
mod surface;
mod wavepacket;

pub use record::FieldRecord;
pub use spectrum::{SpectralComponent, Spectrum};
pub use surface::{FieldDescriptor, SingularityPolicy, Surface, SurfaceDescriptor};
pub use wavepacket::{Wavepacket, WavepacketDescriptor};

/// Represents an error in the synthesis of a wave field.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("`{quantity}` value {value} is outside the valid domain of the model")]
    InvalidDomain { quantity: &'static str, value: f64 },
    #[error("Not enough samples to build the model \
        ( needed: {needed}, got: {got} )")]
    InsufficientData { needed: usize, got: usize },
    #[error("Query arrays cannot be broadcast together \
        ( left shape: {lhs:?}, right shape: {rhs:?} )")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
    #[error(transparent)]
    H5Error(#[from] hdf5::Error),
}
