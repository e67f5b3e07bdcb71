//! Includes commonly used library components.

pub use crate::{
    FieldDescriptor,
    FieldRecord,
    SingularityPolicy,
    SpectralComponent,
    Spectrum,
    Surface,
    SurfaceDescriptor,
    Wavepacket,
    WavepacketDescriptor,
};
pub use crate::dispersion::Dispersion;
