use std::path::Path;
use std::str::FromStr;

use hdf5::types::VarLenUnicode;
use ndarray::{Array1, Array2, Array3, ArrayD};

use crate::surface::Surface;
use crate::Error;

/// A computed or measured displacement field with its metadata, in the
/// shape the shared measurement container stores.
///
/// The schema is explicit: the arrays below plus the recognized metadata
/// keys (`model`, `source_x`/`source_y`, `spreading_exponent`) are
/// everything that is persisted. Simulated and measured fields round-trip
/// through the same file layout, so downstream comparison code does not
/// care which side produced a record.
pub struct FieldRecord {
    /// Identifier of the model (or instrument) that produced the field.
    pub model: String,
    /// Position of the point source, for 2-D fields.
    pub source: Option<(f64, f64)>,
    /// Spatial sampling grid along x (the radius, for 1-D fields).
    pub xs: Array1<f64>,
    /// Spatial sampling grid along y; `None` for 1-D fields.
    pub ys: Option<Array1<f64>>,
    /// Time sampling grid.
    pub times: Array1<f64>,
    /// The displacement values, (time × space) for 1-D fields and
    /// (y × x × time) for 2-D fields.
    pub field: ArrayD<f64>,
    /// Exponent of the spreading correction, for 2-D fields.
    pub spreading_exponent: Option<f64>,
}

impl FieldRecord {
    /// Wraps a (time × space) matrix produced by
    /// [`Wavepacket::field`](crate::Wavepacket::field).
    pub fn from_wavepacket(
        model: &str,
        xs: Array1<f64>,
        times: Array1<f64>,
        field: Array2<f64>,
    ) -> Self {
        Self {
            model: model.to_string(),
            source: None,
            xs,
            ys: None,
            times,
            field: field.into_dyn(),
            spreading_exponent: None,
        }
    }

    /// Wraps a (y × x × time) field produced by
    /// [`Surface::displacement_field`], capturing the surface's metadata.
    pub fn from_surface(
        model: &str,
        surface: &Surface,
        xs: Array1<f64>,
        ys: Array1<f64>,
        times: Array1<f64>,
        field: Array3<f64>,
    ) -> Self {
        Self {
            model: model.to_string(),
            source: Some(surface.source()),
            xs,
            ys: Some(ys),
            times,
            field: field.into_dyn(),
            spreading_exponent: Some(surface.spreading_exponent()),
        }
    }

    /// Saves the record to an HDF5 file, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, filename: P) -> Result<(), Error> {
        let file = hdf5::File::create(filename)?;

        let grid = file.create_group("grid")?;
        grid.new_dataset::<f64>()
            .shape(self.xs.len())
            .create("x")?
            .write(self.xs.view())?;
        if let Some(ref ys) = self.ys {
            grid.new_dataset::<f64>()
                .shape(ys.len())
                .create("y")?
                .write(ys.view())?;
        }

        file.new_dataset::<f64>()
            .shape(self.times.len())
            .create("time")?
            .write(self.times.view())?;
        file.new_dataset::<f64>()
            .shape(self.field.shape())
            .create("field")?
            .write(self.field.view())?;

        let model = VarLenUnicode::from_str(&self.model)
            .map_err(|e| hdf5::Error::from(e.to_string()))?;
        file.new_attr::<VarLenUnicode>()
            .shape(hdf5::Extents::Scalar)
            .create("model")?
            .write_scalar(&model)?;

        if let Some((x, y)) = self.source {
            file.new_attr::<f64>()
                .shape(hdf5::Extents::Scalar)
                .create("source_x")?
                .write_scalar(&x)?;
            file.new_attr::<f64>()
                .shape(hdf5::Extents::Scalar)
                .create("source_y")?
                .write_scalar(&y)?;
        }
        if let Some(exponent) = self.spreading_exponent {
            file.new_attr::<f64>()
                .shape(hdf5::Extents::Scalar)
                .create("spreading_exponent")?
                .write_scalar(&exponent)?;
        }

        file.close()?;
        Ok(())
    }

    /// Loads a record written by [`FieldRecord::save`] (or by the
    /// measurement side using the same layout).
    pub fn load<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let file = hdf5::File::open(filename)?;

        let xs = file.dataset("grid/x")?.read_1d::<f64>()?;
        let ys = match file.dataset("grid/y") {
            Ok(dataset) => Some(dataset.read_1d::<f64>()?),
            Err(_) => None,
        };
        let times = file.dataset("time")?.read_1d::<f64>()?;
        let field = file.dataset("field")?.read_dyn::<f64>()?;

        let model = file
            .attr("model")?
            .read_scalar::<VarLenUnicode>()?
            .as_str()
            .to_string();

        let source = match (file.attr("source_x"), file.attr("source_y")) {
            (Ok(x), Ok(y)) => Some((x.read_scalar::<f64>()?, y.read_scalar::<f64>()?)),
            _ => None,
        };
        let spreading_exponent = match file.attr("spreading_exponent") {
            Ok(attr) => Some(attr.read_scalar::<f64>()?),
            Err(_) => None,
        };

        file.close()?;
        Ok(Self {
            model,
            source,
            xs,
            ys,
            times,
            field,
            spreading_exponent,
        })
    }
}
