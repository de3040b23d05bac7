//! Interfaces specific to integration with `ndarray`.
//!
//! Whole volumes are mapped to arrays with a dynamic number of dimensions,
//! in C (row major) order: the array shape lists the axes of the active
//! order slowest-varying first, so the last array axis is the first public
//! axis.
use crate::backend::StorageEngine;
use crate::element::DataElement;
use crate::error::{MincError, Result};
use crate::file::Minc2File;
use ndarray::{Array, ArrayBase, Data, Dimension as NdDimension, IxDyn};

impl<E: StorageEngine> Minc2File<E> {
    /// Shape of the volume as an array, slowest-varying axis first.
    pub fn array_shape(&self) -> Result<Vec<usize>> {
        Ok(self
            .state()?
            .active_lengths()
            .iter()
            .rev()
            .map(|&l| l as usize)
            .collect())
    }

    /// Read the whole volume, in the active order, into an array.
    pub fn load_ndarray<T: DataElement>(&self) -> Result<Array<T, IxDyn>> {
        let shape = self.array_shape()?;
        let data = self.load_complete_volume_vec::<T>()?;
        let len = data.len();
        Array::from_shape_vec(IxDyn(&shape), data)
            .map_err(|_| MincError::IncompatibleLength(shape.iter().product(), len))
    }

    /// Write the whole volume, in the active order, from an array of the
    /// matching shape in any memory layout.
    pub fn save_ndarray<T, S, D>(&mut self, array: &ArrayBase<S, D>) -> Result<()>
    where
        T: DataElement,
        S: Data<Elem = T>,
        D: NdDimension,
    {
        let shape = self.array_shape()?;
        if array.shape() != &shape[..] {
            return Err(MincError::IncompatibleShape(shape, array.shape().to_vec()));
        }
        let standard = array.as_standard_layout();
        match standard.as_slice() {
            Some(data) => self.save_complete_volume(data),
            None => {
                let data: Vec<T> = standard.iter().copied().collect();
                self.save_complete_volume(&data)
            }
        }
    }
}
