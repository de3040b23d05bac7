//! The volume handle.
//!
//! A [`Minc2File`] starts out empty. It is populated either by [`open`],
//! which discovers the dimensions of an existing volume, or by [`define`]
//! followed by [`create`], which declares a new one. Transfers then happen
//! in native order until [`setup_standard_order`] switches the handle to the
//! standardized order (vector, X, Y, Z, time, fastest-varying first).
//! Closing the handle releases the volume and makes it reusable.
//!
//! [`open`]: Minc2File::open
//! [`define`]: Minc2File::define
//! [`create`]: Minc2File::create
//! [`setup_standard_order`]: Minc2File::setup_standard_order

use crate::backend::{
    CreateOptions, DataClass, DimensionId, DimensionOrder, MemoryEngine, NativeVolume,
    StorageEngine, VoxelOrder,
};
use crate::dimension::{self, Dimension};
use crate::error::{MincError, Result};
use crate::order;
use crate::scaling::{self, Scaling};
use crate::typedef::{to_abstract_type, to_native_type, DimensionKind, MincType};
use crate::util::element_count;
use log::{debug, error};
use std::fmt;
use std::path::Path;

/// Everything a handle knows about its volume.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct VolumeState {
    pub store_type: MincType,
    pub data_type: MincType,
    /// Descriptors in native order, followed by the sentinel
    pub store_dims: Vec<Dimension>,
    /// Descriptors in the active order, followed by the sentinel
    pub representation_dims: Vec<Dimension>,
    /// Store axis index of each representation axis
    pub representation_source: Vec<usize>,
    /// Engine handles in file order, empty until created
    pub file_dims: Vec<DimensionId>,
    pub scaling: Scaling,
    pub using_apparent_order: bool,
    /// Real value range to apply once created
    pub pending_volume_range: Option<(f64, f64)>,
}

impl VolumeState {
    fn new(store_dims: Vec<Dimension>, store_type: MincType, data_type: MincType, scaling: Scaling) -> Self {
        let ndims = store_dims.len() - 1;
        VolumeState {
            store_type,
            data_type,
            representation_dims: store_dims.clone(),
            representation_source: (0..ndims).collect(),
            store_dims,
            file_dims: Vec::new(),
            scaling,
            using_apparent_order: false,
            pending_volume_range: None,
        }
    }

    pub fn ndims(&self) -> usize {
        self.store_dims.len() - 1
    }

    /// Descriptors of the order used by transfers.
    pub fn active_dims(&self) -> &[Dimension] {
        if self.using_apparent_order {
            &self.representation_dims[..self.ndims()]
        } else {
            &self.store_dims[..self.ndims()]
        }
    }

    /// Store axis index of each axis of the active order.
    pub fn active_source(&self) -> Vec<usize> {
        if self.using_apparent_order {
            self.representation_source.clone()
        } else {
            (0..self.ndims()).collect()
        }
    }

    /// Axis lengths of the active order, in public convention.
    pub fn active_lengths(&self) -> Vec<u64> {
        self.active_dims().iter().map(|d| d.length).collect()
    }
}

/// A handle to a MINC volume, viewed either in native dimension order or in
/// the standardized order.
///
/// # Example
///
/// ```no_run
/// use minc2_simple::Minc2File;
/// # use minc2_simple::Result;
///
/// # fn run() -> Result<()> {
/// let mut file = Minc2File::new();
/// file.open("t1.mnc")?;
/// file.setup_standard_order()?;
/// let voxels: Vec<f32> = file.load_complete_volume_vec()?;
/// assert_eq!(voxels.len(), file.nelement()?);
/// file.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Minc2File<E: StorageEngine = MemoryEngine> {
    pub(crate) engine: E,
    pub(crate) volume: Option<E::Volume>,
    pub(crate) state: Option<VolumeState>,
}

impl Minc2File<MemoryEngine> {
    /// Allocate an empty handle backed by the in-memory engine.
    pub fn new() -> Self {
        Minc2File::with_engine(MemoryEngine::new())
    }
}

impl Default for Minc2File<MemoryEngine> {
    fn default() -> Self {
        Minc2File::new()
    }
}

impl<E: StorageEngine> Minc2File<E> {
    /// Allocate an empty handle backed by the given storage engine.
    pub fn with_engine(engine: E) -> Self {
        Minc2File {
            engine,
            volume: None,
            state: None,
        }
    }

    /// Open an existing volume. On failure the handle is left empty.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if self.volume.is_some() {
            return Err(MincError::AlreadyOpen);
        }
        self.state = None;
        let path = path.as_ref();
        let mut volume = self.engine.open_volume(path)?;
        match Self::discover(&volume) {
            Ok(state) => {
                debug!(
                    "opened {}: {} dimensions, stored as {}, {:?} scaling",
                    path.display(),
                    state.ndims(),
                    state.store_type.name(),
                    state.scaling
                );
                self.volume = Some(volume);
                self.state = Some(state);
                Ok(())
            }
            Err(e) => {
                let _ = volume.close();
                Err(e)
            }
        }
    }

    fn discover(volume: &E::Volume) -> Result<VolumeState> {
        let layout = dimension::populate_from_storage(volume)?;

        let store_type = to_abstract_type(volume.data_type()?);
        if !(store_type.is_integral() || store_type.is_floating_point()) {
            error!("Unsupported volume data type: {}", store_type.name());
            return Err(MincError::UnsupportedDataType(store_type));
        }
        match volume.data_class()? {
            DataClass::Real | DataClass::Int | DataClass::Label => {}
            class => {
                error!("Unsupported volume data class: {:?}", class);
                return Err(MincError::Engine(format!("unsupported data class {:?}", class)));
            }
        }

        let slice_flag = volume.slice_scaling_flag()?;
        let valid_range = volume.valid_range()?;
        let scaling = if slice_flag {
            Scaling::Slice
        } else {
            scaling::resolve_on_open(false, valid_range, volume.volume_range()?)
        };
        let data_type = scaling::representation_type(store_type, scaling);

        let mut state = VolumeState::new(layout.dims, store_type, data_type, scaling);
        state.file_dims = layout.file_dims;
        Ok(state)
    }

    /// Describe a new volume before creating it. `dims` is given in public
    /// order, fastest-varying axis first, and may be terminated early with
    /// [`Dimension::END`]. Values will be stored as `store_type` and
    /// represented in memory as `data_type`.
    pub fn define(&mut self, dims: &[Dimension], store_type: MincType, data_type: MincType) -> Result<()> {
        if self.volume.is_some() {
            return Err(MincError::AlreadyOpen);
        }
        let dims = dimension::terminated(dims);
        dimension::validate(dims)?;
        for &t in &[store_type, data_type] {
            if !(t.is_integral() || t.is_floating_point()) {
                error!("Unsupported volume data type: {}", t.name());
                return Err(MincError::UnsupportedDataType(t));
            }
        }

        let mut store_dims = dims.to_vec();
        store_dims.push(Dimension::END);
        let scaling = scaling::resolve_on_define(store_type, data_type);
        self.state = Some(VolumeState::new(store_dims, store_type, data_type, scaling));
        Ok(())
    }

    /// Override the scaling mode of a defined volume, before creating it.
    /// Global and slice scaling are mutually exclusive.
    pub fn set_scaling(&mut self, global: bool, slice: bool) -> Result<()> {
        let scaling = Scaling::from_flags(global, slice)?;
        if self.volume.is_some() {
            return Err(MincError::AlreadyOpen);
        }
        let state = self.state.as_mut().ok_or(MincError::NotInitialized)?;
        state.scaling = scaling;
        Ok(())
    }

    /// Create the defined volume at `path` with default options.
    pub fn create<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.create_with_options(path, &CreateOptions::default())
    }

    /// Create the defined volume at `path`.
    pub fn create_with_options<P: AsRef<Path>>(&mut self, path: P, options: &CreateOptions) -> Result<()> {
        if self.volume.is_some() {
            return Err(MincError::AlreadyOpen);
        }
        let state = self.state.as_mut().ok_or(MincError::NotInitialized)?;
        let path = path.as_ref();

        let declarations = dimension::to_native_declarations(&state.store_dims[..state.ndims()])?;
        let mut volume = self.engine.create_volume(
            path,
            &declarations,
            to_native_type(state.store_type),
            DataClass::Real,
            options,
        )?;
        let configured = Self::configure(&mut volume, state);
        if let Err(e) = configured {
            if let Err(discarded) = volume.discard() {
                error!("could not discard {}: {}", path.display(), discarded);
            }
            return Err(e);
        }

        debug!(
            "created {}: {} dimensions, stored as {}, {:?} scaling",
            path.display(),
            state.ndims(),
            state.store_type.name(),
            state.scaling
        );
        self.volume = Some(volume);
        Ok(())
    }

    fn configure(volume: &mut E::Volume, state: &mut VolumeState) -> Result<()> {
        volume.set_slice_scaling_flag(state.scaling.is_slice())?;
        if let Some((min, max)) = scaling::integral_valid_range(state.store_type) {
            volume.set_valid_range(min, max)?;
        }
        if let Some((min, max)) = state.pending_volume_range.take() {
            volume.set_volume_range(min, max)?;
        }
        state.file_dims = volume.dimensions()?;
        Ok(())
    }

    /// Close the volume and clear the handle, which can then be reused.
    /// Closing an empty handle does nothing.
    pub fn close(&mut self) -> Result<()> {
        self.state = None;
        match self.volume.take() {
            Some(mut volume) => {
                debug!("closing volume");
                volume.close()
            }
            None => Ok(()),
        }
    }

    /// Switch transfers to the standardized order: vector, X, Y, Z, time,
    /// fastest-varying first, with every axis but the vector one traversed
    /// towards increasing world coordinates. Calling it again recomputes the
    /// same order. On failure the handle stays in its previous order.
    pub fn setup_standard_order(&mut self) -> Result<()> {
        let (state, volume) = self.parts_mut()?;
        let ndims = state.ndims();
        let plan = order::standard_plan(&state.store_dims[..ndims]);
        if plan.len() != ndims {
            return Err(MincError::AxisCountMismatch(ndims, plan.len()));
        }

        let mut positive = Vec::new();
        let mut representation = match apply_standard_order(volume, state, &plan, &mut positive) {
            Ok(representation) => representation,
            Err(e) => {
                if !state.using_apparent_order {
                    for id in positive {
                        let _ = volume.set_dimension_apparent_voxel_order(id, VoxelOrder::File);
                    }
                }
                return Err(e);
            }
        };

        representation.push(Dimension::END);
        state.representation_dims = representation;
        state.representation_source = plan;
        state.using_apparent_order = true;
        debug!("standardized order set up over {} dimensions", ndims);
        Ok(())
    }

    pub(crate) fn state(&self) -> Result<&VolumeState> {
        self.state.as_ref().ok_or(MincError::NotInitialized)
    }

    /// State and volume of an opened or created handle.
    pub(crate) fn parts(&self) -> Result<(&VolumeState, &E::Volume)> {
        match (&self.state, &self.volume) {
            (Some(state), Some(volume)) => Ok((state, volume)),
            _ => Err(MincError::NotInitialized),
        }
    }

    pub(crate) fn parts_mut(&mut self) -> Result<(&mut VolumeState, &mut E::Volume)> {
        match (&mut self.state, &mut self.volume) {
            (Some(state), Some(volume)) => Ok((state, volume)),
            _ => Err(MincError::NotInitialized),
        }
    }

    /// The underlying storage engine volume, if opened or created.
    pub fn native_volume(&self) -> Option<&E::Volume> {
        self.volume.as_ref()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> Result<usize> {
        Ok(self.state()?.ndims())
    }

    /// Total number of voxels, regardless of the active order.
    pub fn nelement(&self) -> Result<usize> {
        let state = self.state()?;
        let lengths: Vec<u64> = state.store_dims[..state.ndims()].iter().map(|d| d.length).collect();
        element_count(&lengths).ok_or(MincError::OutOfBounds(lengths))
    }

    /// Type used to represent voxel values in memory.
    pub fn data_type(&self) -> Result<MincType> {
        Ok(self.state()?.data_type)
    }

    /// Type of the voxel values as stored.
    pub fn storage_data_type(&self) -> Result<MincType> {
        Ok(self.state()?.store_type)
    }

    /// Number of dimensions spanning the slices of a slice scaled volume.
    pub fn slice_ndim(&self) -> Result<usize> {
        let (_, volume) = self.parts()?;
        volume.slice_dimension_count()
    }

    /// The scaling mode of the volume.
    pub fn scaling(&self) -> Result<Scaling> {
        Ok(self.state()?.scaling)
    }

    /// Whether the standardized order is active.
    pub fn is_standard_order(&self) -> Result<bool> {
        Ok(self.state()?.using_apparent_order)
    }

    /// Dimensions in native order, fastest-varying first.
    pub fn store_dimensions(&self) -> Result<&[Dimension]> {
        let state = self.state()?;
        Ok(&state.store_dims[..state.ndims()])
    }

    /// Dimensions in the order used by transfers, fastest-varying first.
    /// Before standardization this matches [`store_dimensions`].
    ///
    /// [`store_dimensions`]: Minc2File::store_dimensions
    pub fn representation_dimensions(&self) -> Result<&[Dimension]> {
        let state = self.state()?;
        Ok(&state.representation_dims[..state.ndims()])
    }

    /// Set the global real value range. Applied right away on a created
    /// volume, or on creation of a defined one.
    pub fn set_volume_range(&mut self, min: f64, max: f64) -> Result<()> {
        if self.volume.is_some() {
            let (_, volume) = self.parts_mut()?;
            return volume.set_volume_range(min, max);
        }
        let state = self.state.as_mut().ok_or(MincError::NotInitialized)?;
        state.pending_volume_range = Some((min, max));
        Ok(())
    }

    /// Set the real value range of the slice holding the voxel at `start`,
    /// given in the active public order.
    pub fn set_slice_range(&mut self, start: &[u64], min: f64, max: f64) -> Result<()> {
        let (state, volume) = self.parts_mut()?;
        if start.len() != state.ndims() {
            return Err(MincError::IncorrectDimensionality(state.ndims(), start.len()));
        }
        volume.set_slice_range(&order::to_file_order(start), min, max)
    }

    /// Real value range of the slice holding the voxel at `start`, given in
    /// the active public order.
    pub fn slice_range(&self, start: &[u64]) -> Result<(f64, f64)> {
        let (state, volume) = self.parts()?;
        if start.len() != state.ndims() {
            return Err(MincError::IncorrectDimensionality(state.ndims(), start.len()));
        }
        volume.slice_range(&order::to_file_order(start))
    }

    /// Global real value range.
    pub fn volume_range(&self) -> Result<(f64, f64)> {
        let (_, volume) = self.parts()?;
        volume.volume_range()
    }

    /// Range of the stored voxel values.
    pub fn valid_range(&self) -> Result<(f64, f64)> {
        let (_, volume) = self.parts()?;
        volume.valid_range()
    }
}

/// Push the standardized order to the engine and build the matching
/// representation descriptors. Handles switched to positive voxel order are
/// recorded in `positive`.
fn apply_standard_order<V: NativeVolume>(
    volume: &mut V,
    state: &VolumeState,
    plan: &[usize],
    positive: &mut Vec<DimensionId>,
) -> Result<Vec<Dimension>> {
    let ndims = state.ndims();
    let mut apparent = vec![DimensionId(0); ndims];
    let mut representation = Vec::with_capacity(ndims + 1);
    for (j, &axis) in plan.iter().enumerate() {
        let id = state.file_dims[order::file_index(ndims, axis)];
        let mut dim = state.store_dims[axis];
        if dim.kind != DimensionKind::Vector {
            volume.set_dimension_apparent_voxel_order(id, VoxelOrder::Positive)?;
            positive.push(id);
        }
        // positive order may flip the step and move the start
        dim.step = volume.dimension_separation(id, DimensionOrder::Apparent)?;
        dim.start = volume.dimension_start(id, DimensionOrder::Apparent)?;
        representation.push(dim);
        apparent[order::file_index(ndims, j)] = id;
    }
    volume.set_apparent_dimension_order(&apparent)?;
    Ok(representation)
}

impl<E: StorageEngine> fmt::Debug for Minc2File<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Minc2File")
            .field("open", &self.volume.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl<E: StorageEngine> Drop for Minc2File<E> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("failed to close volume: {}", e);
        }
    }
}
