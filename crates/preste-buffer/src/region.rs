//! Régions mémoire directes : allocations à adresse stable et vues exportées.
//!
//! [`NativeRegion`] est l'équivalent d'un buffer « direct » alloué hors du
//! contrôle du runtime : une plage d'octets à adresse fixe, épinglée par `Arc`
//! aussi longtemps qu'un buffer ou une vue la référence. [`RegionView`] est la
//! vue exportée qu'un collaborateur externe (adaptateur de canal, copie I/O)
//! reçoit d'un buffer ; elle transporte son propriétaire.

use std::any::Any;
use std::cell::UnsafeCell;
use std::fmt;
use std::ptr;
use std::slice;
use std::sync::Arc;

use crate::error::{BufferError, BufferResult};

/// Largest span a single region or buffer may cover.
///
/// Keeping every range below this bound guarantees `base + size` never
/// overflows address arithmetic, which the subtraction-form bounds checks
/// rely on.
pub(crate) const MAX_RANGE: usize = i32::MAX as usize;

/// A byte region with a stable address, usable as off-heap buffer storage.
///
/// The region either owns its allocation (freed on drop) or wraps an
/// externally managed range (never freed here). Buffers constructed over a
/// region hold it through an [`Arc`], so the memory outlives every buffer and
/// slice that references it.
pub struct NativeRegion {
    ptr: *mut u8,
    len: usize,
    read_only: bool,
    backing: Backing,
}

enum Backing {
    /// Allocation owned by the region; dropped with it.
    Owned { _buf: UnsafeCell<Box<[u8]>> },
    /// Externally managed range; the region never frees it.
    Foreign,
}

// A region is a single-owner value whose aliases are coordinated by the
// caller (same contract as `MemBuffer`).
unsafe impl Send for NativeRegion {}
unsafe impl Sync for NativeRegion {}

impl NativeRegion {
    /// Allocates a zeroed region of `len` bytes.
    pub fn allocate(len: usize) -> Self {
        Self::from_vec(vec![0u8; len])
    }

    /// Takes ownership of `bytes` and exposes them at a stable address.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let buf = UnsafeCell::new(bytes.into_boxed_slice());
        let (ptr, len) = unsafe {
            let b = &mut *buf.get();
            (b.as_mut_ptr(), b.len())
        };
        Self { ptr, len, read_only: false, backing: Backing::Owned { _buf: buf } }
    }

    /// Wraps an externally managed range without taking ownership.
    ///
    /// Fails with [`BufferError::InvalidArgument`] on a null pointer or when
    /// the address is too close to the top of the address space for range
    /// arithmetic to stay overflow-free.
    ///
    /// # Safety
    ///
    /// `ptr` must stay valid for reads (and writes unless `read_only`) of
    /// `len` bytes for the whole lifetime of the region and of every buffer
    /// or view created over it.
    pub unsafe fn from_raw(ptr: *mut u8, len: usize, read_only: bool) -> BufferResult<Self> {
        if ptr.is_null() {
            return Err(BufferError::invalid_argument("null region pointer"));
        }
        if len > MAX_RANGE || ptr as usize > usize::MAX - MAX_RANGE {
            return Err(BufferError::invalid_argument("region address range overflow"));
        }
        Ok(Self { ptr, len, read_only, backing: Backing::Foreign })
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the region is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the region.
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// True when writes through this region are forbidden.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read access to the whole region.
    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Exports the whole region as a view pinning `self`.
    pub fn view(self: &Arc<Self>) -> RegionView {
        RegionView {
            ptr: self.ptr,
            len: self.len,
            read_only: self.read_only,
            _owner: Some(self.clone() as Arc<dyn Any + Send + Sync>),
        }
    }

    /// True when the region owns (and will free) its allocation.
    pub fn owns_allocation(&self) -> bool {
        matches!(self.backing, Backing::Owned { .. })
    }
}

impl fmt::Debug for NativeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegion")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("read_only", &self.read_only)
            .field("owned", &self.owns_allocation())
            .finish()
    }
}

/// Exported view over a sub-range of a buffer or region.
///
/// The view pins its backing storage (heap chunk or native region), so it
/// stays valid after the originating buffer is dropped or re-grown. Transfers
/// copy whole slices and report [`BufferError::Overflow`] /
/// [`BufferError::Underflow`] when one side is too small.
pub struct RegionView {
    ptr: *mut u8,
    len: usize,
    read_only: bool,
    _owner: Option<Arc<dyn Any + Send + Sync>>,
}

unsafe impl Send for RegionView {}

impl RegionView {
    pub(crate) fn new(
        ptr: *mut u8,
        len: usize,
        read_only: bool,
        owner: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Self {
        Self { ptr, len, read_only, _owner: owner }
    }

    /// Length of the view in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the view is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Base address of the view.
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// True when writes through this view are forbidden.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read access to the viewed bytes.
    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Fills `dst` entirely from the start of the view.
    ///
    /// Fails with [`BufferError::Underflow`] when the view holds fewer bytes
    /// than `dst` expects.
    pub fn read_into(&self, dst: &mut [u8]) -> BufferResult<()> {
        if dst.len() > self.len {
            return Err(BufferError::Underflow { need: dst.len(), remaining: self.len });
        }
        unsafe { ptr::copy_nonoverlapping(self.ptr, dst.as_mut_ptr(), dst.len()) };
        Ok(())
    }

    /// Copies `src` entirely into the start of the view.
    ///
    /// Fails with [`BufferError::ReadOnly`] on a read-only view and with
    /// [`BufferError::Overflow`] when the view is too small for `src`.
    pub fn write_from(&mut self, src: &[u8]) -> BufferResult<()> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        if src.len() > self.len {
            return Err(BufferError::Overflow { need: src.len(), remaining: self.len });
        }
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), self.ptr, src.len()) };
        Ok(())
    }
}

impl fmt::Debug for RegionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionView")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("read_only", &self.read_only)
            .finish()
    }
}
