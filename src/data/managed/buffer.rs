//! Raw memory exported by Python objects.
//!
//! Objects like `bytes`, `bytearray`, `array.array`, `memoryview` and NumPy arrays export their
//! memory through the buffer protocol. Casting such an object to a [`Buffer`] acquires a view of
//! that memory: its base address, element size, total length, format and the shape and byte
//! strides of every dimension. The element at multi-index `(i0, ..., ik)` is located at
//! `data + i0 * strides[0] + ... + ik * strides[k]`; strides can be negative and aren't
//! necessarily derived from the shape.
//!
//! The view is released when the last clone of the `Buffer` is dropped. This is independent of
//! the handle of the exporting object, which the buffer keeps alive. While a view exists the
//! exporter can't be resized. The memory itself is not synchronized, concurrent writers must
//! coordinate access themselves.
//!
//! Elements can be read and written without unsafe code with [`Buffer::get`] and
//! [`Buffer::set`], which check the index and element type first. [`Buffer::data`] returns the
//! base address for direct access.

use std::{
    mem::{self, size_of},
    os::raw::c_char,
    sync::Arc,
};

use pyo3_ffi as ffi;
use smallvec::SmallVec;

use super::{handle::Handle, private::ManagedPriv, Managed};
use crate::{
    catch::{c_string, take_exception_or},
    data::types::typecheck::{impl_python_typecheck, is_buffer},
    error::{AccessError, PyrsResult, TypeError},
    private::Private,
    runtime::state,
};

/// The kind of data stored in a buffer, derived from its format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Signed,
    Unsigned,
    Float,
    Bool,
    /// Structs, pointers, non-native byte orders and other formats that can only be accessed
    /// as raw memory.
    Other,
}

impl ElementKind {
    /// Derive the element kind from a format string as used by the `struct` module.
    pub fn from_format(format: &str) -> Self {
        let (order, code) = match format.as_bytes() {
            [order @ (b'@' | b'=' | b'<' | b'>' | b'!'), rest @ ..] => (Some(*order), rest),
            rest => (None, rest),
        };

        let native = match order {
            Some(b'<') => cfg!(target_endian = "little"),
            Some(b'>') | Some(b'!') => cfg!(target_endian = "big"),
            _ => true,
        };

        if !native {
            return ElementKind::Other;
        }

        match code {
            [b'b' | b'h' | b'i' | b'l' | b'q' | b'n'] => ElementKind::Signed,
            [b'B' | b'H' | b'I' | b'L' | b'Q' | b'N' | b'c'] => ElementKind::Unsigned,
            [b'e' | b'f' | b'd'] => ElementKind::Float,
            [b'?'] => ElementKind::Bool,
            _ => ElementKind::Other,
        }
    }
}

/// Types that can be read from and written to a buffer.
///
/// Safety: every bit pattern of `size_of::<Self>()` bytes in a buffer whose format has kind
/// `KIND` must be a valid instance of `Self`.
pub unsafe trait Element: Copy {
    /// The kind of formats this type is compatible with.
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($kind:ident => $($type:ty),+) => {
        $(
            unsafe impl Element for $type {
                const KIND: ElementKind = ElementKind::$kind;
            }
        )+
    };
}

impl_element!(Signed => i8, i16, i32, i64, isize);
impl_element!(Unsigned => u8, u16, u32, u64, usize);
impl_element!(Float => f32, f64);

struct View(Box<ffi::Py_buffer>);

// The view is only accessed while the interpreter lock is held, or to read the exported memory
// which isn't synchronized by Python either.
unsafe impl Send for View {}
unsafe impl Sync for View {}

impl Drop for View {
    fn drop(&mut self) {
        if !state::is_init() {
            return;
        }

        unsafe {
            let gstate = ffi::PyGILState_Ensure();
            ffi::PyBuffer_Release(&mut *self.0);
            ffi::PyGILState_Release(gstate);
        }
    }
}

/// A view of the memory exported by a Python object.
#[derive(Clone)]
pub struct Buffer {
    handle: Handle,
    view: Arc<View>,
}

impl Buffer {
    fn acquire(handle: Handle) -> PyrsResult<Self> {
        unsafe {
            // The exporter can store pointers into the view, so it must not move after this.
            let mut raw: Box<ffi::Py_buffer> = Box::new(mem::zeroed());

            if ffi::PyObject_GetBuffer(handle.as_ptr(), &mut *raw, ffi::PyBUF_RECORDS) != 0 {
                ffi::PyErr_Clear();
                if ffi::PyObject_GetBuffer(handle.as_ptr(), &mut *raw, ffi::PyBUF_RECORDS_RO) != 0
                {
                    let exc = take_exception_or("failed to acquire buffer");
                    tracing::debug!(%exc, "buffer acquisition failed");
                    Err(TypeError::TypeMismatch {
                        expected: "Buffer".into(),
                        found: handle.type_name(),
                    })?
                }
            }

            Ok(Buffer {
                handle,
                view: Arc::new(View(raw)),
            })
        }
    }

    #[inline]
    fn raw(&self) -> &ffi::Py_buffer {
        &self.view.0
    }

    /// Returns the base address of the memory.
    pub fn data(&self) -> *mut u8 {
        self.raw().buf.cast()
    }

    /// Returns the base address of the memory as a pointer to `T`. The caller is responsible
    /// for interpreting the memory in accordance with [`Buffer::format`].
    pub fn data_as<T>(&self) -> *mut T {
        self.raw().buf.cast()
    }

    /// Returns the size of a single element in bytes.
    pub fn bytes_per_unit(&self) -> usize {
        self.raw().itemsize as usize
    }

    /// Returns the total size of the memory in bytes.
    pub fn len(&self) -> usize {
        self.raw().len as usize
    }

    /// Returns `true` if the buffer contains no data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the memory can't be written to.
    pub fn readonly(&self) -> bool {
        self.raw().readonly != 0
    }

    /// Returns the format of the elements as used by the `struct` module, e.g. `d` for `f64`.
    pub fn format(&self) -> String {
        unsafe { c_string(self.raw().format as *const c_char) }.unwrap_or_else(|| "B".into())
    }

    /// Returns the number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.raw().ndim as usize
    }

    /// Returns the number of elements in every dimension.
    pub fn shape(&self) -> Vec<usize> {
        self.layout().0.into_vec()
    }

    /// Returns the stride in bytes of every dimension.
    pub fn strides(&self) -> Vec<isize> {
        self.layout().1.into_vec()
    }

    /// Returns the offset in bytes of the element at `idx` relative to [`Buffer::data`].
    pub fn offset_of(&self, idx: &[usize]) -> PyrsResult<isize> {
        let (shape, strides) = self.layout();
        match offset(idx, &shape, &strides) {
            Some(offset) => Ok(offset),
            None => Err(AccessError::InvalidIndex {
                idx: idx.to_vec(),
                shape: shape.into_vec(),
            })?,
        }
    }

    /// Read the element at `idx`.
    pub fn get<T: Element>(&self, idx: &[usize]) -> PyrsResult<T> {
        self.check_element::<T>()?;
        let offset = self.offset_of(idx)?;
        unsafe { Ok(self.data().offset(offset).cast::<T>().read_unaligned()) }
    }

    /// Write `value` to the element at `idx`.
    pub fn set<T: Element>(&self, idx: &[usize], value: T) -> PyrsResult<()> {
        if self.readonly() {
            Err(TypeError::NotWritable)?
        }

        self.check_element::<T>()?;
        let offset = self.offset_of(idx)?;
        unsafe { self.data().offset(offset).cast::<T>().write_unaligned(value) };
        Ok(())
    }

    /// Copy all elements in row-major order.
    pub fn to_vec<T: Element>(&self) -> PyrsResult<Vec<T>> {
        self.check_element::<T>()?;
        let (shape, strides) = self.layout();
        let n_elems = shape.iter().product::<usize>();
        let mut elems = Vec::with_capacity(n_elems);

        if n_elems == 0 {
            return Ok(elems);
        }

        let mut idx: SmallVec<[usize; 4]> = SmallVec::from_elem(0, shape.len());
        loop {
            let offset: isize = idx
                .iter()
                .zip(strides.iter())
                .map(|(&i, &s)| i as isize * s)
                .sum();
            unsafe { elems.push(self.data().offset(offset).cast::<T>().read_unaligned()) };

            // Advance the last dimension first.
            let mut dim = shape.len();
            loop {
                if dim == 0 {
                    return Ok(elems);
                }

                dim -= 1;
                idx[dim] += 1;
                if idx[dim] < shape[dim] {
                    break;
                }

                idx[dim] = 0;
            }
        }
    }

    fn check_element<T: Element>(&self) -> PyrsResult<()> {
        let format = self.format();
        if size_of::<T>() != self.bytes_per_unit() || ElementKind::from_format(&format) != T::KIND
        {
            Err(TypeError::IncompatibleElement {
                format,
                size: size_of::<T>(),
            })?
        }

        Ok(())
    }

    fn layout(&self) -> (SmallVec<[usize; 4]>, SmallVec<[isize; 4]>) {
        let raw = self.raw();
        let ndim = raw.ndim as usize;
        let itemsize = raw.itemsize as isize;

        if ndim == 0 {
            return (SmallVec::new(), SmallVec::new());
        }

        let shape: SmallVec<[usize; 4]> = if raw.shape.is_null() {
            let n = if itemsize == 0 { 0 } else { raw.len / raw.itemsize };
            SmallVec::from_elem(n as usize, 1)
        } else {
            unsafe { std::slice::from_raw_parts(raw.shape, ndim) }
                .iter()
                .map(|&n| n as usize)
                .collect()
        };

        let strides: SmallVec<[isize; 4]> = if raw.strides.is_null() {
            contiguous_strides(&shape, itemsize)
        } else {
            unsafe { std::slice::from_raw_parts(raw.strides, ndim) }
                .iter()
                .map(|&s| s as isize)
                .collect()
        };

        (shape, strides)
    }
}

#[cfg(feature = "ndarray")]
impl Buffer {
    /// Borrow the memory as an `ArrayView`. Fails if the element type is incompatible, or if
    /// the data is misaligned or has negative strides.
    pub fn array_view<T: Element>(&self) -> PyrsResult<ndarray::ArrayViewD<'_, T>> {
        use ndarray::ShapeBuilder;

        self.check_element::<T>()?;
        if self.data() as usize % mem::align_of::<T>() != 0 {
            Err(AccessError::IncompatibleStrides)?
        }

        let (shape, strides) = self.layout();
        let size = size_of::<T>() as isize;
        let mut elem_strides = Vec::with_capacity(strides.len());
        for &stride in strides.iter() {
            if stride < 0 || stride % size != 0 {
                Err(AccessError::IncompatibleStrides)?
            }

            elem_strides.push((stride / size) as usize);
        }

        let shape = ndarray::IxDyn(&shape).strides(ndarray::IxDyn(&elem_strides));
        unsafe {
            Ok(ndarray::ArrayView::from_shape_ptr(
                shape,
                self.data_as::<T>() as *const T,
            ))
        }
    }
}

impl ManagedPriv for Buffer {
    #[inline]
    fn wrap(handle: Handle, _: Private) -> PyrsResult<Self> {
        Buffer::acquire(handle)
    }

    #[inline]
    fn handle(&self, _: Private) -> &Handle {
        &self.handle
    }

    #[inline]
    fn unwrap_handle(self, _: Private) -> Handle {
        self.handle
    }
}

impl Managed for Buffer {}

impl_debug!(Buffer);
impl_display!(Buffer);
impl_compare!(Buffer);
crate::convert::into_python::impl_into_python_managed!(Buffer);
crate::convert::to_key::impl_to_key_managed!(Buffer);
impl_python_typecheck!(Buffer, "Buffer", is_buffer);

fn contiguous_strides(shape: &[usize], itemsize: isize) -> SmallVec<[isize; 4]> {
    let mut strides: SmallVec<[isize; 4]> = SmallVec::from_elem(0, shape.len());
    let mut stride = itemsize;
    for (dim, &n) in shape.iter().enumerate().rev() {
        strides[dim] = stride;
        stride *= n as isize;
    }

    strides
}

fn offset(idx: &[usize], shape: &[usize], strides: &[isize]) -> Option<isize> {
    if idx.len() != shape.len() {
        return None;
    }

    let mut offset = 0;
    for ((&i, &n), &stride) in idx.iter().zip(shape).zip(strides) {
        if i >= n {
            return None;
        }

        offset += i as isize * stride;
    }

    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_kind_from_format() {
        assert_eq!(ElementKind::from_format("d"), ElementKind::Float);
        assert_eq!(ElementKind::from_format("@f"), ElementKind::Float);
        assert_eq!(ElementKind::from_format("q"), ElementKind::Signed);
        assert_eq!(ElementKind::from_format("=L"), ElementKind::Unsigned);
        assert_eq!(ElementKind::from_format("B"), ElementKind::Unsigned);
        assert_eq!(ElementKind::from_format("?"), ElementKind::Bool);
        assert_eq!(ElementKind::from_format("T{<d:x:<d:y:}"), ElementKind::Other);
        assert_eq!(ElementKind::from_format(""), ElementKind::Other);

        if cfg!(target_endian = "little") {
            assert_eq!(ElementKind::from_format("<i"), ElementKind::Signed);
            assert_eq!(ElementKind::from_format(">i"), ElementKind::Other);
        }
    }

    #[test]
    fn contiguous_strides_are_row_major() {
        assert_eq!(contiguous_strides(&[2, 3], 8).as_slice(), &[24, 8]);
        assert_eq!(contiguous_strides(&[4], 2).as_slice(), &[2]);
        assert!(contiguous_strides(&[], 8).is_empty());
    }

    #[test]
    fn offsets_follow_strides() {
        assert_eq!(offset(&[1, 2], &[2, 3], &[24, 8]), Some(40));
        assert_eq!(offset(&[0, 0], &[2, 3], &[24, 8]), Some(0));
        assert_eq!(offset(&[2], &[3], &[-8]), Some(-16));
        assert_eq!(offset(&[2, 0], &[2, 3], &[24, 8]), None);
        assert_eq!(offset(&[0], &[2, 3], &[24, 8]), None);
    }
}
