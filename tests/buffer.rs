mod util;
mod tests {
    use pyrs::{error::{AccessError, PyrsError, TypeError}, prelude::*};

    use super::util::{fixture, PYTHON};

    fn two_by_three() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let buffer = fixture("make_buffer")
                .call0()
                .unwrap()
                .cast::<Buffer>()
                .unwrap();

            assert_eq!(buffer.format(), "d");
            assert_eq!(buffer.bytes_per_unit(), 8);
            assert_eq!(buffer.dimensions(), 2);
            assert_eq!(buffer.shape(), [2, 3]);
            assert_eq!(buffer.strides(), [24, 8]);
            assert_eq!(buffer.len(), 48);
            assert!(!buffer.readonly());

            assert_eq!(
                buffer.to_vec::<f64>().unwrap(),
                [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
            );
            assert_eq!(buffer.get::<f64>(&[1, 0]).unwrap(), 4.0);
            assert_eq!(buffer.offset_of(&[1, 2]).unwrap(), 40);
            let first = unsafe { *buffer.data_as::<f64>() };
            assert_eq!(first, 1.0);
        });
    }

    fn write_through() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let buffer = fixture("make_buffer")
                .call0()
                .unwrap()
                .cast::<Buffer>()
                .unwrap();

            buffer.set(&[1, 2], 60.0f64).unwrap();
            let sum = fixture("buffer_sum").call1(&buffer).unwrap();
            assert_eq!(sum.unbox::<f64>().unwrap(), 75.0);
        });
    }

    fn strided() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let buffer = fixture("make_strided_buffer")
                .call0()
                .unwrap()
                .cast::<Buffer>()
                .unwrap();

            assert_eq!(buffer.shape(), [3]);
            assert_eq!(buffer.strides(), [16]);
            assert_eq!(buffer.to_vec::<f64>().unwrap(), [0.0, 2.0, 4.0]);
            assert_eq!(buffer.get::<f64>(&[2]).unwrap(), 4.0);
        });
    }

    fn invalid_access() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let buffer = fixture("make_buffer")
                .call0()
                .unwrap()
                .cast::<Buffer>()
                .unwrap();

            let err = buffer.get::<f64>(&[2, 0]).unwrap_err();
            assert!(matches!(
                *err,
                PyrsError::AccessError(AccessError::InvalidIndex { .. })
            ));
            assert!(buffer.get::<f64>(&[0]).is_err());

            let err = buffer.get::<i64>(&[0, 0]).unwrap_err();
            assert!(matches!(
                *err,
                PyrsError::TypeError(TypeError::IncompatibleElement { .. })
            ));
            assert!(buffer.to_vec::<f32>().is_err());

            let ints = fixture("make_int_buffer")
                .call0()
                .unwrap()
                .cast::<Buffer>()
                .unwrap();
            assert_eq!(ints.to_vec::<i32>().unwrap(), [1, 2, 3, 4]);
            assert!(ints.to_vec::<u32>().is_err());
        });
    }

    fn readonly_bytes() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let buffer = Scalar::from_bytes(b"pyrs")
                .unwrap()
                .as_handle()
                .cast::<Buffer>()
                .unwrap();

            assert!(buffer.readonly());
            assert_eq!(buffer.format(), "B");
            assert_eq!(buffer.to_vec::<u8>().unwrap(), b"pyrs");

            let err = buffer.set(&[0], b'P').unwrap_err();
            assert!(matches!(*err, PyrsError::TypeError(TypeError::NotWritable)));
        });
    }

    fn not_a_buffer() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let list = List::from_values([1.0f64, 2.0]).unwrap();
            let err = list.as_handle().cast::<Buffer>().unwrap_err();
            assert!(err.is_type_mismatch());
        });
    }

    fn buffer_outlives_handle() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let handle = fixture("make_buffer").call0().unwrap();
            let buffer = handle.cast::<Buffer>().unwrap();
            std::mem::drop(handle);

            let copy = buffer.clone();
            std::mem::drop(buffer);
            assert_eq!(copy.get::<f64>(&[0, 1]).unwrap(), 2.0);
        });
    }

    #[cfg(feature = "ndarray")]
    fn array_view() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let buffer = fixture("make_buffer")
                .call0()
                .unwrap()
                .cast::<Buffer>()
                .unwrap();

            let view = buffer.array_view::<f64>().unwrap();
            assert_eq!(view.shape(), &[2, 3]);
            assert_eq!(view[&[1, 2][..]], 6.0);
        });
    }

    #[test]
    fn buffer_tests() {
        two_by_three();
        write_through();
        strided();
        invalid_access();
        readonly_bytes();
        not_a_buffer();
        buffer_outlives_handle();
        #[cfg(feature = "ndarray")]
        array_view();
    }
}
