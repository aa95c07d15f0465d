mod util;
mod tests {
    use pyrs::prelude::*;

    use super::util::{fixture, PYTHON};

    fn create_tuple() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let values = [
                Handle::new(0i64).unwrap(),
                Handle::new("hello").unwrap(),
                Handle::new(12.5f64).unwrap(),
            ];
            let tuple = Tuple::new(&values).unwrap();
            assert_eq!(tuple.len(), 3);
            assert!(!tuple.is_empty());
            assert!(tuple.get(1).unwrap().is_same(&values[1]));

            let empty = Tuple::empty().unwrap();
            assert!(empty.is_empty());
            assert_eq!(empty.display_string().unwrap(), "()");
        });
    }

    fn echo_tuple() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let values = [
                Handle::new(0i64).unwrap(),
                Handle::new("hello").unwrap(),
                Handle::new(12.5f64).unwrap(),
            ];
            let tuple = Tuple::new(&values).unwrap();

            let echoed = fixture("echo").call1(&tuple).unwrap();
            let echoed = echoed.cast::<Tuple>().unwrap();
            assert_eq!(echoed.len(), 3);
            assert_eq!(echoed.get(0).unwrap().unbox::<i64>().unwrap(), 0);
            assert_eq!(echoed.get(1).unwrap().unbox::<String>().unwrap(), "hello");
            assert_eq!(echoed.get(2).unwrap().unbox::<f64>().unwrap(), 12.5);
        });
    }

    fn returned_tuple() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let tuple = fixture("make_tuple")
                .call0()
                .unwrap()
                .cast::<Tuple>()
                .unwrap();

            let items = tuple.to_vec().unwrap();
            assert_eq!(items.len(), 3);
            assert_eq!(items[0].unbox::<String>().unwrap(), "str");
            assert_eq!(items[1].unbox::<i64>().unwrap(), 10);
            assert_eq!(items[2].unbox::<f64>().unwrap(), 0.1);
        });
    }

    fn tuple_bounds() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let tuple = Tuple::from_values([1i64, 2, 3]).unwrap();
            assert!(tuple.get(-1).unwrap_err().is_index_out_of_range());
            assert!(tuple.get(3).unwrap_err().is_index_out_of_range());
            assert!(Tuple::empty().unwrap().get(0).unwrap_err().is_index_out_of_range());
            assert_eq!(tuple.get(2).unwrap().unbox::<i64>().unwrap(), 3);
        });
    }

    #[test]
    fn tuple_tests() {
        create_tuple();
        echo_tuple();
        returned_tuple();
        tuple_bounds();
    }
}
