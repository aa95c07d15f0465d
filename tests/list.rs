mod util;
mod tests {
    use pyrs::prelude::*;

    use super::util::{fixture, PYTHON};

    fn unbox_all(list: &List) -> Vec<i64> {
        list.to_vec()
            .unwrap()
            .iter()
            .map(|h| h.unbox::<i64>().unwrap())
            .collect()
    }

    fn mutate_list() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let list = List::empty().unwrap();
            assert!(list.is_empty());

            for i in 0..3i64 {
                list.append(&Handle::new(i).unwrap()).unwrap();
            }
            assert_eq!(unbox_all(&list), [0, 1, 2]);

            list.insert(0, &Handle::new(10i64).unwrap()).unwrap();
            list.insert(4, &Handle::new(20i64).unwrap()).unwrap();
            assert_eq!(unbox_all(&list), [10, 0, 1, 2, 20]);

            list.set(1, &Handle::new(5i64).unwrap()).unwrap();
            assert_eq!(list.get(1).unwrap().unbox::<i64>().unwrap(), 5);

            list.sort().unwrap();
            assert_eq!(unbox_all(&list), [1, 2, 5, 10, 20]);

            list.reverse().unwrap();
            assert_eq!(unbox_all(&list), [20, 10, 5, 2, 1]);

            let slice = list.slice(1, 3).unwrap();
            assert_eq!(unbox_all(&slice), [10, 5]);
            assert_eq!(unbox_all(&list.slice(3, 100).unwrap()), [2, 1]);
            assert!(list.slice(3, 1).unwrap().is_empty());

            let tuple = list.to_tuple().unwrap();
            list.append(&Handle::new(0i64).unwrap()).unwrap();
            assert_eq!(tuple.len(), 5);
            assert_eq!(list.len(), 6);
        });
    }

    fn list_bounds() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let list = List::from_values([1i64, 2, 3]).unwrap();
            let value = Handle::new(0i64).unwrap();

            assert!(list.get(-1).unwrap_err().is_index_out_of_range());
            assert!(list.get(3).unwrap_err().is_index_out_of_range());
            assert!(list.set(3, &value).unwrap_err().is_index_out_of_range());
            assert!(list.set(-1, &value).unwrap_err().is_index_out_of_range());
            assert!(list.insert(-1, &value).unwrap_err().is_index_out_of_range());
            assert!(list.insert(4, &value).unwrap_err().is_index_out_of_range());
            assert!(list.slice(-1, 2).unwrap_err().is_index_out_of_range());
            assert!(list.slice(0, -2).unwrap_err().is_index_out_of_range());

            assert_eq!(unbox_all(&list), [1, 2, 3]);
        });
    }

    fn sort_mixed_fails() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let list = fixture("make_list").call0().unwrap().cast::<List>().unwrap();
            let err = list.sort().unwrap_err();
            assert_eq!(err.exception().unwrap().type_name(), "TypeError");
        });
    }

    fn shared_mutation() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let list = List::from_values(["a", "b"]).unwrap();
            let echoed = fixture("echo").call1(&list).unwrap().cast::<List>().unwrap();
            echoed.append(&Handle::new("c").unwrap()).unwrap();

            assert_eq!(list.len(), 3);
            assert_eq!(list.get(2).unwrap().unbox::<String>().unwrap(), "c");
        });
    }

    #[test]
    fn list_tests() {
        mutate_list();
        list_bounds();
        sort_mixed_fails();
        shared_mutation();
    }
}
