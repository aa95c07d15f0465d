mod util;
mod tests {
    use pyrs::prelude::*;

    use super::util::{fixture, PYTHON};

    fn set_get_delete() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let dict = Dict::new().unwrap();
            assert!(dict.is_empty());

            dict.set("a", &Handle::new(1i64).unwrap()).unwrap();
            dict.set("b", &Handle::new(2i64).unwrap()).unwrap();
            dict.set("a", &Handle::new(3i64).unwrap()).unwrap();
            assert_eq!(dict.len(), 2);
            assert_eq!(dict.get("a").unwrap().unbox::<i64>().unwrap(), 3);

            assert!(dict.contains("b"));
            dict.delete("b").unwrap();
            assert!(!dict.contains("b"));
            assert_eq!(dict.len(), 1);

            let err = dict.get("b").unwrap_err();
            assert!(err.is_key_not_found());
            assert_eq!(err.to_string(), "Access error: key 'b' not found");
            assert!(dict.delete("b").unwrap_err().is_key_not_found());
        });
    }

    fn object_keys() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let dict = fixture("make_dict").call0().unwrap().cast::<Dict>().unwrap();
            assert_eq!(dict.len(), 3);

            assert_eq!(dict.get(&0i64).unwrap().unbox::<String>().unwrap(), "str");
            // 1 == 1.0 and both hash to the same value.
            assert_eq!(dict.get(&1i64).unwrap().unbox::<i64>().unwrap(), 10);
            let one = Handle::new(1.0f64).unwrap();
            assert_eq!(dict.get(&one).unwrap().unbox::<i64>().unwrap(), 10);
            assert_eq!(dict.get("key2").unwrap().unbox::<f64>().unwrap(), 0.1);

            let keys = dict.keys().unwrap();
            assert_eq!(keys.len(), 3);
            assert_eq!(keys.get(2).unwrap().unbox::<String>().unwrap(), "key2");

            let values = dict.values().unwrap();
            assert_eq!(values.get(1).unwrap().unbox::<i64>().unwrap(), 10);

            let pairs = dict.to_vec().unwrap();
            assert_eq!(pairs.len(), 3);
            assert_eq!(pairs[0].0.unbox::<i64>().unwrap(), 0);
            assert_eq!(pairs[0].1.unbox::<String>().unwrap(), "str");
        });
    }

    fn unhashable_keys() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let dict = Dict::new().unwrap();
            let key = List::empty().unwrap();

            assert!(!dict.contains(&key));
            assert!(dict.delete(&key).unwrap_err().is_key_not_found());

            let err = dict.set(&key, &Handle::none()).unwrap_err();
            assert_eq!(err.exception().unwrap().type_name(), "TypeError");

            let err = dict.get(&key).unwrap_err();
            assert!(!err.is_key_not_found());
            assert!(err.exception().is_some());
        });
    }

    fn from_pairs() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let one = Handle::new(1i64).unwrap();
            let two = Handle::new(2i64).unwrap();
            let dict = Dict::from_pairs([("x", &one), ("y", &two), ("x", &two)]).unwrap();

            assert_eq!(dict.len(), 2);
            assert!(dict.get("x").unwrap().is_same(&two));

            let echoed = fixture("echo").call1(&dict).unwrap().cast::<Dict>().unwrap();
            echoed.set("z", &one).unwrap();
            assert!(dict.contains("z"));
        });
    }

    #[test]
    fn dict_tests() {
        set_get_delete();
        object_keys();
        unhashable_keys();
        from_pairs();
    }
}
