mod util;
mod tests {
    use pyrs::prelude::*;

    use super::util::{fixture, PYTHON};

    fn call_with_arities() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            assert!(fixture("make_empty").call0().unwrap().is_none());

            let arg = Handle::new("hello").unwrap();
            let res = fixture("echo").call1(&arg).unwrap();
            assert!(res.is_same(&arg));

            let a = Scalar::from_int(6).unwrap();
            let b = Scalar::from_int(7).unwrap();
            let res = fixture("multiply").call2(&a, &b).unwrap();
            assert_eq!(res.unbox::<i64>().unwrap(), 42);

            let args = [Handle::new(1.5f64).unwrap(), Handle::new(4i64).unwrap()];
            let res = fixture("multiply").call(&args).unwrap();
            assert_eq!(res.unbox::<f64>().unwrap(), 6.0);

            let s = Handle::new("ab").unwrap();
            let res = fixture("multiply").call2(&s, &b).unwrap();
            assert_eq!(res.unbox::<String>().unwrap(), "ab".repeat(7));
        });
    }

    fn call_builtins() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let builtins = Module::builtins().unwrap();
            let max = builtins.function("max").unwrap();
            let values = [3i64, 9, 2]
                .into_iter()
                .map(|v| Handle::new(v).unwrap())
                .collect::<Vec<_>>();
            let res = max.call(&values).unwrap();
            assert_eq!(res.unbox::<i64>().unwrap(), 9);

            let list = List::from_values([1i64, 2, 3]).unwrap();
            let len = builtins.function("len").unwrap().call1(&list).unwrap();
            assert_eq!(len.unbox::<i64>().unwrap(), 3);
        });
    }

    fn call_with_keywords() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let greet = fixture("greet");
            let name = Handle::new("pyrs").unwrap();
            assert_eq!(
                greet.call1(&name).unwrap().unbox::<String>().unwrap(),
                "Hello, pyrs!"
            );

            let kw = Dict::new().unwrap();
            kw.set("greeting", &Handle::new("Hi").unwrap()).unwrap();
            let greet_kw = greet.with_keywords(&kw);
            assert!(greet_kw.function().as_handle().is_same(&greet));
            assert_eq!(greet_kw.keywords().len(), 1);
            assert_eq!(
                greet_kw.call1(&name).unwrap().unbox::<String>().unwrap(),
                "Hi, pyrs!"
            );

            kw.set("name", &Handle::new("everyone").unwrap()).unwrap();
            let res = greet.with_keywords(&kw).call0().unwrap();
            assert_eq!(res.unbox::<String>().unwrap(), "Hi, everyone!");

            let unknown = Dict::new().unwrap();
            unknown.set("unknown", &Handle::none()).unwrap();
            let err = greet.with_keywords(&unknown).call1(&name).unwrap_err();
            assert!(err.is_invocation_failure());
            assert_eq!(err.exception().unwrap().type_name(), "TypeError");
        });
    }

    fn invocation_failure() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let arg = Handle::new(1i64).unwrap();
            let err = fixture("echo_fail").call1(&arg).unwrap_err();
            assert!(err.is_invocation_failure());
            let exc = err.exception().unwrap();
            assert_eq!(exc.type_name(), "Exception");
            assert_eq!(exc.get_message(), "panic!");

            let err = fixture("multiply").call1(&arg).unwrap_err();
            assert!(err.is_invocation_failure());

            let zero = Handle::new(0i64).unwrap();
            let div = Module::import("operator")
                .unwrap()
                .function("truediv")
                .unwrap();
            let err = div.call2(&arg, &zero).unwrap_err();
            assert_eq!(err.exception().unwrap().type_name(), "ZeroDivisionError");

            // No exception is left pending after a failed call.
            assert_eq!(fixture("echo").call1(&arg).unwrap().unbox::<i64>().unwrap(), 1);
        });
    }

    fn call_non_callable() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let value = Handle::new(3i64).unwrap();
            let err = value.call0().unwrap_err();
            assert!(err.is_invocation_failure());
            assert!(value.cast::<Callable>().unwrap_err().is_type_mismatch());
        });
    }

    fn methods_and_classes() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let module = Module::import("fixtures").unwrap();
            let hoge = module.function("Hoge").unwrap().call0().unwrap();
            let set = hoge.get_attr("set").unwrap().cast::<Callable>().unwrap();
            set.call1(&Handle::new(1.5f64).unwrap()).unwrap();

            let get = hoge.get_attr("get").unwrap();
            assert_eq!(get.call0().unwrap().unbox::<f64>().unwrap(), 1.5);

            let heavy = module.function("heavy_task").unwrap();
            let res = heavy.call1(&hoge).unwrap();
            assert!(res.is_same(&hoge));
        });
    }

    #[test]
    fn call_tests() {
        call_with_arities();
        call_builtins();
        call_with_keywords();
        invocation_failure();
        call_non_callable();
        methods_and_classes();
    }
}
