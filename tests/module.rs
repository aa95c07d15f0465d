mod util;
mod tests {
    use std::fs;

    use pyrs::{error::RuntimeError, prelude::*};

    use super::util::{scripts_dir, FIXTURES_PY, PYTHON};

    fn import_modules() {
        PYTHON.with(|p| {
            let python = p.borrow();

            let fixtures = python.import("fixtures").unwrap();
            assert_eq!(fixtures.name().unwrap(), "fixtures");
            assert!(fixtures.function("echo").is_ok());

            let again = Module::import("fixtures").unwrap();
            assert!(again.as_handle().is_same(&fixtures));

            let path = Module::import("os.path").unwrap();
            assert_eq!(path.name().unwrap(), "posixpath");

            assert_eq!(Module::builtins().unwrap().name().unwrap(), "builtins");
            assert!(!python.version().is_empty());
        });
    }

    fn import_failure() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let err = Module::import("no_such_module").unwrap_err();
            assert!(err.is_module_load_failure());
            assert_eq!(
                err.exception().unwrap().type_name(),
                "ModuleNotFoundError"
            );

            let err = Module::from_source("broken", "def broken(:\n    pass\n").unwrap_err();
            assert!(err.is_module_load_failure());
            assert_eq!(err.exception().unwrap().type_name(), "SyntaxError");

            let err = Module::from_source("raising", "raise RuntimeError('boom')\n").unwrap_err();
            assert!(err.is_module_load_failure());
            assert_eq!(err.exception().unwrap().get_message(), "boom");
        });
    }

    fn module_from_source() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let module = Module::from_source("fixtures_copy", FIXTURES_PY).unwrap();
            assert_eq!(module.name().unwrap(), "fixtures_copy");

            let a = Handle::new(3i64).unwrap();
            let b = Handle::new(5i64).unwrap();
            let res = module.function("multiply").unwrap().call2(&a, &b).unwrap();
            assert_eq!(res.unbox::<i64>().unwrap(), 15);

            // Modules created from source can be imported afterwards.
            let imported = Module::import("fixtures_copy").unwrap();
            assert!(imported.as_handle().is_same(&module));
        });
    }

    fn globals() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let module = Module::from_source("globals", "answer = 42\n").unwrap();
            assert_eq!(module.global("answer").unwrap().unbox::<i64>().unwrap(), 42);

            module
                .set_global("question", &Handle::new("unknown").unwrap())
                .unwrap();
            assert_eq!(
                module.global("question").unwrap().unbox::<String>().unwrap(),
                "unknown"
            );

            assert!(module.global("missing").is_err());
            assert!(module
                .function("answer")
                .unwrap_err()
                .is_type_mismatch());
        });
    }

    fn add_module_directory() {
        PYTHON.with(|p| {
            let python = p.borrow();

            let dir = tempfile::tempdir().unwrap();
            fs::write(
                dir.path().join("extra_module.py"),
                "def triple(x):\n    return 3 * x\n",
            )
            .unwrap();

            assert!(Module::import("extra_module").is_err());
            python.add_module_directory(dir.path()).unwrap();
            Module::import("importlib")
                .unwrap()
                .function("invalidate_caches")
                .unwrap()
                .call0()
                .unwrap();

            let module = Module::import("extra_module").unwrap();
            let arg = Handle::new(7i64).unwrap();
            let res = module.function("triple").unwrap().call1(&arg).unwrap();
            assert_eq!(res.unbox::<i64>().unwrap(), 21);
        });
    }

    fn runtime_starts_once() {
        PYTHON.with(|p| {
            let _python = p.borrow();

            let res = unsafe { RuntimeBuilder::new().module_directory(scripts_dir()).start() };
            match res {
                Err(e) => assert!(matches!(
                    *e,
                    PyrsError::RuntimeError(RuntimeError::AlreadyInitialized)
                )),
                Ok(_) => panic!("runtime started twice"),
            }
        });
    }

    #[test]
    fn module_tests() {
        import_modules();
        import_failure();
        module_from_source();
        globals();
        add_module_directory();
        runtime_starts_once();
    }
}
