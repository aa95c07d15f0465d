use std::{cell::RefCell, path::PathBuf};

use pyrs::prelude::*;
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub static FIXTURES_PY: &'static str = include_str!("../scripts/fixtures.py");

pub fn scripts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("scripts")
}

thread_local! {
    #[doc(hidden)]
    pub static PYTHON: RefCell<Python> = {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let python = unsafe {
            RuntimeBuilder::new()
                .module_directory(scripts_dir())
                .start()
                .unwrap()
        };

        RefCell::new(python)
    };
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> Callable {
    Module::import("fixtures").unwrap().function(name).unwrap()
}
